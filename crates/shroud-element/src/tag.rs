//! Custom element tag names.
//!
//! See <https://html.spec.whatwg.org/multipage/custom-elements.html#valid-custom-element-name>

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Names the HTML standard reserves even though they look like custom element names.
const RESERVED_NAMES: &[&str] = &[
    "annotation-xml",
    "color-profile",
    "font-face",
    "font-face-src",
    "font-face-uri",
    "font-face-format",
    "font-face-name",
    "missing-glyph",
];

/// A validated custom element tag name (e.g. `plop-counter`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TagName(String);

/// Reasons a string is not a valid custom element name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTagError {
    #[error("need a non-empty custom element tag")]
    Empty,

    #[error("a custom element tag should start with an ASCII lower case letter (a..z), having \"{0}\"")]
    InvalidStartingLetter(String),

    #[error("a custom element tag should contain an hyphen '-', having \"{0}\"")]
    NoHyphen(String),

    #[error("a custom element tag cannot contain an ASCII upper case letter, having \"{tag}\" containing '{ch}'")]
    HasUpperCase { ch: char, tag: String },

    #[error("invalid char for a custom element tag \"{tag}\" containing '{ch}'")]
    InvalidChar { ch: char, tag: String },

    #[error("this custom element tag is reserved \"{0}\"")]
    Reserved(String),
}

impl TagName {
    /// Validate and wrap a tag name.
    pub fn new(tag: &str) -> Result<Self, InvalidTagError> {
        check_tag(tag)?;
        Ok(Self(tag.to_owned()))
    }

    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// PascalCase class name derived from the tag, e.g. `plop-counter` -> `PlopCounter`.
    ///
    /// The result is a valid JavaScript identifier: characters other than
    /// ASCII letters, digits and `_` are written as `_` followed by their
    /// hex code point, e.g. `i-love-🦀` -> `ILove_1f980`.
    pub fn class_name(&self) -> String {
        let mut out = String::with_capacity(self.0.len());
        for part in self.0.split(['-', '.']) {
            for (i, c) in part.chars().enumerate() {
                match c {
                    'a'..='z' if i == 0 => out.push(c.to_ascii_uppercase()),
                    c if c.is_ascii_alphanumeric() || c == '_' => out.push(c),
                    c => out.push_str(&format!("_{:x}", u32::from(c))),
                }
            }
        }
        out
    }
}

impl FromStr for TagName {
    type Err = InvalidTagError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<&str> for TagName {
    type Error = InvalidTagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for TagName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for TagName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Check the tag validity.
fn check_tag(tag: &str) -> Result<(), InvalidTagError> {
    let Some(start) = tag.chars().next() else {
        return Err(InvalidTagError::Empty);
    };
    if !start.is_ascii_lowercase() {
        return Err(InvalidTagError::InvalidStartingLetter(tag.to_owned()));
    }
    if !tag.contains('-') {
        return Err(InvalidTagError::NoHyphen(tag.to_owned()));
    }
    if let Some(ch) = tag.chars().find(char::is_ascii_uppercase) {
        return Err(InvalidTagError::HasUpperCase {
            ch,
            tag: tag.to_owned(),
        });
    }
    if let Some(ch) = tag.chars().skip(1).find(|ch| !is_name_char(*ch)) {
        return Err(InvalidTagError::InvalidChar {
            ch,
            tag: tag.to_owned(),
        });
    }
    if RESERVED_NAMES.contains(&tag) {
        return Err(InvalidTagError::Reserved(tag.to_owned()));
    }

    Ok(())
}

fn is_name_char(ch: char) -> bool {
    matches!(ch, '-'
        | '.'
        | '0'..='9'
        | '_'
        | 'a'..='z'
        | '\u{00B7}'
        | '\u{00C0}'..='\u{00D6}'
        | '\u{00D8}'..='\u{00F6}'
        | '\u{00F8}'..='\u{037D}'
        | '\u{037F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{203F}'..='\u{2040}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_tags() {
        for tag in ["a-a", "my-custom-tag", "plop-counter", "x-1.2_3", "i-love-🦀"] {
            assert!(TagName::new(tag).is_ok(), "{tag} should be valid");
        }
    }

    #[test]
    fn rejects_invalid_tags() {
        assert_eq!(TagName::new(""), Err(InvalidTagError::Empty));
        assert!(matches!(
            TagName::new("-plop"),
            Err(InvalidTagError::InvalidStartingLetter(_))
        ));
        assert!(matches!(
            TagName::new("1-plop"),
            Err(InvalidTagError::InvalidStartingLetter(_))
        ));
        assert!(matches!(
            TagName::new("plop"),
            Err(InvalidTagError::NoHyphen(_))
        ));
        assert!(matches!(
            TagName::new("my-CustomTag"),
            Err(InvalidTagError::HasUpperCase { ch: 'C', .. })
        ));
        assert!(matches!(
            TagName::new("my-custom tag"),
            Err(InvalidTagError::InvalidChar { ch: ' ', .. })
        ));
    }

    #[test]
    fn rejects_reserved_names() {
        for tag in RESERVED_NAMES {
            assert_eq!(
                TagName::new(tag),
                Err(InvalidTagError::Reserved(tag.to_string()))
            );
        }
    }

    #[test]
    fn derives_class_name() {
        let tag = TagName::new("plop-counter").unwrap();
        assert_eq!(tag.class_name(), "PlopCounter");

        let tag = TagName::new("my-big-button").unwrap();
        assert_eq!(tag.class_name(), "MyBigButton");

        let tag = TagName::new("i-love-🦀").unwrap();
        assert_eq!(tag.class_name(), "ILove_1f980");

        let tag = TagName::new("x-1.2_3").unwrap();
        assert_eq!(tag.class_name(), "X12_3");
    }

    #[test]
    fn deserialize_validates() {
        let tag: TagName = serde_json::from_str("\"plop-greeting\"").unwrap();
        assert_eq!(tag.as_str(), "plop-greeting");

        let result: Result<TagName, _> = serde_json::from_str("\"greeting\"");
        assert!(result.is_err());
    }
}
