//! Component manifest: the custom elements to generate glue for.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shroud_element::{PropertyDescriptor, TagName};

/// The list of components, usually the `[[component]]` tables of `shroud.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Manifest {
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentManifest>,
}

/// One custom element.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ComponentManifest {
    /// Custom element tag (e.g. "plop-counter")
    pub tag: TagName,

    /// Observed attributes
    #[serde(default)]
    pub attributes: Vec<String>,

    /// Bridged properties
    #[serde(default)]
    pub properties: Vec<PropertyManifest>,

    /// Custom events the component dispatches on its host element
    #[serde(default)]
    pub events: Vec<EventManifest>,

    /// Style injected in the shadow root
    #[serde(default)]
    pub style: StyleManifest,
}

/// A bridged property.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PropertyManifest {
    pub name: String,

    #[serde(default)]
    pub readonly: bool,

    /// TypeScript type of the value, `unknown` if not set
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
}

/// A custom event.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EventManifest {
    pub name: String,

    /// TypeScript type of `event.detail`, `unknown` if not set
    #[serde(default)]
    pub detail: Option<String>,
}

/// Style sources for a component.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StyleManifest {
    /// CSS files inlined in a `<style>`, relative to the manifest
    #[serde(default)]
    pub css: Vec<PathBuf>,

    /// Stylesheet URLs linked with `<link rel="stylesheet">`
    #[serde(default)]
    pub stylesheets: Vec<String>,
}

/// Errors that can occur while loading or validating a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read {path}: {message}")]
    ReadError { path: String, message: String },

    #[error("Failed to parse manifest: {0}")]
    ParseError(String),

    #[error("Custom element defined twice: {0}")]
    DuplicateTag(String),

    #[error("<{tag}> declares property '{name}' twice")]
    DuplicateProperty { tag: String, name: String },

    #[error("<{tag}> property '{name}' is not a valid identifier")]
    InvalidPropertyName { tag: String, name: String },

    #[error("<{tag}> observed attribute '{name}' must be lowercase")]
    AttributeCase { tag: String, name: String },
}

impl Manifest {
    /// Parse and validate a manifest from TOML.
    pub fn from_toml(source: &str) -> Result<Self, ManifestError> {
        let manifest: Self =
            toml::from_str(source).map_err(|e| ManifestError::ParseError(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let source = fs::read_to_string(path).map_err(|e| ManifestError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml(&source)
    }

    /// Check the rules the element registry would enforce at runtime, plus naming rules.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut tags = HashSet::new();
        for component in &self.components {
            let tag = component.tag.as_str();
            if !tags.insert(tag) {
                return Err(ManifestError::DuplicateTag(tag.to_string()));
            }

            if let Some(name) = component
                .attributes
                .iter()
                .find(|name| name.chars().any(|c| c.is_ascii_uppercase()))
            {
                return Err(ManifestError::AttributeCase {
                    tag: tag.to_string(),
                    name: name.clone(),
                });
            }

            let mut names = HashSet::new();
            for property in &component.properties {
                if !is_identifier(&property.name) {
                    return Err(ManifestError::InvalidPropertyName {
                        tag: tag.to_string(),
                        name: property.name.clone(),
                    });
                }
                if !names.insert(property.name.as_str()) {
                    return Err(ManifestError::DuplicateProperty {
                        tag: tag.to_string(),
                        name: property.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Whether any component bridges properties.
    pub fn has_properties(&self) -> bool {
        self.components.iter().any(|c| !c.properties.is_empty())
    }
}

impl ComponentManifest {
    /// Property descriptors as the element registry sees them.
    pub fn property_descriptors(&self) -> Vec<PropertyDescriptor> {
        self.properties
            .iter()
            .map(|p| PropertyDescriptor::new(p.name.clone(), p.readonly))
            .collect()
    }
}

/// A plain JavaScript identifier (no unicode escapes).
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
