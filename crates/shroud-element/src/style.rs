//! Styles injected into a render root before the component renders.

use std::borrow::Cow;

use crate::root::{RenderNode, RenderRoot};

/// Provide style to the custom element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InjectedStyle {
    /// No style provided
    #[default]
    None,
    /// Raw CSS content to go in an HTML `<style>`
    Css(Cow<'static, str>),
    /// Url of a stylesheet to go in an HTML `<link rel="stylesheet" href="...">`
    Stylesheet(Cow<'static, str>),
    /// Multiple styles, injected in order
    Multiple(Vec<InjectedStyle>),
}

impl InjectedStyle {
    /// Build with a static CSS code
    pub const fn css(css: &'static str) -> Self {
        Self::Css(Cow::Borrowed(css))
    }

    /// Build with a static path to a stylesheet, e.g. an URL
    pub const fn stylesheet(url: &'static str) -> Self {
        Self::Stylesheet(Cow::Borrowed(url))
    }

    pub(crate) fn inject(&self, root: &RenderRoot) {
        match self {
            Self::None => {}
            Self::Css(css) => root.append(RenderNode::Style(css.to_string())),
            Self::Stylesheet(url) => root.append(RenderNode::Stylesheet(url.to_string())),
            Self::Multiple(styles) => {
                for style in styles {
                    style.inject(root);
                }
            }
        }
    }
}
