//! Browser glue for shroud custom elements.
//!
//! Generates the JavaScript module that registers custom elements with
//! `customElements.define` and forwards their lifecycle to component
//! instances, plus matching TypeScript declarations, from a manifest.

pub mod css;
pub mod generator;
pub mod manifest;

pub use css::process_css;
pub use generator::{GenerateError, GlueGenerator, GlueOptions, ShimVariant};
pub use manifest::{
    ComponentManifest, EventManifest, Manifest, ManifestError, PropertyManifest, StyleManifest,
};
