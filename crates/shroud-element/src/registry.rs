//! Custom element registry.
//!
//! Maps tag names to element definitions. A tag can be defined once; the
//! observed attributes and bridged properties are captured at definition time.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::component::ComponentDescriptor;
use crate::element::{CustomElement, ElementError};
use crate::property::PropertyDescriptor;
use crate::tag::{InvalidTagError, TagName};

/// Everything needed to construct elements of one custom element type.
pub struct ElementDefinition {
    tag: TagName,
    observed_attributes: Vec<String>,
    properties: Vec<PropertyDescriptor>,
    descriptor: Rc<dyn ComponentDescriptor>,
}

impl ElementDefinition {
    /// Snapshot the descriptor's attributes and properties under `tag`.
    pub fn new(tag: TagName, descriptor: Rc<dyn ComponentDescriptor>) -> Self {
        let mut observed_attributes: Vec<String> = Vec::new();
        for attribute in descriptor.attributes() {
            let attribute = attribute.to_ascii_lowercase();
            if !observed_attributes.contains(&attribute) {
                observed_attributes.push(attribute);
            }
        }
        let properties = descriptor.properties().to_vec();

        Self {
            tag,
            observed_attributes,
            properties,
            descriptor,
        }
    }

    pub fn tag(&self) -> &TagName {
        &self.tag
    }

    pub fn observed_attributes(&self) -> &[String] {
        &self.observed_attributes
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// Whether changes of `name` (already lowercased) are forwarded.
    pub fn observes(&self, name: &str) -> bool {
        self.observed_attributes.iter().any(|a| a == name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub(crate) fn descriptor(&self) -> &dyn ComponentDescriptor {
        self.descriptor.as_ref()
    }
}

impl fmt::Debug for ElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDefinition")
            .field("tag", &self.tag)
            .field("observed_attributes", &self.observed_attributes)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// Errors that can occur when defining a custom element.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Invalid custom element name: {0}")]
    InvalidTag(#[from] InvalidTagError),

    #[error("Custom element already defined: {0}")]
    AlreadyDefined(String),
}

/// A host-provided registry of custom element types.
pub trait ElementRegistry {
    /// Define a new element type. Fails if the tag is already taken.
    fn define(&mut self, definition: ElementDefinition) -> Result<(), RegistrationError>;

    /// Whether `tag` has been defined.
    fn is_defined(&self, tag: &str) -> bool;
}

/// Define `tag` as a custom element backed by `descriptor`.
pub fn register<R, D>(registry: &mut R, tag: &str, descriptor: D) -> Result<(), RegistrationError>
where
    R: ElementRegistry + ?Sized,
    D: ComponentDescriptor + 'static,
{
    let tag = TagName::new(tag)?;
    registry.define(ElementDefinition::new(tag, Rc::new(descriptor)))
}

/// In-memory registry that also constructs elements.
#[derive(Debug, Default)]
pub struct CustomElementRegistry {
    definitions: HashMap<TagName, Rc<ElementDefinition>>,
}

impl CustomElementRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a definition by tag.
    pub fn get(&self, tag: &str) -> Option<&Rc<ElementDefinition>> {
        self.definitions.get(tag)
    }

    /// All defined tags, sorted.
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.definitions.keys().map(TagName::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Construct a new, disconnected element of a defined type.
    pub fn create_element(&self, tag: &str) -> Result<CustomElement, ElementError> {
        self.create_element_with_attributes(tag, &[])
    }

    /// Construct an element as the parser would for `<tag name="value" ...>`.
    ///
    /// Observed attributes are forwarded right after construction.
    pub fn create_element_with_attributes(
        &self,
        tag: &str,
        attributes: &[(&str, &str)],
    ) -> Result<CustomElement, ElementError> {
        let definition = self
            .get(tag)
            .ok_or_else(|| ElementError::Undefined(tag.to_string()))?;
        CustomElement::upgrade(definition.clone(), attributes)
    }
}

impl ElementRegistry for CustomElementRegistry {
    fn define(&mut self, definition: ElementDefinition) -> Result<(), RegistrationError> {
        if self.definitions.contains_key(definition.tag().as_str()) {
            return Err(RegistrationError::AlreadyDefined(definition.tag().to_string()));
        }

        tracing::debug!(
            "Defined <{}> observing {:?} with {} propert{}",
            definition.tag(),
            definition.observed_attributes(),
            definition.properties().len(),
            if definition.properties().len() == 1 { "y" } else { "ies" }
        );

        self.definitions
            .insert(definition.tag().clone(), Rc::new(definition));
        Ok(())
    }

    fn is_defined(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }
}
