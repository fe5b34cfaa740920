//! Trait definitions for the components wrapped by custom elements.

use crate::host::HostElement;
use crate::property::{PropertyDescriptor, PropertyValue, Value};
use crate::root::RenderRoot;

/// Error raised by a component instance. The adapter hands it back untouched.
pub type InstanceError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a component instance method.
pub type InstanceResult<T = ()> = Result<T, InstanceError>;

/// The per-element component, driven by the element lifecycle.
///
/// One instance lives exactly as long as the element that created it.
pub trait ComponentInstance {
    /// An observed attribute was set or removed.
    ///
    /// Called once per mutation, even when the value did not change.
    fn attribute_changed(
        &mut self,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> InstanceResult;

    /// The element was inserted into a document.
    fn connect(&mut self, host: &HostElement) -> InstanceResult;

    /// The element was removed from its document.
    fn disconnect(&mut self) -> InstanceResult;

    /// Read a bridged property. May return a deferred value.
    fn get_property(&self, _name: &str) -> InstanceResult<PropertyValue> {
        Ok(PropertyValue::undefined())
    }

    /// Write a bridged, writable property.
    fn set_property(&mut self, _name: &str, _value: Value) -> InstanceResult {
        Ok(())
    }
}

/// Describes a component type and creates its instances.
pub trait ComponentDescriptor {
    /// Attribute names to observe, fixed once the element type is defined.
    fn attributes(&self) -> &[String];

    /// Properties exposed as element accessors. Empty for attribute-only components.
    fn properties(&self) -> &[PropertyDescriptor] {
        &[]
    }

    /// Create the instance backing a freshly constructed element.
    fn new_instance(&self, root: RenderRoot) -> InstanceResult<Box<dyn ComponentInstance>>;
}
