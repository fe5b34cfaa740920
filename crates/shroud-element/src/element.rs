//! The custom element adapter.
//!
//! A [`CustomElement`] owns one component instance for its whole life and
//! forwards every lifecycle event to it: construction creates the render root
//! and the instance, observed attribute mutations become `attribute_changed`
//! calls, insertion and removal become `connect` and `disconnect`, and bridged
//! properties delegate to `get_property` / `set_property`.
//!
//! Nothing is filtered, batched or retried. Errors raised by the instance are
//! handed back to the caller as they are.

use std::fmt;
use std::rc::Rc;

use crate::component::{ComponentInstance, InstanceError, InstanceResult};
use crate::host::HostElement;
use crate::property::{PropertyValue, Value};
use crate::registry::ElementDefinition;
use crate::root::RenderRoot;

/// Errors raised by element operations.
#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    #[error("Custom element is not defined: {0}")]
    Undefined(String),

    #[error("Cannot assign to read only property '{0}'")]
    ReadonlyProperty(String),

    #[error("Unknown property '{0}'")]
    UnknownProperty(String),

    #[error("{0}")]
    Instance(#[source] InstanceError),
}

impl ElementError {
    /// The error raised by the component instance, if that is what failed.
    pub fn into_instance_error(self) -> Option<InstanceError> {
        match self {
            Self::Instance(err) => Some(err),
            _ => None,
        }
    }
}

/// One custom element and the component instance bound to it.
pub struct CustomElement {
    definition: Rc<ElementDefinition>,
    host: HostElement,
    root: RenderRoot,
    instance: Box<dyn ComponentInstance>,
}

impl CustomElement {
    /// Construct the element, then forward the observed attributes already present.
    ///
    /// An instance error on one attribute is logged and the remaining
    /// attributes are still forwarded; the element is kept.
    pub(crate) fn upgrade(
        definition: Rc<ElementDefinition>,
        attributes: &[(&str, &str)],
    ) -> Result<Self, ElementError> {
        let host = HostElement::new(definition.tag().as_str());
        let root = RenderRoot::new();
        let instance = definition
            .descriptor()
            .new_instance(root.clone())
            .map_err(ElementError::Instance)?;

        tracing::trace!("<{}> constructed", definition.tag());

        let mut element = Self {
            definition,
            host,
            root,
            instance,
        };
        for (name, value) in attributes {
            if let Err(e) = element.set_attribute(name, value) {
                tracing::warn!(
                    "<{}> failed to handle initial attribute '{}': {}",
                    element.tag_name(),
                    name,
                    e
                );
            }
        }
        Ok(element)
    }

    pub fn tag_name(&self) -> &str {
        self.definition.tag().as_str()
    }

    pub fn definition(&self) -> &ElementDefinition {
        &self.definition
    }

    /// The host element handle given to the instance on connect.
    pub fn host(&self) -> &HostElement {
        &self.host
    }

    /// The render root attached at construction.
    pub fn shadow_root(&self) -> &RenderRoot {
        &self.root
    }

    pub fn is_connected(&self) -> bool {
        self.host.is_connected()
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.host.get_attribute(name)
    }

    /// Set an attribute. Forwards one change if it is observed, even if the value is unchanged.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> InstanceResult {
        let name = name.to_ascii_lowercase();
        let old_value = self.host.store_attribute(&name, Some(value));
        self.attribute_changed(&name, old_value.as_deref(), Some(value))
    }

    /// Remove an attribute. Removing an absent attribute forwards nothing.
    pub fn remove_attribute(&mut self, name: &str) -> InstanceResult {
        let name = name.to_ascii_lowercase();
        match self.host.store_attribute(&name, None) {
            Some(old_value) => self.attribute_changed(&name, Some(&old_value), None),
            None => Ok(()),
        }
    }

    /// Add the attribute if absent, remove it otherwise. Returns whether it is now present.
    pub fn toggle_attribute(&mut self, name: &str) -> InstanceResult<bool> {
        if self.host.has_attribute(name) {
            self.remove_attribute(name)?;
            Ok(false)
        } else {
            self.set_attribute(name, "")?;
            Ok(true)
        }
    }

    fn attribute_changed(
        &mut self,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> InstanceResult {
        if !self.definition.observes(name) {
            return Ok(());
        }
        tracing::trace!(
            "<{}> attribute '{}' changed: {:?} -> {:?}",
            self.tag_name(),
            name,
            old_value,
            new_value
        );
        self.instance.attribute_changed(name, old_value, new_value)
    }

    /// The element was inserted into a live document.
    pub fn connect(&mut self) -> InstanceResult {
        self.host.set_connected(true);
        tracing::trace!("<{}> connected", self.tag_name());
        self.instance.connect(&self.host)
    }

    /// The element was removed from its document.
    pub fn disconnect(&mut self) -> InstanceResult {
        self.host.set_connected(false);
        tracing::trace!("<{}> disconnected", self.tag_name());
        self.instance.disconnect()
    }

    /// The element moved to another parent: disconnect, then connect again.
    ///
    /// Both calls are forwarded even if the first fails; the first error is returned.
    pub fn move_to(&mut self) -> InstanceResult {
        let disconnected = self.disconnect();
        let connected = self.connect();
        disconnected.and(connected)
    }

    /// Read a bridged property, e.g. `el.label`.
    ///
    /// Deferred values are returned as they are, unresolved.
    pub fn get(&self, name: &str) -> Result<PropertyValue, ElementError> {
        if self.definition.property(name).is_none() {
            return Err(ElementError::UnknownProperty(name.to_string()));
        }
        self.instance
            .get_property(name)
            .map_err(ElementError::Instance)
    }

    /// Assign a bridged property, e.g. `el.label = "5"`.
    pub fn set(&mut self, name: &str, value: Value) -> Result<(), ElementError> {
        let Some(property) = self.definition.property(name) else {
            return Err(ElementError::UnknownProperty(name.to_string()));
        };
        if property.readonly {
            return Err(ElementError::ReadonlyProperty(name.to_string()));
        }
        self.instance
            .set_property(name, value)
            .map_err(ElementError::Instance)
    }
}

impl fmt::Debug for CustomElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomElement")
            .field("tag", &self.tag_name())
            .field("host", &self.host)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::component::ComponentDescriptor;
    use crate::property::{Deferred, PropertyDescriptor};
    use crate::registry::{register, CustomElementRegistry};

    /// A call received by the recording instance.
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Created,
        AttributeChanged(String, Option<String>, Option<String>),
        Connect,
        Disconnect,
        Get(String),
        Set(String, Value),
    }

    type Log = Rc<RefCell<Vec<Call>>>;

    struct Recorder {
        log: Log,
        store: RefCell<Vec<(String, Value)>>,
        defer_reads: bool,
        fail_on_connect: bool,
        fail_on_disconnect: bool,
    }

    impl ComponentInstance for Recorder {
        fn attribute_changed(
            &mut self,
            name: &str,
            old_value: Option<&str>,
            new_value: Option<&str>,
        ) -> InstanceResult {
            self.log.borrow_mut().push(Call::AttributeChanged(
                name.to_string(),
                old_value.map(String::from),
                new_value.map(String::from),
            ));
            if new_value == Some("bad") {
                return Err(format!("cannot handle {name}").into());
            }
            Ok(())
        }

        fn connect(&mut self, host: &HostElement) -> InstanceResult {
            assert!(host.is_connected());
            self.log.borrow_mut().push(Call::Connect);
            if self.fail_on_connect {
                return Err("render failed".into());
            }
            Ok(())
        }

        fn disconnect(&mut self) -> InstanceResult {
            self.log.borrow_mut().push(Call::Disconnect);
            if self.fail_on_disconnect {
                return Err("teardown failed".into());
            }
            Ok(())
        }

        fn get_property(&self, name: &str) -> InstanceResult<PropertyValue> {
            self.log.borrow_mut().push(Call::Get(name.to_string()));
            let value = self
                .store
                .borrow()
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .unwrap_or(Value::Null);
            if self.defer_reads {
                Ok(Deferred::new(async move { value }).into())
            } else {
                Ok(value.into())
            }
        }

        fn set_property(&mut self, name: &str, value: Value) -> InstanceResult {
            self.log
                .borrow_mut()
                .push(Call::Set(name.to_string(), value.clone()));
            let mut store = self.store.borrow_mut();
            store.retain(|(key, _)| key != name);
            store.push((name.to_string(), value));
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecorderDescriptor {
        log: Log,
        attributes: Vec<String>,
        properties: Vec<PropertyDescriptor>,
        defer_reads: bool,
        fail_on_connect: bool,
        fail_on_disconnect: bool,
        roots: Rc<RefCell<Vec<RenderRoot>>>,
    }

    impl ComponentDescriptor for RecorderDescriptor {
        fn attributes(&self) -> &[String] {
            &self.attributes
        }

        fn properties(&self) -> &[PropertyDescriptor] {
            &self.properties
        }

        fn new_instance(&self, root: RenderRoot) -> InstanceResult<Box<dyn ComponentInstance>> {
            self.log.borrow_mut().push(Call::Created);
            self.roots.borrow_mut().push(root);
            Ok(Box::new(Recorder {
                log: self.log.clone(),
                store: RefCell::new(Vec::new()),
                defer_reads: self.defer_reads,
                fail_on_connect: self.fail_on_connect,
                fail_on_disconnect: self.fail_on_disconnect,
            }))
        }
    }

    fn changed(name: &str, old: Option<&str>, new: Option<&str>) -> Call {
        Call::AttributeChanged(name.to_string(), old.map(String::from), new.map(String::from))
    }

    fn counter(log: &Log) -> CustomElementRegistry {
        let mut registry = CustomElementRegistry::new();
        let descriptor = RecorderDescriptor {
            log: log.clone(),
            attributes: vec!["label".to_string()],
            ..Default::default()
        };
        register(&mut registry, "plop-counter", descriptor).unwrap();
        registry
    }

    fn greeting(log: &Log, defer_reads: bool) -> CustomElementRegistry {
        let mut registry = CustomElementRegistry::new();
        let descriptor = RecorderDescriptor {
            log: log.clone(),
            attributes: vec!["name".to_string()],
            properties: vec![
                PropertyDescriptor::writable("name"),
                PropertyDescriptor::readonly("length"),
            ],
            defer_reads,
            ..Default::default()
        };
        register(&mut registry, "plop-greeting", descriptor).unwrap();
        registry
    }

    #[test]
    fn forwards_label_changes_in_order() {
        let log = Log::default();
        let registry = counter(&log);

        let mut el = registry.create_element("plop-counter").unwrap();
        el.set_attribute("label", "5").unwrap();
        el.set_attribute("label", "6").unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Created,
                changed("label", None, Some("5")),
                changed("label", Some("5"), Some("6")),
            ]
        );
    }

    #[test]
    fn forwards_every_mutation_of_observed_attributes_only() {
        let log = Log::default();
        let registry = counter(&log);

        let mut el = registry.create_element("plop-counter").unwrap();
        el.set_attribute("id", "first").unwrap();
        el.set_attribute("LABEL", "5").unwrap();
        el.set_attribute("label", "5").unwrap();
        el.remove_attribute("label").unwrap();
        el.remove_attribute("label").unwrap();
        assert!(el.toggle_attribute("label").unwrap());

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Created,
                changed("label", None, Some("5")),
                changed("label", Some("5"), Some("5")),
                changed("label", Some("5"), None),
                changed("label", None, Some("")),
            ]
        );
        assert_eq!(el.get_attribute("id"), Some("first".to_string()));
    }

    #[test]
    fn construction_precedes_initial_attributes() {
        let log = Log::default();
        let registry = counter(&log);

        let el = registry
            .create_element_with_attributes("plop-counter", &[("class", "big"), ("label", "3")])
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec![Call::Created, changed("label", None, Some("3"))]
        );
        assert_eq!(el.get_attribute("class"), Some("big".to_string()));
        assert!(!el.is_connected());
    }

    #[test]
    fn each_element_gets_its_own_instance_and_root() {
        let log = Log::default();
        let roots = Rc::new(RefCell::new(Vec::new()));
        let mut registry = CustomElementRegistry::new();
        let descriptor = RecorderDescriptor {
            log: log.clone(),
            roots: roots.clone(),
            ..Default::default()
        };
        register(&mut registry, "plop-counter", descriptor).unwrap();

        let first = registry.create_element("plop-counter").unwrap();
        let second = registry.create_element("plop-counter").unwrap();

        assert_eq!(*log.borrow(), vec![Call::Created, Call::Created]);
        assert!(roots.borrow()[0].ptr_eq(first.shadow_root()));
        assert!(roots.borrow()[1].ptr_eq(second.shadow_root()));
        assert!(!first.shadow_root().ptr_eq(second.shadow_root()));
    }

    #[test]
    fn forwards_every_connect_and_disconnect() {
        let log = Log::default();
        let registry = counter(&log);
        let mut el = registry.create_element("plop-counter").unwrap();

        el.connect().unwrap();
        el.move_to().unwrap();
        el.disconnect().unwrap();
        el.connect().unwrap();
        el.connect().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Created,
                Call::Connect,
                Call::Disconnect,
                Call::Connect,
                Call::Disconnect,
                Call::Connect,
                Call::Connect,
            ]
        );
        assert!(el.is_connected());
    }

    #[test]
    fn instance_errors_propagate_unchanged() {
        let log = Log::default();
        let mut registry = CustomElementRegistry::new();
        let descriptor = RecorderDescriptor {
            log: log.clone(),
            fail_on_connect: true,
            ..Default::default()
        };
        register(&mut registry, "plop-broken", descriptor).unwrap();

        let mut el = registry.create_element("plop-broken").unwrap();
        let err = el.connect().unwrap_err();
        assert_eq!(err.to_string(), "render failed");

        // Later callbacks are still forwarded.
        el.disconnect().unwrap();
        assert_eq!(
            *log.borrow(),
            vec![Call::Created, Call::Connect, Call::Disconnect]
        );
    }

    #[test]
    fn move_forwards_connect_even_if_disconnect_fails() {
        let log = Log::default();
        let mut registry = CustomElementRegistry::new();
        let descriptor = RecorderDescriptor {
            log: log.clone(),
            fail_on_disconnect: true,
            ..Default::default()
        };
        register(&mut registry, "plop-sticky", descriptor).unwrap();

        let mut el = registry.create_element("plop-sticky").unwrap();
        el.connect().unwrap();
        let err = el.move_to().unwrap_err();

        assert_eq!(err.to_string(), "teardown failed");
        assert_eq!(
            *log.borrow(),
            vec![
                Call::Created,
                Call::Connect,
                Call::Disconnect,
                Call::Connect,
            ]
        );
        assert!(el.is_connected());
    }

    #[test]
    fn initial_attribute_errors_do_not_stop_later_attributes() {
        let log = Log::default();
        let mut registry = CustomElementRegistry::new();
        let descriptor = RecorderDescriptor {
            log: log.clone(),
            attributes: vec!["a".to_string(), "b".to_string()],
            ..Default::default()
        };
        register(&mut registry, "plop-pair", descriptor).unwrap();

        let el = registry
            .create_element_with_attributes("plop-pair", &[("a", "bad"), ("b", "ok")])
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Call::Created,
                changed("a", None, Some("bad")),
                changed("b", None, Some("ok")),
            ]
        );
        assert_eq!(el.get_attribute("a"), Some("bad".to_string()));
        assert_eq!(el.get_attribute("b"), Some("ok".to_string()));
    }

    #[test]
    fn property_round_trips_through_instance() {
        let log = Log::default();
        let registry = greeting(&log, false);
        let mut el = registry.create_element("plop-greeting").unwrap();

        el.set("name", json!("Ada")).unwrap();
        let value = el.get("name").unwrap();

        assert_eq!(value.as_ready(), Some(&json!("Ada")));
        assert_eq!(
            *log.borrow(),
            vec![
                Call::Created,
                Call::Set("name".to_string(), json!("Ada")),
                Call::Get("name".to_string()),
            ]
        );
    }

    #[test]
    fn deferred_reads_are_passed_through_unresolved() {
        let log = Log::default();
        let registry = greeting(&log, true);
        let mut el = registry.create_element("plop-greeting").unwrap();

        el.set("name", json!("Ada")).unwrap();
        let value = el.get("name").unwrap();

        assert!(value.is_deferred());
        assert_eq!(tokio_test::block_on(value.resolve()), json!("Ada"));
    }

    #[test]
    fn readonly_and_unknown_properties_are_rejected() {
        let log = Log::default();
        let registry = greeting(&log, false);
        let mut el = registry.create_element("plop-greeting").unwrap();

        let err = el.set("length", json!(3)).unwrap_err();
        assert!(matches!(err, ElementError::ReadonlyProperty(name) if name == "length"));

        assert!(el.get("length").is_ok());

        let err = el.set("color", json!("red")).unwrap_err();
        assert!(matches!(err, ElementError::UnknownProperty(name) if name == "color"));
        let err = el.get("color").unwrap_err();
        assert!(matches!(err, ElementError::UnknownProperty(_)));

        assert_eq!(
            *log.borrow(),
            vec![Call::Created, Call::Get("length".to_string())]
        );
    }
}
