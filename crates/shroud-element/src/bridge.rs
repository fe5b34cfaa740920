//! Message bridge between an element and a component task.
//!
//! [`Bridge`] is a ready-made descriptor: its instances turn lifecycle
//! callbacks into [`Message`]s sent over an unbounded channel. The component
//! side is started by a launcher on connect and reads the messages from its
//! [`Context`].

use std::fmt;
use std::rc::Rc;

use tokio::sync::{mpsc, oneshot};

use crate::component::{ComponentDescriptor, ComponentInstance, InstanceResult};
use crate::host::HostElement;
use crate::property::{Deferred, PropertyDescriptor, PropertyValue, Value};
use crate::root::{MountPoint, RenderRoot};
use crate::style::InjectedStyle;

/// Class of the container the component renders into.
pub const MOUNT_CLASS: &str = "shroud";

/// A message sent to the component.
#[derive(Debug)]
#[non_exhaustive]
pub enum Message {
    /// An observed attribute value changed
    AttributeChanged {
        /// The attribute name
        name: String,
        /// The new value, `None` if removed
        new_value: Option<String>,
    },
    /// A writable property was assigned
    SetProperty { name: String, value: Value },
    /// A property is read; the component answers through `reply`
    GetProperty {
        name: String,
        reply: oneshot::Sender<Value>,
    },
}

pub type Sender = mpsc::UnboundedSender<Message>;
pub type Receiver = mpsc::UnboundedReceiver<Message>;

/// What the component receives when its element is connected.
#[derive(Debug)]
pub struct Context {
    /// The host element, used as target for custom events
    pub host: HostElement,
    /// Where to render
    pub mount: MountPoint,
    /// The message receiver
    pub rx: Receiver,
}

type Launcher = Rc<dyn Fn(Context)>;

/// Descriptor backed by a launcher closure.
///
/// The launcher typically spawns a local task that renders into
/// `ctx.mount` and loops over `ctx.rx`.
pub struct Bridge {
    attributes: Vec<String>,
    properties: Vec<PropertyDescriptor>,
    style: InjectedStyle,
    launcher: Launcher,
}

impl Bridge {
    pub fn new(launch: impl Fn(Context) + 'static) -> Self {
        Self {
            attributes: Vec::new(),
            properties: Vec::new(),
            style: InjectedStyle::None,
            launcher: Rc::new(launch),
        }
    }

    /// Observe an attribute.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    /// Expose a property accessor.
    pub fn property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    /// Style injected in every render root.
    pub fn style(mut self, style: InjectedStyle) -> Self {
        self.style = style;
        self
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("attributes", &self.attributes)
            .field("properties", &self.properties)
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl ComponentDescriptor for Bridge {
    fn attributes(&self) -> &[String] {
        &self.attributes
    }

    fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    fn new_instance(&self, root: RenderRoot) -> InstanceResult<Box<dyn ComponentInstance>> {
        self.style.inject(&root);
        let mount = root.mount(MOUNT_CLASS);

        Ok(Box::new(BridgeInstance {
            attributes: self.attributes.clone(),
            launcher: self.launcher.clone(),
            mount,
            tx: None,
        }))
    }
}

/// Instance created by [`Bridge`].
struct BridgeInstance {
    attributes: Vec<String>,
    launcher: Launcher,
    mount: MountPoint,
    tx: Option<Sender>,
}

impl BridgeInstance {
    fn send(&self, msg: Message) {
        let Some(tx) = &self.tx else {
            tracing::debug!("Component not connected, dropping {:?}", msg);
            return;
        };
        if let Err(e) = tx.send(msg) {
            tracing::warn!("Component stopped listening, dropping {:?}", e.0);
        }
    }
}

impl ComponentInstance for BridgeInstance {
    fn attribute_changed(
        &mut self,
        name: &str,
        old_value: Option<&str>,
        new_value: Option<&str>,
    ) -> InstanceResult {
        if old_value != new_value && self.tx.is_some() {
            self.send(Message::AttributeChanged {
                name: name.to_string(),
                new_value: new_value.map(String::from),
            });
        }
        Ok(())
    }

    fn connect(&mut self, host: &HostElement) -> InstanceResult {
        if self.tx.is_some() {
            // The component is already running
            return Ok(());
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = Some(tx);

        // Initial state
        for name in &self.attributes {
            self.send(Message::AttributeChanged {
                name: name.clone(),
                new_value: host.get_attribute(name),
            });
        }

        let ctx = Context {
            host: host.clone(),
            mount: self.mount.clone(),
            rx,
        };
        (self.launcher)(ctx);
        Ok(())
    }

    fn disconnect(&mut self) -> InstanceResult {
        self.tx = None;
        Ok(())
    }

    fn get_property(&self, name: &str) -> InstanceResult<PropertyValue> {
        if self.tx.is_none() {
            return Ok(PropertyValue::undefined());
        }

        let (reply, response) = oneshot::channel();
        self.send(Message::GetProperty {
            name: name.to_string(),
            reply,
        });
        let deferred = Deferred::new(async move { response.await.unwrap_or(Value::Null) });
        Ok(deferred.into())
    }

    fn set_property(&mut self, name: &str, value: Value) -> InstanceResult {
        self.send(Message::SetProperty {
            name: name.to_string(),
            value,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::registry::{register, CustomElementRegistry};
    use crate::root::RenderNode;

    type Launched = Rc<RefCell<Vec<Context>>>;

    fn counter(launched: &Launched) -> CustomElementRegistry {
        let sink = launched.clone();
        let bridge = Bridge::new(move |ctx| sink.borrow_mut().push(ctx))
            .attribute("label")
            .property(PropertyDescriptor::writable("label"))
            .style(InjectedStyle::css(":host { display: block; }"));

        let mut registry = CustomElementRegistry::new();
        register(&mut registry, "plop-counter", bridge).unwrap();
        registry
    }

    fn drain(rx: &mut Receiver) -> Vec<String> {
        let mut seen = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            seen.push(match msg {
                Message::AttributeChanged { name, new_value } => {
                    format!("attr {name}={new_value:?}")
                }
                Message::SetProperty { name, value } => format!("set {name}={value}"),
                Message::GetProperty { name, .. } => format!("get {name}"),
            });
        }
        seen
    }

    #[test]
    fn injects_style_before_mount_point() {
        let launched = Launched::default();
        let registry = counter(&launched);
        let el = registry.create_element("plop-counter").unwrap();

        assert_eq!(
            el.shadow_root().children(),
            vec![
                RenderNode::Style(":host { display: block; }".to_string()),
                RenderNode::Container {
                    class: MOUNT_CLASS.to_string(),
                    html: String::new(),
                },
            ]
        );
    }

    #[test]
    fn connect_sends_initial_state_then_changes() {
        let launched = Launched::default();
        let registry = counter(&launched);
        let mut el = registry
            .create_element_with_attributes("plop-counter", &[("label", "5")])
            .unwrap();
        assert!(launched.borrow().is_empty());

        el.connect().unwrap();
        el.set_attribute("label", "5").unwrap();
        el.set_attribute("label", "6").unwrap();

        let mut launched = launched.borrow_mut();
        assert_eq!(launched.len(), 1);
        let ctx = &mut launched[0];
        assert!(ctx.host.ptr_eq(el.host()));
        assert_eq!(
            drain(&mut ctx.rx),
            vec![r#"attr label=Some("5")"#, r#"attr label=Some("6")"#]
        );
    }

    #[test]
    fn connect_launches_once_until_disconnected() {
        let launched = Launched::default();
        let registry = counter(&launched);
        let mut el = registry.create_element("plop-counter").unwrap();

        el.connect().unwrap();
        el.connect().unwrap();
        assert_eq!(launched.borrow().len(), 1);

        el.disconnect().unwrap();
        {
            let mut launched = launched.borrow_mut();
            let ctx = &mut launched[0];
            assert_eq!(drain(&mut ctx.rx), vec!["attr label=None"]);
            assert!(ctx.rx.try_recv().is_err());
        }

        el.connect().unwrap();
        assert_eq!(launched.borrow().len(), 2);
    }

    #[test]
    fn properties_go_through_the_channel() {
        let launched = Launched::default();
        let registry = counter(&launched);
        let mut el = registry.create_element("plop-counter").unwrap();
        el.connect().unwrap();

        el.set("label", json!("Ada")).unwrap();
        let value = el.get("label").unwrap();
        assert!(value.is_deferred());

        let mut launched = launched.borrow_mut();
        let ctx = &mut launched[0];
        let _initial = ctx.rx.try_recv().unwrap();
        assert!(matches!(
            ctx.rx.try_recv().unwrap(),
            Message::SetProperty { name, value } if name == "label" && value == json!("Ada")
        ));
        let Message::GetProperty { name, reply } = ctx.rx.try_recv().unwrap() else {
            panic!("expected a property read");
        };
        assert_eq!(name, "label");
        reply.send(json!("Ada")).unwrap();

        assert_eq!(tokio_test::block_on(value.resolve()), json!("Ada"));
    }

    #[test]
    fn reads_resolve_to_null_when_component_does_not_answer() {
        let launched = Launched::default();
        let registry = counter(&launched);
        let mut el = registry.create_element("plop-counter").unwrap();

        let value = el.get("label").unwrap();
        assert_eq!(value.as_ready(), Some(&Value::Null));

        el.connect().unwrap();
        let value = el.get("label").unwrap();
        launched.borrow_mut().clear();
        assert_eq!(tokio_test::block_on(value.resolve()), Value::Null);
    }
}
