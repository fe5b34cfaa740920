//! The host element seen by component instances.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::event::CustomEvent;

type Listener = Rc<dyn Fn(&CustomEvent)>;

/// Identifies a registered event listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Handle to the DOM element a custom element is hosted by.
///
/// Instances receive it on connect; cloning yields another handle to the same element.
#[derive(Clone)]
pub struct HostElement {
    inner: Rc<HostInner>,
}

struct HostInner {
    tag_name: String,
    attributes: RefCell<Vec<(String, String)>>,
    listeners: RefCell<Vec<(ListenerId, String, Listener)>>,
    next_listener: Cell<u64>,
    connected: Cell<bool>,
}

impl HostElement {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(HostInner {
                tag_name: tag_name.into(),
                attributes: RefCell::new(Vec::new()),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                connected: Cell::new(false),
            }),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.inner.tag_name
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        self.inner
            .attributes
            .borrow()
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }

    /// Attribute names in insertion order.
    pub fn attribute_names(&self) -> Vec<String> {
        self.inner
            .attributes
            .borrow()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Whether the element is currently in a live document.
    pub fn is_connected(&self) -> bool {
        self.inner.connected.get()
    }

    /// Store an attribute value (`None` removes it), returning the previous value.
    pub(crate) fn store_attribute(&self, name: &str, value: Option<&str>) -> Option<String> {
        let mut attributes = self.inner.attributes.borrow_mut();
        let position = attributes.iter().position(|(key, _)| key == name);
        match (position, value) {
            (Some(index), Some(value)) => {
                Some(std::mem::replace(&mut attributes[index].1, value.to_string()))
            }
            (Some(index), None) => Some(attributes.remove(index).1),
            (None, Some(value)) => {
                attributes.push((name.to_string(), value.to_string()));
                None
            }
            (None, None) => None,
        }
    }

    pub(crate) fn set_connected(&self, connected: bool) {
        self.inner.connected.set(connected);
    }

    /// Listen to events of `event_type` dispatched on this element.
    pub fn add_event_listener(
        &self,
        event_type: &str,
        listener: impl Fn(&CustomEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, event_type.to_string(), Rc::new(listener)));
        id
    }

    /// Returns `false` if no such listener was registered.
    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _, _)| *listener_id != id);
        listeners.len() != before
    }

    /// Run the listeners registered for the event type, in registration order.
    ///
    /// Returns `false` if the event is cancelable and a listener canceled it.
    pub fn dispatch_event(&self, event: &CustomEvent) -> bool {
        // Listeners may register or remove listeners while running.
        let matching: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, event_type, _)| event_type == event.event_type())
            .map(|(_, _, listener)| listener.clone())
            .collect();

        tracing::trace!(
            "<{}> dispatching '{}' to {} listener(s)",
            self.inner.tag_name,
            event.event_type(),
            matching.len()
        );

        for listener in matching {
            listener(event);
        }
        !event.default_prevented()
    }

    /// Whether both handles point to the same element.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostElement")
            .field("tag_name", &self.inner.tag_name)
            .field("attributes", &self.inner.attributes.borrow())
            .field("connected", &self.inner.connected.get())
            .finish()
    }
}
