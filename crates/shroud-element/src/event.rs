//! Custom events dispatched on the host element.

use std::cell::Cell;
use std::marker::PhantomData;

use serde::Serialize;

use crate::host::HostElement;
use crate::property::Value;

/// Custom event options.
///
/// Both flags default to `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomEventOptions {
    /// Whether the event bubbles up through the tree
    pub can_bubble: bool,

    /// Whether listeners may cancel the event
    pub cancelable: bool,
}

impl Default for CustomEventOptions {
    fn default() -> Self {
        Self {
            can_bubble: true,
            cancelable: true,
        }
    }
}

/// An event carrying a JSON detail payload.
#[derive(Debug)]
pub struct CustomEvent {
    event_type: String,
    detail: Value,
    options: CustomEventOptions,
    default_prevented: Cell<bool>,
}

impl CustomEvent {
    pub fn new(event_type: impl Into<String>, detail: Value, options: CustomEventOptions) -> Self {
        Self {
            event_type: event_type.into(),
            detail,
            options,
            default_prevented: Cell::new(false),
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn detail(&self) -> &Value {
        &self.detail
    }

    pub fn bubbles(&self) -> bool {
        self.options.can_bubble
    }

    pub fn cancelable(&self) -> bool {
        self.options.cancelable
    }

    /// Cancel the event. Ignored unless the event is cancelable.
    pub fn prevent_default(&self) {
        if self.options.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

/// Dispatches one custom event type on a host element.
pub struct EventEmitter<T> {
    target: HostElement,
    event_type: String,
    options: CustomEventOptions,
    _detail: PhantomData<fn(T)>,
}

impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            event_type: self.event_type.clone(),
            options: self.options,
            _detail: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for EventEmitter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("target", &self.target)
            .field("event_type", &self.event_type)
            .field("options", &self.options)
            .finish()
    }
}

impl<T: Serialize> EventEmitter<T> {
    /// Dispatch the event with `value` as detail.
    ///
    /// Returns `false` if a listener canceled the event. A detail that
    /// cannot be serialized is sent as `null`.
    pub fn emit(&self, value: T) -> bool {
        let detail = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize '{}' event detail: {}", self.event_type, e);
            Value::Null
        });
        let event = CustomEvent::new(self.event_type.clone(), detail, self.options);
        self.target.dispatch_event(&event)
    }
}

/// Create an emitter sending `event_type` custom events on `target`.
pub fn custom_event_handler<T: Serialize>(
    target: &HostElement,
    event_type: &str,
    options: CustomEventOptions,
) -> EventEmitter<T> {
    EventEmitter {
        target: target.clone(),
        event_type: event_type.to_string(),
        options,
        _detail: PhantomData,
    }
}
