//! Property descriptors and the values that flow through bridged accessors.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};

/// Value type carried by bridged properties.
pub type Value = serde_json::Value;

/// A property exposed as an accessor on the custom element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Property name as seen on the element (e.g. `el.label`)
    pub name: String,

    /// Whether assignments are rejected
    #[serde(default)]
    pub readonly: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, readonly: bool) -> Self {
        Self {
            name: name.into(),
            readonly,
        }
    }

    /// A property with a getter and a setter.
    pub fn writable(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// A getter-only property.
    pub fn readonly(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }
}

/// A value that will be available later, e.g. computed by a component task.
///
/// The adapter never polls it; whoever reads the property awaits it.
pub struct Deferred(Pin<Box<dyn Future<Output = Value>>>);

impl Deferred {
    pub fn new(future: impl Future<Output = Value> + 'static) -> Self {
        Self(Box::pin(future))
    }

    /// An already resolved deferred value.
    pub fn resolved(value: Value) -> Self {
        Self::new(std::future::ready(value))
    }
}

impl Future for Deferred {
    type Output = Value;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Value> {
        self.0.as_mut().poll(cx)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// What a property read returns.
#[derive(Debug)]
pub enum PropertyValue {
    /// The value is available now
    Ready(Value),
    /// The value resolves later
    Deferred(Deferred),
}

impl PropertyValue {
    /// The equivalent of JavaScript `undefined` for a property read.
    pub fn undefined() -> Self {
        Self::Ready(Value::Null)
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// The value if it is already available.
    pub fn as_ready(&self) -> Option<&Value> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Deferred(_) => None,
        }
    }

    /// Wait for the value, whichever shape it has.
    pub async fn resolve(self) -> Value {
        match self {
            Self::Ready(value) => value,
            Self::Deferred(deferred) => deferred.await,
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(value: Value) -> Self {
        Self::Ready(value)
    }
}

impl From<Deferred> for PropertyValue {
    fn from(deferred: Deferred) -> Self {
        Self::Deferred(deferred)
    }
}
