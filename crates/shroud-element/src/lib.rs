//! Custom element adapter.
//!
//! This crate defines custom element types that wrap component instances.
//! Each element forwards its lifecycle (construction, attribute changes,
//! connect, disconnect) to the instance it owns and optionally exposes a
//! fixed set of properties that delegate to it.
//!
//! ```
//! use shroud_element::{register, Bridge, CustomElementRegistry, PropertyDescriptor};
//!
//! let mut registry = CustomElementRegistry::new();
//! let counter = Bridge::new(|ctx| ctx.mount.set_html("<output>0</output>"))
//!     .attribute("label")
//!     .property(PropertyDescriptor::writable("label"));
//! register(&mut registry, "plop-counter", counter).unwrap();
//!
//! let mut el = registry.create_element("plop-counter").unwrap();
//! el.connect().unwrap();
//! assert!(el.shadow_root().to_html().contains("<output>0</output>"));
//! ```

pub mod bridge;
pub mod component;
pub mod element;
pub mod event;
pub mod host;
pub mod property;
pub mod registry;
pub mod root;
pub mod style;
pub mod tag;

pub use bridge::{Bridge, Context, Message};
pub use component::{ComponentDescriptor, ComponentInstance, InstanceError, InstanceResult};
pub use element::{CustomElement, ElementError};
pub use event::{custom_event_handler, CustomEvent, CustomEventOptions, EventEmitter};
pub use host::{HostElement, ListenerId};
pub use property::{Deferred, PropertyDescriptor, PropertyValue, Value};
pub use registry::{
    register, CustomElementRegistry, ElementDefinition, ElementRegistry, RegistrationError,
};
pub use root::{MountPoint, RenderNode, RenderRoot};
pub use style::InjectedStyle;
pub use tag::{InvalidTagError, TagName};
