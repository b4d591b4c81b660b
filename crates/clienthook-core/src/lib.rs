#![forbid(unsafe_code)]

//! Core: named reactive state, effects, and DOM attribute sync.
//!
//! # Role in clienthook
//! `clienthook-core` owns everything that does not need a browser. It keeps
//! a registry of named states, propagates writes synchronously to bound DOM
//! elements and subscriber callbacks, and defines the DOM seam that hosts
//! implement. `clienthook-web` plugs a `web-sys` document into that seam and
//! exports the API to JavaScript.
//!
//! # Primary responsibilities
//! - **Registry**: explicit context mapping state names to values and
//!   subscriber lists.
//! - **State**: handle returned by declaration; reads return the value,
//!   writes propagate before returning.
//! - **Effects**: callbacks subscribed to one or more states, invoked once
//!   per dependency at registration and again on every write.
//! - **DOM sync**: checkbox/radio inputs get `checked`, other inputs and
//!   textareas get `value`, everything else gets its content replaced.
//! - **Hooks**: log-and-continue facade for callers that want the hook-style
//!   contract instead of `Result`s.

pub mod config;
pub mod dom;
pub mod error;
pub mod hooks;
pub mod memory_dom;
pub mod registry;
pub mod state;
pub mod value;

pub use config::{DEFAULT_MARKER_ATTRIBUTE, HooksConfig};
pub use dom::{BoundElement, Dom, ElementKind, NullDom, sync_bound, sync_element};
pub use error::HookError;
pub use hooks::Hooks;
pub use memory_dom::{MemoryDom, MemoryElement};
pub use registry::{Callback, EffectOutcome, Registry};
pub use state::State;
pub use value::StateValue;
