#![forbid(unsafe_code)]

//! WASM frontend for clienthook.
//!
//! This crate plugs the browser document into `clienthook-core` and exports
//! the API to JavaScript via `wasm-bindgen`:
//!
//! - `ClientHooks`: explicit registry object (`declareState`,
//!   `registerEffect`, `get`, `set`, `has`, `names`, `notify`).
//! - `useState` / `useEffect`: page-wide hooks that install each state as a
//!   getter/setter on the global object and log failures to the console.
//!
//! Elements opt in with a marker attribute, `client-hook="name"` by default.
//!
//! Only [`selector`] is compiled on native targets.

pub mod selector;

#[cfg(target_arch = "wasm32")]
mod js_state;
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod web_dom;

#[cfg(target_arch = "wasm32")]
pub use js_state::JsState;
#[cfg(target_arch = "wasm32")]
pub use wasm::{ClientHooks, use_effect, use_state};
#[cfg(target_arch = "wasm32")]
pub use web_dom::WebDom;

pub use selector::attribute_selector;
