#![forbid(unsafe_code)]

//! `JsValue` as a state value.
//!
//! Truthiness and string coercion are delegated to the JS engine, so a
//! checkbox bound to `[]` is checked and a span bound to `undefined`
//! renders exactly what the browser would.

use clienthook_core::StateValue;
use js_sys::Array;
use wasm_bindgen::JsValue;

/// A JS value held by a state entry.
#[derive(Debug, Clone, PartialEq)]
pub struct JsState(pub JsValue);

impl From<JsValue> for JsState {
    fn from(value: JsValue) -> Self {
        Self(value)
    }
}

impl From<JsState> for JsValue {
    fn from(state: JsState) -> Self {
        state.0
    }
}

impl StateValue for JsState {
    fn null() -> Self {
        Self(JsValue::NULL)
    }

    fn is_null(&self) -> bool {
        self.0.is_null()
    }

    fn is_truthy(&self) -> bool {
        self.0.is_truthy()
    }

    fn to_text(&self) -> String {
        // `[v].join("")` applies ToString, with null/undefined as "".
        Array::of1(&self.0).join("").into()
    }
}
