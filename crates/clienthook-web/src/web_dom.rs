#![forbid(unsafe_code)]

//! `web-sys` document adapter.
//!
//! Values are written through `Reflect::set` on the element's IDL
//! properties (`checked`, `value`, `innerHTML`), so the browser performs
//! its own conversions. Failed queries and writes are reported with
//! `console.warn` and skipped.

use clienthook_core::{BoundElement, Dom};
use js_sys::Reflect;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

use crate::js_state::JsState;
use crate::selector::attribute_selector;

fn console_warn(message: &str, err: &JsValue) {
    web_sys::console::warn_2(&JsValue::from_str(message), err);
}

/// Live browser document.
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    /// Wrap a document.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The current window's document, if there is one.
    #[must_use]
    pub fn from_window() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }
}

impl Dom<JsState> for WebDom {
    fn bound_elements(&self, attribute: &str, name: &str) -> Vec<Box<dyn BoundElement<JsState>>> {
        let selector = attribute_selector(attribute, name);
        let list = match self.document.query_selector_all(&selector) {
            Ok(list) => list,
            Err(err) => {
                console_warn(&format!("bound element query failed for {selector}:"), &err);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|idx| list.item(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| Box::new(WebElement(element)) as Box<dyn BoundElement<JsState>>)
            .collect()
    }
}

struct WebElement(Element);

impl WebElement {
    fn set_property(&self, property: &str, value: &JsValue) {
        if let Err(err) = Reflect::set(&self.0, &JsValue::from_str(property), value) {
            console_warn(&format!("cannot write element property '{property}':"), &err);
        }
    }
}

impl BoundElement<JsState> for WebElement {
    fn tag_name(&self) -> String {
        self.0.tag_name()
    }

    fn input_type(&self) -> Option<String> {
        self.0.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::type_)
    }

    fn set_checked(&self, checked: bool) {
        self.set_property("checked", &JsValue::from_bool(checked));
    }

    fn set_value(&self, value: &JsState) {
        self.set_property("value", &value.0);
    }

    fn set_content(&self, value: &JsState) {
        self.set_property("innerHTML", &value.0);
    }
}
