#![forbid(unsafe_code)]

//! Headless, in-memory document.
//!
//! [`MemoryDom`] holds a flat list of [`MemoryElement`]s in insertion
//! (document) order. Elements are shared via `Rc`, so a caller can keep a
//! handle to an element it appended and observe what sync wrote into it.
//! Values are stored as text using [`StateValue::to_text`].

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::dom::{BoundElement, Dom};
use crate::value::StateValue;

/// A single element in a [`MemoryDom`].
#[derive(Debug)]
pub struct MemoryElement {
    tag_name: String,
    input_type: Option<String>,
    attributes: RefCell<BTreeMap<String, String>>,
    content: RefCell<String>,
    value: RefCell<String>,
    checked: Cell<bool>,
    writes: Cell<u64>,
}

impl MemoryElement {
    /// Create an element with the given tag. Tags are stored upper-case,
    /// like a DOM `tagName`.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_uppercase(),
            input_type: None,
            attributes: RefCell::new(BTreeMap::new()),
            content: RefCell::new(String::new()),
            value: RefCell::new(String::new()),
            checked: Cell::new(false),
            writes: Cell::new(0),
        }
    }

    /// An `<input>` of the given type.
    #[must_use]
    pub fn input(input_type: &str) -> Self {
        let mut element = Self::new("input");
        element.input_type = Some(input_type.to_ascii_lowercase());
        element
    }

    /// A `<textarea>`.
    #[must_use]
    pub fn textarea() -> Self {
        Self::new("textarea")
    }

    /// Builder: set an attribute.
    #[must_use]
    pub fn with_attribute(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set or replace an attribute.
    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_owned(), value.to_owned());
    }

    /// Current value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Upper-case tag name.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Rendered content, as last written by sync.
    #[must_use]
    pub fn content(&self) -> String {
        self.content.borrow().clone()
    }

    /// The `value` property.
    #[must_use]
    pub fn value(&self) -> String {
        self.value.borrow().clone()
    }

    /// The `checked` property.
    #[must_use]
    pub fn checked(&self) -> bool {
        self.checked.get()
    }

    /// Number of property writes sync has made to this element.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes.get()
    }

    fn record_write(&self) {
        self.writes.set(self.writes.get() + 1);
    }
}

/// Flat in-memory document.
#[derive(Debug, Default)]
pub struct MemoryDom {
    elements: RefCell<Vec<Rc<MemoryElement>>>,
}

impl MemoryDom {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return a shared handle to it.
    pub fn append(&self, element: MemoryElement) -> Rc<MemoryElement> {
        let element = Rc::new(element);
        self.elements.borrow_mut().push(Rc::clone(&element));
        element
    }

    /// Append an element tagged with `attribute="name"`.
    pub fn append_bound(&self, element: MemoryElement, attribute: &str, name: &str) -> Rc<MemoryElement> {
        self.append(element.with_attribute(attribute, name))
    }

    /// Number of elements in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Whether the document has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.borrow().is_empty()
    }
}

struct MemoryBinding(Rc<MemoryElement>);

impl<V: StateValue> BoundElement<V> for MemoryBinding {
    fn tag_name(&self) -> String {
        self.0.tag_name.clone()
    }

    fn input_type(&self) -> Option<String> {
        self.0.input_type.clone()
    }

    fn set_checked(&self, checked: bool) {
        self.0.checked.set(checked);
        self.0.record_write();
    }

    fn set_value(&self, value: &V) {
        *self.0.value.borrow_mut() = value.to_text();
        self.0.record_write();
    }

    fn set_content(&self, value: &V) {
        *self.0.content.borrow_mut() = value.to_text();
        self.0.record_write();
    }
}

impl<V: StateValue> Dom<V> for MemoryDom {
    fn bound_elements(&self, attribute: &str, name: &str) -> Vec<Box<dyn BoundElement<V>>> {
        self.elements
            .borrow()
            .iter()
            .filter(|el| el.attributes.borrow().get(attribute).is_some_and(|v| v == name))
            .map(|el| Box::new(MemoryBinding(Rc::clone(el))) as Box<dyn BoundElement<V>>)
            .collect()
    }
}
