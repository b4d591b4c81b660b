#![forbid(unsafe_code)]

//! DOM seam and the per-element sync rule.
//!
//! The registry never touches a concrete document. It asks a [`Dom`] for
//! the elements whose marker attribute equals a state's name and applies
//! [`sync_element`] to each. Hosts plug in their own document: the web
//! crate wraps `web-sys`, and [`MemoryDom`](crate::MemoryDom) serves
//! headless hosts and tests.
//!
//! # Sync rule
//!
//! | Element | Effect |
//! |---------|--------|
//! | `<input type=checkbox>`, `<input type=radio>` | `checked = is_truthy(value)` |
//! | any other `<input>`, `<textarea>` | `value = value` |
//! | everything else | content replaced by the value, markup included |

use crate::value::StateValue;

/// How an element reflects a state value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Checkbox or radio input, synced through `checked`.
    Toggle,
    /// Text-like input or textarea, synced through `value`.
    Field,
    /// Any other element, synced by replacing its content.
    Content,
}

impl ElementKind {
    /// Classify an element from its tag name and, for inputs, its `type`.
    ///
    /// Both comparisons ignore ASCII case, so `"INPUT"` (a DOM `tagName`)
    /// and `"input"` classify the same way.
    #[must_use]
    pub fn classify(tag_name: &str, input_type: Option<&str>) -> Self {
        if tag_name.eq_ignore_ascii_case("textarea") {
            return Self::Field;
        }
        if !tag_name.eq_ignore_ascii_case("input") {
            return Self::Content;
        }
        match input_type {
            Some(t) if t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio") => {
                Self::Toggle
            }
            _ => Self::Field,
        }
    }
}

/// An element carrying the marker attribute for some state.
pub trait BoundElement<V> {
    /// Element tag name, in any case.
    fn tag_name(&self) -> String;

    /// The `type` of an input element; `None` for other elements.
    fn input_type(&self) -> Option<String>;

    /// Set the `checked` property.
    fn set_checked(&self, checked: bool);

    /// Set the `value` property.
    fn set_value(&self, value: &V);

    /// Replace the rendered content.
    fn set_content(&self, value: &V);

    /// Classification used by [`sync_element`].
    fn kind(&self) -> ElementKind {
        ElementKind::classify(&self.tag_name(), self.input_type().as_deref())
    }
}

/// A document that can be queried for bound elements.
pub trait Dom<V> {
    /// Every element whose `attribute` equals `name`, in document order.
    fn bound_elements(&self, attribute: &str, name: &str) -> Vec<Box<dyn BoundElement<V>>>;
}

/// A document with no elements. Sync through it is always a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDom;

impl<V> Dom<V> for NullDom {
    fn bound_elements(&self, _attribute: &str, _name: &str) -> Vec<Box<dyn BoundElement<V>>> {
        Vec::new()
    }
}

/// Push `value` into a single element according to its kind.
pub fn sync_element<V: StateValue>(element: &dyn BoundElement<V>, value: &V) -> ElementKind {
    let kind = element.kind();
    match kind {
        ElementKind::Toggle => element.set_checked(value.is_truthy()),
        ElementKind::Field => element.set_value(value),
        ElementKind::Content => element.set_content(value),
    }
    kind
}

/// Push `value` into every element bound to `name`. Returns how many
/// elements were updated.
pub fn sync_bound<V: StateValue>(dom: &dyn Dom<V>, attribute: &str, name: &str, value: &V) -> usize {
    let elements = dom.bound_elements(attribute, name);
    for element in &elements {
        sync_element(element.as_ref(), value);
    }
    elements.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_toggles() {
        assert_eq!(ElementKind::classify("INPUT", Some("checkbox")), ElementKind::Toggle);
        assert_eq!(ElementKind::classify("input", Some("RADIO")), ElementKind::Toggle);
    }

    #[test]
    fn classify_fields() {
        assert_eq!(ElementKind::classify("INPUT", Some("text")), ElementKind::Field);
        assert_eq!(ElementKind::classify("INPUT", Some("number")), ElementKind::Field);
        assert_eq!(ElementKind::classify("input", None), ElementKind::Field);
        assert_eq!(ElementKind::classify("TEXTAREA", None), ElementKind::Field);
        assert_eq!(ElementKind::classify("textarea", Some("textarea")), ElementKind::Field);
    }

    #[test]
    fn classify_content() {
        assert_eq!(ElementKind::classify("SPAN", None), ElementKind::Content);
        assert_eq!(ElementKind::classify("div", None), ElementKind::Content);
        // A stray type attribute on a non-input does not make it a toggle.
        assert_eq!(ElementKind::classify("BUTTON", Some("checkbox")), ElementKind::Content);
        assert_eq!(ElementKind::classify("SELECT", None), ElementKind::Content);
    }

    #[test]
    fn null_dom_syncs_nothing() {
        let count = sync_bound::<serde_json::Value>(&NullDom, "client-hook", "x", &1.into());
        assert_eq!(count, 0);
    }
}
