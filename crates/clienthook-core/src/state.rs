#![forbid(unsafe_code)]

//! State handles: the binding point for one declared state.
//!
//! A [`State<V>`] is returned by
//! [`Registry::declare_state`](crate::Registry::declare_state). Reads return
//! the current value; writes store the value and propagate synchronously
//! (DOM sync, then subscribers) before returning. Unlike a change-detecting
//! observable, every write propagates, including writes of an equal value.

use std::rc::Rc;

use crate::registry::{RegistryInner, StateEntry};
use crate::value::StateValue;

/// Handle to a declared state.
///
/// Cloning a `State` creates another handle to the **same** entry.
pub struct State<V> {
    registry: Rc<RegistryInner<V>>,
    entry: Rc<StateEntry<V>>,
}

// Manual Clone: shares the same Rc.
impl<V> Clone for State<V> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
            entry: Rc::clone(&self.entry),
        }
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for State<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("name", &self.entry.name)
            .field("value", &self.entry.value.borrow())
            .field("subscriber_count", &self.entry.subscribers.borrow().len())
            .finish()
    }
}

impl<V: StateValue> State<V> {
    pub(crate) fn new(registry: Rc<RegistryInner<V>>, entry: Rc<StateEntry<V>>) -> Self {
        Self { registry, entry }
    }

    /// Declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> V {
        self.entry.value.borrow().clone()
    }

    /// Access the current value by reference without cloning.
    ///
    /// `f` must not write this state; the value is borrowed while it runs.
    pub fn with<R>(&self, f: impl FnOnce(&V) -> R) -> R {
        f(&*self.entry.value.borrow())
    }

    /// Store a new value and propagate it.
    pub fn set(&self, value: V) {
        *self.entry.value.borrow_mut() = value;
        self.notify();
    }

    /// Modify the value in place, then propagate.
    pub fn update(&self, f: impl FnOnce(&mut V)) {
        f(&mut *self.entry.value.borrow_mut());
        self.notify();
    }

    /// Propagate the current value without changing it.
    pub fn notify(&self) {
        self.registry.propagate(&self.entry);
    }

    /// Number of subscribed callbacks.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.entry.subscribers.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use crate::Registry;
    use serde_json::{Value, json};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn clone_shares_entry() {
        let registry = Registry::<Value>::headless();
        let a = registry.declare_state("a", json!(1)).unwrap();
        let b = a.clone();
        b.set(json!(2));
        assert_eq!(a.get(), json!(2));
        assert_eq!(a.name(), "a");
    }

    #[test]
    fn with_borrows_without_clone() {
        let registry = Registry::<Value>::headless();
        let list = registry.declare_state("list", json!([1, 2, 3])).unwrap();
        let len = list.with(|v| v.as_array().map_or(0, Vec::len));
        assert_eq!(len, 3);
    }

    #[test]
    fn update_mutates_in_place_and_propagates() {
        let registry = Registry::<Value>::headless();
        let list = registry.declare_state("list", json!([1])).unwrap();
        let seen = Rc::new(Cell::new(0usize));
        let seen_clone = Rc::clone(&seen);
        let _ = registry.register_effect(&["list"], move |v| {
            seen_clone.set(v.and_then(Value::as_array).map_or(0, Vec::len));
        });
        list.update(|v| {
            if let Some(items) = v.as_array_mut() {
                items.push(json!(2));
            }
        });
        assert_eq!(seen.get(), 2);
        assert_eq!(list.get(), json!([1, 2]));
    }

    #[test]
    fn equal_writes_still_propagate() {
        let registry = Registry::<Value>::headless();
        let s = registry.declare_state("s", json!(1)).unwrap();
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = Rc::clone(&calls);
        let _ = registry.register_effect(&["s"], move |_| calls_clone.set(calls_clone.get() + 1));
        s.set(json!(1));
        s.set(json!(1));
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn handle_lookup_by_name_is_the_same_state() {
        let registry = Registry::<Value>::headless();
        let s = registry.declare_state("s", json!("x")).unwrap();
        let looked_up = registry.state("s").unwrap();
        looked_up.set(json!("y"));
        assert_eq!(s.get(), json!("y"));
        assert!(registry.state("missing").is_none());
    }

    #[test]
    fn debug_format() {
        let registry = Registry::<Value>::headless();
        let s = registry.declare_state("count", json!(42)).unwrap();
        let dbg = format!("{s:?}");
        assert!(dbg.contains("count"));
        assert!(dbg.contains("42"));
        assert!(dbg.contains("subscriber_count"));
    }
}
