#![forbid(unsafe_code)]

//! Named state registry, declaration, and effect registration.
//!
//! # Design
//!
//! [`Registry<V>`] is an explicit context object. Cloning it creates a new
//! handle to the **same** shared interior (`Rc<..>`), so independent
//! registries never see each other's names.
//!
//! Each declared name owns one state entry: the current value plus an
//! append-only list of subscriber callbacks. Writes go through a
//! [`State`] handle and propagate synchronously: bound DOM elements are
//! synced first, then subscribers run in registration order.
//!
//! # Invariants
//!
//! 1. A name maps to exactly one entry; redeclaration is rejected.
//! 2. Subscribers are never removed.
//! 3. Every subscriber of one propagation cycle receives the value that
//!    started the cycle, even if a subscriber writes the state again.
//! 4. No `RefCell` borrow is held while the DOM adapter or a callback runs,
//!    so callbacks may write any state, including the one that triggered
//!    them. The nested cycle completes before the outer one continues.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Redeclaration | name already declared | `NameCollision`, first entry intact |
//! | Unknown dependency | effect names an undeclared state | recorded, skipped, others still processed |
//! | Unbounded recursion | a subscriber writes its own state unconditionally | stack overflow; not guarded |

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::HooksConfig;
use crate::dom::{self, Dom, NullDom};
use crate::error::HookError;
use crate::state::State;
use crate::value::StateValue;

/// Subscriber callback. Receives `None` only for the one-shot call made by
/// an effect with no dependencies.
pub type Callback<V> = Rc<dyn Fn(Option<&V>)>;

/// A named value and its subscribers.
pub(crate) struct StateEntry<V> {
    pub(crate) name: String,
    pub(crate) value: RefCell<V>,
    pub(crate) subscribers: RefCell<Vec<Callback<V>>>,
}

impl<V> StateEntry<V> {
    fn new(name: &str, value: V) -> Self {
        Self {
            name: name.to_owned(),
            value: RefCell::new(value),
            subscribers: RefCell::new(Vec::new()),
        }
    }
}

/// Shared interior for [`Registry<V>`].
pub(crate) struct RegistryInner<V> {
    entries: RefCell<HashMap<String, Rc<StateEntry<V>>>>,
    dom: Rc<dyn Dom<V>>,
    config: HooksConfig,
}

impl<V: StateValue> RegistryInner<V> {
    fn entry(&self, name: &str) -> Option<Rc<StateEntry<V>>> {
        self.entries.borrow().get(name).cloned()
    }

    /// Sync bound elements, then run subscribers in insertion order.
    pub(crate) fn propagate(&self, entry: &StateEntry<V>) {
        let value = entry.value.borrow().clone();
        let subscribers: Vec<Callback<V>> = entry.subscribers.borrow().clone();

        let synced = dom::sync_bound(
            self.dom.as_ref(),
            &self.config.attribute,
            &entry.name,
            &value,
        );
        trace!(
            state = %entry.name,
            elements = synced,
            subscribers = subscribers.len(),
            "propagating state"
        );

        for callback in &subscribers {
            callback(Some(&value));
        }
    }
}

/// Result of [`Registry::register_effect`].
///
/// Failed dependencies do not stop the others from being processed, so an
/// outcome can carry both subscriptions and errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use = "an effect outcome may carry undefined-dependency errors"]
pub struct EffectOutcome {
    /// Dependencies the callback was subscribed to, in processing order.
    pub subscribed: Vec<String>,
    /// One error per dependency that could not be subscribed.
    pub errors: Vec<HookError>,
}

impl EffectOutcome {
    /// Whether every dependency was subscribed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` if every dependency was subscribed, else the first error.
    pub fn into_result(self) -> Result<(), HookError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Registry of named states bound to a document.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use clienthook_core::{MemoryDom, MemoryElement, Registry};
/// use serde_json::{Value, json};
///
/// let dom = Rc::new(MemoryDom::new());
/// let span = dom.append_bound(MemoryElement::new("span"), "client-hook", "count");
///
/// let registry: Registry<Value> = Registry::new(dom.clone());
/// let count = registry.declare_state("count", json!(1)).unwrap();
/// assert_eq!(span.content(), "1");
///
/// count.set(json!(2));
/// assert_eq!(span.content(), "2");
/// ```
pub struct Registry<V> {
    inner: Rc<RegistryInner<V>>,
}

// Manual Clone: shares the same Rc.
impl<V> Clone for Registry<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V> std::fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("states", &self.inner.entries.borrow().len())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl<V: StateValue> Registry<V> {
    /// Create a registry syncing into `dom` with the default config.
    #[must_use]
    pub fn new(dom: Rc<dyn Dom<V>>) -> Self {
        Self::with_config(dom, HooksConfig::default())
    }

    /// Create a registry syncing into `dom`.
    #[must_use]
    pub fn with_config(dom: Rc<dyn Dom<V>>, config: HooksConfig) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                entries: RefCell::new(HashMap::new()),
                dom,
                config,
            }),
        }
    }

    /// Create a registry with no document attached. Only subscribers observe
    /// writes.
    #[must_use]
    pub fn headless() -> Self {
        Self::new(Rc::new(NullDom))
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &HooksConfig {
        &self.inner.config
    }

    /// Declare a new state and return its handle.
    ///
    /// If `initial` is non-null and [`HooksConfig::sync_on_declare`] is set,
    /// bound elements are synced once before returning.
    ///
    /// # Errors
    ///
    /// [`HookError::NameCollision`] if `name` is already declared. Any other
    /// string, including `""`, is a valid name. On error nothing is created.
    pub fn declare_state(&self, name: &str, initial: V) -> Result<State<V>, HookError> {
        let entry = {
            let mut entries = self.inner.entries.borrow_mut();
            if entries.contains_key(name) {
                return Err(HookError::NameCollision(name.to_owned()));
            }
            let entry = Rc::new(StateEntry::new(name, initial));
            entries.insert(name.to_owned(), Rc::clone(&entry));
            entry
        };
        debug!(state = name, "declared state");

        let state = State::new(Rc::clone(&self.inner), entry);
        if self.inner.config.sync_on_declare && !state.with(StateValue::is_null) {
            state.notify();
        }
        Ok(state)
    }

    /// Declare a new state holding the null sentinel.
    ///
    /// # Errors
    ///
    /// Same as [`declare_state`](Self::declare_state).
    pub fn declare_state_null(&self, name: &str) -> Result<State<V>, HookError> {
        self.declare_state(name, V::null())
    }

    /// Register `callback` against the named states.
    ///
    /// - No dependencies: `callback(None)` runs once and nothing is
    ///   subscribed.
    /// - Otherwise, per dependency in order: the callback is appended to
    ///   that state's subscribers and immediately invoked with the state's
    ///   current value. A callback with N dependencies therefore runs N
    ///   times during registration.
    ///
    /// Undeclared dependencies are recorded in the outcome and skipped.
    /// A name repeated in `dependencies` is subscribed once.
    pub fn register_effect(
        &self,
        dependencies: &[&str],
        callback: impl Fn(Option<&V>) + 'static,
    ) -> EffectOutcome {
        self.register_callback(dependencies, Rc::new(callback))
    }

    /// [`register_effect`](Self::register_effect) for an already shared
    /// callback.
    pub fn register_callback(&self, dependencies: &[&str], callback: Callback<V>) -> EffectOutcome {
        let mut outcome = EffectOutcome::default();
        if dependencies.is_empty() {
            callback(None);
            return outcome;
        }

        for (idx, &name) in dependencies.iter().enumerate() {
            if dependencies[..idx].contains(&name) {
                continue;
            }
            let Some(entry) = self.inner.entry(name) else {
                debug!(state = name, "effect dependency is not declared");
                outcome
                    .errors
                    .push(HookError::UndefinedDependency(name.to_owned()));
                continue;
            };
            entry.subscribers.borrow_mut().push(Rc::clone(&callback));
            outcome.subscribed.push(name.to_owned());

            let value = entry.value.borrow().clone();
            callback(Some(&value));
        }
        debug!(
            subscribed = outcome.subscribed.len(),
            failed = outcome.errors.len(),
            "registered effect"
        );
        outcome
    }

    /// Handle to a declared state.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<State<V>> {
        self.inner
            .entry(name)
            .map(|entry| State::new(Rc::clone(&self.inner), entry))
    }

    /// Current value of a declared state.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<V> {
        self.inner.entry(name).map(|entry| entry.value.borrow().clone())
    }

    /// Write a declared state by name and propagate.
    ///
    /// # Errors
    ///
    /// [`HookError::UnknownState`] if `name` is not declared.
    pub fn set(&self, name: &str, value: V) -> Result<(), HookError> {
        let state = self
            .state(name)
            .ok_or_else(|| HookError::UnknownState(name.to_owned()))?;
        state.set(value);
        Ok(())
    }

    /// Re-run DOM sync and subscribers for `name` with its current value.
    /// Unknown names are ignored.
    pub fn notify(&self, name: &str) {
        match self.inner.entry(name) {
            Some(entry) => self.inner.propagate(&entry),
            None => debug!(state = name, "notify for undeclared state ignored"),
        }
    }

    /// Whether `name` is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.entries.borrow().contains_key(name)
    }

    /// Number of declared states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.entries.borrow().len()
    }

    /// Whether no state has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.entries.borrow().is_empty()
    }

    /// Declared names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.entries.borrow().keys().cloned().collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_dom::{MemoryDom, MemoryElement};
    use serde_json::{Value, json};
    use std::cell::Cell;

    fn registry_with_dom() -> (Registry<Value>, Rc<MemoryDom>) {
        let dom = Rc::new(MemoryDom::new());
        (Registry::new(dom.clone()), dom)
    }

    #[test]
    fn declare_then_read() {
        let registry = Registry::<Value>::headless();
        let state = registry.declare_state("count", json!(3)).unwrap();
        assert_eq!(state.get(), json!(3));
        assert_eq!(registry.get("count"), Some(json!(3)));
        assert!(registry.contains("count"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_string_is_an_ordinary_name() {
        let dom = Rc::new(MemoryDom::new());
        let span = dom.append_bound(MemoryElement::new("span"), "client-hook", "");
        let registry: Registry<Value> = Registry::new(dom.clone());

        let state = registry.declare_state("", json!(1)).unwrap();
        assert_eq!(state.name(), "");
        assert_eq!(registry.get(""), Some(json!(1)));
        assert_eq!(span.content(), "1");

        registry.set("", json!(2)).unwrap();
        assert_eq!(state.get(), json!(2));
        assert!(matches!(
            registry.declare_state("", json!(3)),
            Err(HookError::NameCollision(name)) if name.is_empty()
        ));
    }

    #[test]
    fn redeclaration_collides_and_keeps_first_value() {
        let registry = Registry::<Value>::headless();
        let _x = registry.declare_state("x", json!(1)).unwrap();
        let err = registry.declare_state("x", json!(2)).unwrap_err();
        assert_eq!(err, HookError::NameCollision("x".into()));
        assert_eq!(registry.get("x"), Some(json!(1)));
    }

    #[test]
    fn null_initial_value_skips_declaration_sync() {
        let (registry, dom) = registry_with_dom();
        let span = dom.append_bound(MemoryElement::new("span"), "client-hook", "n");
        let state = registry.declare_state_null("n").unwrap();
        assert_eq!(span.writes(), 0);
        state.set(json!("x"));
        assert_eq!(span.content(), "x");
    }

    #[test]
    fn declaration_sync_can_be_disabled() {
        let dom = Rc::new(MemoryDom::new());
        let span = dom.append_bound(MemoryElement::new("span"), "client-hook", "a");
        let registry: Registry<Value> =
            Registry::with_config(dom.clone(), HooksConfig::default().with_sync_on_declare(false));
        let _a = registry.declare_state("a", json!(5)).unwrap();
        assert_eq!(span.writes(), 0);
    }

    #[test]
    fn custom_marker_attribute() {
        let dom = Rc::new(MemoryDom::new());
        let custom = dom.append_bound(MemoryElement::new("b"), "data-bind", "a");
        let default = dom.append_bound(MemoryElement::new("b"), "client-hook", "a");
        let registry: Registry<Value> =
            Registry::with_config(dom.clone(), HooksConfig::default().with_attribute("data-bind"));
        let _a = registry.declare_state("a", json!("hi")).unwrap();
        assert_eq!(custom.content(), "hi");
        assert_eq!(default.writes(), 0);
    }

    #[test]
    fn empty_dependencies_is_one_shot() {
        let registry = Registry::<Value>::headless();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&calls);
        let outcome = registry.register_effect(&[], move |v| log.borrow_mut().push(v.cloned()));
        assert!(outcome.is_ok());
        assert!(outcome.subscribed.is_empty());
        assert_eq!(*calls.borrow(), vec![None]);
    }

    #[test]
    fn undefined_dependency_is_skipped_and_others_continue() {
        let registry = Registry::<Value>::headless();
        let b = registry.declare_state("b", json!(2)).unwrap();
        let calls = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&calls);

        let outcome = registry.register_effect(&["ghost", "b"], move |_| {
            counter.set(counter.get() + 1);
        });
        assert_eq!(outcome.subscribed, vec!["b".to_owned()]);
        assert_eq!(outcome.errors, vec![HookError::UndefinedDependency("ghost".into())]);
        assert_eq!(calls.get(), 1);
        assert_eq!(b.subscriber_count(), 1);

        assert_eq!(
            outcome.into_result(),
            Err(HookError::UndefinedDependency("ghost".into()))
        );
    }

    #[test]
    fn repeated_dependency_subscribes_once() {
        let registry = Registry::<Value>::headless();
        let a = registry.declare_state("a", json!(0)).unwrap();
        let outcome = registry.register_effect(&["a", "a"], |_| {});
        assert_eq!(outcome.subscribed, vec!["a".to_owned()]);
        assert_eq!(a.subscriber_count(), 1);
    }

    #[test]
    fn set_by_name() {
        let (registry, dom) = registry_with_dom();
        let span = dom.append_bound(MemoryElement::new("span"), "client-hook", "label");
        let _label = registry.declare_state("label", json!("a")).unwrap();
        registry.set("label", json!("b")).unwrap();
        assert_eq!(span.content(), "b");
        assert_eq!(
            registry.set("missing", json!(1)),
            Err(HookError::UnknownState("missing".into()))
        );
    }

    #[test]
    fn notify_resyncs_and_ignores_unknown() {
        let (registry, dom) = registry_with_dom();
        let _v = registry.declare_state("v", json!(1)).unwrap();
        let span = dom.append_bound(MemoryElement::new("span"), "client-hook", "v");
        assert_eq!(span.content(), "");
        registry.notify("v");
        assert_eq!(span.content(), "1");
        registry.notify("nope");
    }

    #[test]
    fn names_are_sorted() {
        let registry = Registry::<Value>::headless();
        for name in ["zeta", "alpha", "mid"] {
            let _ = registry.declare_state(name, json!(null)).unwrap();
        }
        assert_eq!(registry.names(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn clones_share_entries() {
        let registry = Registry::<Value>::headless();
        let other = registry.clone();
        let _s = registry.declare_state("s", json!(1)).unwrap();
        assert!(other.contains("s"));
        assert!(other.declare_state("s", json!(2)).is_err());
    }

    #[test]
    fn independent_registries_do_not_collide() {
        let first = Registry::<Value>::headless();
        let second = Registry::<Value>::headless();
        assert!(first.declare_state("s", json!(1)).is_ok());
        assert!(second.declare_state("s", json!(2)).is_ok());
        assert_eq!(first.get("s"), Some(json!(1)));
        assert_eq!(second.get("s"), Some(json!(2)));
    }

    #[test]
    fn debug_format() {
        let registry = Registry::<Value>::headless();
        let dbg = format!("{registry:?}");
        assert!(dbg.contains("Registry"));
        assert!(dbg.contains("states"));
    }
}
