#![forbid(unsafe_code)]

//! Log-and-continue facade over [`Registry`].
//!
//! Registry operations return their errors. Applications that prefer the
//! hook-style contract, where a failed declaration or dependency is
//! reported and execution carries on, wrap the registry in [`Hooks`].
//! Failures are emitted through `tracing::error!` as
//! `Error in useState: ...` / `Error in useEffect: ...`.

use tracing::error;

use crate::error::HookError;
use crate::registry::Registry;
use crate::state::State;
use crate::value::StateValue;

const USE_STATE: &str = "useState";
const USE_EFFECT: &str = "useEffect";

/// Report `result` for `operation` and discard the error.
pub fn report<T>(operation: &str, result: Result<T, HookError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            report_error(operation, &err);
            None
        }
    }
}

/// Emit a single reported failure.
pub fn report_error(operation: &str, err: &HookError) {
    error!(operation, state = err.state_name(), "Error in {operation}: {err}");
}

/// Hook-style front end for a [`Registry`].
#[derive(Debug, Clone)]
pub struct Hooks<V> {
    registry: Registry<V>,
}

impl<V: StateValue> Hooks<V> {
    /// Wrap a registry.
    #[must_use]
    pub fn new(registry: Registry<V>) -> Self {
        Self { registry }
    }

    /// The wrapped registry.
    #[must_use]
    pub fn registry(&self) -> &Registry<V> {
        &self.registry
    }

    /// Declare a state. Failures are reported and yield `None`; no entry is
    /// created.
    pub fn use_state(&self, name: &str, value: V) -> Option<State<V>> {
        report(USE_STATE, self.registry.declare_state(name, value))
    }

    /// [`use_state`](Self::use_state) with the null sentinel as the initial
    /// value.
    pub fn use_state_null(&self, name: &str) -> Option<State<V>> {
        report(USE_STATE, self.registry.declare_state_null(name))
    }

    /// Register an effect. Each undeclared dependency is reported and
    /// skipped.
    pub fn use_effect(&self, dependencies: &[&str], callback: impl Fn(Option<&V>) + 'static) {
        let outcome = self.registry.register_effect(dependencies, callback);
        for err in &outcome.errors {
            report_error(USE_EFFECT, err);
        }
    }
}
