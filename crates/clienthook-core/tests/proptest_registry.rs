#![forbid(unsafe_code)]

//! Property tests for registry invariants.

use std::cell::RefCell;
use std::rc::Rc;

use clienthook_core::{HookError, MemoryDom, MemoryElement, Registry, StateValue};
use proptest::prelude::*;
use serde_json::{Value, json};

fn state_name() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,15}"
}

fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,24}".prop_map(Value::from),
    ]
}

proptest! {
    #[test]
    fn declare_then_read_returns_value(name in state_name(), value in scalar_value()) {
        let registry = Registry::<Value>::headless();
        let state = registry.declare_state(&name, value.clone()).unwrap();
        prop_assert_eq!(state.get(), value.clone());
        prop_assert_eq!(registry.get(&name), Some(value));
    }

    #[test]
    fn bound_span_shows_text_of_last_write(
        name in state_name(),
        writes in prop::collection::vec(scalar_value(), 1..8),
    ) {
        let dom = Rc::new(MemoryDom::new());
        let span = dom.append_bound(MemoryElement::new("span"), "client-hook", &name);
        let registry: Registry<Value> = Registry::new(dom.clone());
        let state = registry.declare_state_null(&name).unwrap();

        for value in &writes {
            state.set(value.clone());
        }
        let last = writes.last().cloned().unwrap_or(Value::Null);
        prop_assert_eq!(span.content(), last.to_text());
        prop_assert_eq!(span.writes(), writes.len() as u64);
    }

    #[test]
    fn redeclaration_always_collides(name in state_name(), first in scalar_value(), second in scalar_value()) {
        let registry = Registry::<Value>::headless();
        let _state = registry.declare_state(&name, first.clone()).unwrap();
        let err = registry.declare_state(&name, second).unwrap_err();
        prop_assert_eq!(err, HookError::NameCollision(name.clone()));
        prop_assert_eq!(registry.get(&name), Some(first));
        prop_assert_eq!(registry.len(), 1);
    }

    #[test]
    fn subscribers_fire_in_registration_order(count in 1usize..12, value in any::<i64>()) {
        let registry = Registry::<Value>::headless();
        let state = registry.declare_state("s", json!(0)).unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));

        for idx in 0..count {
            let order = Rc::clone(&order);
            let _ = registry.register_effect(&["s"], move |_| order.borrow_mut().push(idx));
        }
        order.borrow_mut().clear();

        state.set(json!(value));
        prop_assert_eq!(order.borrow().clone(), (0..count).collect::<Vec<_>>());
        prop_assert_eq!(state.subscriber_count(), count);
    }
}
