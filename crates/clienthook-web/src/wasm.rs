#![forbid(unsafe_code)]

//! `wasm-bindgen` exports.
//!
//! Two surfaces share the same core:
//!
//! - [`ClientHooks`]: an explicit registry object. Failures are returned to
//!   JS as thrown `Error`s.
//! - [`use_state`] / [`use_effect`] (`useState` / `useEffect` in JS): a
//!   page-wide registry whose states are installed as getter/setter
//!   properties on the global object. Failures are logged with
//!   `console.error` and execution continues.
//!
//! Only compiled on `wasm32` targets.

use std::rc::Rc;

use clienthook_core::{
    Callback, Dom, HookError, HooksConfig, NullDom, Registry, State, StateValue,
};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::js_state::JsState;
use crate::web_dom::WebDom;

const USE_STATE: &str = "useState";
const USE_EFFECT: &str = "useEffect";
const REGISTER_EFFECT: &str = "registerEffect";

thread_local! {
    static PAGE: Registry<JsState> = Registry::new(document_dom());
}

fn console_report(operation: &str, err: &HookError) {
    web_sys::console::error_2(
        &JsValue::from_str(&format!("Error in {operation}:")),
        &JsValue::from_str(&err.to_string()),
    );
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn document_dom() -> Rc<dyn Dom<JsState>> {
    match WebDom::from_window() {
        Some(dom) => Rc::new(dom),
        None => Rc::new(NullDom),
    }
}

fn type_name(value: &JsValue) -> String {
    value
        .js_typeof()
        .as_string()
        .unwrap_or_else(|| "unknown".to_owned())
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

fn to_js_error(err: &HookError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn parse_name(name: &JsValue) -> Result<String, HookError> {
    name.as_string().ok_or_else(|| {
        HookError::InvalidArgument(format!(
            "expected a string state name but received a {}",
            type_name(name)
        ))
    })
}

fn parse_callback(callback: JsValue) -> Result<Function, HookError> {
    callback.dyn_into::<Function>().map_err(|other| {
        HookError::InvalidArgument(format!(
            "expected a function but received a {}",
            type_name(&other)
        ))
    })
}

/// An omitted initial value means null.
fn initial_value(value: JsValue) -> JsState {
    if value.is_undefined() {
        JsState::null()
    } else {
        JsState(value)
    }
}

/// Own enumerable keys of a dependency object, in key order. Anything that
/// is not an object has no dependencies.
///
/// Tested with `typeof`, not `instanceof`, so null-prototype and
/// cross-realm objects count.
fn dependency_names(dependencies: &JsValue) -> Vec<String> {
    if !dependencies.is_object() {
        return Vec::new();
    }
    Object::keys(dependencies.unchecked_ref::<Object>())
        .iter()
        .filter_map(|key| key.as_string())
        .collect()
}

fn js_callback(function: Function, operation: &'static str) -> Callback<JsState> {
    Rc::new(move |value: Option<&JsState>| {
        let result = match value {
            None => function.call0(&JsValue::UNDEFINED),
            Some(value) => function.call1(&JsValue::UNDEFINED, &value.0),
        };
        if let Err(err) = result {
            web_sys::console::error_2(
                &JsValue::from_str(&format!("Error in {operation} callback:")),
                &err,
            );
        }
    })
}

fn register(
    registry: &Registry<JsState>,
    function: Function,
    dependencies: &JsValue,
    operation: &'static str,
) -> Vec<HookError> {
    let names = dependency_names(dependencies);
    let deps: Vec<&str> = names.iter().map(String::as_str).collect();
    registry
        .register_callback(&deps, js_callback(function, operation))
        .errors
}

fn parse_init_string(options: &Option<JsValue>, key: &str) -> Option<String> {
    options
        .as_ref()
        .and_then(|o| Reflect::get(o, &JsValue::from_str(key)).ok())
        .and_then(|v| v.as_string())
}

fn parse_init_bool(options: &Option<JsValue>, key: &str) -> Option<bool> {
    options
        .as_ref()
        .and_then(|o| Reflect::get(o, &JsValue::from_str(key)).ok())
        .and_then(|v| v.as_bool())
}

fn parse_config(options: &Option<JsValue>) -> HooksConfig {
    let mut config = HooksConfig::default();
    if let Some(attribute) = parse_init_string(options, "attribute").filter(|a| !a.is_empty()) {
        config = config.with_attribute(attribute);
    }
    if let Some(sync) = parse_init_bool(options, "syncOnDeclare")
        .or(parse_init_bool(options, "sync_on_declare"))
    {
        config = config.with_sync_on_declare(sync);
    }
    config
}

/// Install a getter/setter pair for `state` under `key` on `target`.
///
/// The closures are leaked: binding points live as long as the page.
fn define_binding_point(
    target: &Object,
    key: &JsValue,
    state: &State<JsState>,
) -> Result<(), JsValue> {
    let reader = state.clone();
    let getter = Closure::<dyn Fn() -> JsValue>::new(move || reader.get().0).into_js_value();
    let writer = state.clone();
    let setter =
        Closure::<dyn Fn(JsValue)>::new(move |value: JsValue| writer.set(JsState(value)))
            .into_js_value();

    let descriptor = Object::new();
    Reflect::set(&descriptor, &JsValue::from_str("get"), &getter)?;
    Reflect::set(&descriptor, &JsValue::from_str("set"), &setter)?;
    if Reflect::define_property(target, key, &descriptor)? {
        Ok(())
    } else {
        Err(JsValue::from_str("property could not be defined"))
    }
}

fn install_global_state(
    registry: &Registry<JsState>,
    name: &JsValue,
    value: JsValue,
) -> Result<(), HookError> {
    let name = parse_name(name)?;
    let global = js_sys::global();
    let key = JsValue::from_str(&name);

    let occupied = !Reflect::get(&global, &key).is_ok_and(|existing| existing.is_undefined());
    if occupied {
        return Err(HookError::NameCollision(name));
    }

    let state = registry.declare_state(&name, initial_value(value))?;
    define_binding_point(&global, &key, &state).map_err(|err| {
        HookError::InvalidArgument(format!(
            "cannot bind '{name}' on the global object: {}",
            describe(&err)
        ))
    })
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

/// Declare a page-wide state and expose it as `globalThis[name]`.
///
/// Reading the property returns the current value; assigning it syncs bound
/// elements and runs subscribers before the assignment returns. Failures
/// are logged to `console.error`.
#[wasm_bindgen(js_name = useState)]
pub fn use_state(name: JsValue, value: JsValue) {
    if let Err(err) = PAGE.with(|registry| install_global_state(registry, &name, value)) {
        console_report(USE_STATE, &err);
    }
}

/// Register `callback` against the page-wide states named by the keys of
/// `variables`. With no keys the callback runs once with no arguments.
/// Failures are logged to `console.error`; undeclared names are skipped.
///
/// An exception thrown by `callback` is logged with `console.error` and
/// does not propagate: the remaining dependencies are still subscribed at
/// registration, and on a later write the remaining subscribers still run.
#[wasm_bindgen(js_name = useEffect)]
pub fn use_effect(callback: JsValue, variables: JsValue) {
    let function = match parse_callback(callback) {
        Ok(function) => function,
        Err(err) => {
            console_report(USE_EFFECT, &err);
            return;
        }
    };
    let errors = PAGE.with(|registry| register(registry, function, &variables, USE_EFFECT));
    for err in &errors {
        console_report(USE_EFFECT, err);
    }
}

/// Explicit registry of named states bound to the current document.
#[wasm_bindgen]
pub struct ClientHooks {
    registry: Registry<JsState>,
}

#[wasm_bindgen]
impl ClientHooks {
    /// Create a registry. `options` may set `attribute` (marker attribute
    /// name) and `syncOnDeclare`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Self {
        install_panic_hook();
        Self {
            registry: Registry::with_config(document_dom(), parse_config(&options)),
        }
    }

    /// Declare a state. Throws on a non-string name or a name already in
    /// use.
    #[wasm_bindgen(js_name = declareState)]
    pub fn declare_state(&self, name: JsValue, value: JsValue) -> Result<(), JsValue> {
        let name = parse_name(&name).map_err(|err| to_js_error(&err))?;
        self.registry
            .declare_state(&name, initial_value(value))
            .map(drop)
            .map_err(|err| to_js_error(&err))
    }

    /// Register an effect on the states named by the keys of
    /// `dependencies`. Every declared dependency is subscribed; if any were
    /// undeclared, throws for the first one afterwards. Exceptions thrown by
    /// `callback` itself are logged, not rethrown, as in `useEffect`.
    #[wasm_bindgen(js_name = registerEffect)]
    pub fn register_effect(&self, callback: JsValue, dependencies: JsValue) -> Result<(), JsValue> {
        let function = parse_callback(callback).map_err(|err| to_js_error(&err))?;
        match register(&self.registry, function, &dependencies, REGISTER_EFFECT).first() {
            Some(err) => Err(to_js_error(err)),
            None => Ok(()),
        }
    }

    /// Current value of a state. Throws for an undeclared name.
    pub fn get(&self, name: &str) -> Result<JsValue, JsValue> {
        self.registry
            .get(name)
            .map(JsValue::from)
            .ok_or_else(|| to_js_error(&HookError::UnknownState(name.to_owned())))
    }

    /// Write a state and propagate. Throws for an undeclared name.
    pub fn set(&self, name: &str, value: JsValue) -> Result<(), JsValue> {
        self.registry
            .set(name, JsState(value))
            .map_err(|err| to_js_error(&err))
    }

    /// Whether `name` is declared.
    pub fn has(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Declared names, sorted. Returns `Array<string>`.
    pub fn names(&self) -> Array {
        self.registry
            .names()
            .into_iter()
            .map(JsValue::from)
            .collect()
    }

    /// Re-sync bound elements and rerun subscribers for `name`.
    pub fn notify(&self, name: &str) {
        self.registry.notify(name);
    }

    /// Number of subscribers on `name`, or `undefined` if undeclared.
    #[wasm_bindgen(js_name = subscriberCount)]
    pub fn subscriber_count(&self, name: &str) -> Option<u32> {
        self.registry
            .state(name)
            .map(|state| u32::try_from(state.subscriber_count()).unwrap_or(u32::MAX))
    }
}
