//! Bridges to the page's Bootstrap bundle (`window.bootstrap`).
//!
//! Bootstrap components are looked up by reflection so the wasm module does
//! not need bindings generated for them, and a page without the bundle just
//! loses the affected behaviour.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use super::logging::Logger;
use super::traits::SelectionDialog;

/// Look up a component class such as `bootstrap.Modal`
pub fn component_class(name: &str) -> Option<Function> {
    let window = web_sys::window()?;
    let bootstrap = Reflect::get(&window, &JsValue::from_str("bootstrap")).ok()?;
    if bootstrap.is_undefined() || bootstrap.is_null() {
        return None;
    }
    Reflect::get(&bootstrap, &JsValue::from_str(name))
        .ok()?
        .dyn_into::<Function>()
        .ok()
}

/// The instance already bound to `element`, or a new one built with `options`
pub fn get_or_create_instance(
    class: &Function,
    element: &Element,
    options: &JsValue,
) -> Result<JsValue, JsValue> {
    let get_instance: Function =
        Reflect::get(class, &JsValue::from_str("getInstance"))?.dyn_into()?;
    let existing = get_instance.call1(class, element)?;
    if !existing.is_null() && !existing.is_undefined() {
        return Ok(existing);
    }
    Reflect::construct(class, &Array::of2(element, options))
}

/// Call a zero-argument method such as `show` or `hide` on an instance
pub fn call_method(instance: &JsValue, method: &str) -> Result<(), JsValue> {
    let method: Function = Reflect::get(instance, &JsValue::from_str(method))?.dyn_into()?;
    method.call0(instance)?;
    Ok(())
}

/// Build a plain options object, e.g. `{ delay: 3500 }`
pub fn options(entries: &[(&str, JsValue)]) -> Result<JsValue, JsValue> {
    let object = Object::new();
    for (key, value) in entries {
        Reflect::set(&object, &JsValue::from_str(key), value)?;
    }
    Ok(object.into())
}

/// The order-type selection modal, driven through `bootstrap.Modal`
pub struct BootstrapModal {
    element: Option<Element>,
}

impl BootstrapModal {
    pub fn new(element: Option<Element>) -> Self {
        Self { element }
    }
}

impl SelectionDialog for BootstrapModal {
    fn close(&self) {
        let Some(element) = &self.element else {
            Logger::debug_with_component(
                "selection-dialog",
                "No modal element on page, nothing to close",
            );
            return;
        };
        let Some(class) = component_class("Modal") else {
            Logger::warn_with_component("selection-dialog", "bootstrap.Modal is not loaded");
            return;
        };

        // Reusing the bound instance keeps hide() a no-op on a closed modal
        let result = get_or_create_instance(&class, element, &JsValue::UNDEFINED)
            .and_then(|modal| call_method(&modal, "hide"));
        if let Err(e) = result {
            Logger::warn_with_component(
                "selection-dialog",
                &format!("Failed to hide modal: {:?}", e),
            );
        }
    }
}
