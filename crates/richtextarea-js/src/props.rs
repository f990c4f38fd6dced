//! Reading host props and calling host handlers.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use richtextarea_browser::{FrameEvent, HostHandler};
use richtextarea_core::HostProps;

/// A JavaScript function registered as an `on*` prop.
#[derive(Debug, Clone)]
pub struct JsHandler(pub js_sys::Function);

impl PartialEq for JsHandler {
    fn eq(&self, other: &Self) -> bool {
        js_sys::Object::is(&self.0, &other.0)
    }
}

impl HostHandler for JsHandler {
    fn handle(&self, event: FrameEvent) {
        let payload = event_payload(&event);
        if let Err(err) = self.0.call1(&JsValue::NULL, &payload) {
            tracing::warn!(error = ?err, kind = %event.kind, "event handler threw");
        }
    }
}

/// `{ value, type, target, currentTarget }`
fn event_payload(event: &FrameEvent) -> JsValue {
    let payload = js_sys::Object::new();
    let fields: [(&str, JsValue); 4] = [
        ("value", JsValue::from_str(&event.value)),
        ("type", JsValue::from_str(event.kind.as_str())),
        (
            "target",
            event.target.clone().map(JsValue::from).unwrap_or(JsValue::NULL),
        ),
        (
            "currentTarget",
            event
                .current_target
                .clone()
                .map(JsValue::from)
                .unwrap_or(JsValue::NULL),
        ),
    ];
    for (key, value) in fields {
        let _ = js_sys::Reflect::set(&payload, &JsValue::from_str(key), &value);
    }
    payload.into()
}

/// Split a plain props object into sync state, handlers and wrapper
/// attributes. `undefined` and `null` give empty props.
pub(crate) fn parse_props(value: &JsValue) -> Result<HostProps<JsHandler>, JsError> {
    let mut props = HostProps::default();
    if value.is_undefined() || value.is_null() {
        return Ok(props);
    }
    let object = value
        .dyn_ref::<js_sys::Object>()
        .ok_or_else(|| JsError::new("Props must be an object"))?;

    for entry in js_sys::Object::entries(object).iter() {
        let pair: js_sys::Array = entry.unchecked_into();
        let Some(name) = pair.get(0).as_string() else {
            continue;
        };
        let value = pair.get(1);
        match value.dyn_ref::<js_sys::Function>() {
            Some(function) => props.push(&name, None, Some(JsHandler(function.clone()))),
            None => props.push(&name, prop_string(&value), None),
        }
    }
    Ok(props)
}

/// String form of a prop value. `false`, `null` and `undefined` mean
/// "absent"; `true` is an empty boolean attribute.
fn prop_string(value: &JsValue) -> Option<String> {
    if value.is_undefined() || value.is_null() {
        return None;
    }
    if let Some(s) = value.as_string() {
        return Some(s);
    }
    if let Some(flag) = value.as_bool() {
        return flag.then(String::new);
    }
    if let Some(n) = value.as_f64() {
        return Some(n.to_string());
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
}
