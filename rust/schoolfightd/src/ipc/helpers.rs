use serde::Serialize;
use serde_json::Value;

use crate::ipc::error::err;
use crate::ipc::types::Request;

pub fn required_str<'a>(req: &'a Request, key: &str) -> Result<&'a str, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing params.{key}"), None))
}

pub fn optional_str<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.params.get(key).and_then(|v| v.as_str())
}

pub fn required_bool(req: &Request, key: &str) -> Result<bool, Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_bool())
        .ok_or_else(|| err(&req.id, "bad_params", format!("params.{key} must be boolean"), None))
}

/// Class named in params, or the dashboard's selected class.
pub fn class_or_selected(req: &Request, selected: &str) -> String {
    optional_str(req, "class")
        .map(str::to_string)
        .unwrap_or_else(|| selected.to_string())
}

/// Mark values arrive as typed text; numbers are accepted and rendered back to
/// text so they go through the same parser.
pub fn mark_text(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

pub fn to_result<T: Serialize>(id: &str, value: &T) -> Value {
    match serde_json::to_value(value) {
        Ok(v) => crate::ipc::error::ok(id, v),
        Err(e) => err(id, "serialize_failed", e.to_string(), None),
    }
}
