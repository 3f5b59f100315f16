use crate::catalog;
use crate::ipc::error::ok;
use crate::ipc::helpers::to_result;
use crate::ipc::types::{AppState, Request};
use serde_json::json;

fn handle_catalog_get(req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "classes": catalog::CLASSES,
            "currentClass": catalog::CURRENT_CLASS,
            "terms": catalog::TERMS,
            "subjects": catalog::SUBJECTS,
            "themes": catalog::THEMES,
        }),
    )
}

fn handle_state_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    to_result(&req.id, &state.dashboard.snapshot())
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "catalog.get" => Some(handle_catalog_get(req)),
        "state.get" => Some(handle_state_get(state, req)),
        _ => None,
    }
}
