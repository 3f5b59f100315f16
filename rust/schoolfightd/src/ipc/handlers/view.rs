use crate::dashboard::{reduce, Action};
use crate::ipc::error::{domain_err, err};
use crate::ipc::helpers::{required_bool, required_str, to_result};
use crate::ipc::types::{AppState, Request};
use serde_json::Value;

fn apply(state: &mut AppState, req: &Request, action: Action) -> Value {
    match reduce(&mut state.dashboard, action) {
        Ok(_) => to_result(&req.id, &state.dashboard.snapshot()),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn str_action(
    state: &mut AppState,
    req: &Request,
    key: &str,
    make: fn(String) -> Action,
) -> Value {
    match required_str(req, key) {
        Ok(v) => apply(state, req, make(v.to_string())),
        Err(resp) => resp,
    }
}

fn bool_action(state: &mut AppState, req: &Request, key: &str, make: fn(bool) -> Action) -> Value {
    match required_bool(req, key) {
        Ok(v) => apply(state, req, make(v)),
        Err(resp) => resp,
    }
}

fn handle_select_term(state: &mut AppState, req: &Request) -> Value {
    // An explicit null collapses every term.
    let term = match req.params.get("term") {
        Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        _ => {
            return err(
                &req.id,
                "bad_params",
                "params.term must be a string or null",
                None,
            )
        }
    };
    apply(state, req, Action::SelectTerm(term))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    match req.method.as_str() {
        "view.selectClass" => Some(str_action(state, req, "class", Action::SelectClass)),
        "view.selectTerm" => Some(handle_select_term(state, req)),
        "view.toggleTerm" => Some(str_action(state, req, "term", Action::ToggleTerm)),
        "view.set" => Some(str_action(state, req, "view", Action::SetView)),
        "view.setTheme" => Some(str_action(state, req, "theme", Action::SetTheme)),
        "view.setDarkMode" => Some(bool_action(state, req, "enabled", Action::SetDarkMode)),
        "view.toggleMenu" => Some(bool_action(state, req, "open", Action::ToggleMenu)),
        "view.openOverview" => Some(apply(state, req, Action::OpenOverview)),
        "view.openHistoryEntry" => {
            Some(str_action(state, req, "class", Action::OpenHistoryEntry))
        }
        _ => None,
    }
}
