use crate::catalog;
use crate::dashboard::{reduce, Action, Outcome};
use crate::ipc::error::{domain_err, ok};
use crate::ipc::helpers::{class_or_selected, mark_text, required_str, to_result};
use crate::ipc::types::{AppState, Request};
use serde_json::json;
use tracing::warn;

fn handle_marks_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term = match required_str(req, "term") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    let subject = match required_str(req, "subject") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    let field = match required_str(req, "field") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    let raw = mark_text(req.params.get("value"));
    let class = class_or_selected(req, state.dashboard.selection.class);

    let action = Action::SetMark {
        class,
        term,
        subject,
        field,
        raw: raw.clone(),
    };
    match reduce(&mut state.dashboard, action) {
        Ok(Outcome::MarkSet {
            class,
            term,
            subject,
            entry,
            parsed,
        }) => {
            if parsed.is_fallback() {
                warn!(class, term, subject, raw = %raw, "unparseable mark stored as 0");
            }
            ok(
                &req.id,
                json!({
                    "entry": entry,
                    "parsed": parsed,
                    "report": state.dashboard.term_report(class, term),
                }),
            )
        }
        Ok(_) => ok(&req.id, json!({})),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_ranks_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let term = match required_str(req, "term") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    let value = match required_str(req, "value") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    let class = class_or_selected(req, state.dashboard.selection.class);

    match reduce(&mut state.dashboard, Action::SetRank { class, term, value }) {
        Ok(Outcome::RankSet { class, term }) => ok(
            &req.id,
            json!({ "class": class, "term": term, "rank": state.dashboard.rank(class, term) }),
        ),
        Ok(_) => ok(&req.id, json!({})),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_results_term(state: &mut AppState, req: &Request) -> serde_json::Value {
    let class = class_or_selected(req, state.dashboard.selection.class);
    let class = match catalog::resolve_class(&class) {
        Ok(v) => v,
        Err(e) => return domain_err(&req.id, &e),
    };
    let term = match required_str(req, "term").map(catalog::resolve_term) {
        Ok(Ok(v)) => v,
        Ok(Err(e)) => return domain_err(&req.id, &e),
        Err(resp) => return resp,
    };
    to_result(&req.id, &state.dashboard.term_report(class, term))
}

fn handle_results_class(state: &mut AppState, req: &Request) -> serde_json::Value {
    let class = class_or_selected(req, state.dashboard.selection.class);
    match catalog::resolve_class(&class) {
        Ok(class) => to_result(&req.id, &state.dashboard.class_report(class)),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_results_history(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(&req.id, json!({ "classes": state.dashboard.history() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "marks.set" => Some(handle_marks_set(state, req)),
        "ranks.set" => Some(handle_ranks_set(state, req)),
        "results.term" => Some(handle_results_term(state, req)),
        "results.class" => Some(handle_results_class(state, req)),
        "results.history" => Some(handle_results_history(state, req)),
        _ => None,
    }
}
