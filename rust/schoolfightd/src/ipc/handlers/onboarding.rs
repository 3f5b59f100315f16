use crate::dashboard::{reduce, Action, Outcome};
use crate::db;
use crate::ipc::error::{domain_err, err, ok};
use crate::ipc::helpers::{mark_text, optional_str, required_str, to_result};
use crate::ipc::types::{AppState, Request};
use crate::onboarding::OnboardingView;
use serde_json::json;
use tracing::{info, warn};

fn onboarding_result(state: &AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "onboarding": OnboardingView::from(&state.dashboard.onboarding),
            "userName": state.dashboard.user_name,
            "theme": state.dashboard.selection.theme,
        }),
    )
}

fn apply(state: &mut AppState, req: &Request, action: Action) -> serde_json::Value {
    match reduce(&mut state.dashboard, action) {
        Ok(_) => onboarding_result(state, req),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_set_name(state: &mut AppState, req: &Request) -> serde_json::Value {
    let name = match required_str(req, "name") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    apply(state, req, Action::SetUserName(name))
}

fn handle_demo_grade(state: &mut AppState, req: &Request) -> serde_json::Value {
    let raw = mark_text(req.params.get("obtained"));
    match reduce(&mut state.dashboard, Action::TryDemo(raw)) {
        Ok(Outcome::DemoGraded(demo)) => to_result(&req.id, &demo),
        Ok(_) => onboarding_result(state, req),
        Err(e) => domain_err(&req.id, &e),
    }
}

fn handle_pick_theme(state: &mut AppState, req: &Request) -> serde_json::Value {
    let theme = match required_str(req, "theme") {
        Ok(v) => v.to_string(),
        Err(resp) => return resp,
    };
    apply(state, req, Action::PickOnboardingTheme(theme))
}

fn handle_complete(state: &mut AppState, req: &Request) -> serde_json::Value {
    // Completion must be persisted; refuse before touching state if it can't be.
    if state.db.is_none() {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    }

    let name = optional_str(req, "name").map(str::to_string);
    let prev_onboarding = state.dashboard.onboarding.clone();
    let prev_name = state.dashboard.user_name.clone();
    let user_name = match reduce(&mut state.dashboard, Action::CompleteOnboarding(name)) {
        Ok(Outcome::OnboardingCompleted { user_name }) => user_name,
        Ok(_) => return onboarding_result(state, req),
        Err(e) => return domain_err(&req.id, &e),
    };

    let Some(conn) = state.db.as_ref() else {
        return err(&req.id, "no_workspace", "select a workspace first", None);
    };
    if let Err(e) = db::save_onboarding_complete(conn, &user_name) {
        // Memory must not claim a completion the store never recorded.
        state.dashboard.onboarding = prev_onboarding;
        state.dashboard.user_name = prev_name;
        warn!(error = %e, "failed to persist onboarding completion");
        return err(&req.id, "db_update_failed", e.to_string(), None);
    }
    info!(user_name = %user_name, "onboarding complete");
    onboarding_result(state, req)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "onboarding.get" => Some(onboarding_result(state, req)),
        "onboarding.setName" => Some(handle_set_name(state, req)),
        "onboarding.demoGrade" => Some(handle_demo_grade(state, req)),
        "onboarding.pickTheme" => Some(handle_pick_theme(state, req)),
        "onboarding.advance" => Some(apply(state, req, Action::AdvanceOnboarding)),
        "onboarding.complete" => Some(handle_complete(state, req)),
        _ => None,
    }
}
