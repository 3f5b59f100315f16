mod calc;
mod catalog;
mod dashboard;
mod db;
mod error;
mod ipc;
mod onboarding;

use clap::Parser;
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Exam-marks dashboard sidecar: one JSON request per stdin line, one JSON
/// response per stdout line.
#[derive(Debug, Parser)]
#[command(name = "schoolfightd", version)]
struct Args {
    /// Workspace directory holding the preferences store; opened at startup.
    #[arg(long, env = "SCHOOLFIGHTD_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// tracing filter directive, e.g. "debug" or "schoolfightd=trace".
    #[arg(long, env = "SCHOOLFIGHTD_LOG", default_value = "info")]
    log_filter: String,
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries responses; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(&args.log_filter);

    let mut state = ipc::AppState::new();
    if let Some(path) = args.workspace.as_deref() {
        if let Err(e) = state.open_workspace(path) {
            tracing::error!(workspace = %path.display(), error = ?e, "failed to open workspace");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without id.
                warn!(error = %e, "dropping malformed request line");
                let resp = json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(stdout, "{}", resp);
        let _ = stdout.flush();
    }
}
