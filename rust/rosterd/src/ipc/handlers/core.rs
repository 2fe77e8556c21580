use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::roster::Roster;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state
                .roster
                .as_ref()
                .map(|r| r.workspace().to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };

    // Release the previous workspace before opening the next one.
    state.roster = None;
    match Roster::open(&path) {
        Ok(roster) => {
            let count = roster.records().len();
            state.roster = Some(roster);
            ok(
                &req.id,
                json!({
                    "workspacePath": path.to_string_lossy(),
                    "studentCount": count
                }),
            )
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), "workspace open failed: {e:#}");
            err(&req.id, "db_open_failed", format!("{e:#}"), None)
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
