mod backup;
mod config;
mod csv;
mod db;
mod error;
mod filter;
mod ipc;
mod model;
mod reconcile;
mod roster;
mod store;

use std::io::{self, BufRead, Write};

fn main() {
    let config = config::Config::from_env();
    config::init_tracing(&config);
    tracing::info!("rosterd starting v{}", env!("CARGO_PKG_VERSION"));

    let mut state = ipc::AppState::default();
    if let Some(path) = config.workspace.as_ref() {
        match roster::Roster::open(path) {
            Ok(r) => state.roster = Some(r),
            Err(e) => tracing::warn!(path = %path.display(), "startup workspace not opened: {e:#}"),
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
                tracing::warn!("bad request line: {e}");
                let resp = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{}", resp);
                let _ = stdout.flush();
                continue;
            }
        };

        tracing::debug!(id = %req.id, method = %req.method, "request");
        let resp = ipc::handle_request(&mut state, req);
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }
    tracing::info!("stdin closed, exiting");
}
