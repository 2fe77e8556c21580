use anyhow::anyhow;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::backup;
use crate::csv;
use crate::error::RosterError;
use crate::ipc::error::respond;
use crate::ipc::helpers::{roster, roster_mut};
use crate::ipc::types::{AppState, Request};
use crate::store::RecordStore;

fn required_path(params: &Value, key: &'static str) -> Result<PathBuf, RosterError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| RosterError::InvalidField {
            field: key,
            reason: format!("missing {}", key),
        })
}

fn handle_export_bundle(state: &AppState, req: &Request) -> Result<Value, RosterError> {
    let out_path = required_path(&req.params, "outPath")?;
    let roster = roster(state)?;
    let records = roster.records();
    let summary = backup::export_roster_bundle(
        &roster.snapshot_json()?,
        &csv::encode(records),
        records.len(),
        &out_path,
    )
    .map_err(RosterError::Bundle)?;
    tracing::info!(path = %out_path.display(), students = records.len(), "roster bundle exported");
    Ok(json!({
        "ok": true,
        "path": out_path.to_string_lossy(),
        "bundleFormat": summary.bundle_format,
        "entryCount": summary.entry_count,
        "studentCount": records.len(),
        "sha256": summary.sha256,
    }))
}

/// The bundled roster is parsed and every row checked before the single
/// write that replaces the stored value.
fn handle_import_bundle(state: &mut AppState, req: &Request) -> Result<Value, RosterError> {
    let in_path = required_path(&req.params, "inPath")?;
    let roster = roster_mut(state)?;

    let bundle = backup::read_roster_bundle(&in_path).map_err(RosterError::Bundle)?;
    let next = RecordStore::from_json(&bundle.roster_json)
        .map_err(|e| RosterError::Bundle(anyhow!("bundled roster is not valid: {e}")))?;
    let count = roster.restore(next)?;

    tracing::info!(
        path = %in_path.display(),
        format = %bundle.format_detected,
        students = count,
        "roster bundle imported"
    );
    Ok(json!({
        "ok": true,
        "bundleFormatDetected": bundle.format_detected,
        "studentCount": count,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "backup.exportWorkspaceBundle" => handle_export_bundle(state, req),
        "backup.importWorkspaceBundle" => handle_import_bundle(state, req),
        _ => return None,
    };
    Some(respond(&req.id, &req.method, result))
}
