use serde_json::{json, Value};
use std::path::Path;

use crate::csv::{self, Decoded, EXPORT_FILE_NAME, EXPORT_MIME_TYPE};
use crate::error::RosterError;
use crate::ipc::error::respond;
use crate::ipc::helpers::{optional_str, roster, roster_mut};
use crate::ipc::types::{AppState, Request};

/// Reads the CSV payload from `inPath` when given, otherwise from `text`.
/// A file that cannot be read counts as unparseable input.
fn decode_request(params: &Value) -> Result<Decoded, RosterError> {
    if let Some(in_path) = optional_str(params, "inPath") {
        let bytes = std::fs::read(in_path)
            .map_err(|e| RosterError::ParseFailure(format!("{}: {}", in_path, e)))?;
        return csv::decode_bytes(&bytes);
    }
    csv::decode_input(optional_str(params, "text"))
}

fn handle_decode(req: &Request) -> Result<Value, RosterError> {
    let decoded = decode_request(&req.params)?;
    Ok(json!({
        "students": decoded.records.iter().map(|r| r.to_row_json()).collect::<Vec<_>>(),
        "accepted": decoded.accepted,
        "rowsTotal": decoded.rows_total,
        "rejected": decoded.rejected,
    }))
}

fn handle_import(state: &mut AppState, req: &Request) -> Result<Value, RosterError> {
    let roster = roster_mut(state)?;
    let decoded = decode_request(&req.params)?;
    let accepted = decoded.accepted;
    let rejected = decoded.rejected;
    let summary = roster.import(decoded)?;
    Ok(json!({
        "added": summary.added,
        "skipped": summary.skipped,
        "accepted": accepted,
        "rejected": rejected,
        "message": summary.message(),
    }))
}

fn write_text_file(path: &Path, contents: &str) -> Result<(), RosterError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

fn handle_export(state: &AppState, req: &Request) -> Result<Value, RosterError> {
    let roster = roster(state)?;
    let text = roster.export_csv()?;
    let out_path = optional_str(&req.params, "outPath");
    if let Some(p) = out_path {
        write_text_file(Path::new(p), &text)?;
        tracing::info!(path = p, rows = roster.records().len(), "csv exported");
    }
    Ok(json!({
        "csv": text,
        "fileName": EXPORT_FILE_NAME,
        "mimeType": EXPORT_MIME_TYPE,
        "rowsExported": roster.records().len(),
        "path": out_path,
    }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "csv.decode" => handle_decode(req),
        "students.importCsv" => handle_import(state, req),
        "students.exportCsv" => handle_export(state, req),
        _ => return None,
    };
    Some(respond(&req.id, &req.method, result))
}
