use serde_json::{json, Value};

use crate::error::RosterError;
use crate::filter::render_table;
use crate::ipc::error::respond;
use crate::ipc::helpers::{field_text, optional_str, roll_number, roster, roster_mut};
use crate::ipc::types::{AppState, Request};
use crate::model::{count_label, validate_fields};

fn handle_list(state: &AppState, req: &Request) -> Result<Value, RosterError> {
    let query = optional_str(&req.params, "query").unwrap_or("");
    let rows = roster(state)?.list(query);
    Ok(json!({
        "students": rows.iter().map(|r| r.to_row_json()).collect::<Vec<_>>(),
        "total": rows.len(),
        "label": count_label(rows.len()),
    }))
}

fn handle_get(state: &AppState, req: &Request) -> Result<Value, RosterError> {
    let roll = roll_number(&req.params)?;
    let student = roster(state)?.get(roll)?;
    Ok(json!({ "student": student.to_row_json() }))
}

fn handle_create(state: &mut AppState, req: &Request) -> Result<Value, RosterError> {
    let p = &req.params;
    let record = validate_fields(
        &field_text(p, "name")?,
        &field_text(p, "rollNumber")?,
        &field_text(p, "course")?,
        &field_text(p, "year")?,
        &field_text(p, "cgpa")?,
    )?;
    let row = record.to_row_json();
    roster_mut(state)?.add(record)?;
    Ok(json!({ "student": row }))
}

/// The UI asks the user first; anything but `confirmed: true` leaves the
/// roster untouched.
fn handle_delete(state: &mut AppState, req: &Request) -> Result<Value, RosterError> {
    let roll = roll_number(&req.params)?;
    let confirmed = req
        .params
        .get("confirmed")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let roster = roster_mut(state)?;
    let removed = if confirmed { roster.delete(roll)? } else { 0 };
    Ok(json!({
        "confirmed": confirmed,
        "removed": removed,
    }))
}

fn handle_report(state: &AppState, req: &Request) -> Result<Value, RosterError> {
    let query = optional_str(&req.params, "query").unwrap_or("");
    let rows = roster(state)?.list(query);
    Ok(json!({ "text": render_table(&rows) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<Value> {
    let result = match req.method.as_str() {
        "students.list" => handle_list(state, req),
        "students.get" => handle_get(state, req),
        "students.create" => handle_create(state, req),
        "students.delete" => handle_delete(state, req),
        "students.report" => handle_report(state, req),
        _ => return None,
    };
    Some(respond(&req.id, &req.method, result))
}
