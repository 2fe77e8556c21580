use serde_json::Value;

use crate::error::RosterError;
use crate::ipc::types::AppState;
use crate::roster::Roster;

pub fn roster(state: &AppState) -> Result<&Roster, RosterError> {
    state.roster.as_ref().ok_or(RosterError::NoWorkspace)
}

pub fn roster_mut(state: &mut AppState) -> Result<&mut Roster, RosterError> {
    state.roster.as_mut().ok_or(RosterError::NoWorkspace)
}

pub fn optional_str<'a>(params: &'a Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

/// Form inputs arrive as text or as JSON numbers; both are handed to field
/// validation as text.
pub fn field_text(params: &Value, key: &'static str) -> Result<String, RosterError> {
    match params.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(RosterError::InvalidField {
            field: key,
            reason: format!("missing {}", key),
        }),
    }
}

pub fn roll_number(params: &Value) -> Result<i64, RosterError> {
    let raw = field_text(params, "rollNumber")?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| RosterError::InvalidField {
            field: "rollNumber",
            reason: format!("{:?} is not an integer", raw.trim()),
        })
}
