use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("A student with roll number {0} already exists")]
    DuplicateRollNumber(i64),

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Error parsing CSV file: {0}")]
    ParseFailure(String),

    #[error("No data to export!")]
    NothingToExport,

    #[error("no student found with roll number {0}")]
    NotFound(i64),

    #[error("select a workspace first")]
    NoWorkspace,

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("failed to encode roster: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0:#}")]
    Bundle(anyhow::Error),
}

impl RosterError {
    /// Stable wire code reported in IPC error responses.
    pub fn code(&self) -> &'static str {
        match self {
            RosterError::DuplicateRollNumber(_) => "duplicate_roll_number",
            RosterError::InvalidField { .. } => "invalid_field",
            RosterError::ParseFailure(_) => "parse_failed",
            RosterError::NothingToExport => "no_data",
            RosterError::NotFound(_) => "not_found",
            RosterError::NoWorkspace => "no_workspace",
            RosterError::Storage(_) | RosterError::Encode(_) => "db_failed",
            RosterError::Io(_) => "io_failed",
            RosterError::Bundle(_) => "bundle_failed",
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            RosterError::DuplicateRollNumber(roll) | RosterError::NotFound(roll) => {
                Some(json!({ "rollNumber": roll }))
            }
            RosterError::InvalidField { field, .. } => Some(json!({ "field": field })),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RosterError>;
