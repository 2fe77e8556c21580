use anyhow::Context;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

use crate::csv::{self, Decoded};
use crate::db;
use crate::error::{Result, RosterError};
use crate::filter;
use crate::model::{check_record, StudentRecord};
use crate::reconcile::{self, ImportSummary};
use crate::store::RecordStore;

pub const STORAGE_KEY: &str = "students_data";

/// Owns the record store for one workspace. Every mutation writes the whole
/// roster through to storage before the in-memory copy changes.
pub struct Roster {
    workspace: PathBuf,
    conn: Connection,
    store: RecordStore,
}

impl Roster {
    pub fn open(workspace: &Path) -> anyhow::Result<Self> {
        let conn = db::open_db(workspace)?;
        let store = match db::kv_get(&conn, STORAGE_KEY)? {
            Some(text) => RecordStore::from_json(&text)
                .with_context(|| format!("stored value under {STORAGE_KEY} is not a roster"))?,
            None => RecordStore::new(),
        };
        tracing::info!(
            workspace = %workspace.display(),
            students = store.len(),
            "roster loaded"
        );
        Ok(Self {
            workspace: workspace.to_path_buf(),
            conn,
            store,
        })
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn records(&self) -> &[StudentRecord] {
        self.store.records()
    }

    pub fn list(&self, query: &str) -> Vec<&StudentRecord> {
        filter::filter(self.store.records(), query)
    }

    pub fn get(&self, roll_number: i64) -> Result<&StudentRecord> {
        reconcile::find_record(&self.store, roll_number)
            .ok_or(RosterError::NotFound(roll_number))
    }

    pub fn add(&mut self, record: StudentRecord) -> Result<()> {
        let roll = record.roll_number;
        let mut next = self.store.clone();
        reconcile::add_record(&mut next, record)?;
        self.commit(next)?;
        tracing::info!(roll, "student added");
        Ok(())
    }

    pub fn delete(&mut self, roll_number: i64) -> Result<usize> {
        let mut next = self.store.clone();
        let removed = reconcile::delete_record(&mut next, roll_number);
        if removed > 0 {
            self.commit(next)?;
        }
        tracing::info!(roll = roll_number, removed, "student delete");
        Ok(removed)
    }

    pub fn import(&mut self, decoded: Decoded) -> Result<ImportSummary> {
        let mut next = self.store.clone();
        let summary = reconcile::import_records(&mut next, decoded.records);
        if summary.added > 0 {
            self.commit(next)?;
        }
        tracing::info!(
            added = summary.added,
            skipped = summary.skipped,
            rejected = decoded.rejected,
            "csv import"
        );
        Ok(summary)
    }

    pub fn export_csv(&self) -> Result<String> {
        if self.store.is_empty() {
            return Err(RosterError::NothingToExport);
        }
        Ok(csv::encode(self.store.records()))
    }

    /// The value persisted under `STORAGE_KEY`.
    pub fn snapshot_json(&self) -> Result<String> {
        Ok(self.store.to_json()?)
    }

    /// Replaces the whole roster with a previously saved value. Every row is
    /// checked before anything is written.
    pub fn restore(&mut self, next: RecordStore) -> Result<usize> {
        for record in next.records() {
            check_record(record)?;
        }
        let count = next.len();
        self.commit(next)?;
        tracing::info!(students = count, "roster restored");
        Ok(count)
    }

    fn commit(&mut self, next: RecordStore) -> Result<()> {
        db::kv_set(&self.conn, STORAGE_KEY, &next.to_json()?)?;
        self.store = next;
        Ok(())
    }
}
