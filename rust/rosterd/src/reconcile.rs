use crate::error::RosterError;
use crate::model::StudentRecord;
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        if self.added > 0 {
            format!("Successfully imported {} student(s).", self.added)
        } else {
            "No new unique students imported.".to_string()
        }
    }
}

pub fn add_record(store: &mut RecordStore, record: StudentRecord) -> Result<(), RosterError> {
    if store.contains_roll(record.roll_number) {
        return Err(RosterError::DuplicateRollNumber(record.roll_number));
    }
    store.push(record);
    Ok(())
}

/// Appends candidates in order; a roll number already in the store, or seen
/// earlier in the same batch, is skipped without error.
pub fn import_records(
    store: &mut RecordStore,
    candidates: impl IntoIterator<Item = StudentRecord>,
) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for candidate in candidates {
        if store.contains_roll(candidate.roll_number) {
            summary.skipped += 1;
            continue;
        }
        store.push(candidate);
        summary.added += 1;
    }
    summary
}

pub fn delete_record(store: &mut RecordStore, roll_number: i64) -> usize {
    let before = store.len();
    store.retain(|r| r.roll_number != roll_number);
    before - store.len()
}

pub fn find_record(store: &RecordStore, roll_number: i64) -> Option<&StudentRecord> {
    store.records().iter().find(|r| r.roll_number == roll_number)
}
