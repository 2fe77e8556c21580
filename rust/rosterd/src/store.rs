use crate::model::StudentRecord;

/// Ordered, in-memory roster. Mutation goes through `reconcile`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordStore {
    records: Vec<StudentRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains_roll(&self, roll_number: i64) -> bool {
        self.records.iter().any(|r| r.roll_number == roll_number)
    }

    pub(crate) fn push(&mut self, record: StudentRecord) {
        self.records.push(record);
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&StudentRecord) -> bool) {
        self.records.retain(keep);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records)
    }

    /// Rebuilds a store from the persisted value. Later rows that repeat a
    /// roll number are dropped so a hand-edited value cannot break uniqueness.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let rows: Vec<StudentRecord> = serde_json::from_str(text)?;
        let mut store = Self::new();
        for row in rows {
            if !store.contains_roll(row.roll_number) {
                store.push(row);
            }
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_value_roundtrips_and_dedupes() {
        let text = r#"[
            {"name":"Ana","roll":1,"course":"CS","year":2,"cgpa":3.5},
            {"name":"Ana again","roll":1,"course":"CS","year":2,"cgpa":3.1},
            {"name":"Bob","roll":2,"course":"Math","year":3,"cgpa":3.8}
        ]"#;
        let store = RecordStore::from_json(text).expect("parse");
        assert_eq!(store.len(), 2);
        assert_eq!(store.records()[0].name, "Ana");

        let again = RecordStore::from_json(&store.to_json().expect("json")).expect("reparse");
        assert_eq!(again, store);
    }

    #[test]
    fn malformed_value_is_an_error() {
        assert!(RecordStore::from_json("{not json").is_err());
    }
}
