use crate::{record::Record, schema::Schema, types::FilterMode};

/// Enabled/disabled partition plus case-insensitive substring search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    mode: FilterMode,
    term: String,
    needle: String,
}

impl ViewFilter {
    /// Enabled rows, no search.
    pub fn new() -> Self {
        Self::default()
    }

    /// Active side of the partition.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Search term as applied (trimmed).
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Returns whether the mode changed.
    pub fn set_mode(&mut self, mode: FilterMode) -> bool {
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Trims and stores `term`; returns whether the effective term changed.
    pub fn set_term(&mut self, term: &str) -> bool {
        let term = term.trim();
        if term == self.term {
            return false;
        }
        self.term = term.to_string();
        self.needle = term.to_lowercase();
        true
    }

    /// True when `rec` is on the active side and matches the search.
    pub fn admits(&self, schema: &Schema, rec: &Record) -> bool {
        self.mode.admits(rec.is_disabled())
            && (self.needle.is_empty() || schema.matches_search(rec, &self.needle))
    }

    /// Records passing the filter, in backing-array order.
    pub fn apply<'a>(&self, schema: &Schema, records: &'a [Record]) -> Vec<&'a Record> {
        records.iter().filter(|r| self.admits(schema, r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::store::RecordStore, record::RecordDraft, schema::FieldSpec};

    fn fixture() -> (Schema, RecordStore) {
        let schema = Schema::new(vec![
            FieldSpec::text("name").searchable(),
            FieldSpec::text("notes"),
            FieldSpec::number("age").searchable(),
        ])
        .unwrap();
        let store = RecordStore::from_drafts(vec![
            RecordDraft::new().with("name", "Alice Smith").with("notes", "bob").with("age", 31),
            RecordDraft::new().with("name", "Bob Jones").with("age", 45),
            RecordDraft::new().with("name", "Carol").with("age", 31).disabled(true),
        ]);
        (schema, store)
    }

    fn ids(recs: Vec<&Record>) -> Vec<u64> {
        recs.into_iter().map(Record::id).collect()
    }

    #[test]
    fn mode_partitions_records() {
        let (schema, store) = fixture();
        let mut filter = ViewFilter::new();
        assert_eq!(ids(filter.apply(&schema, store.records())), vec![1, 2]);
        filter.set_mode(FilterMode::ShowDisabled);
        assert_eq!(ids(filter.apply(&schema, store.records())), vec![3]);
    }

    #[test]
    fn search_is_case_insensitive_and_limited_to_searchable_fields() {
        let (schema, store) = fixture();
        let mut filter = ViewFilter::new();
        assert!(filter.set_term("  BOB "));
        assert_eq!(filter.term(), "BOB");
        // "bob" in the non-searchable notes of record 1 must not match.
        assert_eq!(ids(filter.apply(&schema, store.records())), vec![2]);
        filter.set_term("31");
        assert_eq!(ids(filter.apply(&schema, store.records())), vec![1]);
        assert!(!filter.set_term("31 "));
    }
}
