use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::{
    error::{GridError, GridResult},
    record::{DISABLED_FIELD, FieldMap, ID_FIELD, Record, RecordDraft, RecordPatch},
    types::RecordId,
};

/// Serializable copy of the backing records and the id counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Next id handed out to a draft without one.
    pub next_id: RecordId,
    /// Records in insertion order.
    pub records: Vec<Record>,
}

/// Insertion-ordered backing array with an id index.
#[derive(Debug, Default, Clone)]
pub struct RecordStore {
    records: Vec<Record>,
    pos: HashMap<RecordId, usize>,
    next_id: RecordId,
}

impl RecordStore {
    /// Empty store; ids start at 1.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Normalizes host-supplied drafts.
    ///
    /// Missing ids are assigned after every explicit id has been reserved, and a
    /// repeated id is replaced by a fresh one. Once the counter runs past
    /// `RecordId::MAX`, the lowest free id is used instead.
    pub fn from_drafts(drafts: impl IntoIterator<Item = RecordDraft>) -> Self {
        let drafts: Vec<RecordDraft> = drafts.into_iter().collect();
        let mut store = Self::new();
        let highest = drafts.iter().filter_map(|d| d.id).max().unwrap_or(0);
        store.next_id = store.next_id.max(highest.saturating_add(1));

        for draft in drafts {
            let id = match draft.id {
                Some(id) if !store.pos.contains_key(&id) => Some(id),
                Some(dup) => {
                    let fresh = store.take_next_id().or_else(|| store.lowest_free_id());
                    tracing::warn!(duplicate = dup, reassigned = ?fresh, "duplicate record id in host data");
                    fresh
                }
                None => store.take_next_id().or_else(|| store.lowest_free_id()),
            };
            let Some(id) = id else {
                tracing::warn!("record dropped: no free id");
                continue;
            };
            let rec = Record::new(id, draft.is_disabled.unwrap_or(false), strip_reserved(draft.fields));
            store.push(rec);
        }

        store
    }

    /// Rebuilds a store from an exported snapshot. Rejects repeated ids.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> GridResult<Self> {
        let mut store = Self::new();
        for rec in snapshot.records {
            if store.pos.contains_key(&rec.id()) {
                return Err(GridError::DuplicateId(rec.id()));
            }
            store.bump_next_id_from(rec.id());
            store.push(rec);
        }
        store.next_id = store.next_id.max(snapshot.next_id);
        Ok(store)
    }

    /// Owned copy of the records and id counter.
    pub fn export_snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            next_id: self.next_id,
            records: self.records.clone(),
        }
    }

    /// Appends a draft, filling in `id` and `isDisabled` when absent.
    pub fn insert(&mut self, draft: RecordDraft) -> GridResult<RecordId> {
        let id = match draft.id {
            Some(id) if self.pos.contains_key(&id) => return Err(GridError::DuplicateId(id)),
            Some(id) => {
                self.bump_next_id_from(id);
                id
            }
            None => self.take_next_id().ok_or(GridError::IdSpaceExhausted)?,
        };
        let rec = Record::new(id, draft.is_disabled.unwrap_or(false), strip_reserved(draft.fields));
        self.push(rec);
        Ok(id)
    }

    /// Applies `patch` and returns the inverse.
    pub fn apply_patch(&mut self, id: RecordId, patch: &RecordPatch) -> GridResult<RecordPatch> {
        let rec = self.get_mut(id).ok_or(GridError::NotFound(id))?;
        let prev = patch.capture_inverse_for(rec);
        patch.apply_to(rec);
        Ok(prev)
    }

    /// Sets the soft-delete flag; returns whether it changed.
    pub fn set_disabled(&mut self, id: RecordId, is_disabled: bool) -> GridResult<bool> {
        let rec = self.get_mut(id).ok_or(GridError::NotFound(id))?;
        let changed = rec.is_disabled() != is_disabled;
        rec.set_disabled(is_disabled);
        Ok(changed)
    }

    /// Physically removes a record.
    pub fn remove(&mut self, id: RecordId) -> GridResult<Record> {
        let idx = self.pos.remove(&id).ok_or(GridError::NotFound(id))?;
        let rec = self.records.remove(idx);
        for (i, r) in self.records.iter().enumerate().skip(idx) {
            self.pos.insert(r.id(), i);
        }
        Ok(rec)
    }

    /// Record by id.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.pos.get(&id).map(|idx| &self.records[*idx])
    }

    /// True when a record with `id` exists.
    pub fn contains(&self, id: RecordId) -> bool {
        self.pos.contains_key(&id)
    }

    /// Index of `id` in insertion order.
    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.pos.get(&id).copied()
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the store, yielding records in insertion order.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        let idx = *self.pos.get(&id)?;
        self.records.get_mut(idx)
    }

    fn push(&mut self, rec: Record) {
        self.pos.insert(rec.id(), self.records.len());
        self.records.push(rec);
    }

    /// Hands out the counter value. The counter sticks at `RecordId::MAX`, so
    /// that id is given out at most once.
    fn take_next_id(&mut self) -> Option<RecordId> {
        let id = self.next_id;
        if self.pos.contains_key(&id) {
            return None;
        }
        self.next_id = id.checked_add(1).unwrap_or(id);
        Some(id)
    }

    fn lowest_free_id(&self) -> Option<RecordId> {
        (1..=RecordId::MAX).find(|id| !self.pos.contains_key(id))
    }

    fn bump_next_id_from(&mut self, id: RecordId) {
        self.next_id = self.next_id.max(id.saturating_add(1));
    }
}

fn strip_reserved(mut fields: FieldMap) -> FieldMap {
    for key in [ID_FIELD, DISABLED_FIELD] {
        if fields.remove(key).is_some() {
            tracing::warn!(field = key, "reserved key dropped from record fields");
        }
    }
    fields
}
