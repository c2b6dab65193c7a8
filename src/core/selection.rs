use hashbrown::HashSet;

use crate::{
    record::Record,
    types::{MasterCheckState, RecordId},
};

/// Checked records, keyed by id so membership survives paging and filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<RecordId>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `id` is selected.
    pub fn contains(&self, id: RecordId) -> bool {
        self.ids.contains(&id)
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Flips membership; returns true if `id` is now selected.
    pub fn toggle(&mut self, id: RecordId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Returns true when `id` was selected.
    pub fn remove(&mut self, id: RecordId) -> bool {
        self.ids.remove(&id)
    }

    /// Returns true when anything was selected.
    pub fn clear(&mut self) -> bool {
        let changed = !self.ids.is_empty();
        self.ids.clear();
        changed
    }

    /// Returns whether any id was newly added.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = RecordId>) -> bool {
        ids.into_iter().fold(false, |changed, id| self.ids.insert(id) || changed)
    }

    /// Returns whether any id was removed.
    pub fn deselect_all(&mut self, ids: impl IntoIterator<Item = RecordId>) -> bool {
        ids.into_iter().fold(false, |changed, id| self.ids.remove(&id) || changed)
    }

    /// Header checkbox state for the ids on one page.
    pub fn master_state(&self, page_ids: &[RecordId]) -> MasterCheckState {
        let checked = page_ids.iter().filter(|id| self.ids.contains(*id)).count();
        match checked {
            0 => MasterCheckState::Unchecked,
            n if n == page_ids.len() => MasterCheckState::Checked,
            _ => MasterCheckState::Indeterminate,
        }
    }

    /// Selected ids in backing-array order.
    pub fn ordered(&self, records: &[Record]) -> Vec<RecordId> {
        records
            .iter()
            .map(Record::id)
            .filter(|id| self.ids.contains(id))
            .collect()
    }
}
