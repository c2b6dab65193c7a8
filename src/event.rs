//! Notifications queued by the controller for renderers and subscribers.

use crate::{
    record::RecordPatch,
    types::{DeleteKind, FilterMode, RecordId},
};

/// One observable state change.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// A record was appended.
    RecordAdded {
        /// New record id.
        id: RecordId,
    },
    /// An edit session was committed.
    RecordUpdated {
        /// Updated record id.
        id: RecordId,
        /// Forward patch.
        patch: RecordPatch,
        /// Inverse patch restoring the previous values.
        prev: RecordPatch,
    },
    /// A record was soft- or hard-deleted.
    RecordDeleted {
        /// Deleted record id.
        id: RecordId,
        /// Delete flavor.
        kind: DeleteKind,
    },
    /// A soft-deleted record was re-enabled.
    RecordRestored {
        /// Restored record id.
        id: RecordId,
    },
    /// The current page index changed.
    PageChanged {
        /// New 1-based page.
        page: usize,
    },
    /// The page size changed.
    PageSizeChanged {
        /// New rows per page.
        page_size: usize,
    },
    /// Selection membership changed.
    SelectionChanged {
        /// Selected ids in record order.
        ids: Vec<RecordId>,
    },
    /// The enabled/disabled view filter changed.
    FilterToggled {
        /// New filter.
        mode: FilterMode,
    },
    /// A search term was applied (empty when cleared).
    SearchApplied {
        /// Normalized term.
        term: String,
    },
    /// A record entered edit mode.
    EditStarted {
        /// Record under edit.
        id: RecordId,
    },
    /// An edit session ended without committing.
    EditCancelled {
        /// Record that was under edit.
        id: RecordId,
    },
}
