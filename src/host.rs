//! Capability interface the host page injects into a grid.

use crate::{
    record::{Record, RecordPatch},
    types::{DeleteKind, RecordId},
};

/// Persistence and notification hooks supplied by the host.
///
/// Every hook runs after the controller has already updated its own state and
/// its return is not awaited. Failed persistence is the host's to roll back.
pub trait GridHost: Send {
    /// A committed edit changed `patch` on record `id`.
    fn on_save(&mut self, _id: RecordId, _patch: &RecordPatch) {}

    /// A record was deleted; for [`DeleteKind::Hard`] `record` is the removed value.
    fn on_delete_record(&mut self, _id: RecordId, _record: &Record, _kind: DeleteKind) {}

    /// A soft-deleted record was re-enabled.
    fn on_restore_record(&mut self, _id: RecordId, _record: &Record) {}

    /// Selection membership changed; `ids` are in record order.
    fn on_selection_change(&mut self, _ids: &[RecordId]) {}

    /// A new record was appended and is ready to be filled in.
    fn on_new_record(&mut self, _record: &Record) {}
}

/// Host that ignores every hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl GridHost for NoopHost {}
