//! The grid state machine: filter, search, paging, selection, and editing over
//! one record array.

use std::fmt;

use crate::{
    config::{ConfigError, GridConfig},
    core::{
        edit::EditSession,
        filter::ViewFilter,
        pagination::Pager,
        selection::Selection,
        store::{RecordStore, StoreSnapshot},
    },
    error::{GridError, GridResult},
    event::GridEvent,
    host::{GridHost, NoopHost},
    record::{FieldMap, Record, RecordDraft, RecordPatch, Value},
    schema::Schema,
    types::{DeleteKind, FilterMode, MasterCheckState, RecordId},
    view::{ColumnHeader, PageView, RowView},
};

/// Outcome of a bulk soft-delete or restore.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Ids whose flag flipped.
    pub changed: Vec<RecordId>,
    /// Ids already in the requested state.
    pub unchanged: Vec<RecordId>,
    /// Ids with no record.
    pub not_found: Vec<RecordId>,
}

/// Owns the records and view state of one grid.
///
/// Every operation runs to completion before the host hooks fire, so a hook
/// always observes the post-mutation state.
pub struct RecordGridController {
    schema: Schema,
    store: RecordStore,
    filter: ViewFilter,
    pager: Pager,
    selection: Selection,
    edit: Option<EditSession>,
    config: GridConfig,
    host: Box<dyn GridHost>,
    pending_events: Vec<GridEvent>,
}

impl fmt::Debug for RecordGridController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordGridController")
            .field("records", &self.store.len())
            .field("filter", &self.filter)
            .field("pager", &self.pager)
            .field("selected", &self.selection.len())
            .field("editing", &self.editing_id())
            .finish_non_exhaustive()
    }
}

impl RecordGridController {
    /// Grid over `records` with the default config and no host hooks.
    pub fn new(schema: Schema, records: impl IntoIterator<Item = RecordDraft>) -> Self {
        Self::from_store(schema, RecordStore::from_drafts(records))
    }

    /// Grid over an already normalized store.
    pub fn from_store(schema: Schema, store: RecordStore) -> Self {
        let config = GridConfig::default();
        Self {
            schema,
            store,
            filter: ViewFilter::new(),
            pager: Pager::new(config.page_size),
            selection: Selection::new(),
            edit: None,
            config,
            host: Box::new(NoopHost),
            pending_events: Vec::new(),
        }
    }

    /// Replaces the config and resets paging to its initial page size.
    pub fn with_config(mut self, config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.pager = Pager::new(config.page_size);
        self.config = config;
        Ok(self)
    }

    /// Installs the host hooks.
    pub fn with_host(mut self, host: impl GridHost + 'static) -> Self {
        self.host = Box::new(host);
        self
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Column schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Active configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// All records, in insertion order, regardless of filter.
    pub fn records(&self) -> &[Record] {
        self.store.records()
    }

    /// Record by id, regardless of filter.
    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.store.get(id)
    }

    /// Active side of the enabled/disabled partition.
    pub fn filter_mode(&self) -> FilterMode {
        self.filter.mode()
    }

    /// Trimmed search term; empty when no search is active.
    pub fn search_term(&self) -> &str {
        self.filter.term()
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.pager.page()
    }

    /// Rows per page.
    pub fn page_size(&self) -> usize {
        self.pager.page_size()
    }

    /// Page count for the visible rows; at least 1.
    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.visible_len())
    }

    /// Records passing the view filter and search, in insertion order.
    pub fn visible_records(&self) -> Vec<&Record> {
        self.filter.apply(&self.schema, self.store.records())
    }

    /// Number of rows passing the filter and search.
    pub fn visible_len(&self) -> usize {
        self.store
            .records()
            .iter()
            .filter(|r| self.filter.admits(&self.schema, r))
            .count()
    }

    /// The slice of [`Self::visible_records`] on the current page.
    pub fn page_records(&self) -> Vec<&Record> {
        let visible = self.visible_records();
        let range = self.pager.range(visible.len());
        visible[range].to_vec()
    }

    /// True unless on page 1.
    pub fn can_go_prev(&self) -> bool {
        self.pager.page() > 1
    }

    /// True unless on the last page.
    pub fn can_go_next(&self) -> bool {
        self.pager.page() < self.total_pages()
    }

    /// Id of the record in edit mode, if any.
    pub fn editing_id(&self) -> Option<RecordId> {
        self.edit.as_ref().map(EditSession::id)
    }

    /// Uncommitted values of the open edit session.
    pub fn edit_buffer(&self) -> Option<&FieldMap> {
        self.edit.as_ref().map(EditSession::buffer)
    }

    /// True when `id` is in the selection.
    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selection.contains(id)
    }

    /// Selected ids in insertion order, including ones filtered out of view.
    pub fn selected_ids(&self) -> Vec<RecordId> {
        self.selection.ordered(self.store.records())
    }

    /// Selected records in insertion order.
    pub fn selected_records(&self) -> Vec<&Record> {
        self.store
            .records()
            .iter()
            .filter(|r| self.selection.contains(r.id()))
            .collect()
    }

    /// Tri-state of the header checkbox for the current page.
    pub fn master_check_state(&self) -> MasterCheckState {
        self.selection.master_state(&self.page_ids())
    }

    /// Projection of the current page for a renderer.
    pub fn page_view(&self) -> PageView {
        let visible = self.visible_records();
        let total_rows = visible.len();
        let range = self.pager.range(total_rows);
        let (first_row, last_row) = if range.is_empty() {
            (0, 0)
        } else {
            (range.start + 1, range.end)
        };

        let columns: Vec<ColumnHeader> = self
            .schema
            .visible_fields()
            .map(|spec| ColumnHeader {
                name: spec.name.clone(),
                display_name: spec.display_name.clone(),
                field_type: spec.field_type,
                editor_kind: spec.editor_kind.clone(),
            })
            .collect();

        let rows = visible[range]
            .iter()
            .map(|rec| {
                let editing = self.editing_id() == Some(rec.id());
                let source = match &self.edit {
                    Some(session) if editing => session.buffer(),
                    _ => rec.fields(),
                };
                RowView {
                    id: rec.id(),
                    is_disabled: rec.is_disabled(),
                    selected: self.selection.contains(rec.id()),
                    editing,
                    cells: columns
                        .iter()
                        .map(|c| source.get(&c.name).cloned().unwrap_or_default())
                        .collect(),
                }
            })
            .collect::<Vec<_>>();

        let page_ids: Vec<RecordId> = rows.iter().map(|r| r.id).collect();
        let total_pages = self.pager.total_pages(total_rows);

        PageView {
            columns,
            master: self.selection.master_state(&page_ids),
            rows,
            page: self.pager.page(),
            total_pages,
            page_size: self.pager.page_size(),
            page_size_options: self.config.page_size_options.clone(),
            first_row,
            last_row,
            total_rows,
            filter_mode: self.filter.mode(),
            search_term: self.filter.term().to_string(),
            can_go_prev: self.pager.page() > 1,
            can_go_next: self.pager.page() < total_pages,
        }
    }

    /// Copy of the backing records for host-side persistence.
    pub fn export_snapshot(&self) -> StoreSnapshot {
        self.store.export_snapshot()
    }

    /// Hands the records back to the host.
    pub fn into_records(self) -> Vec<Record> {
        self.store.into_records()
    }

    /// Takes the events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ------------------------------------------------------------------
    // Filter and search
    // ------------------------------------------------------------------

    /// Switches the view filter and returns to page 1.
    pub fn set_filter_mode(&mut self, mode: FilterMode) -> bool {
        if !self.filter.set_mode(mode) {
            return false;
        }
        tracing::debug!(mode = ?mode, "filter toggled");
        self.emit(GridEvent::FilterToggled { mode });
        self.reset_page();
        true
    }

    /// Flips the view filter and returns the new mode.
    pub fn toggle_filter(&mut self) -> FilterMode {
        let mode = self.filter.mode().toggled();
        self.set_filter_mode(mode);
        mode
    }

    /// Applies a search term and returns to page 1.
    ///
    /// Leading and trailing whitespace is trimmed before matching, so `"Smith "`
    /// searches for `"Smith"`.
    pub fn set_search(&mut self, term: &str) -> bool {
        if !self.filter.set_term(term) {
            return false;
        }
        tracing::debug!(term = %self.filter.term(), "search applied");
        self.emit(GridEvent::SearchApplied {
            term: self.filter.term().to_string(),
        });
        self.reset_page();
        true
    }

    /// Drops the search term.
    pub fn clear_search(&mut self) -> bool {
        self.set_search("")
    }

    // ------------------------------------------------------------------
    // Paging
    // ------------------------------------------------------------------

    /// No-op for pages outside `1..=total_pages`.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let len = self.visible_len();
        if !self.pager.go_to(page, len) {
            return false;
        }
        self.emit(GridEvent::PageChanged { page });
        true
    }

    /// Advances one page. No-op on the last page.
    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.pager.page() + 1)
    }

    /// Steps back one page. No-op on page 1.
    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.pager.page().saturating_sub(1))
    }

    /// Jumps to page 1.
    pub fn first_page(&mut self) -> bool {
        self.go_to_page(1)
    }

    /// Jumps to the last page.
    pub fn last_page(&mut self) -> bool {
        self.go_to_page(self.total_pages())
    }

    /// Rejects zero, clamps to the configured maximum, and keeps the first row
    /// of the old page on screen.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let before = self.pager.page();
        let len = self.visible_len();
        if !self
            .pager
            .set_page_size(page_size, self.config.max_page_size, len)
        {
            return false;
        }
        tracing::debug!(page_size = self.pager.page_size(), "page size changed");
        self.emit(GridEvent::PageSizeChanged {
            page_size: self.pager.page_size(),
        });
        if self.pager.page() != before {
            self.emit(GridEvent::PageChanged {
                page: self.pager.page(),
            });
        }
        true
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Returns whether `id` is selected afterwards.
    pub fn toggle_select(&mut self, id: RecordId) -> GridResult<bool> {
        if !self.store.contains(id) {
            return Err(GridError::NotFound(id));
        }
        let selected = self.selection.toggle(id);
        self.notify_selection();
        Ok(selected)
    }

    /// Adds every row of the current page to the selection.
    pub fn select_all_on_page(&mut self) -> bool {
        let ids = self.page_ids();
        let changed = self.selection.select_all(ids);
        if changed {
            self.notify_selection();
        }
        changed
    }

    /// Removes every row of the current page from the selection.
    pub fn deselect_all_on_page(&mut self) -> bool {
        let ids = self.page_ids();
        let changed = self.selection.deselect_all(ids);
        if changed {
            self.notify_selection();
        }
        changed
    }

    /// Master checkbox click: select the page unless it is already fully selected.
    pub fn toggle_select_page(&mut self) -> bool {
        match self.master_check_state() {
            MasterCheckState::Checked => self.deselect_all_on_page(),
            MasterCheckState::Unchecked | MasterCheckState::Indeterminate => {
                self.select_all_on_page()
            }
        }
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) -> bool {
        let changed = self.selection.clear();
        if changed {
            self.notify_selection();
        }
        changed
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    /// Opens `id` for editing, discarding any other open session.
    pub fn start_edit(&mut self, id: RecordId) -> GridResult<()> {
        let rec = self.store.get(id).ok_or(GridError::NotFound(id))?;
        if self.editing_id() == Some(id) {
            return Ok(());
        }
        let session = EditSession::start(rec);
        self.cancel_edit();
        self.edit = Some(session);
        tracing::debug!(id, "edit started");
        self.emit(GridEvent::EditStarted { id });
        Ok(())
    }

    /// Writes into the edit buffer only.
    pub fn update_edit_field(&mut self, name: &str, value: impl Into<Value>) -> GridResult<()> {
        let session = self.edit.as_mut().ok_or(GridError::NotEditing)?;
        session.update(&self.schema, name, value.into())
    }

    /// Validates and merges the buffer, then calls `on_save`.
    ///
    /// On validation failure the session stays open and nothing changes.
    pub fn commit_edit(&mut self) -> GridResult<RecordPatch> {
        let session = self.edit.as_ref().ok_or(GridError::NotEditing)?;
        let id = session.id();

        let Some(rec) = self.store.get(id) else {
            self.edit = None;
            return Err(GridError::NotFound(id));
        };

        let errors = session.validate(&self.schema, rec);
        if !errors.is_empty() {
            tracing::debug!(id, errors = errors.len(), "commit rejected");
            return Err(GridError::Validation(errors));
        }

        let patch = session.patch_for(rec);
        self.edit = None;

        let prev = self.store.apply_patch(id, &patch)?;
        tracing::debug!(id, fields = patch.fields.len(), "edit committed");
        self.emit(GridEvent::RecordUpdated {
            id,
            patch: patch.clone(),
            prev,
        });
        self.clamp_page();
        self.host.on_save(id, &patch);
        Ok(patch)
    }

    /// Discards the buffer. Returns false when nothing was being edited.
    pub fn cancel_edit(&mut self) -> bool {
        let Some(session) = self.edit.take() else {
            return false;
        };
        tracing::debug!(id = session.id(), "edit cancelled");
        self.emit(GridEvent::EditCancelled { id: session.id() });
        true
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    /// Appends a record, brings it on screen, and opens it for editing.
    ///
    /// If the new record would be hidden, the filter is switched to its side and
    /// the search cleared before navigating to its page.
    pub fn add_record(&mut self, draft: RecordDraft) -> GridResult<RecordId> {
        let id = self.store.insert(draft)?;
        tracing::debug!(id, "record added");
        self.emit(GridEvent::RecordAdded { id });

        let is_disabled = self.store.get(id).is_some_and(Record::is_disabled);
        let mode = if is_disabled {
            FilterMode::ShowDisabled
        } else {
            FilterMode::ShowEnabled
        };
        self.set_filter_mode(mode);
        if self
            .store
            .get(id)
            .is_some_and(|rec| !self.filter.admits(&self.schema, rec))
        {
            self.clear_search();
        }

        let visible = self.visible_records();
        if let Some(idx) = visible.iter().position(|r| r.id() == id) {
            let page = self.pager.page_of(idx);
            let len = visible.len();
            if self.pager.go_to(page, len) {
                self.emit(GridEvent::PageChanged { page });
            }
        }

        if self.config.open_new_records_in_edit {
            self.start_edit(id)?;
        }
        if let Some(rec) = self.store.get(id) {
            self.host.on_new_record(rec);
        }
        Ok(id)
    }

    /// Marks a record disabled. Selection membership is kept.
    pub fn soft_delete(&mut self, id: RecordId) -> GridResult<bool> {
        if !self.store.set_disabled(id, true)? {
            return Ok(false);
        }
        self.drop_edit_of(id);
        tracing::debug!(id, "record soft-deleted");
        self.emit(GridEvent::RecordDeleted {
            id,
            kind: DeleteKind::Soft,
        });
        self.clamp_page();
        if let Some(rec) = self.store.get(id) {
            self.host.on_delete_record(id, rec, DeleteKind::Soft);
        }
        Ok(true)
    }

    /// Re-enables a record. Selection membership is kept.
    pub fn restore(&mut self, id: RecordId) -> GridResult<bool> {
        if !self.store.set_disabled(id, false)? {
            return Ok(false);
        }
        tracing::debug!(id, "record restored");
        self.emit(GridEvent::RecordRestored { id });
        self.clamp_page();
        if let Some(rec) = self.store.get(id) {
            self.host.on_restore_record(id, rec);
        }
        Ok(true)
    }

    /// Removes a record for good and drops it from the selection.
    pub fn hard_delete(&mut self, id: RecordId) -> GridResult<Record> {
        let rec = self.store.remove(id)?;
        self.drop_edit_of(id);
        if self.selection.remove(id) {
            self.notify_selection();
        }
        tracing::debug!(id, "record hard-deleted");
        self.emit(GridEvent::RecordDeleted {
            id,
            kind: DeleteKind::Hard,
        });
        self.clamp_page();
        self.host.on_delete_record(id, &rec, DeleteKind::Hard);
        Ok(rec)
    }

    /// Soft-deletes each id, then clears the selection.
    pub fn bulk_soft_delete(&mut self, ids: &[RecordId]) -> BulkReport {
        self.bulk(ids, Self::soft_delete)
    }

    /// Restores each id, then clears the selection.
    pub fn bulk_restore(&mut self, ids: &[RecordId]) -> BulkReport {
        self.bulk(ids, Self::restore)
    }

    /// Soft-deletes every selected record.
    pub fn bulk_soft_delete_selected(&mut self) -> BulkReport {
        let ids = self.selected_ids();
        self.bulk_soft_delete(&ids)
    }

    /// Restores every selected record.
    pub fn bulk_restore_selected(&mut self) -> BulkReport {
        let ids = self.selected_ids();
        self.bulk_restore(&ids)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn bulk(
        &mut self,
        ids: &[RecordId],
        op: fn(&mut Self, RecordId) -> GridResult<bool>,
    ) -> BulkReport {
        let mut report = BulkReport::default();
        for &id in ids {
            match op(self, id) {
                Ok(true) => report.changed.push(id),
                Ok(false) => report.unchanged.push(id),
                Err(_) => report.not_found.push(id),
            }
        }
        self.clear_selection();
        report
    }

    fn page_ids(&self) -> Vec<RecordId> {
        self.page_records().into_iter().map(Record::id).collect()
    }

    fn drop_edit_of(&mut self, id: RecordId) {
        if self.editing_id() == Some(id) {
            self.cancel_edit();
        }
    }

    fn reset_page(&mut self) {
        if self.pager.reset() {
            self.emit(GridEvent::PageChanged { page: 1 });
        }
    }

    fn clamp_page(&mut self) {
        let len = self.visible_len();
        if self.pager.clamp(len) {
            tracing::trace!(page = self.pager.page(), "page clamped");
            self.emit(GridEvent::PageChanged {
                page: self.pager.page(),
            });
        }
    }

    fn notify_selection(&mut self) {
        let ids = self.selected_ids();
        self.emit(GridEvent::SelectionChanged { ids: ids.clone() });
        self.host.on_selection_change(&ids);
    }

    fn emit(&mut self, event: GridEvent) {
        tracing::trace!(?event, "grid event");
        self.pending_events.push(event);
    }
}
