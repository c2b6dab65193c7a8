//! Render-ready projection of the current page.

use serde::Serialize;

use crate::{
    record::Value,
    schema::{EditorKind, FieldType},
    types::{FilterMode, MasterCheckState, RecordId},
};

/// One visible column, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnHeader {
    /// Field name.
    pub name: String,
    /// Header label.
    pub display_name: String,
    /// Value kind.
    pub field_type: FieldType,
    /// Edit-mode widget.
    pub editor_kind: EditorKind,
}

/// One row on the current page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    /// Record id.
    pub id: RecordId,
    /// Soft-delete flag.
    pub is_disabled: bool,
    /// Row checkbox.
    pub selected: bool,
    /// Row is in edit mode; `cells` then hold the edit buffer.
    pub editing: bool,
    /// Values aligned with [`PageView::columns`]; missing fields are `Null`.
    pub cells: Vec<Value>,
}

/// Everything a renderer needs for one frame of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    /// Visible columns.
    pub columns: Vec<ColumnHeader>,
    /// Rows of the current page.
    pub rows: Vec<RowView>,
    /// Header checkbox state.
    pub master: MasterCheckState,
    /// Current 1-based page.
    pub page: usize,
    /// Page count, at least 1.
    pub total_pages: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Choices for the page-size picker.
    pub page_size_options: Vec<usize>,
    /// 1-based index of the first row shown, 0 when empty.
    pub first_row: usize,
    /// 1-based index of the last row shown, 0 when empty.
    pub last_row: usize,
    /// Rows passing filter and search.
    pub total_rows: usize,
    /// Active view filter.
    pub filter_mode: FilterMode,
    /// Active search term.
    pub search_term: String,
    /// A previous page exists.
    pub can_go_prev: bool,
    /// A next page exists.
    pub can_go_next: bool,
}

impl PageView {
    /// "Showing 6 to 10 of 23 entries" style summary.
    pub fn summary(&self) -> String {
        format!(
            "Showing {} to {} of {} entries",
            self.first_row, self.last_row, self.total_rows
        )
    }
}
