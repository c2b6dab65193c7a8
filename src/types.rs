//! Shared primitive IDs and view-state enums.

use serde::{Deserialize, Serialize};

/// Monotonic record identifier.
pub type RecordId = u64;

/// Which side of the soft-delete partition is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Records with `isDisabled == false`.
    #[default]
    ShowEnabled,
    /// Records with `isDisabled == true`.
    ShowDisabled,
}

impl FilterMode {
    /// Returns true when a record with the given disabled flag belongs to this view.
    pub fn admits(self, is_disabled: bool) -> bool {
        is_disabled == (self == Self::ShowDisabled)
    }

    /// The opposite filter.
    pub fn toggled(self) -> Self {
        match self {
            Self::ShowEnabled => Self::ShowDisabled,
            Self::ShowDisabled => Self::ShowEnabled,
        }
    }
}

/// How a record left the enabled view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteKind {
    /// `isDisabled` was set; the record can be restored.
    Soft,
    /// The record was removed from the backing array.
    Hard,
}

/// Derived state of the header checkbox for the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasterCheckState {
    /// No record on the page is selected, or the page is empty.
    Unchecked,
    /// Some but not all records on the page are selected.
    Indeterminate,
    /// Every record on a non-empty page is selected.
    Checked,
}
