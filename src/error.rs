//! Error values returned by grid, schema, and configuration APIs.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RecordId;

/// Why a single field failed commit validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorReason {
    /// Required field is blank after trimming.
    Required,
    /// Value kind does not match the field type.
    TypeMismatch,
}

impl fmt::Display for FieldErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::TypeMismatch => f.write_str("type-mismatch"),
        }
    }
}

/// One inline validation message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field name.
    pub field: String,
    /// Failure reason.
    pub reason: FieldErrorReason,
}

impl FieldError {
    /// Builds an error for `field`.
    pub fn new(field: impl Into<String>, reason: FieldErrorReason) -> Self {
        Self {
            field: field.into(),
            reason,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Recoverable failures of controller operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// The id does not (or no longer) refer to a record.
    #[error("record {0} not found")]
    NotFound(RecordId),

    /// Commit rejected; the edit session stays open.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// An edit operation was called with no active edit session.
    #[error("no record is being edited")]
    NotEditing,

    /// The field is not part of the schema.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// `id` and `isDisabled` cannot be edited through an edit session.
    #[error("reserved field cannot be edited: {0}")]
    ReservedField(String),

    /// The field's editor is read-only.
    #[error("field is read-only: {0}")]
    ReadOnlyField(String),

    /// Every id past the highest one in use is taken.
    #[error("no record ids left to assign")]
    IdSpaceExhausted,

    /// An explicit id collided with an existing record.
    #[error("record {0} already exists")]
    DuplicateId(RecordId),
}

impl GridError {
    /// Field errors carried by a validation failure, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

/// Result alias for controller operations.
pub type GridResult<T> = Result<T, GridError>;

/// Invalid schema definitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Field at this position has a blank name.
    #[error("field #{0} has an empty name")]
    EmptyName(usize),

    /// Two fields share a name.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// Field uses `id` or `isDisabled`.
    #[error("reserved field name: {0}")]
    ReservedName(String),
}
