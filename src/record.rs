//! Record values, materialized records, drafts, and sparse patches.

use std::{borrow::Cow, collections::BTreeMap};

use serde::{Deserialize, Serialize};

use crate::types::RecordId;

/// Reserved key carrying the record identifier in flat JSON form.
pub const ID_FIELD: &str = "id";
/// Reserved key carrying the soft-delete flag in flat JSON form.
pub const DISABLED_FIELD: &str = "isDisabled";

/// Named field values keyed by schema field name.
pub type FieldMap = BTreeMap<String, Value>;

/// A single cell value.
///
/// Dates travel as [`Value::Text`]; the schema's field type says how to read them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent or cleared value.
    #[default]
    Null,
    /// Boolean flag.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Free text or a date string.
    Text(String),
}

impl Value {
    /// True for `Null` and for text that is empty after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Bool(_) | Self::Number(_) => false,
        }
    }

    /// String form used for display and search matching.
    pub fn display(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed(""),
            Self::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Fully normalized record held by the grid.
///
/// Serializes as a flat object: `{"id": 1, "isDisabled": false, "name": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    id: RecordId,
    #[serde(default)]
    is_disabled: bool,
    #[serde(flatten)]
    fields: FieldMap,
}

impl Record {
    pub(crate) fn new(id: RecordId, is_disabled: bool, fields: FieldMap) -> Self {
        Self {
            id,
            is_disabled,
            fields,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Soft-delete flag.
    pub fn is_disabled(&self) -> bool {
        self.is_disabled
    }

    /// All non-reserved fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Value of one field, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub(crate) fn set_disabled(&mut self, is_disabled: bool) {
        self.is_disabled = is_disabled;
    }
}

/// Partial record supplied by the host; missing reserved fields are filled in on insert.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDraft {
    /// Requested id; assigned from the store counter when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Requested soft-delete flag; `false` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_disabled: Option<bool>,
    /// Field values.
    #[serde(flatten)]
    pub fields: FieldMap,
}

impl RecordDraft {
    /// Empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Requests a specific id.
    pub fn with_id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }

    /// Requests the soft-delete flag.
    pub fn disabled(mut self, is_disabled: bool) -> Self {
        self.is_disabled = Some(is_disabled);
        self
    }
}

/// Sparse field patch; every entry overwrites the record value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    /// Replacement values by field name.
    pub fields: FieldMap,
}

impl RecordPatch {
    /// Diff that turns `before` into `after`, including fields `after` dropped.
    pub fn between(before: &FieldMap, after: &FieldMap) -> Self {
        let mut fields = FieldMap::new();
        for (name, value) in after {
            if before.get(name).unwrap_or(&Value::Null) != value {
                fields.insert(name.clone(), value.clone());
            }
        }
        for (name, value) in before {
            if *value != Value::Null && !after.contains_key(name) {
                fields.insert(name.clone(), Value::Null);
            }
        }
        Self { fields }
    }

    /// Returns true when no fields are set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Captures an inverse patch for all fields present in `self`.
    pub fn capture_inverse_for(&self, rec: &Record) -> Self {
        let fields = self
            .fields
            .keys()
            .map(|name| (name.clone(), rec.get(name).cloned().unwrap_or_default()))
            .collect();
        Self { fields }
    }

    /// Applies this patch in place to `rec`. `Null` removes the field.
    pub fn apply_to(&self, rec: &mut Record) {
        for (name, value) in &self.fields {
            match value {
                Value::Null => {
                    rec.fields.remove(name);
                }
                v => {
                    rec.fields.insert(name.clone(), v.clone());
                }
            }
        }
    }
}
