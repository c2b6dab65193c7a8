//! Column schema: field types, editor hints, and the immutable [`Schema`].

use serde::{Deserialize, Serialize};

use crate::{
    error::SchemaError,
    record::{DISABLED_FIELD, ID_FIELD, Record, Value},
};

/// Value kind stored in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text.
    #[default]
    Text,
    /// Numeric value.
    Number,
    /// Boolean flag.
    Boolean,
    /// Date string, e.g. `2024-03-01`.
    Date,
}

impl FieldType {
    /// True when `value` is storable in a field of this type. `Null` always is.
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (Self::Text | Self::Date, Value::Text(_)) => true,
            (Self::Number, Value::Number(n)) => n.is_finite(),
            (Self::Boolean, Value::Bool(_)) => true,
            _ => false,
        }
    }

    fn default_editor(self) -> EditorKind {
        match self {
            Self::Text => EditorKind::TextInput,
            Self::Number => EditorKind::NumberInput,
            Self::Boolean => EditorKind::Toggle,
            Self::Date => EditorKind::DatePicker,
        }
    }
}

/// Input widget a renderer should use while the row is in edit mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorKind {
    /// Single-line text input.
    TextInput,
    /// Multi-line text input.
    TextArea,
    /// Numeric input.
    NumberInput,
    /// Toggle switch.
    Toggle,
    /// Date picker.
    DatePicker,
    /// Drop-down over fixed options.
    Select(Vec<String>),
    /// Shown but never editable.
    ReadOnly,
}

/// Definition of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Field name as stored in records.
    pub name: String,
    /// Value kind.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Header label.
    pub display_name: String,
    /// Must be non-blank on commit.
    pub required: bool,
    /// Included in full-text search.
    pub searchable: bool,
    /// Rendered as a column.
    pub visible: bool,
    /// Edit-mode widget.
    pub editor_kind: EditorKind,
}

impl FieldSpec {
    /// Visible, optional, non-searchable field of the given type.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            field_type,
            required: false,
            searchable: false,
            visible: true,
            editor_kind: field_type.default_editor(),
        }
    }

    /// Text field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    /// Number field.
    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Number)
    }

    /// Boolean field.
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    /// Date field.
    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Date)
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Includes the field in search.
    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    /// Hides the column.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Overrides the header label.
    pub fn display_name(mut self, label: impl Into<String>) -> Self {
        self.display_name = label.into();
        self
    }

    /// Overrides the editor widget.
    pub fn editor(mut self, kind: EditorKind) -> Self {
        self.editor_kind = kind;
        self
    }
}

/// Ordered, immutable set of field definitions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Validates names and builds the schema.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        for (idx, spec) in fields.iter().enumerate() {
            if spec.name.trim().is_empty() {
                return Err(SchemaError::EmptyName(idx));
            }
            if spec.name == ID_FIELD || spec.name == DISABLED_FIELD {
                return Err(SchemaError::ReservedName(spec.name.clone()));
            }
            if fields[..idx].iter().any(|f| f.name == spec.name) {
                return Err(SchemaError::DuplicateField(spec.name.clone()));
            }
        }
        Ok(Self { fields })
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields rendered as columns.
    pub fn visible_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.visible)
    }

    /// Fields consulted by search.
    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.searchable)
    }

    /// True when any searchable field of `rec` contains `needle_lower`.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches_search(&self, rec: &Record, needle_lower: &str) -> bool {
        self.searchable_fields().any(|spec| {
            rec.get(&spec.name)
                .is_some_and(|v| v.display().to_lowercase().contains(needle_lower))
        })
    }
}

impl TryFrom<Vec<FieldSpec>> for Schema {
    type Error = SchemaError;

    fn try_from(value: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Schema> for Vec<FieldSpec> {
    fn from(value: Schema) -> Self {
        value.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_and_duplicate_names_are_rejected() {
        assert_eq!(
            Schema::new(vec![FieldSpec::text("id")]),
            Err(SchemaError::ReservedName("id".to_string()))
        );
        assert_eq!(
            Schema::new(vec![FieldSpec::text("name"), FieldSpec::number("name")]),
            Err(SchemaError::DuplicateField("name".to_string()))
        );
        assert_eq!(
            Schema::new(vec![FieldSpec::text(" ")]),
            Err(SchemaError::EmptyName(0))
        );
    }

    #[test]
    fn type_acceptance() {
        assert!(FieldType::Number.accepts(&Value::Number(3.0)));
        assert!(!FieldType::Number.accepts(&Value::Text("3".into())));
        assert!(FieldType::Date.accepts(&Value::Text("2024-01-01".into())));
        assert!(FieldType::Boolean.accepts(&Value::Null));
        assert!(!FieldType::Boolean.accepts(&Value::Number(1.0)));
    }

    #[test]
    fn schema_deserializes_from_json_list() {
        let schema: Schema = serde_json::from_str(
            r#"[{"name":"name","type":"text","displayName":"Name","required":true,
                 "searchable":true,"visible":true,"editorKind":"text_input"}]"#,
        )
        .unwrap();
        assert_eq!(schema.fields().len(), 1);
        assert!(schema.field("name").unwrap().required);
    }
}
