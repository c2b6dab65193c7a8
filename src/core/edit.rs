use crate::{
    error::{FieldError, FieldErrorReason, GridError, GridResult},
    record::{DISABLED_FIELD, FieldMap, ID_FIELD, Record, RecordPatch, Value},
    schema::{EditorKind, Schema},
    types::RecordId,
};

/// Scratch copy of one record's fields.
///
/// The soft-delete flag is not part of the buffer, so a commit can never change it.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    id: RecordId,
    buffer: FieldMap,
}

impl EditSession {
    /// Opens a session with a copy of the record fields.
    pub fn start(rec: &Record) -> Self {
        Self {
            id: rec.id(),
            buffer: rec.fields().clone(),
        }
    }

    /// Id of the record being edited.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Current buffer contents.
    pub fn buffer(&self) -> &FieldMap {
        &self.buffer
    }

    /// Writes `value` into the buffer only.
    pub fn update(&mut self, schema: &Schema, name: &str, value: Value) -> GridResult<()> {
        if name == ID_FIELD || name == DISABLED_FIELD {
            return Err(GridError::ReservedField(name.to_string()));
        }
        let spec = schema
            .field(name)
            .ok_or_else(|| GridError::UnknownField(name.to_string()))?;
        if spec.editor_kind == EditorKind::ReadOnly {
            return Err(GridError::ReadOnlyField(name.to_string()));
        }
        self.buffer.insert(name.to_string(), value);
        Ok(())
    }

    /// Commit checks against the stored `rec`, in schema order.
    ///
    /// Required applies to every editable field. Type checks only cover fields
    /// the buffer changes, so a stored value of the wrong kind does not block
    /// edits elsewhere in the row.
    pub fn validate(&self, schema: &Schema, rec: &Record) -> Vec<FieldError> {
        let patch = self.patch_for(rec);
        let mut errors = Vec::new();
        for spec in schema.fields() {
            let value = self.buffer.get(&spec.name).unwrap_or(&Value::Null);
            let editable = spec.editor_kind != EditorKind::ReadOnly;
            if spec.required && editable && value.is_blank() {
                errors.push(FieldError::new(&spec.name, FieldErrorReason::Required));
            } else if patch.fields.contains_key(&spec.name) && !spec.field_type.accepts(value) {
                errors.push(FieldError::new(&spec.name, FieldErrorReason::TypeMismatch));
            }
        }
        errors
    }

    /// Changes the buffer would make to `rec`.
    pub fn patch_for(&self, rec: &Record) -> RecordPatch {
        RecordPatch::between(rec.fields(), &self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::store::RecordStore, record::RecordDraft, schema::FieldSpec};

    fn fixture() -> (Schema, RecordStore) {
        let schema = Schema::new(vec![
            FieldSpec::text("name").required(),
            FieldSpec::text("position").required(),
            FieldSpec::number("salary"),
            FieldSpec::text("code").editor(EditorKind::ReadOnly),
        ])
        .unwrap();
        let store = RecordStore::from_drafts(vec![
            RecordDraft::new()
                .with("name", "Ann")
                .with("position", "Dev")
                .with("salary", 100)
                .with("code", "A1"),
        ]);
        (schema, store)
    }

    #[test]
    fn update_never_touches_record() {
        let (schema, store) = fixture();
        let rec = store.get(1).unwrap();
        let mut session = EditSession::start(rec);
        session.update(&schema, "name", "Bob".into()).unwrap();
        assert_eq!(rec.get("name"), Some(&Value::from("Ann")));
        assert_eq!(session.buffer().get("name"), Some(&Value::from("Bob")));
        let patch = session.patch_for(rec);
        assert_eq!(patch.fields.len(), 1);
    }

    #[test]
    fn update_rejects_reserved_unknown_and_read_only() {
        let (schema, store) = fixture();
        let mut session = EditSession::start(store.get(1).unwrap());
        assert_eq!(
            session.update(&schema, "isDisabled", true.into()),
            Err(GridError::ReservedField("isDisabled".into()))
        );
        assert_eq!(
            session.update(&schema, "nope", 1.into()),
            Err(GridError::UnknownField("nope".into()))
        );
        assert_eq!(
            session.update(&schema, "code", "B2".into()),
            Err(GridError::ReadOnlyField("code".into()))
        );
    }

    #[test]
    fn validation_reports_blank_required_and_type_mismatch() {
        let (schema, store) = fixture();
        let rec = store.get(1).unwrap();
        let mut session = EditSession::start(rec);
        session.update(&schema, "position", "   ".into()).unwrap();
        session.update(&schema, "salary", "lots".into()).unwrap();
        assert_eq!(
            session.validate(&schema, rec),
            vec![
                FieldError::new("position", FieldErrorReason::Required),
                FieldError::new("salary", FieldErrorReason::TypeMismatch),
            ]
        );
    }

    #[test]
    fn untouched_and_read_only_fields_do_not_block_commit() {
        let schema = Schema::new(vec![
            FieldSpec::text("name").required(),
            FieldSpec::number("salary"),
            FieldSpec::text("code").required().editor(EditorKind::ReadOnly),
        ])
        .unwrap();
        let store = RecordStore::from_drafts(vec![RecordDraft::new().with("name", "Ann").with("salary", "1000")]);
        let rec = store.get(1).unwrap();
        let mut session = EditSession::start(rec);
        session.update(&schema, "name", "Bea".into()).unwrap();
        assert!(session.validate(&schema, rec).is_empty());

        session.update(&schema, "salary", "2000".into()).unwrap();
        assert_eq!(
            session.validate(&schema, rec),
            vec![FieldError::new("salary", FieldErrorReason::TypeMismatch)]
        );
    }
}
