use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TypeError;

/// Untyped JSON object as held by a document store.
pub type Document = Map<String, Value>;

/// Reserved document key carrying the storage-assigned [`RecordId`](crate::RecordId).
pub const ID_FIELD: &str = "_id";

/// The Sablon entity.
///
/// Deserialization is strict: unknown keys are rejected, `age` must be a
/// JSON integer and `name`/`gender` must be JSON strings. Absent `age` and
/// `gender` become `None` and always serialize as `null`. The storage
/// identifier is never part of this type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SablonRecord {
    pub name: String,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
}

impl SablonRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age: None,
            gender: None,
        }
    }

    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    /// Check constraints the type system does not capture.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.name.is_empty() {
            return Err(TypeError::InvalidRecord("name must not be empty".into()));
        }
        Ok(())
    }

    /// Parse and validate an untyped payload.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        let record: Self =
            serde_json::from_value(value).map_err(|e| TypeError::InvalidRecord(e.to_string()))?;
        record.validate()?;
        Ok(record)
    }

    /// Parse a stored document. The caller must strip [`ID_FIELD`] first.
    pub fn from_document(document: Document) -> Result<Self, TypeError> {
        Self::from_value(Value::Object(document))
    }

    /// The storable form: all three keys present, options as `null`.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("name".into(), Value::String(self.name.clone()));
        doc.insert("age".into(), self.age.map_or(Value::Null, Value::from));
        doc.insert(
            "gender".into(),
            self.gender.clone().map_or(Value::Null, Value::String),
        );
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn full_record_parses() {
        let r = SablonRecord::from_value(json!({"name": "Ana", "age": 30, "gender": "F"})).unwrap();
        assert_eq!(r, SablonRecord::new("Ana").with_age(30).with_gender("F"));
    }

    #[test]
    fn missing_options_become_none() {
        let r = SablonRecord::from_value(json!({"name": "Ana"})).unwrap();
        assert_eq!(r.age, None);
        assert_eq!(r.gender, None);
    }

    #[test]
    fn explicit_nulls_are_accepted() {
        let r =
            SablonRecord::from_value(json!({"name": "Ana", "age": null, "gender": null})).unwrap();
        assert_eq!(r, SablonRecord::new("Ana"));
    }

    #[test]
    fn serializes_absent_options_as_null() {
        let v = serde_json::to_value(SablonRecord::new("Ana")).unwrap();
        assert_eq!(v, json!({"name": "Ana", "age": null, "gender": null}));
    }

    #[test]
    fn to_document_matches_serde_form() {
        let r = SablonRecord::new("Ion").with_age(41);
        assert_eq!(
            Value::Object(r.to_document()),
            serde_json::to_value(&r).unwrap()
        );
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = SablonRecord::from_value(json!({"age": 3})).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(SablonRecord::from_value(json!({"name": ""})).is_err());
    }

    #[test]
    fn string_age_is_rejected() {
        assert!(SablonRecord::from_value(json!({"name": "Ana", "age": "24"})).is_err());
    }

    #[test]
    fn float_age_is_rejected() {
        assert!(SablonRecord::from_value(json!({"name": "Ana", "age": 24.5})).is_err());
    }

    #[test]
    fn boolean_gender_is_rejected() {
        assert!(SablonRecord::from_value(json!({"name": "Ana", "gender": false})).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = SablonRecord::from_value(json!({"name": "Ana", "place_of_birth": "Slobozia"}))
            .unwrap_err();
        assert!(err.to_string().contains("place_of_birth"));
    }

    #[test]
    fn id_field_is_not_part_of_the_entity() {
        let mut doc = SablonRecord::new("Ana").to_document();
        doc.insert(ID_FIELD.into(), json!("65a1b2c3d4e5f60718293a4b"));
        assert!(SablonRecord::from_document(doc).is_err());
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(SablonRecord::from_value(json!(["Ana"])).is_err());
    }

    proptest! {
        #[test]
        fn valid_records_survive_documents(
            name in "[a-zA-Z]{1,16}",
            age in proptest::option::of(any::<i64>()),
            gender in proptest::option::of("[A-Z][a-z]{0,8}"),
        ) {
            let record = SablonRecord { name, age, gender };
            let back = SablonRecord::from_document(record.to_document()).unwrap();
            prop_assert_eq!(back, record);
        }
    }
}
