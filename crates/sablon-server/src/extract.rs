//! Request-shape parsing shared by the handlers.
//!
//! Identifier-or-query endpoints take the identifier from the last path
//! segment. Because a path segment cannot be left out, the literal `None`
//! stands for "no identifier"; callers then supply a JSON body as the query.

use axum::body::Bytes;
use serde_json::Value;

use sablon_types::Document;

use crate::error::ApiError;

/// Path segment meaning "no identifier".
pub const ABSENT_ID_SEGMENT: &str = "None";

/// Identifier taken from a path segment, absent when the segment is `None`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathId(Option<String>);

impl PathId {
    pub fn from_segment(segment: &str) -> Self {
        if segment == ABSENT_ID_SEGMENT {
            Self(None)
        } else {
            Self(Some(segment.to_string()))
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn into_inner(self) -> Option<String> {
        self.0
    }
}

/// What drives a get or delete.
#[derive(Clone, Debug, PartialEq)]
pub enum Lookup {
    Id(String),
    Query(Document),
}

impl Lookup {
    /// Exactly one of identifier and query must be present. An empty object
    /// is neither: it is not a usable query and it does not leave the body
    /// absent.
    pub fn select(id: PathId, body: QueryBody) -> Option<Self> {
        match (id.into_inner(), body) {
            (Some(id), QueryBody::Absent) => Some(Self::Id(id)),
            (None, QueryBody::Query(query)) => Some(Self::Query(query)),
            _ => None,
        }
    }
}

/// Body of an identifier-or-query request.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryBody {
    /// No body, whitespace only, or `null`.
    Absent,
    /// `{}`.
    Empty,
    Query(Document),
}

fn parse(body: &Bytes) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))
}

/// A body that must be present; any JSON value is passed on.
pub fn required_json(body: &Bytes) -> Result<Value, ApiError> {
    parse(body)?.ok_or_else(|| ApiError::bad_request("request body is required"))
}

/// An optional JSON object, kept apart from the empty object.
pub fn query_body(body: &Bytes) -> Result<QueryBody, ApiError> {
    match parse(body)? {
        None | Some(Value::Null) => Ok(QueryBody::Absent),
        Some(Value::Object(map)) if map.is_empty() => Ok(QueryBody::Empty),
        Some(Value::Object(map)) => Ok(QueryBody::Query(map)),
        Some(_) => Err(ApiError::bad_request("request body must be a JSON object")),
    }
}

/// A JSON object that must be present (it may be empty).
pub fn required_object(body: &Bytes) -> Result<Document, ApiError> {
    match required_json(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::bad_request("request body must be a JSON object")),
    }
}

/// Type checks on update payloads, run before the service is called.
pub fn check_partial_fields(partial: &Document) -> Result<(), ApiError> {
    if partial.get("name").is_some_and(|v| !v.is_string()) {
        return Err(ApiError::bad_request(
            "Error! 'name' parameter is not a string instance",
        ));
    }
    if partial.get("age").is_some_and(|v| v.as_i64().is_none()) {
        return Err(ApiError::bad_request(
            "Error! 'age' parameter is not an integer instance",
        ));
    }
    if partial.get("gender").is_some_and(|v| !v.is_string()) {
        return Err(ApiError::bad_request(
            "Error! 'gender' parameter is not a string instance",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Document {
        match v {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn none_segment_is_absent() {
        assert_eq!(PathId::from_segment("None").as_deref(), None);
        assert_eq!(PathId::from_segment("none").as_deref(), Some("none"));
        assert_eq!(PathId::from_segment("abc").as_deref(), Some("abc"));
    }

    #[test]
    fn lookup_requires_exactly_one_source() {
        let q = obj(json!({"name": "Ana"}));
        let id = || PathId::from_segment("abc");
        let none = || PathId::from_segment("None");

        assert_eq!(
            Lookup::select(id(), QueryBody::Absent),
            Some(Lookup::Id("abc".into()))
        );
        assert_eq!(
            Lookup::select(none(), QueryBody::Query(q.clone())),
            Some(Lookup::Query(q.clone()))
        );
        assert_eq!(Lookup::select(id(), QueryBody::Query(q)), None);
        assert_eq!(Lookup::select(none(), QueryBody::Absent), None);
    }

    #[test]
    fn empty_object_is_neither_id_nor_query() {
        assert_eq!(Lookup::select(PathId::from_segment("abc"), QueryBody::Empty), None);
        assert_eq!(Lookup::select(PathId::from_segment("None"), QueryBody::Empty), None);
    }

    #[test]
    fn query_body_states() {
        for raw in ["", "  \n", "null"] {
            assert_eq!(query_body(&Bytes::from(raw)).unwrap(), QueryBody::Absent, "{raw:?}");
        }
        assert_eq!(query_body(&Bytes::from("{}")).unwrap(), QueryBody::Empty);
        assert_eq!(query_body(&Bytes::from(" { } ")).unwrap(), QueryBody::Empty);

        let QueryBody::Query(q) = query_body(&Bytes::from(r#"{"age": 3}"#)).unwrap() else {
            panic!("expected a query");
        };
        assert_eq!(q["age"], json!(3));
    }

    #[test]
    fn query_body_rejects_non_objects() {
        assert!(query_body(&Bytes::from("[1]")).is_err());
        assert!(query_body(&Bytes::from("{oops")).is_err());
    }

    #[test]
    fn required_json_rejects_empty() {
        let err = required_json(&Bytes::new()).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn partial_field_messages() {
        let err = check_partial_fields(&obj(json!({"age": "thirty"}))).unwrap_err();
        assert_eq!(err.detail, "Error! 'age' parameter is not an integer instance");

        let err = check_partial_fields(&obj(json!({"name": 5}))).unwrap_err();
        assert!(err.detail.contains("'name'"));

        let err = check_partial_fields(&obj(json!({"gender": null}))).unwrap_err();
        assert!(err.detail.contains("'gender'"));

        assert!(check_partial_fields(&obj(json!({"age": 1.5}))).is_err());
    }

    #[test]
    fn partial_fields_pass_through_unknown_keys() {
        assert!(check_partial_fields(&obj(json!({"age": 99, "active": false}))).is_ok());
        assert!(check_partial_fields(&Document::new()).is_ok());
    }
}
