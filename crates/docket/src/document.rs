use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{id::generate_id, CREATED_AT_FIELD, ID_FIELD, RESERVED_FIELDS, UPDATED_AT_FIELD};

/// A stored record: an assigned identifier, two timestamps, and the payload fields.
///
/// On disk the document is one flat JSON object. The identifier comes first, then the
/// payload fields in insertion order, then `created_at` and `updated_at` as Unix epoch
/// milliseconds:
///
/// ```json
/// {
///   "id": "04718239561",
///   "email": "alice@example.com",
///   "created_at": 1760572800000,
///   "updated_at": 1760572800000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The unique identifier of the document.
    id:         String,
    /// The payload fields.
    #[serde(flatten)]
    data:       Map<String, Value>,
    /// Creation timestamp in milliseconds since the Unix epoch.
    created_at: i64,
    /// Last modification timestamp in milliseconds since the Unix epoch.
    updated_at: i64,
}

impl Document {
    /// Creates a document with a freshly generated identifier and both timestamps set to now.
    ///
    /// Reserved fields present in `data` are dropped; the store owns them.
    pub fn new(data: Map<String, Value>) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            id:         generate_id(),
            data:       strip_reserved(data),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the document identifier.
    pub fn id(&self) -> &str { &self.id }

    /// Returns the payload fields.
    pub const fn data(&self) -> &Map<String, Value> { &self.data }

    /// Returns the creation timestamp in Unix epoch milliseconds.
    pub const fn created_at(&self) -> i64 { self.created_at }

    /// Returns the last modification timestamp in Unix epoch milliseconds.
    pub const fn updated_at(&self) -> i64 { self.updated_at }

    /// Returns the creation timestamp as a UTC date-time.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> { DateTime::from_timestamp_millis(self.created_at) }

    /// Returns the last modification timestamp as a UTC date-time.
    pub fn updated_at_utc(&self) -> Option<DateTime<Utc>> { DateTime::from_timestamp_millis(self.updated_at) }

    /// Returns the value of a field, including the assigned `id`, `created_at` and
    /// `updated_at`.
    pub fn get(&self, field: &str) -> Option<Value> {
        match field {
            ID_FIELD => Some(Value::String(self.id.clone())),
            CREATED_AT_FIELD => Some(Value::from(self.created_at)),
            UPDATED_AT_FIELD => Some(Value::from(self.updated_at)),
            _ => self.data.get(field).cloned(),
        }
    }

    /// Strict equality between a field and a value. An absent field matches nothing,
    /// not even `null`.
    pub fn field_equals(&self, field: &str, value: &Value) -> bool {
        match field {
            ID_FIELD => value.as_str() == Some(self.id.as_str()),
            CREATED_AT_FIELD => value.as_i64() == Some(self.created_at),
            UPDATED_AT_FIELD => value.as_i64() == Some(self.updated_at),
            _ => self.data.get(field) == Some(value),
        }
    }

    /// Shallow-merges `patch` over the payload and refreshes `updated_at`.
    ///
    /// `id`, `created_at` and `updated_at` in the patch are ignored.
    pub fn apply_patch(&mut self, patch: Map<String, Value>) {
        for (key, value) in strip_reserved(patch) {
            self.data.insert(key, value);
        }
        self.touch();
    }

    /// Refreshes `updated_at`, keeping it monotonic for this document.
    fn touch(&mut self) { self.updated_at = Utc::now().timestamp_millis().max(self.updated_at); }

    /// Serializes the document into a single flat JSON object.
    pub fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.data.len().saturating_add(RESERVED_FIELDS.len()));
        object.insert(ID_FIELD.to_owned(), Value::String(self.id.clone()));
        object.extend(self.data.clone());
        object.insert(CREATED_AT_FIELD.to_owned(), Value::from(self.created_at));
        object.insert(UPDATED_AT_FIELD.to_owned(), Value::from(self.updated_at));
        Value::Object(object)
    }
}

/// Removes store-assigned fields from a payload or patch.
fn strip_reserved(mut data: Map<String, Value>) -> Map<String, Value> {
    for field in RESERVED_FIELDS {
        data.remove(*field);
    }
    data
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_document_creation_assigns_id_and_timestamps() {
        let doc = Document::new(object(json!({"name": "Test", "value": 42})));

        assert_eq!(doc.id().len(), crate::ID_LENGTH);
        assert_eq!(doc.created_at(), doc.updated_at());
        assert_eq!(doc.data()["name"], "Test");
        assert_eq!(doc.data()["value"], 42);
        assert!(doc.created_at_utc().is_some());
    }

    #[test]
    fn test_document_creation_drops_reserved_fields() {
        let doc = Document::new(object(json!({"id": "forged", "created_at": 1, "name": "x"})));

        assert_ne!(doc.id(), "forged");
        assert_ne!(doc.created_at(), 1);
        assert!(!doc.data().contains_key("id"));
        assert!(!doc.data().contains_key("created_at"));
    }

    #[test]
    fn test_serialized_layout_is_flat_and_ordered() {
        let doc = Document::new(object(json!({"b": 1, "a": 2})));
        let text = serde_json::to_string(&doc).unwrap();

        let keys: Vec<String> = match serde_json::from_str::<Value>(&text).unwrap() {
            Value::Object(map) => map.keys().cloned().collect(),
            other => panic!("expected object, got {other}"),
        };
        assert_eq!(keys, vec!["id", "b", "a", "created_at", "updated_at"]);
        assert_eq!(serde_json::to_value(&doc).unwrap(), doc.to_value());
    }

    #[test]
    fn test_deserialize_round_trip() {
        let raw = json!({
            "id": "12345678901",
            "email": "a@x.com",
            "posts": ["p1"],
            "created_at": 1700000000000_i64,
            "updated_at": 1700000000500_i64
        });
        let doc: Document = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(doc.id(), "12345678901");
        assert_eq!(doc.data().len(), 2);
        assert_eq!(doc.created_at(), 1_700_000_000_000);
        assert_eq!(doc.to_value(), raw);
    }

    #[test]
    fn test_deserialize_without_id_fails() {
        let raw = json!({"email": "a@x.com", "created_at": 1, "updated_at": 1});
        assert!(serde_json::from_value::<Document>(raw).is_err());
    }

    #[test]
    fn test_field_equals_is_strict() {
        let doc = Document::new(object(json!({"count": 1, "flag": false, "name": "1"})));

        assert!(doc.field_equals("count", &json!(1)));
        assert!(!doc.field_equals("count", &json!("1")));
        assert!(!doc.field_equals("name", &json!(1)));
        assert!(doc.field_equals("flag", &json!(false)));
        assert!(!doc.field_equals("missing", &Value::Null));
        assert!(doc.field_equals("id", &json!(doc.id())));
        assert!(doc.field_equals("created_at", &json!(doc.created_at())));
    }

    #[test]
    fn test_apply_patch_keeps_identity() {
        let mut doc = Document::new(object(json!({"x": 0, "y": "keep"})));
        let (id, created_at, before) = (doc.id().to_owned(), doc.created_at(), doc.updated_at());

        doc.apply_patch(object(json!({"x": 1, "id": "other", "created_at": 5})));

        assert_eq!(doc.id(), id);
        assert_eq!(doc.created_at(), created_at);
        assert_eq!(doc.data()["x"], 1);
        assert_eq!(doc.data()["y"], "keep");
        assert!(doc.updated_at() >= before);
    }

    #[test]
    fn test_get_reserved_and_payload_fields() {
        let doc = Document::new(object(json!({"name": "Alice"})));

        assert_eq!(doc.get("id"), Some(json!(doc.id())));
        assert_eq!(doc.get("updated_at"), Some(json!(doc.updated_at())));
        assert_eq!(doc.get("name"), Some(json!("Alice")));
        assert_eq!(doc.get("missing"), None);
    }
}
