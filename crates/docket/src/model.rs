use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::{schema::validate_unique, Collection, DocketError, Document, Result, Schema};

/// A collection bound to a schema.
///
/// Creation runs the full validation layer: shape, required fields and kinds locally, then
/// uniqueness against a fresh read of the collection inside the same locked cycle as the
/// append. Updates check shape and kinds only, unless the schema opts into
/// `unique_on_update`. Lookups and deletes go straight to the collection.
///
/// Cloning is cheap; clones share the collection handle.
#[derive(Debug, Clone)]
pub struct Model {
    /// The declared shape.
    schema:     Arc<Schema>,
    /// The backing collection.
    collection: Arc<Collection>,
}

impl Model {
    /// Binds `schema` to `collection`. Prefer [`crate::Store::model`].
    pub fn new(schema: Schema, collection: Arc<Collection>) -> Self {
        Self {
            schema: Arc::new(schema),
            collection,
        }
    }

    /// Returns the schema.
    pub fn schema(&self) -> &Schema { &self.schema }

    /// Returns the backing collection.
    pub const fn collection(&self) -> &Arc<Collection> { &self.collection }

    /// Validates `payload` and stores it as a new document.
    ///
    /// # Errors
    ///
    /// In the order the checks run:
    /// - [`DocketError::InvalidPayload`] if `payload` is not a JSON object
    /// - [`DocketError::UnknownField`] for undeclared fields
    /// - [`DocketError::MissingField`] for absent, null or empty required fields
    /// - [`DocketError::KindMismatch`] for values of the wrong kind
    /// - [`DocketError::DuplicateValue`] for a unique collision with a stored document
    /// - [`DocketError::Read`] / [`DocketError::Write`] on storage failure
    ///
    /// # Example
    ///
    /// ```rust
    /// use docket::{DocketError, FieldKind, Schema, Store};
    /// use serde_json::json;
    ///
    /// # async fn example() -> docket::Result<()> {
    /// let store = Store::new("/tmp/docket-model");
    /// let schema = Schema::builder("User")
    ///     .field("email", FieldKind::Text)
    ///     .required(["email"])
    ///     .unique(["email"])
    ///     .build()?;
    /// let users = store.model(schema).await?;
    ///
    /// users.create(json!({"email": "a@x.com"})).await?;
    /// let again = users.create(json!({"email": "a@x.com"})).await;
    /// assert!(matches!(again, Err(DocketError::DuplicateValue { .. })));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(&self, payload: Value) -> Result<Document> {
        trace!("Creating document in collection: {}", self.schema.collection());
        let payload = into_object(payload)?;
        self.schema.check_new(&payload)?;

        let schema = &self.schema;
        let document = self
            .collection
            .append_with(payload, |existing, candidate| {
                schema.check_unique(candidate, existing)
            })
            .await?;
        debug!(
            "Document {} created in collection '{}'",
            document.id(),
            self.schema.collection()
        );
        Ok(document)
    }

    /// Returns every document in stored order.
    pub async fn find(&self) -> Result<Vec<Document>> { self.collection.get_all().await }

    /// Returns the document with identifier `id`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>> { self.collection.find_by_id(id).await }

    /// Returns the first document whose `field` strictly equals `value`.
    pub async fn find_one(&self, field: &str, value: &Value) -> Result<Option<Document>> {
        self.collection.find_by_field(field, value).await
    }

    /// Shallow-merges `patch` into the document with identifier `id`.
    ///
    /// The patch may be partial; only shape and kinds are checked. Uniqueness is not
    /// re-checked unless the schema was declared with `unique_on_update`, so by default an
    /// update can introduce a duplicate value for a unique field.
    ///
    /// Returns `Ok(None)` when no document has that id.
    pub async fn update_by_id(&self, id: &str, patch: Value) -> Result<Option<Document>> {
        trace!(
            "Updating document {} in collection: {}",
            id,
            self.schema.collection()
        );
        let patch = into_object(patch)?;
        self.schema.check_patch(&patch)?;

        if !self.schema.unique_on_update() {
            return self.collection.update_by_id(id, patch).await;
        }

        let schema = &self.schema;
        let candidate = patch.clone();
        self.collection
            .update_with(id, patch, |target, existing| {
                let others = existing.iter().filter(|doc| doc.id() != target.id());
                validate_unique(
                    schema.collection(),
                    &candidate,
                    others,
                    schema.unique(),
                )
            })
            .await
    }

    /// Removes the document with identifier `id`, returning it, or `Ok(None)` if absent.
    pub async fn delete_by_id(&self, id: &str) -> Result<Option<Document>> { self.collection.delete_by_id(id).await }
}

/// Accepts only JSON objects as payloads and patches.
fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
            Err(DocketError::InvalidPayload {
                reason: format!("expected a JSON object, got {}", crate::schema::field::describe_value(&value)),
            })
        },
    }
}

#[cfg(test)]
mod tests {
    use futures::future::join_all;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::{FieldKind, Store};

    async fn setup_users(unique_on_update: bool) -> (Model, TempDir) {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Store::new(temp_dir.path());
        let schema = Schema::builder("User")
            .field("firstName", FieldKind::Text)
            .field("lastName", FieldKind::Text)
            .field("email", FieldKind::Text)
            .field("password", FieldKind::Text)
            .field("posts", FieldKind::List)
            .required(["email", "firstName"])
            .unique(["email"])
            .unique_on_update(unique_on_update)
            .build()
            .unwrap();
        let model = store.model(schema).await.unwrap();
        (model, temp_dir)
    }

    #[tokio::test]
    async fn test_create_stores_document_with_generated_id() {
        let (users, _temp_dir) = setup_users(false).await;

        let alice = users
            .create(json!({"email": "a@x.com", "firstName": "Alice"}))
            .await
            .unwrap();

        assert_eq!(alice.id().len(), crate::ID_LENGTH);
        assert_eq!(alice.data()["email"], "a@x.com");
        let stored = users.find().await.unwrap();
        assert_eq!(stored, vec![alice]);
    }

    #[tokio::test]
    async fn test_create_duplicate_unique_value_fails() {
        let (users, _temp_dir) = setup_users(false).await;

        users
            .create(json!({"email": "a@x.com", "firstName": "Alice"}))
            .await
            .unwrap();
        let err = users
            .create(json!({"email": "a@x.com", "firstName": "Alicia"}))
            .await
            .unwrap_err();

        match err {
            DocketError::DuplicateValue {
                field,
                value,
                collection,
            } => {
                assert_eq!(field, "email");
                assert_eq!(value, json!("a@x.com"));
                assert_eq!(collection, "User");
            },
            other => panic!("Expected DuplicateValue, got {other:?}"),
        }
        assert_eq!(users.find().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_empty_payload_reports_missing_fields() {
        let (users, _temp_dir) = setup_users(false).await;

        let err = users.create(json!({})).await.unwrap_err();
        match err {
            DocketError::MissingField {
                fields, ..
            } => assert_eq!(fields, vec!["email", "firstName"]),
            other => panic!("Expected MissingField, got {other:?}"),
        }
        assert!(users.find().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_field_wins_over_other_failures() {
        let (users, _temp_dir) = setup_users(false).await;
        users
            .create(json!({"email": "a@x.com", "firstName": "Alice"}))
            .await
            .unwrap();

        // Duplicate email and missing firstName, but the unknown field is reported.
        let err = users
            .create(json!({"email": "a@x.com", "age": 30}))
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::UnknownField { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_non_object_payload() {
        let (users, _temp_dir) = setup_users(false).await;

        for payload in [json!("text"), json!([1, 2]), json!(null), json!(7)] {
            let err = users.create(payload).await.unwrap_err();
            assert!(matches!(err, DocketError::InvalidPayload { .. }));
        }
    }

    #[tokio::test]
    async fn test_find_by_id_and_find_one() {
        let (users, _temp_dir) = setup_users(false).await;
        let alice = users
            .create(json!({"email": "a@x.com", "firstName": "Alice"}))
            .await
            .unwrap();
        users
            .create(json!({"email": "b@x.com", "firstName": "Bob"}))
            .await
            .unwrap();

        assert_eq!(users.find_by_id(alice.id()).await.unwrap(), Some(alice.clone()));
        let bob = users
            .find_one("firstName", &json!("Bob"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bob.data()["email"], "b@x.com");
        assert!(users.find_by_id("00000000000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_checks_shape_and_merges() {
        let (users, _temp_dir) = setup_users(false).await;
        let alice = users
            .create(json!({"email": "a@x.com", "firstName": "Alice"}))
            .await
            .unwrap();

        let err = users
            .update_by_id(alice.id(), json!({"nickname": "Al"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::UnknownField { .. }));

        let updated = users
            .update_by_id(alice.id(), json!({"lastName": "Liddell"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.data()["lastName"], "Liddell");
        assert_eq!(updated.data()["firstName"], "Alice");
        assert_eq!(updated.created_at(), alice.created_at());
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_an_error() {
        let (users, _temp_dir) = setup_users(false).await;
        let result = users
            .update_by_id("12345678901", json!({"lastName": "X"}))
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_bypasses_uniqueness_by_default() {
        let (users, _temp_dir) = setup_users(false).await;
        users
            .create(json!({"email": "a@x.com", "firstName": "Alice"}))
            .await
            .unwrap();
        let bob = users
            .create(json!({"email": "b@x.com", "firstName": "Bob"}))
            .await
            .unwrap();

        let updated = users
            .update_by_id(bob.id(), json!({"email": "a@x.com"}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.data()["email"], "a@x.com");
    }

    #[tokio::test]
    async fn test_update_enforces_uniqueness_when_enabled() {
        let (users, _temp_dir) = setup_users(true).await;
        users
            .create(json!({"email": "a@x.com", "firstName": "Alice"}))
            .await
            .unwrap();
        let bob = users
            .create(json!({"email": "b@x.com", "firstName": "Bob"}))
            .await
            .unwrap();

        let err = users
            .update_by_id(bob.id(), json!({"email": "a@x.com"}))
            .await
            .unwrap_err();
        assert!(matches!(err, DocketError::DuplicateValue { .. }));

        // Re-asserting its own value is not a collision.
        assert!(users
            .update_by_id(bob.id(), json!({"email": "b@x.com"}))
            .await
            .unwrap()
            .is_some());
        let stored = users.find_by_id(bob.id()).await.unwrap().unwrap();
        assert_eq!(stored.data()["email"], "b@x.com");
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let (users, _temp_dir) = setup_users(false).await;
        let alice = users
            .create(json!({"email": "a@x.com", "firstName": "Alice"}))
            .await
            .unwrap();

        let removed = users.delete_by_id(alice.id()).await.unwrap();
        assert_eq!(removed, Some(alice.clone()));
        assert!(users.delete_by_id(alice.id()).await.unwrap().is_none());
        assert!(users.find().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_one_duplicate() {
        let (users, _temp_dir) = setup_users(false).await;

        let attempts = (0 .. 8).map(|i| {
            let users = users.clone();
            tokio::spawn(async move {
                users
                    .create(json!({"email": "same@x.com", "firstName": format!("User{i}")}))
                    .await
            })
        });
        let results: Vec<_> = join_all(attempts)
            .await
            .into_iter()
            .map(|joined| joined.unwrap())
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, DocketError::DuplicateValue { .. })));
        assert_eq!(users.find().await.unwrap().len(), 1);
    }
}
