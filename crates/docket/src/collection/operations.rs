use serde_json::{Map, Value};
use tracing::{debug, info, trace, warn};

use super::coll::Collection;
use crate::{Document, Result};

impl Collection {
    /// Appends a new document built from `payload`.
    ///
    /// A fresh identifier is generated, `created_at` and `updated_at` are set to the current
    /// time, and the whole container is rewritten with the new document at the end.
    ///
    /// # Returns
    ///
    /// The stored document, including its assigned fields.
    ///
    /// # Example
    ///
    /// ```rust
    /// use docket::Store;
    /// use serde_json::json;
    ///
    /// # async fn example() -> docket::Result<()> {
    /// let store = Store::new("/tmp/docket-example");
    /// let notes = store.collection("notes").await?;
    ///
    /// let payload = json!({"title": "hello"}).as_object().cloned().unwrap_or_default();
    /// let note = notes.append(payload).await?;
    /// assert_eq!(note.data()["title"], "hello");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn append(&self, payload: Map<String, Value>) -> Result<Document> {
        self.append_with(payload, |_, _| Ok(())).await
    }

    /// Appends a new document after `check` accepts it against the current contents.
    ///
    /// `check` receives the freshly read sequence and the payload, inside the same locked
    /// cycle as the write, so no other mutation can slip in between the check and the
    /// append. An error from `check` aborts the cycle without writing.
    pub async fn append_with<F>(&self, payload: Map<String, Value>, check: F) -> Result<Document>
    where
        F: FnOnce(&[Document], &Map<String, Value>) -> Result<()>,
    {
        trace!("Appending document to collection: {}", self.name);
        let _guard = self.lock.lock().await;

        let mut documents = self.read_all().await?;
        check(&documents, &payload)?;

        let document = Document::new(payload);
        if documents.iter().any(|doc| doc.id() == document.id()) {
            warn!(
                "Generated id {} already exists in collection '{}'; appending anyway",
                document.id(),
                self.name
            );
        }
        documents.push(document.clone());

        self.write_all(&documents).await?;
        debug!(
            "Document {} added to collection '{}'",
            document.id(),
            self.name
        );
        Ok(document)
    }

    /// Returns every document in stored order.
    ///
    /// # Errors
    ///
    /// [`crate::DocketError::Read`] when the container is missing or malformed.
    pub async fn get_all(&self) -> Result<Vec<Document>> {
        trace!("Listing documents of collection: {}", self.name);
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    /// Returns the number of stored documents.
    pub async fn count(&self) -> Result<usize> { Ok(self.get_all().await?.len()) }

    /// Returns the first document whose `field` strictly equals `value`.
    ///
    /// `field` may be a payload field or one of `id`, `created_at`, `updated_at`. The scan is
    /// linear; there is no index.
    pub async fn find_by_field(&self, field: &str, value: &Value) -> Result<Option<Document>> {
        trace!(
            "Finding document in collection '{}' where {} = {}",
            self.name,
            field,
            value
        );
        let found = self
            .get_all()
            .await?
            .into_iter()
            .find(|doc| doc.field_equals(field, value));
        if found.is_none() {
            debug!(
                "No document in collection '{}' where {} = {}",
                self.name, field, value
            );
        }
        Ok(found)
    }

    /// Returns the document with identifier `id`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>> {
        self.find_by_field(crate::ID_FIELD, &Value::String(id.to_owned()))
            .await
    }

    /// Shallow-merges `patch` into the document with identifier `id`.
    ///
    /// `updated_at` is refreshed; `id` and `created_at` are never overwritten, and any
    /// reserved key in the patch is ignored.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Document))` with the updated document
    /// - `Ok(None)` if no document has that id; nothing is written
    pub async fn update_by_id(&self, id: &str, patch: Map<String, Value>) -> Result<Option<Document>> {
        self.update_with(id, patch, |_, _| Ok(())).await
    }

    /// Like [`Collection::update_by_id`], but runs `check` against the target document and
    /// the full current sequence before merging, inside the locked cycle.
    pub async fn update_with<F>(&self, id: &str, patch: Map<String, Value>, check: F) -> Result<Option<Document>>
    where
        F: FnOnce(&Document, &[Document]) -> Result<()>,
    {
        trace!("Updating document {} in collection: {}", id, self.name);
        let _guard = self.lock.lock().await;

        let mut documents = self.read_all().await?;
        let Some(index) = documents.iter().position(|doc| doc.id() == id)
        else {
            info!(
                "No matching record found for update of {} in collection '{}'",
                id, self.name
            );
            return Ok(None);
        };

        check(&documents[index], &documents)?;
        documents[index].apply_patch(patch);
        let updated = documents[index].clone();

        self.write_all(&documents).await?;
        debug!("Document {} updated in collection '{}'", id, self.name);
        Ok(Some(updated))
    }

    /// Removes the first document with identifier `id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Document))` with the removed document
    /// - `Ok(None)` if no document has that id; nothing is written
    pub async fn delete_by_id(&self, id: &str) -> Result<Option<Document>> {
        trace!("Deleting document {} from collection: {}", id, self.name);
        let _guard = self.lock.lock().await;

        let mut documents = self.read_all().await?;
        let Some(index) = documents.iter().position(|doc| doc.id() == id)
        else {
            info!(
                "No matching record found for delete of {} in collection '{}'",
                id, self.name
            );
            return Ok(None);
        };

        let removed = documents.remove(index);
        self.write_all(&documents).await?;
        debug!("Document {} deleted from collection '{}'", id, self.name);
        Ok(Some(removed))
    }
}
