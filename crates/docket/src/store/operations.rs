use std::sync::Arc;

use tokio::fs as tokio_fs;
use tracing::{debug, error, trace};

use super::stor::Store;
use crate::{Collection, DocketError, Model, Result, Schema, CONTAINER_EXTENSION};

#[allow(
    clippy::multiple_inherent_impl,
    reason = "multiple impl blocks for Store are intentional for organization"
)]
impl Store {
    /// Retrieves the collection with the specified name, opening it on first access.
    ///
    /// The first call for a name validates it, ensures its container exists and registers
    /// the handle. Later calls return the registered handle without touching the disk.
    ///
    /// # Errors
    ///
    /// - [`DocketError::InvalidCollectionName`] before any I/O if the name is not usable
    /// - [`DocketError::StorageInit`] if the container cannot be created
    pub async fn collection(&self, name: &str) -> Result<Arc<Collection>> {
        trace!("Accessing collection: {}", name);
        let mut collections = self.collections.lock().await;
        if let Some(collection) = collections.get(name) {
            return Ok(Arc::clone(collection));
        }

        let collection = Arc::new(Collection::new(
            &self.root_path,
            name,
            self.config.clone(),
        )?);
        collection.ensure().await?;
        collections.insert(name.to_owned(), Arc::clone(&collection));
        debug!("Collection '{}' registered", name);
        Ok(collection)
    }

    /// Ensures the container for `name` exists.
    ///
    /// Unlike [`Store::collection`], this re-checks the disk even for registered collections,
    /// recreating an empty container if it was removed externally. An existing container is
    /// left untouched.
    pub async fn ensure_collection(&self, name: &str) -> Result<()> {
        let collection = self.collection(name).await?;
        collection.ensure().await
    }

    /// Binds `schema` to its collection and returns a validating handle.
    pub async fn model(&self, schema: Schema) -> Result<Model> {
        let collection = self.collection(schema.collection()).await?;
        Ok(Model::new(schema, collection))
    }

    /// Lists the names of all collections with a container under the root directory,
    /// sorted by name. A missing root directory yields an empty list.
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        trace!("Listing collections under {:?}", self.root_path);
        let list_error = |e: std::io::Error| {
            error!(
                "Failed to read store directory {:?}: {}",
                self.root_path, e
            );
            DocketError::ListCollections {
                root:   self.root_path.clone(),
                source: e,
            }
        };

        let mut entries = match tokio_fs::read_dir(&self.root_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Store directory {:?} does not exist yet", self.root_path);
                return Ok(Vec::new());
            },
            Err(e) => return Err(list_error(e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(list_error)? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CONTAINER_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) &&
                !stem.starts_with('.')
            {
                names.push(stem.to_owned());
            }
        }
        names.sort();

        debug!("Found {} collections", names.len());
        Ok(names)
    }
}
