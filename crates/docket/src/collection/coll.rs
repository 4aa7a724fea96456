use std::path::{Path, PathBuf};

use tokio::{fs as tokio_fs, io::AsyncWriteExt as _, sync::Mutex};
use tracing::{debug, error, trace, warn};

use crate::{
    validation::validate_collection_name,
    DocketError,
    Document,
    Result,
    StoreConfig,
    WriteMode,
    CONTAINER_EXTENSION,
    STAGING_EXTENSION,
};

/// A named collection of documents backed by a single JSON container file.
///
/// The container holds the full ordered sequence of documents as one JSON array. Every
/// mutation is a read-modify-write cycle over the whole container: read the full sequence,
/// change it in memory, write the full sequence back. The cycles of one collection are
/// serialized by an internal async mutex, so concurrent callers in the same process never
/// lose each other's writes.
///
/// Obtain collections through [`crate::Store::collection`], which keeps exactly one handle
/// per collection name. Two handles on the same container bypass each other's lock.
///
/// # Structure
///
/// - `{root}/{name}.json` - the container
/// - `{root}/{name}.json.tmp` - staging file, only present during an atomic rewrite
#[derive(Debug)]
#[allow(
    clippy::field_scoped_visibility_modifiers,
    reason = "fields need to be pub(crate) for internal access"
)]
pub struct Collection {
    /// The collection name.
    pub(crate) name:   String,
    /// The path of the container file.
    pub(crate) path:   PathBuf,
    /// Write settings inherited from the store.
    pub(crate) config: StoreConfig,
    /// Serializes read-modify-write cycles on the container.
    pub(crate) lock:   Mutex<()>,
}

impl Collection {
    /// Creates a handle for the collection `name` under `root`. No I/O happens here.
    pub(crate) fn new(root: &Path, name: &str, config: StoreConfig) -> Result<Self> {
        validate_collection_name(name)?;
        let path = root.join(format!("{}.{}", name, CONTAINER_EXTENSION));
        Ok(Self {
            name: name.to_owned(),
            path,
            config,
            lock: Mutex::new(()),
        })
    }

    /// Returns the name of the collection.
    pub fn name(&self) -> &str { &self.name }

    /// Returns the path of the container file.
    pub fn path(&self) -> &Path { &self.path }

    /// Ensures the container exists, creating the enclosing directory and an empty container
    /// when needed.
    ///
    /// Idempotent: an existing container is never truncated or rewritten, even if another
    /// process creates it between the existence check and the write.
    ///
    /// # Errors
    ///
    /// Returns [`DocketError::StorageInit`] when the container's existence cannot be checked,
    /// or when the directory or the empty container cannot be created.
    pub async fn ensure(&self) -> Result<()> {
        trace!("Ensuring container for collection: {}", self.name);
        let _guard = self.lock.lock().await;

        let storage_init = |path: &Path, source: std::io::Error| {
            error!(
                "Failed to initialize collection '{}' at {:?}: {}",
                self.name, path, source
            );
            DocketError::StorageInit {
                collection: self.name.clone(),
                path: path.to_path_buf(),
                source,
            }
        };

        if tokio_fs::try_exists(&self.path)
            .await
            .map_err(|e| storage_init(&self.path, e))?
        {
            debug!("Container for collection '{}' already exists", self.name);
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            tokio_fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_init(parent, e))?;
        }

        match tokio_fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .await
        {
            Ok(mut file) => {
                file.write_all(b"[]")
                    .await
                    .map_err(|e| storage_init(&self.path, e))?;
                file.flush()
                    .await
                    .map_err(|e| storage_init(&self.path, e))?;
                debug!("Collection {} created", self.name);
                Ok(())
            },
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(
                    "Container for collection '{}' appeared concurrently, leaving it untouched",
                    self.name
                );
                Ok(())
            },
            Err(e) => Err(storage_init(&self.path, e)),
        }
    }

    /// Reads and decodes the full container. Callers hold the lock.
    pub(crate) async fn read_all(&self) -> Result<Vec<Document>> {
        trace!("Reading container {:?}", self.path);
        let content = tokio_fs::read_to_string(&self.path).await.map_err(|e| {
            error!("Failed to read container {:?}: {}", self.path, e);
            DocketError::read(&self.name, e)
        })?;

        let documents: Vec<Document> = serde_json::from_str(&content).map_err(|e| {
            error!("Malformed container {:?}: {}", self.path, e);
            DocketError::read(&self.name, e)
        })?;

        if let Some(index) = documents.iter().position(|doc| doc.id().is_empty()) {
            error!(
                "Document at index {} in container {:?} has an empty id",
                index, self.path
            );
            return Err(DocketError::read(
                &self.name,
                format!("document at index {} has an empty id", index),
            ));
        }

        debug!(
            "Read {} documents from collection '{}'",
            documents.len(),
            self.name
        );
        Ok(documents)
    }

    /// Encodes and writes the full sequence. Callers hold the lock.
    ///
    /// The sequence is fully encoded before the container is touched.
    pub(crate) async fn write_all(&self, documents: &[Document]) -> Result<()> {
        trace!(
            "Writing {} documents to container {:?}",
            documents.len(),
            self.path
        );
        let encoded = if self.config.pretty {
            serde_json::to_vec_pretty(documents)
        }
        else {
            serde_json::to_vec(documents)
        }
        .map_err(|e| {
            error!(
                "Failed to encode collection '{}' for writing: {}",
                self.name, e
            );
            DocketError::write(&self.name, e)
        })?;

        match self.config.write_mode {
            WriteMode::Atomic => self.write_atomic(&encoded).await,
            WriteMode::InPlace => {
                tokio_fs::write(&self.path, &encoded).await.map_err(|e| {
                    error!("Failed to write container {:?}: {}", self.path, e);
                    DocketError::write(&self.name, e)
                })
            },
        }
    }

    /// Writes to the staging file, syncs it, then renames it over the container.
    async fn write_atomic(&self, encoded: &[u8]) -> Result<()> {
        let staging = self.path.with_extension(STAGING_EXTENSION);

        let result = async {
            let mut file = tokio_fs::File::create(&staging).await?;
            file.write_all(encoded).await?;
            file.sync_all().await?;
            drop(file);
            tokio_fs::rename(&staging, &self.path).await
        }
        .await;

        if let Err(e) = result {
            error!(
                "Failed to rewrite container {:?} through {:?}: {}",
                self.path, staging, e
            );
            if let Err(cleanup) = tokio_fs::remove_file(&staging).await &&
                cleanup.kind() != std::io::ErrorKind::NotFound
            {
                warn!(
                    "Failed to remove staging file {:?}: {}",
                    staging, cleanup
                );
            }
            return Err(DocketError::write(&self.name, e));
        }
        Ok(())
    }
}
