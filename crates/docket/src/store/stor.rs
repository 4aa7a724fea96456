use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;
use tracing::trace;

use crate::{Collection, StoreConfig, DEFAULT_ROOT_DIR};

/// The registry of collections under one root directory.
///
/// `Store` owns the root directory where container files live and hands out exactly one
/// [`Collection`] handle per collection name. The first access to a name creates the
/// handle and ensures its container; later accesses return the same `Arc`. Since every
/// handle serializes its own read-modify-write cycles, routing all access through a single
/// `Store` is what makes concurrent writers within the process safe.
///
/// # Architecture
///
/// - Root directory (specified at creation, `db` by default)
///   - `User.json` - one container per collection
///   - `Post.json`
///
/// # Examples
///
/// ```no_run
/// use docket::Store;
///
/// # async fn example() -> docket::Result<()> {
/// let store = Store::new("/var/lib/docket");
/// let users = store.collection("users").await?;
/// let again = store.collection("users").await?;
/// assert!(std::sync::Arc::ptr_eq(&users, &again));
/// # Ok(())
/// # }
/// ```
///
/// Nothing is written until a collection is first accessed.
#[allow(clippy::field_scoped_visibility_modifiers, reason = "fields need to be pub(crate) for internal access")]
#[derive(Debug)]
pub struct Store {
    /// The root path of the store.
    pub(crate) root_path:   PathBuf,
    /// Settings handed to every collection.
    pub(crate) config:      StoreConfig,
    /// Open collections keyed by name.
    pub(crate) collections: Mutex<HashMap<String, Arc<Collection>>>,
}

impl Store {
    /// Creates a store rooted at `root_path` with the default configuration.
    pub fn new<P>(root_path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self::new_with_config(root_path, StoreConfig::default())
    }

    /// Creates a store rooted at `root_path` with a custom configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use docket::{Store, StoreConfig, WriteMode};
    ///
    /// let config = StoreConfig {
    ///     write_mode: WriteMode::InPlace,
    ///     pretty:     false,
    /// };
    /// let store = Store::new_with_config("/tmp/docket", config);
    /// ```
    pub fn new_with_config<P>(root_path: P, config: StoreConfig) -> Self
    where
        P: AsRef<Path>,
    {
        trace!(
            "Creating store at path: {:?} ({:?})",
            root_path.as_ref(),
            config
        );
        Self {
            root_path: root_path.as_ref().to_path_buf(),
            config,
            collections: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the root path of the store.
    pub const fn root_path(&self) -> &PathBuf { &self.root_path }

    /// Returns the store configuration.
    pub const fn config(&self) -> &StoreConfig { &self.config }
}

impl Default for Store {
    /// A store rooted at `db` in the working directory.
    fn default() -> Self { Self::new(DEFAULT_ROOT_DIR) }
}
