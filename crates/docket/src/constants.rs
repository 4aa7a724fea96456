//! Constants for special file names and document fields used throughout Docket.

/// Default root directory for a store, relative to the working directory.
pub const DEFAULT_ROOT_DIR: &str = "db";

/// File extension for collection containers.
pub const CONTAINER_EXTENSION: &str = "json";

/// File extension for the staging file used by atomic rewrites.
pub const STAGING_EXTENSION: &str = "json.tmp";

/// Field holding the document identifier.
pub const ID_FIELD: &str = "id";

/// Field holding the creation timestamp (Unix epoch milliseconds).
pub const CREATED_AT_FIELD: &str = "created_at";

/// Field holding the last modification timestamp (Unix epoch milliseconds).
pub const UPDATED_AT_FIELD: &str = "updated_at";

/// Fields assigned by the store. Payloads and patches can never set them.
pub const RESERVED_FIELDS: &[&str] = &[ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD];

/// Number of digits in a generated document identifier.
pub const ID_LENGTH: usize = 11;
