use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::schema::FieldKind;

/// Boxed cause carried by container read and write failures.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Docket-wide error type.
///
/// Validation failures (`UnknownField`, `MissingField`, `KindMismatch`, `DuplicateValue`)
/// are raised before anything is written. Storage failures (`StorageInit`, `Read`,
/// `Write`) carry the underlying cause. A missing document is never an error: lookups,
/// updates and deletes report it as `None`.
#[derive(Error, Debug)]
pub enum DocketError {
    /// The payload contains fields the schema does not declare.
    #[error("Undefined fields detected in collection '{collection}': {}", fields.join(", "))]
    UnknownField {
        collection: String,
        fields:     Vec<String>,
    },

    /// Required fields are absent, null, or empty strings.
    #[error("Missing required fields in collection '{collection}': {}", fields.join(", "))]
    MissingField {
        collection: String,
        fields:     Vec<String>,
    },

    /// A present value does not match the declared field kind.
    #[error("Field '{field}' in collection '{collection}' expects {expected}, found {found}")]
    KindMismatch {
        collection: String,
        field:      String,
        expected:   FieldKind,
        found:      String,
    },

    /// A unique field collides with an existing document.
    #[error("A value with the unique key '{field}' and value {value} already exists in collection '{collection}'")]
    DuplicateValue {
        collection: String,
        field:      String,
        value:      Value,
    },

    /// The collection's backing location could not be created.
    #[error("Failed to initialize storage for collection '{collection}' at {path:?}: {source}")]
    StorageInit {
        collection: String,
        path:       PathBuf,
        #[source]
        source:     std::io::Error,
    },

    /// The container could not be read or its encoding is malformed.
    #[error("Error reading data from {collection} collection: {source}")]
    Read {
        collection: String,
        #[source]
        source:     BoxedSource,
    },

    /// The container could not be written.
    #[error("Error writing data to {collection} collection: {source}")]
    Write {
        collection: String,
        #[source]
        source:     BoxedSource,
    },

    /// The store's root directory could not be scanned for containers.
    #[error("Error listing collections under {root:?}: {source}")]
    ListCollections {
        root:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The payload handed to a model is not a JSON object.
    #[error("Invalid data type, it should be an object: {reason}")]
    InvalidPayload {
        reason: String,
    },

    /// The collection name is empty or not filesystem-safe.
    #[error("Invalid collection name: '{name}'")]
    InvalidCollectionName {
        name: String,
    },

    /// The schema declaration is inconsistent.
    #[error("Invalid schema for collection '{collection}': {reason}")]
    InvalidSchema {
        collection: String,
        reason:     String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },
}

impl DocketError {
    /// Builds a [`DocketError::Read`] from any error cause.
    pub fn read<E>(collection: &str, source: E) -> Self
    where
        E: Into<BoxedSource>,
    {
        Self::Read {
            collection: collection.to_owned(),
            source:     source.into(),
        }
    }

    /// Builds a [`DocketError::Write`] from any error cause.
    pub fn write<E>(collection: &str, source: E) -> Self
    where
        E: Into<BoxedSource>,
    {
        Self::Write {
            collection: collection.to_owned(),
            source:     source.into(),
        }
    }

    /// Returns true for errors raised by the validation layer.
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. } |
                Self::MissingField { .. } |
                Self::KindMismatch { .. } |
                Self::DuplicateValue { .. } |
                Self::InvalidPayload { .. }
        )
    }
}

/// Result type alias for Docket operations.
pub type Result<T> = std::result::Result<T, DocketError>;
