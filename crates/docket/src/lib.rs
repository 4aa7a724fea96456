//! Docket is a schema-validated document store backed by one JSON file per collection.
//!
//! A [`Store`] owns a root directory and a registry of open collections. Binding a
//! [`Schema`] to the store yields a [`Model`], which validates payloads before they reach
//! the underlying [`Collection`].
//!
//! ```no_run
//! use docket::{FieldKind, Schema, Store};
//! use serde_json::json;
//!
//! # async fn example() -> docket::Result<()> {
//! let store = Store::new("db");
//! let schema = Schema::builder("User")
//!     .field("email", FieldKind::Text)
//!     .field("firstName", FieldKind::Text)
//!     .required(["email", "firstName"])
//!     .unique(["email"])
//!     .build()?;
//!
//! let users = store.model(schema).await?;
//! let alice = users
//!     .create(json!({"email": "alice@example.com", "firstName": "Alice"}))
//!     .await?;
//! assert!(users.find_by_id(alice.id()).await?.is_some());
//! # Ok(())
//! # }
//! ```

/// Collection store: one container file per collection.
pub mod collection;
/// Store configuration.
pub mod config;
/// Well-known names and sizes.
pub mod constants;
/// Stored document representation.
pub mod document;
/// Error types.
pub mod error;
/// Document identifier generation.
pub mod id;
/// Schema-bound document handles.
pub mod model;
/// Schema declarations and the validation layer.
pub mod schema;
/// Collection registry.
pub mod store;
/// Filesystem name validation helpers.
pub mod validation;

pub use collection::Collection;
pub use config::{StoreConfig, WriteMode};
pub use constants::*;
pub use document::Document;
pub use error::{DocketError, Result};
pub use model::Model;
pub use schema::{FieldKind, Schema, SchemaBuilder, SchemaDefinition};
pub use store::Store;
