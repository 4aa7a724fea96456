use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::field::FieldKind;
use crate::{validation::validate_collection_name, DocketError, Result, RESERVED_FIELDS};

/// The serializable form of a schema declaration, as read from a JSON file.
///
/// ```json
/// {
///   "collection": "User",
///   "fields": { "email": "string", "firstName": "string", "posts": "array" },
///   "required": ["email", "firstName"],
///   "unique": ["email"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    /// Name of the collection backing documents of this shape.
    pub collection:       String,
    /// Declared fields and their kinds; the allowed-field set.
    #[serde(default)]
    pub fields:           BTreeMap<String, FieldKind>,
    /// Fields that must be present and non-empty on creation.
    #[serde(default)]
    pub required:         Vec<String>,
    /// Fields whose values must not repeat across the collection.
    #[serde(default)]
    pub unique:           Vec<String>,
    /// Also enforce `unique` when updating a document.
    #[serde(default)]
    pub unique_on_update: bool,
}

/// An immutable, checked schema declaration.
///
/// Built either with [`Schema::builder`] or from a [`SchemaDefinition`]. Construction
/// guarantees that the collection name is usable, that every required and unique field is
/// declared, and that no declared field shadows a store-assigned one (`id`, `created_at`,
/// `updated_at`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Backing collection name.
    collection:       String,
    /// Allowed fields.
    fields:           BTreeMap<String, FieldKind>,
    /// Required fields, in declaration order.
    required:         Vec<String>,
    /// Unique fields, in declaration order.
    unique:           Vec<String>,
    /// Whether updates re-run the uniqueness check.
    unique_on_update: bool,
}

impl Schema {
    /// Starts a schema declaration for `collection`.
    pub fn builder(collection: impl Into<String>) -> SchemaBuilder { SchemaBuilder::new(collection) }

    /// Parses and checks a JSON schema declaration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let definition: SchemaDefinition = serde_json::from_str(json).map_err(|e| {
            DocketError::Config {
                message: format!("invalid schema declaration: {}", e),
            }
        })?;
        Self::try_from(definition)
    }

    /// Returns the backing collection name.
    pub fn collection(&self) -> &str { &self.collection }

    /// Returns the allowed fields and their kinds.
    pub const fn fields(&self) -> &BTreeMap<String, FieldKind> { &self.fields }

    /// Returns the kind declared for `field`, if any.
    pub fn kind_of(&self, field: &str) -> Option<FieldKind> { self.fields.get(field).copied() }

    /// Returns the required fields.
    pub fn required(&self) -> &[String] { &self.required }

    /// Returns the unique fields.
    pub fn unique(&self) -> &[String] { &self.unique }

    /// Returns whether updates are checked for uniqueness.
    pub const fn unique_on_update(&self) -> bool { self.unique_on_update }

    /// Returns the serializable form of this schema.
    pub fn to_definition(&self) -> SchemaDefinition {
        SchemaDefinition {
            collection:       self.collection.clone(),
            fields:           self.fields.clone(),
            required:         self.required.clone(),
            unique:           self.unique.clone(),
            unique_on_update: self.unique_on_update,
        }
    }
}

impl TryFrom<SchemaDefinition> for Schema {
    type Error = DocketError;

    fn try_from(definition: SchemaDefinition) -> Result<Self> {
        trace!("Checking schema for collection: {}", definition.collection);
        validate_collection_name(&definition.collection)?;

        let invalid = |reason: String| {
            debug!(
                "Schema for collection '{}' rejected: {}",
                definition.collection, reason
            );
            DocketError::InvalidSchema {
                collection: definition.collection.clone(),
                reason,
            }
        };

        if let Some(reserved) = definition
            .fields
            .keys()
            .find(|field| RESERVED_FIELDS.contains(&field.as_str()))
        {
            return Err(invalid(format!(
                "field '{}' is assigned by the store and cannot be declared",
                reserved
            )));
        }

        for (list, names) in [("required", &definition.required), ("unique", &definition.unique)] {
            if let Some(undeclared) = names.iter().find(|name| !definition.fields.contains_key(*name)) {
                return Err(invalid(format!(
                    "{} field '{}' is not declared in fields",
                    list, undeclared
                )));
            }
        }

        let schema = Self {
            required: dedup(definition.required),
            unique: dedup(definition.unique),
            collection: definition.collection,
            fields: definition.fields,
            unique_on_update: definition.unique_on_update,
        };
        debug!(
            "Schema for collection '{}' accepted ({} fields)",
            schema.collection,
            schema.fields.len()
        );
        Ok(schema)
    }
}

/// Drops repeated names, keeping the first occurrence.
fn dedup(names: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen
}

/// Incremental builder for [`Schema`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    /// Declaration under construction.
    definition: SchemaDefinition,
}

impl SchemaBuilder {
    /// Starts a declaration for `collection`.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            definition: SchemaDefinition {
                collection: collection.into(),
                ..SchemaDefinition::default()
            },
        }
    }

    /// Declares a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.definition.fields.insert(name.into(), kind);
        self
    }

    /// Marks fields as required on creation.
    #[must_use]
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition
            .required
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Marks fields as unique across the collection.
    #[must_use]
    pub fn unique<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.definition
            .unique
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Enforces uniqueness on updates as well as on creation.
    #[must_use]
    pub fn unique_on_update(mut self, enabled: bool) -> Self {
        self.definition.unique_on_update = enabled;
        self
    }

    /// Checks the declaration and returns the schema.
    pub fn build(self) -> Result<Schema> { Schema::try_from(self.definition) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_builder() -> SchemaBuilder {
        Schema::builder("User")
            .field("firstName", FieldKind::Text)
            .field("email", FieldKind::Text)
            .field("posts", FieldKind::List)
    }

    #[test]
    fn test_builder_accepts_valid_schema() {
        let schema = user_builder()
            .required(["email", "firstName", "email"])
            .unique(["email"])
            .build()
            .unwrap();

        assert_eq!(schema.collection(), "User");
        assert_eq!(schema.required(), ["email", "firstName"]);
        assert_eq!(schema.unique(), ["email"]);
        assert_eq!(schema.kind_of("posts"), Some(FieldKind::List));
        assert!(!schema.unique_on_update());
    }

    #[test]
    fn test_empty_collection_name_is_rejected() {
        let err = Schema::builder("").build().unwrap_err();
        assert!(matches!(err, DocketError::InvalidCollectionName { .. }));
    }

    #[test]
    fn test_undeclared_required_field_is_rejected() {
        let err = user_builder().required(["age"]).build().unwrap_err();
        match err {
            DocketError::InvalidSchema {
                collection,
                reason,
            } => {
                assert_eq!(collection, "User");
                assert!(reason.contains("'age'"));
            },
            other => panic!("Expected InvalidSchema, got {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_unique_field_is_rejected() {
        let err = user_builder().unique(["nickname"]).build().unwrap_err();
        assert!(matches!(err, DocketError::InvalidSchema { .. }));
    }

    #[test]
    fn test_reserved_field_cannot_be_declared() {
        let err = user_builder()
            .field("created_at", FieldKind::Number)
            .build()
            .unwrap_err();
        assert!(matches!(err, DocketError::InvalidSchema { .. }));
    }

    #[test]
    fn test_from_json_str() {
        let schema = Schema::from_json_str(
            r#"{
                "collection": "User",
                "fields": {"email": "string", "posts": "array"},
                "required": ["email"],
                "unique": ["email"],
                "unique_on_update": true
            }"#,
        )
        .unwrap();

        assert_eq!(schema.kind_of("email"), Some(FieldKind::Text));
        assert!(schema.unique_on_update());
        assert_eq!(Schema::try_from(schema.to_definition()).unwrap(), schema);
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        let err = Schema::from_json_str("{\"fields\": 3}").unwrap_err();
        assert!(matches!(err, DocketError::Config { .. }));
    }
}
