//! The validation layer.
//!
//! Checks run cheapest first: shape and required fields are purely local, kinds are
//! local, and uniqueness needs the current contents of the collection. A payload that
//! fails a local check never reaches the uniqueness scan.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::{
    definition::Schema,
    field::{describe_value, FieldKind},
};
use crate::{DocketError, Document, Result};

/// Fails with [`DocketError::UnknownField`] listing, in payload order, every key that is not
/// in `allowed`.
pub fn validate_shape(collection: &str, document: &Map<String, Value>, allowed: &BTreeMap<String, FieldKind>) -> Result<()> {
    let unknown: Vec<String> = document
        .keys()
        .filter(|field| !allowed.contains_key(*field))
        .cloned()
        .collect();

    if unknown.is_empty() {
        return Ok(());
    }
    debug!(
        "Undefined fields for collection '{}': {:?}",
        collection, unknown
    );
    Err(DocketError::UnknownField {
        collection: collection.to_owned(),
        fields:     unknown,
    })
}

/// Fails with [`DocketError::MissingField`] listing every required field that is absent,
/// `null`, or an empty string.
pub fn validate_required(collection: &str, document: &Map<String, Value>, required: &[String]) -> Result<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|field| is_blank(document.get(field.as_str())))
        .cloned()
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    debug!(
        "Missing required fields for collection '{}': {:?}",
        collection, missing
    );
    Err(DocketError::MissingField {
        collection: collection.to_owned(),
        fields:     missing,
    })
}

/// Fails with [`DocketError::KindMismatch`] on the first declared field whose present,
/// non-null value has the wrong kind.
pub fn validate_kinds(collection: &str, document: &Map<String, Value>, fields: &BTreeMap<String, FieldKind>) -> Result<()> {
    for (field, value) in document {
        if value.is_null() {
            continue;
        }
        if let Some(&expected) = fields.get(field) &&
            !expected.matches(value)
        {
            debug!(
                "Field '{}' of collection '{}' expects {}, found {}",
                field,
                collection,
                expected,
                describe_value(value)
            );
            return Err(DocketError::KindMismatch {
                collection: collection.to_owned(),
                field: field.clone(),
                expected,
                found: describe_value(value).to_owned(),
            });
        }
    }
    Ok(())
}

/// Fails with [`DocketError::DuplicateValue`] when the candidate shares a unique field's
/// value with any existing document.
///
/// Unique fields are checked in declaration order and, for each field, documents in stored
/// order; the first collision is reported. Absent or `null` candidate values never collide.
pub fn validate_unique<'a, I>(collection: &str, candidate: &Map<String, Value>, existing: I, unique: &[String]) -> Result<()>
where
    I: IntoIterator<Item = &'a Document>,
    I::IntoIter: Clone,
{
    let existing = existing.into_iter();
    for field in unique {
        let Some(value) = candidate.get(field).filter(|value| !value.is_null())
        else {
            continue;
        };
        if let Some(other) = existing.clone().find(|doc| doc.field_equals(field, value)) {
            debug!(
                "Unique field '{}' of collection '{}' collides with document {}",
                field,
                collection,
                other.id()
            );
            return Err(DocketError::DuplicateValue {
                collection: collection.to_owned(),
                field:      field.clone(),
                value:      value.clone(),
            });
        }
    }
    Ok(())
}

/// True for values that do not satisfy a required field.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(&Value::Null) => true,
        Some(&Value::String(ref text)) => text.is_empty(),
        Some(_) => false,
    }
}

impl Schema {
    /// Runs the local checks for a new document: shape, required fields, then kinds.
    pub fn check_new(&self, payload: &Map<String, Value>) -> Result<()> {
        trace!("Validating new document for collection: {}", self.collection());
        validate_shape(self.collection(), payload, self.fields())?;
        validate_required(self.collection(), payload, self.required())?;
        validate_kinds(self.collection(), payload, self.fields())
    }

    /// Runs the local checks for a partial update: shape, then kinds.
    pub fn check_patch(&self, patch: &Map<String, Value>) -> Result<()> {
        trace!("Validating patch for collection: {}", self.collection());
        validate_shape(self.collection(), patch, self.fields())?;
        validate_kinds(self.collection(), patch, self.fields())
    }

    /// Checks the unique fields of `candidate` against `existing`.
    pub fn check_unique(&self, candidate: &Map<String, Value>, existing: &[Document]) -> Result<()> {
        validate_unique(self.collection(), candidate, existing, self.unique())
    }
}
