/// Validation layer checks.
pub mod checks;
/// Schema declaration and builder.
pub mod definition;
/// Field kinds.
pub mod field;

pub use checks::{validate_kinds, validate_required, validate_shape, validate_unique};
pub use definition::{Schema, SchemaBuilder, SchemaDefinition};
pub use field::FieldKind;
