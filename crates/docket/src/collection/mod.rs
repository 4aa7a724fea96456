/// Core collection implementation.
pub mod coll;
/// Collection operations.
pub mod operations;

pub use coll::*;
