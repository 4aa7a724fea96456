//! Store configuration.

use serde::{Deserialize, Serialize};

/// How a collection container is rewritten after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Write the new sequence to a staging file, flush it, then rename it over the container.
    /// A crash mid-write leaves the previous container intact.
    #[default]
    Atomic,
    /// Overwrite the container in place. A failed write can leave it truncated.
    InPlace,
}

impl std::str::FromStr for WriteMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "in-place" | "in_place" | "inplace" => Ok(Self::InPlace),
            _ => Err(format!("Invalid write mode: {}", s)),
        }
    }
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Atomic => write!(f, "atomic"),
            Self::InPlace => write!(f, "in-place"),
        }
    }
}

/// Configuration shared by every collection opened through a [`crate::Store`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// How containers are rewritten.
    pub write_mode: WriteMode,
    /// Pretty-print containers with two-space indentation.
    pub pretty:     bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            write_mode: WriteMode::Atomic,
            pretty:     true,
        }
    }
}
