use tracing::{debug, trace};

use crate::{DocketError, Result};

/// Windows reserved names that cannot be used as filenames.
/// A collection named after one of these could not be persisted on Windows hosts.
pub const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8", "COM9", "LPT1", "LPT2",
    "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Checks if a name contains only characters that are safe in a container file name.
///
/// Valid characters are: alphanumeric, underscore (_), hyphen (-), and dot (.).
pub fn is_valid_name_chars(name: &str) -> bool {
    name.chars()
        .all(|ch| matches!(ch, 'a' ..= 'z' | 'A' ..= 'Z' | '0' ..= '9' | '_' | '-' | '.'))
}

/// Checks if a name is a Windows reserved name (case-insensitive), including the base name
/// before any extension.
pub fn is_reserved_name(name: &str) -> bool {
    let name_upper = name.to_uppercase();
    let base_name = name_upper.split('.').next().unwrap_or(&name_upper);
    WINDOWS_RESERVED_NAMES.contains(&name_upper.as_str()) || WINDOWS_RESERVED_NAMES.contains(&base_name)
}

/// Validates a collection name before it is turned into a container path.
///
/// - Must not be empty
/// - Must not start with a dot (staging files and hidden entries live there)
/// - Must not end with a dot or space
/// - Must only contain alphanumeric characters, underscores, hyphens and dots
/// - Must not be a Windows reserved name (CON, PRN, AUX, NUL, COM1-9, LPT1-9)
///
/// # Examples
/// ```
/// use docket::validation::validate_collection_name;
///
/// assert!(validate_collection_name("User").is_ok());
/// assert!(validate_collection_name("audit_logs-2024").is_ok());
/// assert!(validate_collection_name("").is_err());
/// assert!(validate_collection_name("../escape").is_err());
/// ```
pub fn validate_collection_name(name: &str) -> Result<()> {
    trace!("Validating collection name: {}", name);
    let invalid = || {
        DocketError::InvalidCollectionName {
            name: name.to_owned(),
        }
    };

    if name.is_empty() {
        debug!("Collection name is empty");
        return Err(invalid());
    }

    if name.starts_with('.') {
        debug!("Collection name starts with a dot: {}", name);
        return Err(invalid());
    }

    if name.ends_with('.') || name.ends_with(' ') {
        debug!("Collection name ends with dot or space: {}", name);
        return Err(invalid());
    }

    if !is_valid_name_chars(name) {
        debug!("Collection name contains invalid characters: {}", name);
        return Err(invalid());
    }

    if is_reserved_name(name) {
        debug!("Collection name is a reserved name: {}", name);
        return Err(invalid());
    }

    trace!("Collection name '{}' is valid", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name_chars() {
        assert!(is_valid_name_chars("valid_name-123.v2"));
        assert!(!is_valid_name_chars("invalid/name"));
        assert!(!is_valid_name_chars("invalid\\name"));
        assert!(!is_valid_name_chars("invalid<name>"));
        assert!(!is_valid_name_chars("invalid:name"));
        assert!(!is_valid_name_chars("invalid name"));
        assert!(!is_valid_name_chars("invalid\u{0001}name"));
        assert!(!is_valid_name_chars("naïve"));
    }

    #[test]
    fn test_is_reserved_name() {
        assert!(is_reserved_name("CON"));
        assert!(is_reserved_name("con"));
        assert!(is_reserved_name("nul.json"));
        assert!(!is_reserved_name("console"));
    }

    #[test]
    fn test_validate_collection_name() {
        for name in ["User", "users", "user_data", "data-2024", "v1.0"] {
            assert!(validate_collection_name(name).is_ok(), "{name} should be valid");
        }

        for name in ["", ".hidden", "trailing.", "trailing ", "path/traversal", "LPT1", "a*b"] {
            assert!(
                matches!(
                    validate_collection_name(name),
                    Err(DocketError::InvalidCollectionName { .. })
                ),
                "{name:?} should be invalid"
            );
        }
    }
}
