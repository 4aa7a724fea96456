use rand::Rng as _;

use crate::ID_LENGTH;

/// Digits an identifier is drawn from.
const DIGITS: &[u8] = b"0123456789";

/// Generates a fresh document identifier.
///
/// The identifier is [`ID_LENGTH`] decimal digits, each drawn independently. Nothing here
/// checks the result against identifiers already stored in a collection, so two documents
/// can in principle receive the same id (one in 10^11 per pair).
pub fn generate_id() -> String {
    let mut rng = rand::rng();
    (0 .. ID_LENGTH)
        .map(|_| char::from(DIGITS[rng.random_range(0 .. DIGITS.len())]))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_id_varies() {
        let ids: HashSet<String> = (0 .. 100).map(|_| generate_id()).collect();
        assert!(ids.len() > 90);
    }
}
