//! ID generation utilities.

use ulid::Ulid;

use crate::error::{AppError, AppResult};

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

/// Validate an entity identifier supplied by a caller.
///
/// Identifiers are lowercase ULIDs; anything that does not parse is a
/// malformed argument, distinct from a well-formed id that simply does
/// not exist.
pub fn validate_id(id: &str) -> AppResult<()> {
    Ulid::from_string(id)
        .map(|_| ())
        .map_err(|_| AppError::InvalidArgument(format!("malformed identifier: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_generated_ids_validate() {
        let id_gen = IdGenerator::new();
        assert!(validate_id(&id_gen.generate()).is_ok());
    }

    #[test]
    fn test_malformed_id_rejected() {
        let result = validate_id("not-a-ulid!");
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(validate_id("").is_err());
    }
}
