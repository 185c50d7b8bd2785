//! Identifier types shared by users, drivers and predictions.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A string-backed identifier.
///
/// Used both for opaque ids (users, drivers) and for deterministic ids
/// derived from a content hash (predictions).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate an EntityId from input fields.
    /// Uses SHA256 and takes the first 16 characters for brevity.
    pub fn generate(fields: &[&str]) -> Self {
        let mut hasher = Sha256::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                hasher.update(b"|");
            }
            hasher.update(field.as_bytes());
        }
        let hash = hex::encode(hasher.finalize());
        Self(hash[..16].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for ids that carry no characters once trimmed.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Type alias for league member ids
pub type UserId = EntityId;

/// Type alias for candidate (driver) ids, e.g. "norris"
pub type DriverId = EntityId;

/// Type alias for prediction ids
pub type PredictionId = EntityId;

/// Events are numbered by the calendar.
pub type EventId = u32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation_deterministic() {
        let id1 = EntityId::generate(&["user-1", "3", "RaceMain"]);
        let id2 = EntityId::generate(&["user-1", "3", "RaceMain"]);
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_entity_id_different_inputs() {
        let id1 = EntityId::generate(&["user-1", "3", "RaceMain"]);
        let id2 = EntityId::generate(&["user-1", "3", "QualifyingMain"]);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_entity_id_field_separator_matters() {
        let id1 = EntityId::generate(&["ab", "c"]);
        let id2 = EntityId::generate(&["a", "bc"]);
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_entity_id_hex_format() {
        let id = EntityId::generate(&["test"]);
        assert_eq!(id.as_str().len(), 16);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_entity_id_serializes_as_plain_string() {
        let id = EntityId::from("norris");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"norris\"");

        let back: EntityId = serde_json::from_str("\"piastri\"").unwrap();
        assert_eq!(back.as_str(), "piastri");
    }

    #[test]
    fn test_entity_id_blank() {
        assert!(EntityId::from("").is_blank());
        assert!(EntityId::from("   ").is_blank());
        assert!(!EntityId::from("leclerc").is_blank());
    }

    #[test]
    fn test_entity_id_display_and_debug() {
        let id = EntityId::new("russell".to_string());
        assert_eq!(format!("{}", id), "russell");
        assert!(format!("{:?}", id).contains("russell"));
    }
}
