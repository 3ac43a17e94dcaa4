//! Identifiers for graph records
//!
//! All ids wrap a UUIDv7, which gives:
//! - Chronological sortability (creation order)
//! - 128-bit uniqueness without coordination
//! - A standard string form for export and logs

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh UUIDv7-based id
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Build an id from a raw u128 value (storage and tests)
            pub fn from_value(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Raw u128 value
            pub fn value(&self) -> u128 {
                self.0.as_u128()
            }

            /// Millisecond timestamp embedded in the UUIDv7
            pub fn timestamp(&self) -> u64 {
                (self.0.as_u128() >> 80) as u64
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| DomainError::InvalidId(format!("{s}: {e}")))
            }
        }
    };
}

define_id!(
    /// Identifier of a [`crate::Node`]
    NodeId
);
define_id!(
    /// Identifier of an [`crate::Edge`]
    EdgeId
);
define_id!(
    /// Identifier of an [`crate::InferenceRecord`]
    InferenceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ordering() {
        let a = NodeId::from_value(1000);
        let b = NodeId::from_value(2000);
        assert!(a < b);
    }

    #[test]
    fn test_id_chronological() {
        let id1 = EdgeId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = EdgeId::new();

        assert!(id1 < id2);
        assert!(id1.timestamp() <= id2.timestamp());
    }

    #[test]
    fn test_display_and_parse() {
        let id = NodeId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);

        let parsed: NodeId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_invalid_string() {
        assert!("not-a-uuid".parse::<InferenceId>().is_err());
        assert!("".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_serializes_as_uuid_string() {
        let id = NodeId::from_value(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
