//! Error types for the clause database.

use crate::node::Address;
use serde::{Deserialize, Serialize};

/// Clause database error type.
///
/// None of these are retried: every operation is a deterministic
/// transformation of its input, so failures go straight to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ClauseDbError {
    /// Address was never handed out by this database
    #[error("Node address {address} out of range (table holds {len} nodes)")]
    OutOfRange { address: Address, len: usize },

    /// Input is not one of the recognized formula/clause shapes
    #[error("Malformed structure: {message}")]
    MalformedStructure { message: String },

    /// Decompilation reached a placeholder or a node it cannot rebuild
    #[error("Undefined reference at node {address}: {reason}")]
    UndefinedReference { address: Address, reason: String },
}

impl ClauseDbError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ClauseDbError::MalformedStructure {
            message: message.into(),
        }
    }

    pub(crate) fn undefined(address: Address, reason: impl Into<String>) -> Self {
        ClauseDbError::UndefinedReference {
            address,
            reason: reason.into(),
        }
    }
}

/// Result type for clause database operations
pub type ClauseDbResult<T> = Result<T, ClauseDbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ClauseDbError::OutOfRange {
            address: Address::new(7),
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "Node address 7 out of range (table holds 3 nodes)"
        );

        let err = ClauseDbError::undefined(Address::new(2), "placeholder");
        assert_eq!(err.to_string(), "Undefined reference at node 2: placeholder");

        let err = ClauseDbError::malformed("clause in body");
        assert_eq!(err.to_string(), "Malformed structure: clause in body");
    }

    #[test]
    fn test_error_json_roundtrip() {
        let err = ClauseDbError::undefined(Address::new(4), "not node");
        let json = serde_json::to_string(&err).unwrap();
        let back: ClauseDbError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
