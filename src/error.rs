//! Error surface for every fallible ledger operation.
//!
//! Each variant corresponds to one distinguishable failure kind.  Mutating
//! operations are all-or-nothing: when any of these errors is returned the
//! election state is exactly what it was before the call.

use crate::phase::ElectionPhase;
use thiserror::Error;

/// Errors raised by registries, the vote ledger and the lifecycle machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElectionError {
    /// The operation is not legal in the current election phase.
    #[error("operation not permitted while election is {phase}")]
    InvalidState {
        /// Phase the election was in when the operation was attempted.
        phase: ElectionPhase,
    },
    /// A national id or participant address is already registered.
    #[error("identity {identity} is already registered")]
    DuplicateIdentity {
        /// Human-readable form of the conflicting identity.
        identity: String,
    },
    /// A referenced candidate or voter does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of record that was looked up (`"candidate"` or `"voter"`).
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },
    /// The voter has already cast a vote; votes are permanent.
    #[error("voter {0} has already voted")]
    AlreadyVoted(crate::identity::NationalId),
    /// A required field was empty or malformed.
    #[error("invalid {field}: {reason}")]
    ValidationError {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// A lifecycle precondition was not met.
    #[error("{0}")]
    PreconditionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::NationalId;

    #[test]
    fn display_names_the_failure_kind() {
        let err = ElectionError::InvalidState {
            phase: ElectionPhase::Ended,
        };
        assert_eq!(err.to_string(), "operation not permitted while election is ended");

        let err = ElectionError::AlreadyVoted(NationalId::new(42101).unwrap());
        assert_eq!(err.to_string(), "voter 42101 has already voted");

        let err = ElectionError::NotFound {
            entity: "candidate",
            id: "9".to_string(),
        };
        assert_eq!(err.to_string(), "candidate 9 not found");
    }
}
