//! Election lifecycle phases.
//!
//! The phase advances monotonically NotStarted → Started → Ended and is never
//! revisited except through an explicit reset of the whole election.  Every
//! mutating operation consults the phase before touching any registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Global lifecycle phase of an election.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionPhase {
    /// Registration is open, no votes may be cast yet.
    #[default]
    NotStarted,
    /// Voting window: registration stays open and votes are accepted.
    Started,
    /// Terminal phase: registries and ledger are frozen, results are final.
    Ended,
}

impl ElectionPhase {
    /// Whether candidate and voter registration is currently legal.
    pub fn accepts_registration(self) -> bool {
        matches!(self, Self::NotStarted | Self::Started)
    }

    /// Whether votes may be cast in this phase.
    pub fn accepts_votes(self) -> bool {
        matches!(self, Self::Started)
    }
}

impl fmt::Display for ElectionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::Started => "started",
            Self::Ended => "ended",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_window_spans_not_started_and_started() {
        assert!(ElectionPhase::NotStarted.accepts_registration());
        assert!(ElectionPhase::Started.accepts_registration());
        assert!(!ElectionPhase::Ended.accepts_registration());
    }

    #[test]
    fn votes_only_while_started() {
        assert!(!ElectionPhase::NotStarted.accepts_votes());
        assert!(ElectionPhase::Started.accepts_votes());
        assert!(!ElectionPhase::Ended.accepts_votes());
    }

    #[test]
    fn default_phase_is_not_started() {
        assert_eq!(ElectionPhase::default(), ElectionPhase::NotStarted);
    }
}
