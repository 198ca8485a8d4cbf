//! Committed-mutation notifications for external reporting collaborators.
//!
//! Events are a side channel, not required for correctness: each successful
//! mutation emits exactly one event, after commit, in commit order.  A failed
//! operation emits nothing.  Collaborators subscribe through the
//! [`ElectionObserver`] trait instead of coupling to ledger internals.

use crate::candidate::CandidateId;
use crate::identity::{NationalId, VoterAddress};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

/// Notification emitted once per committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionEvent {
    /// A candidate was registered.
    CandidateAdded {
        /// Assigned sequential id.
        id: CandidateId,
        /// Candidate name.
        name: String,
    },
    /// A voter was registered.
    VoterRegistered {
        /// Registering participant address.
        address: VoterAddress,
        /// Voter name.
        name: String,
    },
    /// A vote was committed.
    VoteCast {
        /// National id of the voter.
        voter: NationalId,
        /// Candidate the vote went to.
        candidate: CandidateId,
    },
    /// The election moved to the started phase.
    ElectionStarted {
        /// Candidate count at the moment voting opened.
        total_candidates: u64,
    },
    /// The election moved to the ended phase.
    ElectionEnded {
        /// Name of the winning candidate (lowest id on an exact tie).
        winner_name: String,
        /// Total votes cast across all candidates.
        total_votes: u64,
    },
    /// The election was reset to its initial state.
    ElectionReset,
}

/// Subscriber interface for election events.
pub trait ElectionObserver: Send + Sync {
    /// Called once per committed mutation, in commit order.
    fn on_event(&mut self, event: &ElectionEvent);
}

/// Observer that records every event it sees; shared handles read them back.
///
/// Cloning an `EventLog` clones the handle, not the log, so a test or
/// reporting collaborator can keep one half while the election owns the other.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<ElectionEvent>>>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every event recorded so far, in commit order.
    pub fn events(&self) -> Vec<ElectionEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Whether no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ElectionObserver for EventLog {
    fn on_event(&mut self, event: &ElectionEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event.clone());
    }
}
