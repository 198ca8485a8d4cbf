//! The authoritative election aggregate.
//!
//! [`Election`] is one explicitly owned state object: registries, vote
//! ledger, lifecycle phase and counters live behind it, and every mutating
//! operation passes through the phase gate before touching any of them.
//! There is no hidden global; tests and callers may hold any number of
//! independent elections.
//!
//! Mutations take `&mut self`, which is exactly the single-writer-at-a-time
//! discipline the ledger requires: a mutation either commits all of its
//! effects or returns an error having changed nothing.  Reads take `&self`
//! and never mutate.  For shared multi-threaded use see [`SharedElection`].

use crate::candidate::{Candidate, CandidateId, CandidateRegistry};
use crate::error::ElectionError;
use crate::events::{ElectionEvent, ElectionObserver};
use crate::identity::{NationalId, VoterAddress};
use crate::phase::ElectionPhase;
use crate::tally::{self, PartyBreakdown, WinnerSummary};
use crate::turnout::{self, AreaTally};
use crate::voter::{Voter, VoterRegistry};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Snapshot of the election's aggregate counters and lifecycle timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionStats {
    /// Number of registered candidates.
    pub total_candidates: u64,
    /// Number of registered voters.
    pub total_voters: u64,
    /// Number of votes cast.
    pub total_votes: u64,
    /// Unix seconds when the election started, once started.
    pub start_time: Option<u64>,
    /// Unix seconds when the election ended, once ended.
    pub end_time: Option<u64>,
}

/// The election ledger: registries, vote ledger, phase machine and event
/// dispatch behind a single owned value.
#[derive(Default)]
pub struct Election {
    phase: ElectionPhase,
    candidates: CandidateRegistry,
    voters: VoterRegistry,
    total_votes: u64,
    start_time: Option<u64>,
    end_time: Option<u64>,
    observers: Vec<Box<dyn ElectionObserver>>,
}

impl Election {
    /// Creates a fresh election in the `NotStarted` phase.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        phase: ElectionPhase,
        candidates: CandidateRegistry,
        voters: VoterRegistry,
        total_votes: u64,
        start_time: Option<u64>,
        end_time: Option<u64>,
    ) -> Self {
        Self {
            phase,
            candidates,
            voters,
            total_votes,
            start_time,
            end_time,
            observers: Vec::new(),
        }
    }

    /// Subscribes an observer to committed-mutation events.  Observers
    /// survive a reset; only ledger state is cleared.
    pub fn subscribe<O: ElectionObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    // -----------------------------------------------------------------
    // Lifecycle transitions
    // -----------------------------------------------------------------

    /// Opens the voting window.  Legal only from `NotStarted` and only with
    /// at least one registered candidate.
    pub fn start_election(&mut self) -> Result<(), ElectionError> {
        if self.phase != ElectionPhase::NotStarted {
            return Err(ElectionError::InvalidState { phase: self.phase });
        }
        if self.candidates.is_empty() {
            return Err(ElectionError::PreconditionFailed(
                "cannot start an election with no candidates".to_string(),
            ));
        }
        self.phase = ElectionPhase::Started;
        self.start_time = Some(now_unix());
        let total_candidates = self.candidates.len() as u64;
        tracing::info!(total_candidates, "election started");
        self.emit(ElectionEvent::ElectionStarted { total_candidates });
        Ok(())
    }

    /// Closes the voting window.  Legal only from `Started`.
    pub fn end_election(&mut self) -> Result<(), ElectionError> {
        if self.phase != ElectionPhase::Started {
            return Err(ElectionError::InvalidState { phase: self.phase });
        }
        self.phase = ElectionPhase::Ended;
        self.end_time = Some(now_unix());
        let winner_name = tally::winner(self.candidates.as_slice())
            .map(|w| w.name)
            .unwrap_or_default();
        let total_votes = self.total_votes;
        tracing::info!(winner = %winner_name, total_votes, "election ended");
        self.emit(ElectionEvent::ElectionEnded {
            winner_name,
            total_votes,
        });
        Ok(())
    }

    /// Re-initialises the entire election: clears both registries, the vote
    /// ledger and all timestamps, returning to `NotStarted` with ids
    /// restarting from 1.  Legal from `Ended`; a no-op from `NotStarted`.
    pub fn reset_election(&mut self) -> Result<(), ElectionError> {
        match self.phase {
            ElectionPhase::NotStarted => Ok(()),
            ElectionPhase::Started => Err(ElectionError::InvalidState { phase: self.phase }),
            ElectionPhase::Ended => {
                self.candidates.clear();
                self.voters.clear();
                self.total_votes = 0;
                self.start_time = None;
                self.end_time = None;
                self.phase = ElectionPhase::NotStarted;
                tracing::info!("election reset");
                self.emit(ElectionEvent::ElectionReset);
                Ok(())
            }
        }
    }

    // -----------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------

    /// Registers a candidate during the registration window, assigning the
    /// next sequential id starting at 1.
    pub fn add_candidate(
        &mut self,
        name: &str,
        party: &str,
        national_id: NationalId,
        city: &str,
    ) -> Result<CandidateId, ElectionError> {
        if !self.phase.accepts_registration() {
            return Err(ElectionError::InvalidState { phase: self.phase });
        }
        let id = self.candidates.add(name, party, national_id, city)?;
        let name = self.candidates.get(id)?.name.clone();
        tracing::debug!(%id, %name, "candidate added");
        self.emit(ElectionEvent::CandidateAdded { id, name });
        Ok(id)
    }

    /// Registers a voter during the registration window.  Both the national
    /// id and the address must be previously unseen.
    pub fn register_voter(
        &mut self,
        address: VoterAddress,
        name: &str,
        national_id: NationalId,
        city: &str,
    ) -> Result<(), ElectionError> {
        if !self.phase.accepts_registration() {
            return Err(ElectionError::InvalidState { phase: self.phase });
        }
        let event_address = address.clone();
        self.voters.register(address, name, national_id, city)?;
        let name = self.voters.get(national_id)?.name.clone();
        tracing::debug!(address = %event_address, %name, "voter registered");
        self.emit(ElectionEvent::VoterRegistered {
            address: event_address,
            name,
        });
        Ok(())
    }

    // -----------------------------------------------------------------
    // Vote ledger
    // -----------------------------------------------------------------

    /// Records the voter's single vote for a candidate.
    ///
    /// All checks run before any mutation, so the voter flag, the
    /// candidate's count and the total advance together or not at all; the
    /// ledger can never hold a voter marked as voted without the matching
    /// count increment.  A committed vote is permanent.
    pub fn cast_vote(
        &mut self,
        candidate_id: CandidateId,
        voter_national_id: NationalId,
    ) -> Result<(), ElectionError> {
        if !self.phase.accepts_votes() {
            return Err(ElectionError::InvalidState { phase: self.phase });
        }
        let voter = self.voters.get(voter_national_id)?;
        if voter.has_voted {
            return Err(ElectionError::AlreadyVoted(voter_national_id));
        }
        self.candidates.get(candidate_id)?;

        let voter = self.voters.get_mut(voter_national_id)?;
        voter.has_voted = true;
        voter.voted_for = Some(candidate_id);
        self.candidates.get_mut(candidate_id)?.vote_count += 1;
        self.total_votes += 1;
        tracing::debug!(voter = %voter_national_id, candidate = %candidate_id, "vote cast");
        self.emit(ElectionEvent::VoteCast {
            voter: voter_national_id,
            candidate: candidate_id,
        });
        Ok(())
    }

    /// Returns the vote count recorded for a candidate.
    pub fn votes_for(&self, candidate_id: CandidateId) -> Result<u64, ElectionError> {
        Ok(self.candidates.get(candidate_id)?.vote_count)
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// Current lifecycle phase.
    pub fn phase(&self) -> ElectionPhase {
        self.phase
    }

    /// Aggregate counters and lifecycle timestamps.
    pub fn stats(&self) -> ElectionStats {
        ElectionStats {
            total_candidates: self.candidates.len() as u64,
            total_voters: self.voters.len() as u64,
            total_votes: self.total_votes,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Looks up a candidate by id.
    pub fn candidate(&self, id: CandidateId) -> Result<&Candidate, ElectionError> {
        self.candidates.get(id)
    }

    /// All candidates in ascending id order.
    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.as_slice()
    }

    /// Number of registered candidates.
    pub fn candidate_count(&self) -> u64 {
        self.candidates.len() as u64
    }

    /// Looks up a voter by national id.
    pub fn voter(&self, national_id: NationalId) -> Result<&Voter, ElectionError> {
        self.voters.get(national_id)
    }

    /// Looks up a voter by participant address.
    pub fn voter_by_address(&self, address: &VoterAddress) -> Result<&Voter, ElectionError> {
        self.voters.get_by_address(address)
    }

    /// Iterator over registered voters in ascending national id order.
    pub fn voters(&self) -> impl Iterator<Item = &Voter> {
        self.voters.iter()
    }

    // -----------------------------------------------------------------
    // Derived results
    // -----------------------------------------------------------------

    /// The winning candidate.  Defined only once the election has ended;
    /// on an exact vote-count tie the lowest-id candidate wins.
    pub fn winner(&self) -> Result<WinnerSummary, ElectionError> {
        if self.phase != ElectionPhase::Ended {
            return Err(ElectionError::InvalidState { phase: self.phase });
        }
        tally::winner(self.candidates.as_slice()).ok_or_else(|| {
            ElectionError::PreconditionFailed("no candidates registered".to_string())
        })
    }

    /// Candidates whose city matches `area` (case-insensitive substring),
    /// sorted by descending vote count.
    pub fn results_by_area(&self, area: &str) -> Vec<Candidate> {
        tally::results_by_area(self.candidates.as_slice(), area)
    }

    /// Per-party totals and vote shares, ordered by party name.
    pub fn party_breakdown(&self) -> Vec<PartyBreakdown> {
        tally::party_breakdown(self.candidates.as_slice())
    }

    /// Votes cast relative to registered voters, in percent.
    pub fn overall_turnout(&self) -> f64 {
        turnout::overall_turnout(self.total_votes, self.voters.len() as u64)
    }

    /// One area's combined candidate votes relative to registered voters.
    pub fn area_turnout(&self, area: &str) -> f64 {
        turnout::area_turnout(self.candidates.as_slice(), area, self.voters.len() as u64)
    }

    /// At most `n` areas ranked by combined votes descending.
    pub fn top_areas(&self, n: usize) -> Vec<AreaTally> {
        turnout::top_areas(self.candidates.as_slice(), self.voters.len() as u64, n)
    }

    fn emit(&mut self, event: ElectionEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

impl fmt::Debug for Election {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Election")
            .field("phase", &self.phase)
            .field("candidates", &self.candidates.len())
            .field("voters", &self.voters.len())
            .field("total_votes", &self.total_votes)
            .finish_non_exhaustive()
    }
}

/// Thread-safe handle sharing one election across collaborators.
///
/// Each closure runs under the lock, so a mutation is a single serializable
/// transaction: two concurrent [`Election::cast_vote`] calls for the same
/// voter cannot both succeed.  Readers share the lock with each other.
///
/// A panicked closure poisons the lock; the handle recovers instead of
/// propagating the panic to later callers.  Every mutation checks before it
/// commits, so the recovered state holds only fully committed effects.
#[derive(Clone)]
pub struct SharedElection {
    inner: Arc<RwLock<Election>>,
}

impl SharedElection {
    /// Wraps an election for shared use.
    pub fn new(election: Election) -> Self {
        Self {
            inner: Arc::new(RwLock::new(election)),
        }
    }

    /// Runs a read-only closure against the committed state.
    pub fn read<R>(&self, f: impl FnOnce(&Election) -> R) -> R {
        f(&self
            .inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    /// Runs a mutating closure as one atomic transaction.
    pub fn write<R>(&self, f: impl FnOnce(&mut Election) -> R) -> R {
        f(&mut self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()))
    }
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
