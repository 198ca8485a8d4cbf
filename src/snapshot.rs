//! JSON snapshots of a whole election.
//!
//! A snapshot captures committed state only; observers are not part of it.
//! Restoring re-derives every registry index and verifies the ledger
//! invariants, so a tampered or hand-edited file is rejected instead of
//! producing an inconsistent election.

use crate::candidate::{Candidate, CandidateRegistry};
use crate::election::Election;
use crate::phase::ElectionPhase;
use crate::voter::{Voter, VoterRegistry};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

const SNAPSHOT_SCHEMA: &str = "ballot_house.election.v1";

/// Serializable image of an election's committed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionSnapshot {
    /// Snapshot schema identifier (`ballot_house.election.v1`).
    pub schema: String,
    /// Lifecycle phase at capture time.
    pub phase: ElectionPhase,
    /// Candidate records in ascending id order.
    pub candidates: Vec<Candidate>,
    /// Voter records in ascending national id order.
    pub voters: Vec<Voter>,
    /// Total votes cast.
    pub total_votes: u64,
    /// Unix seconds when the election started, if it has.
    pub start_time: Option<u64>,
    /// Unix seconds when the election ended, if it has.
    pub end_time: Option<u64>,
}

/// Errors raised while capturing, persisting or restoring snapshots.
#[derive(Debug, Clone, Error)]
pub enum SnapshotError {
    /// Underlying filesystem failure.
    #[error("io error: {0}")]
    Io(String),
    /// The file could not be parsed as snapshot JSON.
    #[error("parse error: {0}")]
    Parse(String),
    /// The schema tag did not match the expected identifier.
    #[error("invalid schema: expected {SNAPSHOT_SCHEMA}, found {0}")]
    InvalidSchema(String),
    /// The stored state violates a ledger invariant.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

impl ElectionSnapshot {
    /// Captures the committed state of an election.
    pub fn capture(election: &Election) -> Self {
        let stats = election.stats();
        Self {
            schema: SNAPSHOT_SCHEMA.to_string(),
            phase: election.phase(),
            candidates: election.candidates().to_vec(),
            voters: election.voters().cloned().collect(),
            total_votes: stats.total_votes,
            start_time: stats.start_time,
            end_time: stats.end_time,
        }
    }

    /// Rebuilds an election from the snapshot, verifying schema, registry
    /// uniqueness and vote-count consistency.
    pub fn restore(self) -> Result<Election, SnapshotError> {
        if self.schema != SNAPSHOT_SCHEMA {
            return Err(SnapshotError::InvalidSchema(self.schema));
        }
        let counted: u64 = self.candidates.iter().map(|c| c.vote_count).sum();
        if counted != self.total_votes {
            return Err(SnapshotError::Corrupt(format!(
                "candidate counts sum to {} but total_votes is {}",
                counted, self.total_votes
            )));
        }
        let voted = self.voters.iter().filter(|v| v.has_voted).count() as u64;
        if voted != self.total_votes {
            return Err(SnapshotError::Corrupt(format!(
                "{} voters marked as voted but total_votes is {}",
                voted, self.total_votes
            )));
        }
        // Aggregate totals can balance while individual counts are shuffled;
        // re-tally each candidate from the voters' voted_for fields.
        let mut tallied = vec![0u64; self.candidates.len()];
        for voter in &self.voters {
            if let Some(candidate_id) = voter.voted_for {
                let slot = candidate_id
                    .value()
                    .checked_sub(1)
                    .and_then(|idx| tallied.get_mut(idx as usize));
                match slot {
                    Some(count) => *count += 1,
                    None => {
                        return Err(SnapshotError::Corrupt(format!(
                            "voter {} voted for unknown candidate {}",
                            voter.national_id, candidate_id
                        )));
                    }
                }
            }
        }
        for candidate in &self.candidates {
            let counted = candidate
                .id
                .value()
                .checked_sub(1)
                .and_then(|idx| tallied.get(idx as usize).copied())
                .unwrap_or(0);
            if candidate.vote_count != counted {
                return Err(SnapshotError::Corrupt(format!(
                    "candidate {} records {} votes but {} voters voted for it",
                    candidate.id, candidate.vote_count, counted
                )));
            }
        }
        if self.start_time.is_none() && self.phase != ElectionPhase::NotStarted {
            return Err(SnapshotError::Corrupt(
                "phase has advanced but start_time is unset".to_string(),
            ));
        }
        if self.end_time.is_some() != (self.phase == ElectionPhase::Ended) {
            return Err(SnapshotError::Corrupt(
                "end_time does not match phase".to_string(),
            ));
        }
        let candidates =
            CandidateRegistry::from_records(self.candidates).map_err(SnapshotError::Corrupt)?;
        let voters = VoterRegistry::from_records(self.voters).map_err(SnapshotError::Corrupt)?;
        Ok(Election::from_parts(
            self.phase,
            candidates,
            voters,
            self.total_votes,
            self.start_time,
            self.end_time,
        ))
    }

    /// Serialises the snapshot to pretty JSON text.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialises a snapshot from JSON text.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Persists the snapshot to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::Io(e.to_string()))?;
        }
        let data = self
            .to_json_string()
            .map_err(|e| SnapshotError::Parse(e.to_string()))?;
        fs::write(path, data).map_err(|e| SnapshotError::Io(e.to_string()))
    }

    /// Loads a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let contents = fs::read_to_string(path).map_err(|e| SnapshotError::Io(e.to_string()))?;
        Self::from_json_str(&contents).map_err(|e| SnapshotError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidate::CandidateId;
    use crate::identity::{NationalId, VoterAddress};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn nid(raw: u64) -> NationalId {
        NationalId::new(raw).unwrap()
    }

    fn voted_election() -> Election {
        let mut election = Election::new();
        election
            .add_candidate("Ayesha Khan", "Unity", nid(1001), "Lahore")
            .unwrap();
        election
            .add_candidate("Bilal Shah", "Progress", nid(1002), "Karachi")
            .unwrap();
        election
            .register_voter(
                VoterAddress::new("0xa1").unwrap(),
                "Voter One",
                nid(35201),
                "Lahore",
            )
            .unwrap();
        election.start_election().unwrap();
        election.cast_vote(CandidateId::new(2), nid(35201)).unwrap();
        election
    }

    #[test]
    fn capture_restore_round_trip_preserves_state() {
        let election = voted_election();
        let snapshot = ElectionSnapshot::capture(&election);
        let restored = snapshot.restore().unwrap();

        assert_eq!(restored.phase(), election.phase());
        assert_eq!(restored.stats(), election.stats());
        assert_eq!(restored.candidates(), election.candidates());
        assert_eq!(restored.voter(nid(35201)).unwrap().voted_for, Some(CandidateId::new(2)));
    }

    #[test]
    fn restored_election_keeps_enforcing_invariants() {
        let election = voted_election();
        let mut restored = ElectionSnapshot::capture(&election).restore().unwrap();
        let err = restored
            .cast_vote(CandidateId::new(1), nid(35201))
            .unwrap_err();
        assert!(matches!(err, crate::ElectionError::AlreadyVoted(_)));
    }

    #[test]
    fn tampered_vote_totals_are_rejected() {
        let election = voted_election();
        let mut snapshot = ElectionSnapshot::capture(&election);
        snapshot.candidates[0].vote_count += 1;
        assert!(matches!(
            snapshot.restore().unwrap_err(),
            SnapshotError::Corrupt(_)
        ));
    }

    #[test]
    fn misattributed_vote_counts_are_rejected() {
        let election = voted_election();
        let mut snapshot = ElectionSnapshot::capture(&election);
        // Move the single vote's count from candidate 2 to candidate 1 while
        // the voter still records voted_for == 2: aggregate totals balance,
        // the per-candidate tally does not.
        snapshot.candidates[0].vote_count = 1;
        snapshot.candidates[1].vote_count = 0;
        assert!(matches!(
            snapshot.restore().unwrap_err(),
            SnapshotError::Corrupt(_)
        ));
    }

    #[test]
    fn dangling_voted_for_is_rejected() {
        let election = voted_election();
        let mut snapshot = ElectionSnapshot::capture(&election);
        snapshot.voters[0].voted_for = Some(CandidateId::new(9));
        assert!(matches!(
            snapshot.restore().unwrap_err(),
            SnapshotError::Corrupt(_)
        ));
    }

    #[test]
    fn wrong_schema_is_rejected() {
        let election = voted_election();
        let mut snapshot = ElectionSnapshot::capture(&election);
        snapshot.schema = "ballot_house.election.v0".to_string();
        assert!(matches!(
            snapshot.restore().unwrap_err(),
            SnapshotError::InvalidSchema(_)
        ));
    }

    #[test]
    fn json_round_trip_through_disk() {
        let election = voted_election();
        let snapshot = ElectionSnapshot::capture(&election);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("ballot_house_snapshot_{nanos}.json"));
        snapshot.save(&path).unwrap();
        let loaded = ElectionSnapshot::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let restored = loaded.restore().unwrap();
        assert_eq!(restored.stats(), election.stats());
    }
}
