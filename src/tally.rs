//! Pure tally derivations over committed candidate records.
//!
//! Every function here reads a candidate slice and derives a result; nothing
//! mutates.  The winner tie-break is a deliberate, documented policy: on an
//! exact vote-count tie the candidate with the *lowest id* wins.  Ties are
//! never reported as ties.

use crate::candidate::{Candidate, CandidateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Winning candidate summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSummary {
    /// Id of the winning candidate.
    pub id: CandidateId,
    /// Name of the winning candidate.
    pub name: String,
    /// Vote count achieved.
    pub vote_count: u64,
}

/// Per-party aggregate across all its candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyBreakdown {
    /// Party name.
    pub party: String,
    /// Combined votes across the party's candidates.
    pub total_votes: u64,
    /// Number of candidates fielded by the party.
    pub candidate_count: u64,
    /// Share of all cast votes, in percent; `0.0` when no votes were cast.
    pub percentage: f64,
}

/// Returns the candidate with the maximum vote count, or `None` for an
/// empty slate.
///
/// Tie-break: a strict `>` comparison during the ascending-id scan keeps the
/// first maximum found, so the lowest-id candidate wins an exact tie.
pub fn winner(candidates: &[Candidate]) -> Option<WinnerSummary> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.vote_count <= current.vote_count => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|candidate| WinnerSummary {
        id: candidate.id,
        name: candidate.name.clone(),
        vote_count: candidate.vote_count,
    })
}

/// Candidates whose city contains `area` (case-insensitive substring match),
/// sorted by descending vote count.  Returns an empty vector, not an error,
/// when nothing matches.
pub fn results_by_area(candidates: &[Candidate], area: &str) -> Vec<Candidate> {
    let needle = area.trim().to_lowercase();
    let mut matched: Vec<Candidate> = candidates
        .iter()
        .filter(|candidate| candidate.city.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    // Stable sort keeps ascending id order within equal counts.
    matched.sort_by(|a, b| b.vote_count.cmp(&a.vote_count));
    matched
}

/// Per-party totals and vote shares, ordered by party name.
pub fn party_breakdown(candidates: &[Candidate]) -> Vec<PartyBreakdown> {
    let total_votes: u64 = candidates.iter().map(|c| c.vote_count).sum();
    let mut parties: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for candidate in candidates {
        let entry = parties.entry(candidate.party.as_str()).or_insert((0, 0));
        entry.0 += candidate.vote_count;
        entry.1 += 1;
    }
    parties
        .into_iter()
        .map(|(party, (votes, count))| PartyBreakdown {
            party: party.to_string(),
            total_votes: votes,
            candidate_count: count,
            percentage: percentage(votes, total_votes),
        })
        .collect()
}

/// Share of `part` in `whole`, in percent; `0.0` when `whole` is zero.
pub(crate) fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
