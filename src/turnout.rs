//! Participation percentages derived from registries and the vote ledger.
//!
//! All percentages are zero-guarded: with no registered voters every turnout
//! figure is `0.0`, never a division by zero.

use crate::candidate::Candidate;
use crate::tally::percentage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Combined votes and turnout share for one area (city).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaTally {
    /// Area name, the exact city string carried by its candidates.
    pub area: String,
    /// Combined votes across the area's candidates.
    pub total_votes: u64,
    /// Number of candidates standing in the area.
    pub candidate_count: u64,
    /// Combined votes relative to all registered voters, in percent.
    pub turnout: f64,
}

/// Overall turnout: votes cast relative to registered voters, in percent.
pub fn overall_turnout(total_votes: u64, total_voters: u64) -> f64 {
    percentage(total_votes, total_voters)
}

/// Turnout for one area: the combined votes of candidates whose city contains
/// `area` (case-insensitive substring match, consistent with area results)
/// relative to all registered voters.
pub fn area_turnout(candidates: &[Candidate], area: &str, total_voters: u64) -> f64 {
    let needle = area.trim().to_lowercase();
    let votes: u64 = candidates
        .iter()
        .filter(|candidate| candidate.city.to_lowercase().contains(&needle))
        .map(|candidate| candidate.vote_count)
        .sum();
    percentage(votes, total_voters)
}

/// At most `n` areas ordered by combined votes descending.  Areas are grouped
/// by the exact city string; equal counts keep alphabetical order.
pub fn top_areas(candidates: &[Candidate], total_voters: u64, n: usize) -> Vec<AreaTally> {
    let mut areas: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for candidate in candidates {
        let entry = areas.entry(candidate.city.as_str()).or_insert((0, 0));
        entry.0 += candidate.vote_count;
        entry.1 += 1;
    }
    let mut ranked: Vec<AreaTally> = areas
        .into_iter()
        .map(|(area, (votes, count))| AreaTally {
            area: area.to_string(),
            total_votes: votes,
            candidate_count: count,
            turnout: percentage(votes, total_voters),
        })
        .collect();
    ranked.sort_by(|a, b| b.total_votes.cmp(&a.total_votes));
    ranked.truncate(n);
    ranked
}
