//! Candidate records and the registry that assigns their ids.

use crate::error::ElectionError;
use crate::identity::{require_text, NationalId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier assigned to a candidate: 1-based, sequential, unique for the
/// lifetime of an election.  Ids restart from 1 after a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(u64);

impl CandidateId {
    /// Wraps a raw candidate id.  No range check happens here; an id that
    /// was never assigned surfaces as [`ElectionError::NotFound`] on lookup.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric value.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered candidate together with its running vote count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Sequential id assigned at registration.
    pub id: CandidateId,
    /// Candidate name (non-empty).
    pub name: String,
    /// Party affiliation (non-empty).
    pub party: String,
    /// Unique national id within the candidate identity space.
    pub national_id: NationalId,
    /// Home city, used for area results and turnout grouping.
    pub city: String,
    /// Number of votes recorded for this candidate.
    pub vote_count: u64,
}

/// Append-only store of candidates ordered by ascending id.
///
/// Records are never deleted during an election; the whole registry is
/// cleared only by an explicit election reset.
#[derive(Debug, Clone, Default)]
pub struct CandidateRegistry {
    records: Vec<Candidate>,
    by_national_id: HashMap<NationalId, CandidateId>,
}

impl CandidateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a new candidate, assigning the next sequential id.
    pub(crate) fn add(
        &mut self,
        name: &str,
        party: &str,
        national_id: NationalId,
        city: &str,
    ) -> Result<CandidateId, ElectionError> {
        let name = require_text("name", name)?;
        let party = require_text("party", party)?;
        let city = require_text("city", city)?;
        if self.by_national_id.contains_key(&national_id) {
            return Err(ElectionError::DuplicateIdentity {
                identity: national_id.to_string(),
            });
        }
        let id = CandidateId(self.records.len() as u64 + 1);
        self.by_national_id.insert(national_id, id);
        self.records.push(Candidate {
            id,
            name,
            party,
            national_id,
            city,
            vote_count: 0,
        });
        Ok(id)
    }

    /// Looks up a candidate by id.
    pub fn get(&self, id: CandidateId) -> Result<&Candidate, ElectionError> {
        self.index_of(id)
            .and_then(|idx| self.records.get(idx))
            .ok_or_else(|| ElectionError::NotFound {
                entity: "candidate",
                id: id.to_string(),
            })
    }

    /// Mutable lookup used by the vote ledger to bump `vote_count`.
    pub(crate) fn get_mut(&mut self, id: CandidateId) -> Result<&mut Candidate, ElectionError> {
        let idx = self.index_of(id).ok_or_else(|| ElectionError::NotFound {
            entity: "candidate",
            id: id.to_string(),
        })?;
        Ok(&mut self.records[idx])
    }

    /// All candidates in ascending id order.  The slice reflects current
    /// committed state; callers may re-enumerate at any time.
    pub fn as_slice(&self) -> &[Candidate] {
        &self.records
    }

    /// Iterator over candidates in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.records.iter()
    }

    /// Number of registered candidates.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record.  Only reachable through an election reset.
    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.by_national_id.clear();
    }

    /// Rebuilds a registry from stored records, re-deriving the national id
    /// index and verifying id sequence and identity uniqueness.
    pub(crate) fn from_records(records: Vec<Candidate>) -> Result<Self, String> {
        let mut by_national_id = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.id.value() != idx as u64 + 1 {
                return Err(format!(
                    "candidate ids not sequential: position {} holds id {}",
                    idx, record.id
                ));
            }
            if by_national_id.insert(record.national_id, record.id).is_some() {
                return Err(format!("duplicate candidate national id {}", record.national_id));
            }
        }
        Ok(Self {
            records,
            by_national_id,
        })
    }

    fn index_of(&self, id: CandidateId) -> Option<usize> {
        let raw = id.value();
        if raw == 0 || raw > self.records.len() as u64 {
            return None;
        }
        Some((raw - 1) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nid(raw: u64) -> NationalId {
        NationalId::new(raw).unwrap()
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut registry = CandidateRegistry::new();
        let a = registry.add("Ayesha Khan", "Unity", nid(1001), "Lahore").unwrap();
        let b = registry.add("Bilal Shah", "Progress", nid(1002), "Karachi").unwrap();
        assert_eq!(a.value(), 1);
        assert_eq!(b.value(), 2);
        assert_eq!(registry.get(a).unwrap().name, "Ayesha Khan");
        assert_eq!(registry.get(b).unwrap().vote_count, 0);
    }

    #[test]
    fn duplicate_national_id_is_rejected() {
        let mut registry = CandidateRegistry::new();
        registry.add("Ayesha Khan", "Unity", nid(1001), "Lahore").unwrap();
        let err = registry
            .add("Impostor", "Unity", nid(1001), "Lahore")
            .unwrap_err();
        assert!(matches!(err, ElectionError::DuplicateIdentity { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn empty_fields_fail_validation() {
        let mut registry = CandidateRegistry::new();
        assert!(registry.add("", "Unity", nid(1001), "Lahore").is_err());
        assert!(registry.add("Ayesha", " ", nid(1001), "Lahore").is_err());
        assert!(registry.add("Ayesha", "Unity", nid(1001), "").is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn lookup_outside_assigned_range_is_not_found() {
        let mut registry = CandidateRegistry::new();
        registry.add("Ayesha Khan", "Unity", nid(1001), "Lahore").unwrap();
        assert!(registry.get(CandidateId::new(0)).is_err());
        assert!(registry.get(CandidateId::new(2)).is_err());
    }

    #[test]
    fn enumeration_is_ordered_and_restartable() {
        let mut registry = CandidateRegistry::new();
        registry.add("Ayesha Khan", "Unity", nid(1001), "Lahore").unwrap();
        registry.add("Bilal Shah", "Progress", nid(1002), "Karachi").unwrap();
        let first: Vec<u64> = registry.iter().map(|c| c.id.value()).collect();
        let second: Vec<u64> = registry.iter().map(|c| c.id.value()).collect();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(first, second);
    }

    #[test]
    fn from_records_rejects_broken_sequences() {
        let mut registry = CandidateRegistry::new();
        registry.add("Ayesha Khan", "Unity", nid(1001), "Lahore").unwrap();
        let mut records = registry.as_slice().to_vec();
        records[0].id = CandidateId::new(7);
        assert!(CandidateRegistry::from_records(records).is_err());
    }
}
