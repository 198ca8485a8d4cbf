//! Voter records and the registry enforcing one registration per identity.

use crate::candidate::CandidateId;
use crate::error::ElectionError;
use crate::identity::{require_text, NationalId, VoterAddress};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A registered voter.  `has_voted`/`voted_for` transition exactly once,
/// from unset to set, when the voter's single vote is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    /// Participant address that registered this voter.
    pub address: VoterAddress,
    /// Voter name (non-empty).
    pub name: String,
    /// Unique national id within the voter identity space.
    pub national_id: NationalId,
    /// Home city.
    pub city: String,
    /// Whether the voter's single vote has been cast.
    pub has_voted: bool,
    /// Candidate the vote went to, once cast.
    pub voted_for: Option<CandidateId>,
}

/// Store of registered voters keyed by national id, with an address index
/// so both identity forms can be resolved.
#[derive(Debug, Clone, Default)]
pub struct VoterRegistry {
    records: BTreeMap<NationalId, Voter>,
    by_address: HashMap<VoterAddress, NationalId>,
}

impl VoterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and stores a new voter with `has_voted = false`.
    ///
    /// Both the national id and the address must be previously unseen;
    /// either collision is a [`ElectionError::DuplicateIdentity`].
    pub(crate) fn register(
        &mut self,
        address: VoterAddress,
        name: &str,
        national_id: NationalId,
        city: &str,
    ) -> Result<(), ElectionError> {
        let name = require_text("name", name)?;
        let city = require_text("city", city)?;
        if self.records.contains_key(&national_id) {
            return Err(ElectionError::DuplicateIdentity {
                identity: national_id.to_string(),
            });
        }
        if self.by_address.contains_key(&address) {
            return Err(ElectionError::DuplicateIdentity {
                identity: address.to_string(),
            });
        }
        self.by_address.insert(address.clone(), national_id);
        self.records.insert(
            national_id,
            Voter {
                address,
                name,
                national_id,
                city,
                has_voted: false,
                voted_for: None,
            },
        );
        Ok(())
    }

    /// Looks up a voter by national id.
    pub fn get(&self, national_id: NationalId) -> Result<&Voter, ElectionError> {
        self.records
            .get(&national_id)
            .ok_or_else(|| ElectionError::NotFound {
                entity: "voter",
                id: national_id.to_string(),
            })
    }

    /// Looks up a voter by participant address.
    pub fn get_by_address(&self, address: &VoterAddress) -> Result<&Voter, ElectionError> {
        self.by_address
            .get(address)
            .and_then(|national_id| self.records.get(national_id))
            .ok_or_else(|| ElectionError::NotFound {
                entity: "voter",
                id: address.to_string(),
            })
    }

    /// Mutable lookup used by the vote ledger to mark the vote.
    pub(crate) fn get_mut(&mut self, national_id: NationalId) -> Result<&mut Voter, ElectionError> {
        self.records
            .get_mut(&national_id)
            .ok_or_else(|| ElectionError::NotFound {
                entity: "voter",
                id: national_id.to_string(),
            })
    }

    /// Iterator over voters in ascending national id order.
    pub fn iter(&self) -> impl Iterator<Item = &Voter> {
        self.records.values()
    }

    /// Number of registered voters.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no voters.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every record.  Only reachable through an election reset.
    pub(crate) fn clear(&mut self) {
        self.records.clear();
        self.by_address.clear();
    }

    /// Rebuilds a registry from stored records, re-deriving the address index
    /// and verifying identity uniqueness and vote-flag consistency.
    pub(crate) fn from_records(records: Vec<Voter>) -> Result<Self, String> {
        let mut registry = Self::new();
        for voter in records {
            if voter.has_voted != voter.voted_for.is_some() {
                return Err(format!(
                    "voter {} has inconsistent vote flags",
                    voter.national_id
                ));
            }
            if registry.records.contains_key(&voter.national_id) {
                return Err(format!("duplicate voter national id {}", voter.national_id));
            }
            if registry.by_address.contains_key(&voter.address) {
                return Err(format!("duplicate voter address {}", voter.address));
            }
            registry
                .by_address
                .insert(voter.address.clone(), voter.national_id);
            registry.records.insert(voter.national_id, voter);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nid(raw: u64) -> NationalId {
        NationalId::new(raw).unwrap()
    }

    fn addr(raw: &str) -> VoterAddress {
        VoterAddress::new(raw).unwrap()
    }

    #[test]
    fn registration_creates_unvoted_record() {
        let mut registry = VoterRegistry::new();
        registry
            .register(addr("0xa1"), "Voter One", nid(35201), "Lahore")
            .unwrap();
        let voter = registry.get(nid(35201)).unwrap();
        assert!(!voter.has_voted);
        assert_eq!(voter.voted_for, None);
        assert_eq!(registry.get_by_address(&addr("0xa1")).unwrap().name, "Voter One");
    }

    #[test]
    fn duplicate_national_id_is_rejected() {
        let mut registry = VoterRegistry::new();
        registry
            .register(addr("0xa1"), "Voter One", nid(35201), "Lahore")
            .unwrap();
        let err = registry
            .register(addr("0xa2"), "Voter Two", nid(35201), "Karachi")
            .unwrap_err();
        assert!(matches!(err, ElectionError::DuplicateIdentity { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_address_is_rejected() {
        let mut registry = VoterRegistry::new();
        registry
            .register(addr("0xa1"), "Voter One", nid(35201), "Lahore")
            .unwrap();
        let err = registry
            .register(addr("0xa1"), "Voter Two", nid(35202), "Karachi")
            .unwrap_err();
        assert!(matches!(err, ElectionError::DuplicateIdentity { .. }));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistered_lookup_is_not_found() {
        let registry = VoterRegistry::new();
        assert!(registry.get(nid(35201)).is_err());
        assert!(registry.get_by_address(&addr("0xa1")).is_err());
    }

    #[test]
    fn from_records_rejects_inconsistent_vote_flags() {
        let voter = Voter {
            address: addr("0xa1"),
            name: "Voter One".to_string(),
            national_id: nid(35201),
            city: "Lahore".to_string(),
            has_voted: true,
            voted_for: None,
        };
        assert!(VoterRegistry::from_records(vec![voter]).is_err());
    }
}
