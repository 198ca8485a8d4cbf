#![deny(missing_docs)]

//! # ballot_house
//!
//! **ballot_house** is an in-process election ledger and tally engine: an
//! authoritative, invariant-enforcing store for candidates, registered
//! voters and cast votes, with a gated lifecycle and deterministic result
//! aggregation.  It is the core a remote voting contract or service would
//! implement; transport, sessions and rendering are the concern of external
//! collaborators that call into it.
//!
//! ## Features
//!
//! * **Lifecycle gating**: the election advances monotonically
//!   NotStarted → Started → Ended; every mutating operation consults the
//!   phase before touching any registry, and only an explicit reset
//!   re-initialises the ledger.
//! * **Single-vote enforcement**: a voter's vote commits atomically — the
//!   voter flag, the candidate count and the running total advance together
//!   or not at all, and a committed vote is permanent.
//! * **Typed identities**: national ids and participant addresses are
//!   validated newtypes; malformed input fails fast instead of being
//!   coerced.
//! * **Deterministic tallies**: winner selection (lowest id wins an exact
//!   tie), case-insensitive area results, party breakdowns and turnout
//!   figures, all zero-guarded and free of mutation.
//! * **Observer events**: each committed mutation emits one
//!   [`ElectionEvent`] in commit order, so reporting collaborators can
//!   subscribe without coupling to ledger internals.
//!
//! ## Usage
//!
//! ```rust
//! use ballot_house::{Election, NationalId, VoterAddress};
//!
//! # fn main() -> Result<(), ballot_house::ElectionError> {
//! let mut election = Election::new();
//! let ayesha =
//!     election.add_candidate("Ayesha Khan", "Unity", NationalId::new(42101)?, "Lahore")?;
//! election.add_candidate("Bilal Shah", "Progress", NationalId::new(42102)?, "Karachi")?;
//! election.register_voter(
//!     VoterAddress::new("0xa1")?,
//!     "Voter One",
//!     NationalId::new(35201)?,
//!     "Lahore",
//! )?;
//!
//! election.start_election()?;
//! election.cast_vote(ayesha, NationalId::new(35201)?)?;
//! election.end_election()?;
//!
//! let winner = election.winner()?;
//! assert_eq!(winner.name, "Ayesha Khan");
//! assert_eq!(winner.vote_count, 1);
//! # Ok(())
//! # }
//! ```

mod candidate;
mod election;
mod error;
mod events;
mod identity;
mod phase;
mod snapshot;
pub mod tally;
pub mod turnout;
mod voter;

pub use candidate::{Candidate, CandidateId, CandidateRegistry};
pub use election::{Election, ElectionStats, SharedElection};
pub use error::ElectionError;
pub use events::{ElectionEvent, ElectionObserver, EventLog};
pub use identity::{NationalId, VoterAddress};
pub use phase::ElectionPhase;
pub use snapshot::{ElectionSnapshot, SnapshotError};
pub use tally::{PartyBreakdown, WinnerSummary};
pub use turnout::AreaTally;
pub use voter::{Voter, VoterRegistry};
