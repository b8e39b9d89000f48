//! Networked play - the per-round wire payload and outcome checks

pub mod protocol;

pub use protocol::{verify_outcome, OutcomeDigest, PeerMsg, PlayerDocument, SelectedMove};
