//! Proof-of-work search for native VRF fulfillment.
//!
//! A request is fulfilled by the smallest input whose signature over
//! `keccak256(previous_random, input)` scores to a multiple of the ledger
//! difficulty. Everything here is deterministic given a deterministic signer,
//! so any party can re-derive and re-check a submitted solution.

mod error;
mod hasher;
mod scorer;
mod signer;
mod solver;
mod verify;

pub use error::{PowError, SignerError};
pub use hasher::{challenge_hash, message_hash};
pub use scorer::{Difficulty, SCORED_SIGNATURE_BYTES, signature_to_u256};
pub use signer::ChallengeSigner;
pub use solver::{Solution, solve};
pub use verify::verify_solution;
