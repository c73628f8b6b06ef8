//! Beacon-chain Merkle proof verification for native-stake deposits.
//!
//! The settlement ledger cannot observe the beacon chain directly; it
//! trusts a block root from an oracle and requires a two-hop SSZ proof
//! binding a validator record to that root. This crate is pure
//! computation over those proofs, with no ledger state of its own.

mod container;
mod errors;
mod fork;
mod gindex;
mod merkle;
mod proof;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use container::{VALIDATOR_FIELD_COUNT, ValidatorContainer};
pub use errors::{ProofError, ProofResult};
pub use fork::BeaconFork;
pub use gindex::{
    HEADER_TREE_HEIGHT, STATE_ROOT_FIELD_INDEX, VALIDATOR_TREE_HEIGHT, VALIDATORS_FIELD_INDEX,
    validator_registry_index,
};
pub use merkle::{compute_merkle_root, merkleize8, verify_merkle_branch};
pub use proof::{NativeStakeProof, verify_native_stake_proof};
