//! Test utilities for building proofs that verify by construction.

#![allow(unreachable_pub, reason = "test utils module")]

use causeway_primitives::Hash;
use sha2::{Digest, Sha256};

use crate::{
    container::ValidatorContainer,
    fork::BeaconFork,
    gindex::{STATE_ROOT_FIELD_INDEX, validator_registry_index},
    merkle::compute_merkle_root,
    proof::NativeStakeProof,
};

/// Builds a consistent `(block_root, proof)` pair from a chosen
/// container, so tests exercise the real verifier instead of stubbing it.
///
/// Sibling hashes derive deterministically from a seed, keeping fixtures
/// stable across runs.
#[derive(Debug, Clone)]
pub struct ProofBuilder {
    fork: BeaconFork,
    container: ValidatorContainer,
    validator_index: u64,
    beacon_timestamp: u64,
    seed: u8,
}

impl ProofBuilder {
    /// Create a builder for the given fork and validator record.
    pub fn new(fork: BeaconFork, container: ValidatorContainer) -> Self {
        Self {
            fork,
            container,
            validator_index: 0,
            beacon_timestamp: 0,
            seed: 0,
        }
    }

    /// Set the validator's registry index.
    pub fn with_validator_index(mut self, index: u64) -> Self {
        self.validator_index = index;
        self
    }

    /// Set the timestamp the proof's block root is keyed by.
    pub fn with_beacon_timestamp(mut self, timestamp: u64) -> Self {
        self.beacon_timestamp = timestamp;
        self
    }

    /// Vary the seed to get distinct sibling sets.
    pub fn with_seed(mut self, seed: u8) -> Self {
        self.seed = seed;
        self
    }

    /// Produce the pair. The proof verifies under the builder's fork.
    pub fn build(self) -> (Hash, NativeStakeProof) {
        let validator_branch = sibling_chain(self.seed, 0x00, self.fork.validator_proof_len());
        let state_root = compute_merkle_root(
            &self.container.hash_tree_root(),
            &validator_branch,
            validator_registry_index(self.validator_index),
        );

        let state_root_branch = sibling_chain(self.seed, 0x80, self.fork.header_proof_len());
        let block_root =
            compute_merkle_root(&state_root, &state_root_branch, STATE_ROOT_FIELD_INDEX);

        let proof = NativeStakeProof::new(
            self.beacon_timestamp,
            state_root,
            state_root_branch,
            self.container,
            validator_branch,
            self.validator_index,
        );
        (block_root, proof)
    }
}

fn sibling_chain(seed: u8, tag: u8, len: usize) -> Vec<Hash> {
    (0..len)
        .map(|i| {
            let mut hasher = Sha256::new();
            hasher.update([seed, tag, i as u8]);
            hasher.finalize().into()
        })
        .collect()
}
