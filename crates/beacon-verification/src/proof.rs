//! Two-hop proof binding a validator record to a beacon block root.

use causeway_primitives::Hash;

use crate::{
    container::ValidatorContainer,
    errors::{ProofError, ProofResult},
    fork::BeaconFork,
    gindex::{STATE_ROOT_FIELD_INDEX, validator_registry_index},
    merkle::verify_merkle_branch,
};

/// Everything needed to prove one validator record under a block root.
///
/// The block root itself is not part of the proof; it comes from the
/// trusted beacon root oracle, keyed by `beacon_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeStakeProof {
    /// Timestamp identifying the block root this proof was built for.
    beacon_timestamp: u64,

    /// Claimed beacon state root.
    state_root: Hash,

    /// Branch proving the state root within the block header.
    state_root_branch: Vec<Hash>,

    /// The validator record being proven.
    validator_container: ValidatorContainer,

    /// Branch proving the container root within the state registry.
    validator_branch: Vec<Hash>,

    /// Index of the validator in the registry.
    validator_index: u64,
}

impl NativeStakeProof {
    /// Assemble a proof from its parts.
    pub fn new(
        beacon_timestamp: u64,
        state_root: Hash,
        state_root_branch: Vec<Hash>,
        validator_container: ValidatorContainer,
        validator_branch: Vec<Hash>,
        validator_index: u64,
    ) -> Self {
        Self {
            beacon_timestamp,
            state_root,
            state_root_branch,
            validator_container,
            validator_branch,
            validator_index,
        }
    }

    /// Timestamp the proof's block root is keyed by.
    pub fn beacon_timestamp(&self) -> u64 {
        self.beacon_timestamp
    }

    /// Get the claimed state root.
    pub fn state_root(&self) -> &Hash {
        &self.state_root
    }

    /// Get the validator record.
    pub fn validator_container(&self) -> &ValidatorContainer {
        &self.validator_container
    }

    /// Get the validator's registry index.
    pub fn validator_index(&self) -> u64 {
        self.validator_index
    }
}

/// Verify a native-stake proof against a trusted block root.
///
/// Both hops must hold: the state root within the header, and the
/// container root within the state registry. Branch lengths are gated
/// before any hashing so an ill-sized proof is rejected without touching
/// the hasher.
pub fn verify_native_stake_proof(
    block_root: &Hash,
    proof: &NativeStakeProof,
    fork: BeaconFork,
) -> ProofResult<()> {
    let header_len = fork.header_proof_len();
    if proof.state_root_branch.len() != header_len {
        return Err(ProofError::InvalidProofLength {
            expected: header_len,
            got: proof.state_root_branch.len(),
        });
    }

    let validator_len = fork.validator_proof_len();
    if proof.validator_branch.len() != validator_len {
        return Err(ProofError::InvalidProofLength {
            expected: validator_len,
            got: proof.validator_branch.len(),
        });
    }

    if !verify_merkle_branch(
        &proof.state_root,
        &proof.state_root_branch,
        header_len,
        STATE_ROOT_FIELD_INDEX,
        block_root,
    ) {
        return Err(ProofError::StateRootMismatch);
    }

    let container_root = proof.validator_container.hash_tree_root();
    if !verify_merkle_branch(
        &container_root,
        &proof.validator_branch,
        validator_len,
        validator_registry_index(proof.validator_index),
        &proof.state_root,
    ) {
        return Err(ProofError::ValidatorRecordMismatch);
    }

    Ok(())
}
