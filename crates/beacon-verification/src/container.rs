//! The validator record as it appears in proofs.

use causeway_primitives::{Hash, PubkeyHash};

use crate::{
    errors::{ProofError, ProofResult},
    merkle::merkleize8,
};

/// Number of field roots in a validator container.
pub const VALIDATOR_FIELD_COUNT: usize = 8;

const PUBKEY_FIELD: usize = 0;
const WITHDRAWAL_CREDENTIALS_FIELD: usize = 1;
const EFFECTIVE_BALANCE_FIELD: usize = 2;
const SLASHED_FIELD: usize = 3;

/// Width of the little-endian balance prefix in its field root.
const BALANCE_BYTES: usize = 8;

/// A validator record, represented as its eight SSZ field roots.
///
/// Proofs carry the record in this pre-hashed form; the container root is
/// the three-level merkleization of the field roots, and the individual
/// fields the ledger cares about are read back out of their leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorContainer {
    fields: [Hash; VALIDATOR_FIELD_COUNT],
}

impl ValidatorContainer {
    /// Create a container from exactly eight field roots.
    pub fn new(fields: [Hash; VALIDATOR_FIELD_COUNT]) -> Self {
        Self { fields }
    }

    /// Create a container from a field root list of unchecked length.
    pub fn try_new(fields: Vec<Hash>) -> ProofResult<Self> {
        let fields: [Hash; VALIDATOR_FIELD_COUNT] = fields
            .try_into()
            .map_err(|_| ProofError::MalformedContainer("field count"))?;
        Ok(Self { fields })
    }

    /// Get the field roots.
    pub fn fields(&self) -> &[Hash; VALIDATOR_FIELD_COUNT] {
        &self.fields
    }

    /// Hash of the validator's BLS pubkey, the registry-wide identity.
    pub fn pubkey_hash(&self) -> PubkeyHash {
        PubkeyHash::new(self.fields[PUBKEY_FIELD])
    }

    /// The withdrawal credentials committed for this validator.
    pub fn withdrawal_credentials(&self) -> &Hash {
        &self.fields[WITHDRAWAL_CREDENTIALS_FIELD]
    }

    /// Effective balance in gwei.
    ///
    /// A `uint64` leaf is the little-endian value in the first eight
    /// bytes with a zero tail; a nonzero tail means the leaf cannot be a
    /// balance and the container is rejected.
    pub fn effective_balance_gwei(&self) -> ProofResult<u64> {
        let leaf = &self.fields[EFFECTIVE_BALANCE_FIELD];
        if leaf[BALANCE_BYTES..] != [0u8; 32 - BALANCE_BYTES] {
            return Err(ProofError::MalformedContainer("effective balance padding"));
        }
        let mut raw = [0u8; BALANCE_BYTES];
        raw.copy_from_slice(&leaf[..BALANCE_BYTES]);
        Ok(u64::from_le_bytes(raw))
    }

    /// Whether the validator has been slashed.
    pub fn slashed(&self) -> bool {
        self.fields[SLASHED_FIELD][0] != 0
    }

    /// The container root proven against the state registry.
    pub fn hash_tree_root(&self) -> Hash {
        merkleize8(&self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balance_leaf(gwei: u64) -> Hash {
        let mut leaf = [0u8; 32];
        leaf[..8].copy_from_slice(&gwei.to_le_bytes());
        leaf
    }

    fn test_container(balance_gwei: u64) -> ValidatorContainer {
        let mut fields = [[0u8; 32]; VALIDATOR_FIELD_COUNT];
        fields[0] = [0xab; 32];
        fields[1] = [0xcd; 32];
        fields[2] = balance_leaf(balance_gwei);
        ValidatorContainer::new(fields)
    }

    #[test]
    fn test_field_accessors() {
        let container = test_container(32_000_000_000);
        assert_eq!(container.pubkey_hash(), PubkeyHash::new([0xab; 32]));
        assert_eq!(container.withdrawal_credentials(), &[0xcd; 32]);
        assert_eq!(container.effective_balance_gwei().unwrap(), 32_000_000_000);
        assert!(!container.slashed());
    }

    #[test]
    fn test_balance_padding_enforced() {
        let mut container = test_container(7);
        container.fields[2][8] = 1;
        assert!(matches!(
            container.effective_balance_gwei(),
            Err(ProofError::MalformedContainer("effective balance padding"))
        ));

        let mut container = test_container(7);
        container.fields[2][31] = 1;
        assert!(container.effective_balance_gwei().is_err());
    }

    #[test]
    fn test_try_new_shape() {
        assert!(ValidatorContainer::try_new(vec![[0u8; 32]; 8]).is_ok());
        assert!(matches!(
            ValidatorContainer::try_new(vec![[0u8; 32]; 7]),
            Err(ProofError::MalformedContainer("field count"))
        ));
        assert!(ValidatorContainer::try_new(vec![[0u8; 32]; 9]).is_err());
    }

    #[test]
    fn test_slashed_flag() {
        let mut container = test_container(1);
        assert!(!container.slashed());
        container.fields[3][0] = 1;
        assert!(container.slashed());
    }
}
