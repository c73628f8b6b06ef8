//! Leaf index arithmetic for the two proof hops.
//!
//! These constants and shifts are part of the proof contract: any
//! divergence still walks a syntactically valid branch, just against the
//! wrong leaf, and verification would pass for fabricated data. Values
//! must match the beacon chain's generalized-index scheme bit for bit.

/// `state_root` is field 3 of the beacon block header container.
pub const STATE_ROOT_FIELD_INDEX: u64 = 3;

/// The header container has 5 fields, merkleized at depth 3 (2^3 = 8).
pub const HEADER_TREE_HEIGHT: u32 = 3;

/// `validators` is field 11 of the beacon state container.
pub const VALIDATORS_FIELD_INDEX: u64 = 11;

/// The validator registry is a list limited to 2^40 entries.
pub const VALIDATOR_TREE_HEIGHT: u32 = 40;

/// Leaf index of validator `validator_index`'s container root under the
/// beacon state root.
///
/// The `+ 1` accounts for the list length mix-in level above the
/// registry data tree.
pub const fn validator_registry_index(validator_index: u64) -> u64 {
    (VALIDATORS_FIELD_INDEX << (VALIDATOR_TREE_HEIGHT + 1)) | validator_index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_index_bits() {
        // Field bits land above the 41-bit validator span.
        assert_eq!(validator_registry_index(0), 11 << 41);
        assert_eq!(validator_registry_index(1), (11 << 41) | 1);
        assert_eq!(
            validator_registry_index((1 << 40) - 1),
            (11 << 41) | ((1 << 40) - 1)
        );
    }
}
