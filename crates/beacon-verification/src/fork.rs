//! Hard-fork dependent tree geometry.

use serde::{Deserialize, Serialize};

use crate::gindex::{HEADER_TREE_HEIGHT, VALIDATOR_TREE_HEIGHT};

/// Beacon chain hard fork the proofs are built against.
///
/// Electra grew the beacon state container past 32 fields, which deepens
/// the state tree by one level and lengthens every validator proof by one
/// sibling. The fork is deployment configuration, never wire data.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BeaconFork {
    /// Deneb: 2^5 = 32 state fields.
    Deneb,

    /// Electra: 2^6 = 64 state fields.
    Electra,
}

impl BeaconFork {
    /// Depth of the beacon state container tree.
    pub const fn state_tree_height(&self) -> u32 {
        match self {
            Self::Deneb => 5,
            Self::Electra => 6,
        }
    }

    /// Number of siblings in a proof from a validator container root up
    /// to the beacon state root.
    pub const fn validator_proof_len(&self) -> usize {
        (VALIDATOR_TREE_HEIGHT + 1 + self.state_tree_height()) as usize
    }

    /// Number of siblings in a proof from the state root up to the block
    /// header root. Fork-independent.
    pub const fn header_proof_len(&self) -> usize {
        HEADER_TREE_HEIGHT as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proof_lengths() {
        assert_eq!(BeaconFork::Deneb.validator_proof_len(), 46);
        assert_eq!(BeaconFork::Electra.validator_proof_len(), 47);
        assert_eq!(BeaconFork::Deneb.header_proof_len(), 3);
        assert_eq!(BeaconFork::Electra.header_proof_len(), 3);
    }
}
