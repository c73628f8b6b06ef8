//! Withdrawal credential commitments.
//!
//! A validator restakes through a capsule by pointing its withdrawal
//! credentials at the capsule's deterministic address. Registration
//! recomputes the expected credential leaf from the capsule owner and
//! compares it byte-for-byte against the proven one.

use causeway_primitives::{EVM_ADDR_LEN, Hash, StakerAddr};
use int_enum::IntEnum;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain tag mixed into the capsule address derivation.
const CAPSULE_ADDR_TAG: &[u8] = b"causeway/capsule/v1";

/// Zero filler between the prefix byte and the embedded address.
const CREDENTIAL_PAD_LEN: usize = 11;

/// The underlying type of the credential prefix byte.
pub type RawCredentialPrefix = u8;

/// Which withdrawal credential prefix validators are expected to carry.
///
/// The discriminant is the prefix byte itself as it appears in the
/// credential leaf.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, IntEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialMode {
    /// Execution-address withdrawals, the original 0x01 prefix.
    Legacy = 0x01,

    /// Compounding validators, the 0x02 prefix.
    Compounding = 0x02,
}

/// Derive the capsule's 20-byte address from its owner.
///
/// Owners and capsule addresses are in deterministic one-to-one
/// correspondence, so a credential leaf can be checked without any
/// registry of deployed capsules.
pub fn capsule_address(owner: &StakerAddr) -> [u8; EVM_ADDR_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(CAPSULE_ADDR_TAG);
    hasher.update(owner.inner());
    let digest = hasher.finalize();
    let mut out = [0u8; EVM_ADDR_LEN];
    out.copy_from_slice(&digest[..EVM_ADDR_LEN]);
    out
}

/// The credential leaf a validator must commit to for a given capsule:
/// prefix byte, eleven zero bytes, then the capsule address.
pub fn expected_credentials(mode: CredentialMode, capsule_addr: &[u8; EVM_ADDR_LEN]) -> Hash {
    let mut out = [0u8; 32];
    out[0] = u8::from(mode);
    out[1 + CREDENTIAL_PAD_LEN..].copy_from_slice(capsule_addr);
    out
}
