use causeway_beacon_verification::ProofError;
use causeway_primitives::{Amount, PubkeyHash};
use thiserror::Error;

/// Errors from capsule operations.
///
/// Every variant is returned before any state is touched, so a failed
/// call leaves the capsule exactly as it was.
#[derive(Debug, Error)]
pub enum CapsuleError {
    /// Zero-amount claims and withdrawals are rejected outright.
    #[error("zero amount")]
    ZeroAmount,

    /// A claim is already in flight; only one may be at a time.
    #[error("a native stake claim is already in progress")]
    ClaimInProgress,

    /// Not enough time has passed since the last confirmed claim.
    #[error("claim too soon: {since_last}s since last claim, minimum {min_interval}s")]
    ClaimTooSoon { since_last: u64, min_interval: u64 },

    /// Claim amount exceeds what is not already withdrawable.
    #[error("claim of {requested} exceeds claimable balance {claimable}")]
    ExceedsClaimable {
        requested: Amount,
        claimable: Amount,
    },

    /// The pubkey hash already has a record, whatever its status.
    #[error("validator {0} is already registered with this capsule")]
    DoubleRegistration(PubkeyHash),

    /// The proof's block root is older than the freshness window allows.
    #[error("proof is stale: {age}s old, freshness window {max_age}s")]
    StaleProof { age: u64, max_age: u64 },

    /// The proven withdrawal credentials do not commit to this capsule.
    #[error("withdrawal credentials do not match this capsule")]
    CredentialMismatch,

    /// Slashed or zero-balance validators cannot back new stake.
    #[error("validator {0} is slashed or carries no effective balance")]
    InactiveValidator(PubkeyHash),

    /// The pubkey hash has no record with this capsule.
    #[error("validator {0} is not registered with this capsule")]
    UnknownValidator(PubkeyHash),

    /// Withdrawal exceeds the unlocked balance.
    #[error("withdrawal of {requested} exceeds withdrawable balance {available}")]
    InsufficientWithdrawable {
        requested: Amount,
        available: Amount,
    },

    /// The Merkle proof itself did not hold up.
    #[error("proof verification failed")]
    Proof(#[from] ProofError),
}

pub type CapsuleResult<T> = Result<T, CapsuleError>;
