use causeway_primitives::Amount;
use thiserror::Error;

/// Errors from vault accounting operations.
///
/// Every variant is raised before any mutation, so a returned error means
/// the vault is exactly as it was.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Zero-amount operations are rejected outright.
    #[error("zero amount")]
    ZeroAmount,

    /// The deposit would push consumed TVL past the configured limit.
    #[error("tvl limit exceeded: consumed {consumed} + requested {requested} > limit {limit}")]
    TvlLimitExceeded {
        limit: Amount,
        consumed: Amount,
        requested: Amount,
    },

    /// The withdrawal exceeds the staker's withdrawable balance.
    #[error("insufficient withdrawable: requested {requested}, available {available}")]
    InsufficientWithdrawable {
        requested: Amount,
        available: Amount,
    },

    /// A settlement-approved movement exceeds the local balance. The two
    /// ledgers disagree about this account and nothing is applied.
    #[error("ledger divergence in {bucket}: approved {approved}, local {available}")]
    LedgerDivergence {
        bucket: &'static str,
        approved: Amount,
        available: Amount,
    },
}

pub type VaultResult<T> = Result<T, VaultError>;
