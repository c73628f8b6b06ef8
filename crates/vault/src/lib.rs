//! Client-chain LST accounting: TVL budgets and per-staker balance
//! buckets, mutated only through the gateway protocol.

mod account;
mod errors;
mod vault;

pub use account::VaultAccount;
pub use errors::{VaultError, VaultResult};
pub use vault::{Vault, WithdrawReceipt};
