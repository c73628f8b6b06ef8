//! Per-staker capsules tracking natively staked ether.
//!
//! A capsule binds a staker to a deterministic withdrawal address.
//! Validators pointing their withdrawal credentials at that address can
//! be proven against beacon block roots and their balances counted as
//! restaked principal; claims then unlock that principal for physical
//! withdrawal, one at a time and rate limited.

mod capsule;
mod credentials;
mod errors;
mod validator;

pub use capsule::{Capsule, CapsuleParams, WithdrawReceipt};
pub use credentials::{
    CredentialMode, RawCredentialPrefix, capsule_address, expected_credentials,
};
pub use errors::{CapsuleError, CapsuleResult};
pub use validator::{ClaimState, ValidatorRecord, ValidatorStatus};
