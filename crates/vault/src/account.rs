//! Per-staker balance buckets.

use borsh::{BorshDeserialize, BorshSerialize};
use causeway_primitives::Amount;

/// One staker's balances within a vault.
///
/// Principal enters at deposit, reward enters via settlement-side sync,
/// and both leave only through withdrawable after the settlement side has
/// approved the move.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VaultAccount {
    /// Balance deposited and still restaked.
    principal: Amount,

    /// Reward balance attributed by the settlement ledger.
    reward: Amount,

    /// Balance approved for physical withdrawal.
    withdrawable: Amount,
}

impl VaultAccount {
    /// A fresh account with all buckets empty.
    pub fn new() -> Self {
        Self {
            principal: Amount::ZERO,
            reward: Amount::ZERO,
            withdrawable: Amount::ZERO,
        }
    }

    pub fn principal(&self) -> Amount {
        self.principal
    }

    pub fn reward(&self) -> Amount {
        self.reward
    }

    pub fn withdrawable(&self) -> Amount {
        self.withdrawable
    }

    /// Adds to principal, panicking on overflow.
    pub(crate) fn add_principal(&mut self, amount: Amount) {
        self.principal = self
            .principal
            .checked_add(amount)
            .expect("vault: overflowing principal");
    }

    /// Moves an approved amount from principal into withdrawable.
    pub(crate) fn unlock_principal(&mut self, amount: Amount) {
        self.principal = self
            .principal
            .checked_sub(amount)
            .expect("vault: principal unlock underflow");
        self.withdrawable = self
            .withdrawable
            .checked_add(amount)
            .expect("vault: overflowing withdrawable");
    }

    /// Moves an approved amount from reward into withdrawable.
    pub(crate) fn unlock_reward(&mut self, amount: Amount) {
        self.reward = self
            .reward
            .checked_sub(amount)
            .expect("vault: reward unlock underflow");
        self.withdrawable = self
            .withdrawable
            .checked_add(amount)
            .expect("vault: overflowing withdrawable");
    }

    pub(crate) fn sub_withdrawable(&mut self, amount: Amount) {
        self.withdrawable = self
            .withdrawable
            .checked_sub(amount)
            .expect("vault: withdrawable underflow");
    }

    pub(crate) fn add_withdrawable(&mut self, amount: Amount) {
        self.withdrawable = self
            .withdrawable
            .checked_add(amount)
            .expect("vault: overflowing withdrawable");
    }

    pub(crate) fn set_principal(&mut self, value: Amount) {
        self.principal = value;
    }

    pub(crate) fn set_reward(&mut self, value: Amount) {
        self.reward = value;
    }
}
