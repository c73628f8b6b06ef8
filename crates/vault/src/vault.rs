//! The per-token deposit ledger.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use causeway_primitives::{Amount, StakerAddr, TokenId};

use crate::{
    account::VaultAccount,
    errors::{VaultError, VaultResult},
};

/// Accounting ledger for one whitelisted token.
///
/// The vault tracks how much of the deposit budget (TVL limit) is
/// consumed and the per-staker balance buckets. It never touches custody
/// itself; the gateway interleaves custody transfers between the checks
/// and the mutations here.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Vault {
    /// Token this vault accounts for.
    token: TokenId,

    /// Deposit budget. Consumed TVL may transiently exceed it after a
    /// limit reduction; only new deposits are gated.
    tvl_limit: Amount,

    /// Sum of deposits not yet physically withdrawn.
    consumed_tvl: Amount,

    /// Balance buckets per staker.
    accounts: BTreeMap<StakerAddr, VaultAccount>,
}

/// Proof that a withdrawal was debited, used to roll it back if the
/// custody transfer fails.
///
/// Deliberately not `Clone`: a receipt undoes at most one withdrawal.
#[derive(Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    staker: StakerAddr,
    amount: Amount,
}

impl WithdrawReceipt {
    pub fn staker(&self) -> &StakerAddr {
        &self.staker
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl Vault {
    /// Creates an empty vault with the given deposit budget.
    pub fn new(token: TokenId, tvl_limit: Amount) -> Self {
        Self {
            token,
            tvl_limit,
            consumed_tvl: Amount::ZERO,
            accounts: BTreeMap::new(),
        }
    }

    pub fn token(&self) -> &TokenId {
        &self.token
    }

    pub fn tvl_limit(&self) -> Amount {
        self.tvl_limit
    }

    pub fn consumed_tvl(&self) -> Amount {
        self.consumed_tvl
    }

    /// Looks up a staker's account, if any balance was ever booked.
    pub fn account(&self, staker: &StakerAddr) -> Option<&VaultAccount> {
        self.accounts.get(staker)
    }

    /// Admission check for a deposit against the current limit and
    /// counter.
    ///
    /// Callers run this before taking custody; [`Vault::credit_deposit`]
    /// is then infallible, so a custody failure between the two leaves
    /// the ledger untouched.
    pub fn ensure_deposit_allowed(&self, amount: Amount) -> VaultResult<()> {
        if amount.is_zero() {
            return Err(VaultError::ZeroAmount);
        }

        match self.consumed_tvl.checked_add(amount) {
            Some(consumed_after) if consumed_after <= self.tvl_limit => Ok(()),
            _ => Err(VaultError::TvlLimitExceeded {
                limit: self.tvl_limit,
                consumed: self.consumed_tvl,
                requested: amount,
            }),
        }
    }

    /// Books an admitted deposit: principal and consumed TVL grow
    /// together.
    pub fn credit_deposit(&mut self, staker: StakerAddr, amount: Amount) {
        self.consumed_tvl = self
            .consumed_tvl
            .checked_add(amount)
            .expect("vault: overflowing tvl counter");
        self.accounts
            .entry(staker)
            .or_insert_with(VaultAccount::new)
            .add_principal(amount);
    }

    /// Applies a settlement-approved principal unlock.
    ///
    /// A shortfall means the client ledger is behind the settlement
    /// approval; nothing is applied.
    pub fn unlock_principal(&mut self, staker: &StakerAddr, amount: Amount) -> VaultResult<()> {
        let available = self
            .accounts
            .get(staker)
            .map(VaultAccount::principal)
            .unwrap_or(Amount::ZERO);
        if available < amount {
            return Err(VaultError::LedgerDivergence {
                bucket: "principal",
                approved: amount,
                available,
            });
        }

        self.accounts
            .get_mut(staker)
            .expect("vault: account vanished")
            .unlock_principal(amount);
        Ok(())
    }

    /// Applies a settlement-approved reward unlock.
    pub fn unlock_reward(&mut self, staker: &StakerAddr, amount: Amount) -> VaultResult<()> {
        let available = self
            .accounts
            .get(staker)
            .map(VaultAccount::reward)
            .unwrap_or(Amount::ZERO);
        if available < amount {
            return Err(VaultError::LedgerDivergence {
                bucket: "reward",
                approved: amount,
                available,
            });
        }

        self.accounts
            .get_mut(staker)
            .expect("vault: account vanished")
            .unlock_reward(amount);
        Ok(())
    }

    /// Debits a physical withdrawal: withdrawable and consumed TVL shrink
    /// together.
    ///
    /// Returns a receipt for [`Vault::undo_withdraw`] should the custody
    /// transfer fail. All checks run before any mutation.
    pub fn withdraw(
        &mut self,
        staker: &StakerAddr,
        amount: Amount,
    ) -> VaultResult<WithdrawReceipt> {
        if amount.is_zero() {
            return Err(VaultError::ZeroAmount);
        }

        let available = self
            .accounts
            .get(staker)
            .map(VaultAccount::withdrawable)
            .unwrap_or(Amount::ZERO);
        if available < amount {
            return Err(VaultError::InsufficientWithdrawable {
                requested: amount,
                available,
            });
        }

        // Reward unlocks share the withdrawable bucket but never fed the
        // TVL counter, so the counter can run out first. That is a
        // divergence, not a shortfall the staker can fix.
        if self.consumed_tvl < amount {
            return Err(VaultError::LedgerDivergence {
                bucket: "consumed tvl",
                approved: amount,
                available: self.consumed_tvl,
            });
        }

        self.accounts
            .get_mut(staker)
            .expect("vault: account vanished")
            .sub_withdrawable(amount);
        self.consumed_tvl = self
            .consumed_tvl
            .checked_sub(amount)
            .expect("vault: tvl counter underflow");

        Ok(WithdrawReceipt {
            staker: *staker,
            amount,
        })
    }

    /// Restores the balances a withdrawal debited.
    pub fn undo_withdraw(&mut self, receipt: WithdrawReceipt) {
        let WithdrawReceipt { staker, amount } = receipt;
        self.consumed_tvl = self
            .consumed_tvl
            .checked_add(amount)
            .expect("vault: overflowing tvl counter");
        self.accounts
            .get_mut(&staker)
            .expect("vault: receipt for missing account")
            .add_withdrawable(amount);
    }

    /// Replaces the deposit budget.
    ///
    /// Lowering it below the consumed counter blocks further deposits but
    /// never unwinds existing ones.
    pub fn set_tvl_limit(&mut self, new_limit: Amount) {
        self.tvl_limit = new_limit;
    }

    /// Overwrites a staker's principal with the settlement-side value.
    pub fn set_principal_balance(&mut self, staker: StakerAddr, value: Amount) {
        self.accounts
            .entry(staker)
            .or_insert_with(VaultAccount::new)
            .set_principal(value);
    }

    /// Overwrites a staker's reward with the settlement-side value.
    pub fn set_reward_balance(&mut self, staker: StakerAddr, value: Amount) {
        self.accounts
            .entry(staker)
            .or_insert_with(VaultAccount::new)
            .set_reward(value);
    }
}
