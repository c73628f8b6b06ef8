//! The capsule ledger: per-staker accounting for natively staked ether.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use causeway_beacon_verification::{BeaconFork, NativeStakeProof, verify_native_stake_proof};
use causeway_primitives::{Amount, EVM_ADDR_LEN, Hash, PubkeyHash, StakerAddr};

use crate::{
    credentials::{CredentialMode, capsule_address, expected_credentials},
    errors::{CapsuleError, CapsuleResult},
    validator::{ClaimState, ValidatorRecord, ValidatorStatus},
};

/// Tunables governing capsule operations.
///
/// Owned by the gateway configuration and passed into the calls that
/// need them, so the ledger itself stays configuration-free.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CapsuleParams {
    /// Minimum seconds between confirmed claims.
    pub min_claim_interval_secs: u64,

    /// Maximum age of a proof's block root, in seconds.
    pub proof_freshness_secs: u64,

    /// Per-validator cap on the balance counted as principal, in gwei.
    pub max_restaked_balance_gwei: u64,

    /// Withdrawal credential prefix validators must carry.
    pub credential_mode: CredentialMode,
}

/// Proof that a capsule withdrawal was applied, used to roll it back if
/// the downstream effect fails.
///
/// Deliberately not `Clone`: a receipt is consumed exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct WithdrawReceipt {
    amount: Amount,
}

impl WithdrawReceipt {
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Restaked-ether ledger for one staker.
///
/// Balances move through three stages: registration proves a validator's
/// effective balance and counts it as principal; a confirmed claim
/// unlocks part of the principal as withdrawable; a physical withdrawal
/// removes unlocked funds from the capsule entirely. `withdrawable`
/// never exceeds `principal`, which the claim gate maintains.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Capsule {
    /// The staker this capsule belongs to.
    owner: StakerAddr,

    /// Deterministic address the validators' credentials commit to.
    capsule_addr: [u8; EVM_ADDR_LEN],

    /// Total balance the capsule accounts for, in wei.
    principal: Amount,

    /// Portion of the principal unlocked for physical withdrawal.
    withdrawable: Amount,

    /// Registration records by pubkey hash.
    validators: BTreeMap<PubkeyHash, ValidatorRecord>,

    /// Reverse lookup from registry index to pubkey hash.
    by_index: BTreeMap<u64, PubkeyHash>,

    /// Claim gating state.
    claim: ClaimState,
}

impl Capsule {
    /// Create an empty capsule for the given owner.
    pub fn new(owner: StakerAddr) -> Self {
        let capsule_addr = capsule_address(&owner);
        Self {
            owner,
            capsule_addr,
            principal: Amount::ZERO,
            withdrawable: Amount::ZERO,
            validators: BTreeMap::new(),
            by_index: BTreeMap::new(),
            claim: ClaimState::new(),
        }
    }

    pub fn owner(&self) -> &StakerAddr {
        &self.owner
    }

    /// The derived address validators point their credentials at.
    pub fn capsule_addr(&self) -> &[u8; EVM_ADDR_LEN] {
        &self.capsule_addr
    }

    pub fn principal(&self) -> Amount {
        self.principal
    }

    pub fn withdrawable(&self) -> Amount {
        self.withdrawable
    }

    pub fn claim(&self) -> &ClaimState {
        &self.claim
    }

    /// Lifecycle status of a pubkey hash; unknown hashes are
    /// [`ValidatorStatus::Unregistered`].
    pub fn validator_status(&self, pubkey_hash: &PubkeyHash) -> ValidatorStatus {
        self.validators
            .get(pubkey_hash)
            .map(|record| record.status())
            .unwrap_or(ValidatorStatus::Unregistered)
    }

    /// Look up the pubkey hash registered at a registry index.
    pub fn validator_by_index(&self, index: u64) -> Option<&PubkeyHash> {
        self.by_index.get(&index)
    }

    /// The credential leaf a validator must carry to register here.
    pub fn expected_credentials(&self, mode: CredentialMode) -> Hash {
        expected_credentials(mode, &self.capsule_addr)
    }

    /// Run every registration check without touching state, returning
    /// the amount that would be credited as principal (the effective
    /// balance, capped per `params`, in wei).
    ///
    /// A pubkey hash registers at most once; any existing record,
    /// including a withdrawn one, rejects the call regardless of how the
    /// new proof would have fared.
    pub fn validate_registration(
        &self,
        proof: &NativeStakeProof,
        block_root: &Hash,
        fork: BeaconFork,
        now: u64,
        params: &CapsuleParams,
    ) -> CapsuleResult<Amount> {
        let container = proof.validator_container();
        let pubkey_hash = container.pubkey_hash();

        let balance_gwei = container.effective_balance_gwei()?;
        if container.slashed() || balance_gwei == 0 {
            return Err(CapsuleError::InactiveValidator(pubkey_hash));
        }

        if self.validators.contains_key(&pubkey_hash) {
            return Err(CapsuleError::DoubleRegistration(pubkey_hash));
        }

        let age = now.saturating_sub(proof.beacon_timestamp());
        if age > params.proof_freshness_secs {
            return Err(CapsuleError::StaleProof {
                age,
                max_age: params.proof_freshness_secs,
            });
        }

        if container.withdrawal_credentials() != &self.expected_credentials(params.credential_mode)
        {
            return Err(CapsuleError::CredentialMismatch);
        }

        verify_native_stake_proof(block_root, proof, fork)?;

        Ok(Amount::from_gwei(
            balance_gwei.min(params.max_restaked_balance_gwei),
        ))
    }

    /// Record a validated registration, crediting `restaked` to the
    /// principal. Callers must have passed the same proof through
    /// [`Self::validate_registration`] first.
    pub fn commit_registration(&mut self, proof: &NativeStakeProof, restaked: Amount) {
        let pubkey_hash = proof.validator_container().pubkey_hash();
        self.principal = self
            .principal
            .checked_add(restaked)
            .expect("capsule: principal overflow");
        self.validators
            .insert(pubkey_hash, ValidatorRecord::registered(proof.validator_index()));
        self.by_index.insert(proof.validator_index(), pubkey_hash);
    }

    /// Validate and record a registration in one step. Returns the
    /// credited amount in wei.
    pub fn register_validator(
        &mut self,
        proof: &NativeStakeProof,
        block_root: &Hash,
        fork: BeaconFork,
        now: u64,
        params: &CapsuleParams,
    ) -> CapsuleResult<Amount> {
        let restaked = self.validate_registration(proof, block_root, fork, now, params)?;
        self.commit_registration(proof, restaked);
        Ok(restaked)
    }

    /// Gate a new claim: one in flight at a time, a minimum interval
    /// since the last confirmed claim, and no more than the portion of
    /// the principal not already withdrawable. On success only the
    /// in-flight flag is set; balances move when the claim confirms.
    pub fn start_claim(
        &mut self,
        amount: Amount,
        now: u64,
        params: &CapsuleParams,
    ) -> CapsuleResult<()> {
        if amount.is_zero() {
            return Err(CapsuleError::ZeroAmount);
        }
        if self.claim.in_progress() {
            return Err(CapsuleError::ClaimInProgress);
        }
        let since_last = now.saturating_sub(self.claim.last_claim_timestamp());
        if since_last < params.min_claim_interval_secs {
            return Err(CapsuleError::ClaimTooSoon {
                since_last,
                min_interval: params.min_claim_interval_secs,
            });
        }
        let claimable = self
            .principal
            .checked_sub(self.withdrawable)
            .expect("capsule: withdrawable exceeds principal");
        if amount > claimable {
            return Err(CapsuleError::ExceedsClaimable {
                requested: amount,
                claimable,
            });
        }
        self.claim.begin();
        Ok(())
    }

    /// Clear the in-flight claim flag. Called whether the claim
    /// confirmed, was denied, or never made it out.
    pub fn end_claim(&mut self) {
        self.claim.clear();
    }

    /// Unlock a confirmed claim amount for withdrawal and stamp the
    /// claim clock. Called only once the remote side has approved.
    pub fn unlock_balance(&mut self, amount: Amount, now: u64) {
        self.withdrawable = self
            .withdrawable
            .checked_add(amount)
            .expect("capsule: withdrawable overflow");
        self.claim.stamp(now);
    }

    /// Move unlocked funds out of the capsule. Both buckets drop
    /// together, as withdrawn ether leaves the capsule entirely.
    pub fn withdraw(&mut self, amount: Amount) -> CapsuleResult<WithdrawReceipt> {
        if amount.is_zero() {
            return Err(CapsuleError::ZeroAmount);
        }
        if amount > self.withdrawable {
            return Err(CapsuleError::InsufficientWithdrawable {
                requested: amount,
                available: self.withdrawable,
            });
        }
        self.withdrawable = self
            .withdrawable
            .checked_sub(amount)
            .expect("capsule: withdrawable underflow");
        self.principal = self
            .principal
            .checked_sub(amount)
            .expect("capsule: withdrawable exceeds principal");
        Ok(WithdrawReceipt { amount })
    }

    /// Put a withdrawal back, consuming its receipt.
    pub fn undo_withdraw(&mut self, receipt: WithdrawReceipt) {
        self.withdrawable = self
            .withdrawable
            .checked_add(receipt.amount)
            .expect("capsule: withdrawable overflow");
        self.principal = self
            .principal
            .checked_add(receipt.amount)
            .expect("capsule: principal overflow");
    }

    /// Record that a registered validator has fully exited and been
    /// swept. Terminal; the pubkey hash can never register again.
    pub fn mark_validator_withdrawn(&mut self, pubkey_hash: &PubkeyHash) -> CapsuleResult<()> {
        let record = self
            .validators
            .get_mut(pubkey_hash)
            .ok_or(CapsuleError::UnknownValidator(*pubkey_hash))?;
        if record.status() != ValidatorStatus::Registered {
            return Err(CapsuleError::InactiveValidator(*pubkey_hash));
        }
        record.mark_withdrawn();
        Ok(())
    }
}
