//! Per-validator lifecycle records and claim gating state.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};

/// Lifecycle of one validator with respect to one capsule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum ValidatorStatus {
    /// No record exists; the state of every unknown pubkey hash.
    Unregistered,

    /// Proven against a beacon block root and counted into the capsule
    /// principal.
    Registered,

    /// Fully exited and swept out of the capsule. Terminal.
    Withdrawn,
}

impl fmt::Display for ValidatorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unregistered => "unregistered",
            Self::Registered => "registered",
            Self::Withdrawn => "withdrawn",
        };
        f.write_str(s)
    }
}

/// Registration record for one validator pubkey hash.
///
/// Records are only ever created in the `Registered` state; an
/// unregistered validator is the absence of a record.
#[derive(Copy, Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ValidatorRecord {
    status: ValidatorStatus,
    index: u64,
}

impl ValidatorRecord {
    pub(crate) fn registered(index: u64) -> Self {
        Self {
            status: ValidatorStatus::Registered,
            index,
        }
    }

    pub fn status(&self) -> ValidatorStatus {
        self.status
    }

    /// Registry index the validator was proven at.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub(crate) fn mark_withdrawn(&mut self) {
        self.status = ValidatorStatus::Withdrawn;
    }
}

/// Claim gating state, one per capsule.
///
/// At most one native stake claim may be in flight, and a new one may
/// not start until a minimum interval after the last confirmed claim.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ClaimState {
    in_progress: bool,

    /// Timestamp of the last claim confirmation, zero if none yet.
    last_claim_timestamp: u64,
}

impl ClaimState {
    pub(crate) fn new() -> Self {
        Self {
            in_progress: false,
            last_claim_timestamp: 0,
        }
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn last_claim_timestamp(&self) -> u64 {
        self.last_claim_timestamp
    }

    pub(crate) fn begin(&mut self) {
        self.in_progress = true;
    }

    pub(crate) fn clear(&mut self) {
        self.in_progress = false;
    }

    pub(crate) fn stamp(&mut self, now: u64) {
        self.last_claim_timestamp = now;
    }
}
