use std::fmt;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use causeway_codec::{Codec, CodecError, Decoder, Encoder};
use serde::{Deserialize, Serialize};

/// A token or stake value in settlement units (wei).
///
/// Arithmetic is checked only; balance bookkeeping treats a wrap as a logic
/// error and surfaces it instead of saturating.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    BorshDeserialize,
    BorshSerialize,
    Deserialize,
    Serialize,
)]
pub struct Amount(u128);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Self(0);

    /// The maximum value of an amount.
    pub const MAX: Amount = Self(u128::MAX);

    /// Serialized length of the wire slot: one full 32-byte word.
    pub const SIZE: usize = 32;

    /// The number of wei in 1 gwei.
    pub const GWEI_FACTOR: u128 = 1_000_000_000;

    /// Get the number of wei in this [`Amount`].
    pub fn to_wei(&self) -> u128 {
        self.0
    }

    /// Create an [`Amount`] from a wei value.
    pub const fn from_wei(value: u128) -> Self {
        Self(value)
    }

    /// Create an [`Amount`] from a gwei value, scaling to wei.
    ///
    /// Cannot overflow: the largest `u64` gwei value scaled by
    /// [`Self::GWEI_FACTOR`] stays far inside `u128`.
    pub const fn from_gwei(value: u64) -> Self {
        Self(value as u128 * Self::GWEI_FACTOR)
    }

    /// Checked addition. Returns [`None`] if overflow occurred.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self::from_wei)
    }

    /// Checked subtraction. Returns [`None`] if overflow occurred.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self::from_wei)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Offset of the value bytes inside the 32-byte wire slot.
const SLOT_PAD: usize = Amount::SIZE - size_of::<u128>();

impl Codec for Amount {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        let mut slot = [0u8; Amount::SIZE];
        slot[SLOT_PAD..].copy_from_slice(&self.0.to_be_bytes());
        enc.write_buf(&slot)
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let slot = dec.read_arr::<{ Amount::SIZE }>()?;

        // The wire slot is a full 256-bit word; values past the in-memory
        // width cannot be represented and must not truncate silently.
        if slot[..SLOT_PAD].iter().any(|b| *b != 0) {
            return Err(CodecError::MalformedField("amount"));
        }

        let mut raw = [0u8; size_of::<u128>()];
        raw.copy_from_slice(&slot[SLOT_PAD..]);
        Ok(Self(u128::from_be_bytes(raw)))
    }
}
