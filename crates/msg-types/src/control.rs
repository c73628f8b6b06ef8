//! Control-plane payloads: responses, token registration, balance sync.

use std::fmt;

use causeway_codec::{Codec, CodecError, Decoder, Encoder};
use causeway_primitives::{Amount, Nonce, StakerAddr, TokenId};
use int_enum::IntEnum;

/// Payload carrying the settlement verdict for an earlier request.
///
/// The nonce is the outbound nonce the request was sent under on its own
/// channel, which is how the requester finds the pending entry to settle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespondData {
    /// Nonce the original request was sent under.
    origin_nonce: Nonce,

    /// Whether the requested operation was applied.
    success: bool,
}

impl RespondData {
    /// Create a new response payload.
    pub fn new(origin_nonce: Nonce, success: bool) -> Self {
        Self {
            origin_nonce,
            success,
        }
    }

    /// Get the nonce of the request being answered.
    pub fn origin_nonce(&self) -> Nonce {
        self.origin_nonce
    }

    /// Whether the request succeeded remotely.
    pub fn success(&self) -> bool {
        self.success
    }
}

impl Codec for RespondData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.origin_nonce.encode(enc)?;
        self.success.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let origin_nonce = Nonce::decode(dec)?;
        let success = bool::decode(dec)?;
        Ok(Self {
            origin_nonce,
            success,
        })
    }
}

/// Payload shared by the token whitelist actions.
///
/// [`ActionKind::AddWhitelistToken`] carries the initial deposit limit,
/// [`ActionKind::UpdateWhitelistToken`] a replacement limit.
///
/// [`ActionKind::AddWhitelistToken`]: crate::ActionKind::AddWhitelistToken
/// [`ActionKind::UpdateWhitelistToken`]: crate::ActionKind::UpdateWhitelistToken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenBudgetData {
    /// Token being registered or updated.
    token: TokenId,

    /// Total value locked limit for deposits, in the token's smallest unit.
    tvl_limit: Amount,
}

impl TokenBudgetData {
    /// Create a new token budget payload.
    pub fn new(token: TokenId, tvl_limit: Amount) -> Self {
        Self { token, tvl_limit }
    }

    /// Get the token.
    pub fn token(&self) -> &TokenId {
        &self.token
    }

    /// Get the deposit limit.
    pub fn tvl_limit(&self) -> Amount {
        self.tvl_limit
    }
}

impl Codec for TokenBudgetData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.token.encode(enc)?;
        self.tvl_limit.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let token = TokenId::decode(dec)?;
        let tvl_limit = Amount::decode(dec)?;
        Ok(Self { token, tvl_limit })
    }
}

/// Raw primitive version of a balance kind tag.
pub type RawBalanceKind = u8;

/// Which ledger bucket a balance sync entry overwrites.
#[repr(u8)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, IntEnum)]
pub enum BalanceKind {
    /// Principal balance deposited by the staker.
    Principal = 0,

    /// Reward balance accrued on the settlement side.
    Reward = 1,
}

impl Codec for BalanceKind {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        enc.write_buf(&[u8::from(*self)])
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let [raw] = dec.read_arr::<1>()?;
        Self::try_from(raw).map_err(|_| CodecError::InvalidVariant("BalanceKind"))
    }
}

impl fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Principal => "principal",
            Self::Reward => "reward",
        };
        write!(f, "{}", s)
    }
}

/// One absolute balance overwrite within a [`BalanceSyncData`] batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSyncEntry {
    /// Token of the account being overwritten.
    token: TokenId,

    /// Staker of the account being overwritten.
    staker: StakerAddr,

    /// Which bucket the value replaces.
    kind: BalanceKind,

    /// The new absolute balance.
    value: Amount,
}

impl BalanceSyncEntry {
    /// Create a new sync entry.
    pub fn new(token: TokenId, staker: StakerAddr, kind: BalanceKind, value: Amount) -> Self {
        Self {
            token,
            staker,
            kind,
            value,
        }
    }

    /// Get the token.
    pub fn token(&self) -> &TokenId {
        &self.token
    }

    /// Get the staker account.
    pub fn staker(&self) -> &StakerAddr {
        &self.staker
    }

    /// Get the bucket kind.
    pub fn kind(&self) -> BalanceKind {
        self.kind
    }

    /// Get the new absolute balance.
    pub fn value(&self) -> Amount {
        self.value
    }
}

impl Codec for BalanceSyncEntry {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.token.encode(enc)?;
        self.staker.encode(enc)?;
        self.kind.encode(enc)?;
        self.value.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let token = TokenId::decode(dec)?;
        let staker = StakerAddr::decode(dec)?;
        let kind = BalanceKind::decode(dec)?;
        let value = Amount::decode(dec)?;
        Ok(Self {
            token,
            staker,
            kind,
            value,
        })
    }
}

/// Payload overwriting a batch of staker balances with settlement truth.
///
/// The batch is never empty and is length-prefixed with a `u16` count on
/// the wire, so a single message can carry at most [`u16::MAX`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceSyncData {
    /// The overwrites, applied in order.
    entries: Vec<BalanceSyncEntry>,
}

impl BalanceSyncData {
    /// Create a new sync batch.
    ///
    /// Returns `None` for an empty batch or one exceeding the `u16` count
    /// prefix.
    pub fn new(entries: Vec<BalanceSyncEntry>) -> Option<Self> {
        if entries.is_empty() || entries.len() > u16::MAX as usize {
            return None;
        }
        Some(Self { entries })
    }

    /// Get the entries.
    pub fn entries(&self) -> &[BalanceSyncEntry] {
        &self.entries
    }

    /// Takes out the inner entries.
    pub fn into_entries(self) -> Vec<BalanceSyncEntry> {
        self.entries
    }
}

impl Codec for BalanceSyncData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        let count: u16 = self
            .entries
            .len()
            .try_into()
            .map_err(|_| CodecError::OverflowContainer)?;
        count.encode(enc)?;
        for entry in &self.entries {
            entry.encode(enc)?;
        }
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let count = u16::decode(dec)?;
        if count == 0 {
            return Err(CodecError::MalformedField("balance sync batch"));
        }

        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            entries.push(BalanceSyncEntry::decode(dec)?);
        }
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use causeway_codec::{decode_buf_exact, encode_to_vec};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_respond_layout() {
        let data = RespondData::new(Nonce::new(7), true);
        let encoded = encode_to_vec(&data).expect("Encoding should succeed");
        assert_eq!(encoded, vec![0, 0, 0, 0, 0, 0, 0, 7, 1]);
    }

    #[test]
    fn test_respond_strict_success_byte() {
        // Only 0x00 and 0x01 are admissible verdict bytes.
        let mut buf = vec![0u8; 9];
        buf[7] = 3;
        buf[8] = 2;
        let res = decode_buf_exact::<RespondData>(&buf);
        assert!(matches!(res, Err(CodecError::InvalidVariant("bool"))));
    }

    #[test]
    fn test_balance_kind_tags() {
        assert_eq!(u8::from(BalanceKind::Principal), 0);
        assert_eq!(u8::from(BalanceKind::Reward), 1);
        assert!(BalanceKind::try_from(2u8).is_err());
    }

    #[test]
    fn test_balance_sync_rejects_empty() {
        assert!(BalanceSyncData::new(Vec::new()).is_none());

        // A zero count on the wire is also rejected.
        let res = decode_buf_exact::<BalanceSyncData>(&[0, 0]);
        assert!(matches!(
            res,
            Err(CodecError::MalformedField("balance sync batch"))
        ));
    }

    #[test]
    fn test_balance_sync_count_must_match() {
        let entry = BalanceSyncEntry::new(
            TokenId::new([1; 32]),
            StakerAddr::new([2; 32]),
            BalanceKind::Principal,
            Amount::from_wei(5),
        );
        let batch = BalanceSyncData::new(vec![entry]).unwrap();
        let mut encoded = encode_to_vec(&batch).expect("Encoding should succeed");

        // Claim two entries but carry one.
        encoded[1] = 2;
        let res = decode_buf_exact::<BalanceSyncData>(&encoded);
        assert!(matches!(res, Err(CodecError::UnexpectedEnd { .. })));

        // Claim one entry but carry trailing garbage.
        encoded[1] = 1;
        encoded.push(0xff);
        let res = decode_buf_exact::<BalanceSyncData>(&encoded);
        assert!(matches!(res, Err(CodecError::TrailingBytes(1))));
    }

    proptest! {
        #[test]
        fn test_balance_sync_codec(
            seeds in prop::collection::vec(any::<([u8; 32], [u8; 32], bool, u128)>(), 1..16),
        ) {
            let entries = seeds
                .into_iter()
                .map(|(token, staker, reward, value)| {
                    let kind = if reward {
                        BalanceKind::Reward
                    } else {
                        BalanceKind::Principal
                    };
                    BalanceSyncEntry::new(
                        TokenId::new(token),
                        StakerAddr::new(staker),
                        kind,
                        Amount::from_wei(value),
                    )
                })
                .collect::<Vec<_>>();
            let count = entries.len();

            let batch = BalanceSyncData::new(entries).expect("batch is non-empty");
            let encoded = encode_to_vec(&batch).expect("Encoding should succeed");
            prop_assert_eq!(encoded.len(), 2 + count * 97);

            let decoded: BalanceSyncData =
                decode_buf_exact(&encoded).expect("Decoding should succeed");
            prop_assert_eq!(decoded, batch);
        }
    }
}
