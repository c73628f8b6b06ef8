//! Transfer payloads: deposits and balance unlock requests.

use causeway_codec::{Codec, CodecError, Decoder, Encoder};
use causeway_primitives::{Amount, PubkeyHash, StakerAddr, TokenId};

/// Payload shared by LST transfer actions.
///
/// [`ActionKind::DepositLst`], [`ActionKind::WithdrawLst`] and
/// [`ActionKind::WithdrawReward`] all carry this layout; the action tag
/// alone decides which ledger bucket the amount moves through.
///
/// [`ActionKind::DepositLst`]: crate::ActionKind::DepositLst
/// [`ActionKind::WithdrawLst`]: crate::ActionKind::WithdrawLst
/// [`ActionKind::WithdrawReward`]: crate::ActionKind::WithdrawReward
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LstTransferData {
    /// Token the transfer is denominated in.
    token: TokenId,

    /// Staker account being credited or debited.
    staker: StakerAddr,

    /// Transfer amount in the token's smallest unit.
    amount: Amount,
}

impl LstTransferData {
    /// Create a new LST transfer payload.
    pub fn new(token: TokenId, staker: StakerAddr, amount: Amount) -> Self {
        Self {
            token,
            staker,
            amount,
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

    /// Get the transfer amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl Codec for LstTransferData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.token.encode(enc)?;
        self.staker.encode(enc)?;
        self.amount.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let token = TokenId::decode(dec)?;
        let staker = StakerAddr::decode(dec)?;
        let amount = Amount::decode(dec)?;
        Ok(Self {
            token,
            staker,
            amount,
        })
    }
}

/// Payload for a proven native-stake deposit.
///
/// Unlike LST deposits the asset is identified by the validator's pubkey
/// hash rather than a token ID; the settlement side books it under the
/// reserved native-stake token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NstDepositData {
    /// Hash of the validator pubkey whose stake is deposited.
    pubkey_hash: PubkeyHash,

    /// Staker account being credited.
    staker: StakerAddr,

    /// Deposit amount in wei.
    amount: Amount,
}

impl NstDepositData {
    /// Create a new native-stake deposit payload.
    pub fn new(pubkey_hash: PubkeyHash, staker: StakerAddr, amount: Amount) -> Self {
        Self {
            pubkey_hash,
            staker,
            amount,
        }
    }

    /// Get the validator pubkey hash.
    pub fn pubkey_hash(&self) -> &PubkeyHash {
        &self.pubkey_hash
    }

    /// Get the staker account.
    pub fn staker(&self) -> &StakerAddr {
        &self.staker
    }

    /// Get the deposit amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl Codec for NstDepositData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.pubkey_hash.encode(enc)?;
        self.staker.encode(enc)?;
        self.amount.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let pubkey_hash = PubkeyHash::decode(dec)?;
        let staker = StakerAddr::decode(dec)?;
        let amount = Amount::decode(dec)?;
        Ok(Self {
            pubkey_hash,
            staker,
            amount,
        })
    }
}

/// Payload for a native-stake unlock request.
///
/// Carries no token field: native stake always lives under the reserved
/// native-stake token, so only the staker and amount travel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NstClaimData {
    /// Staker account requesting the unlock.
    staker: StakerAddr,

    /// Amount to unlock, in wei.
    amount: Amount,
}

impl NstClaimData {
    /// Create a new native-stake claim payload.
    pub fn new(staker: StakerAddr, amount: Amount) -> Self {
        Self { staker, amount }
    }

    /// Get the staker account.
    pub fn staker(&self) -> &StakerAddr {
        &self.staker
    }

    /// Get the unlock amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl Codec for NstClaimData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.staker.encode(enc)?;
        self.amount.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let staker = StakerAddr::decode(dec)?;
        let amount = Amount::decode(dec)?;
        Ok(Self { staker, amount })
    }
}

#[cfg(test)]
mod tests {
    use causeway_codec::{decode_buf_exact, encode_to_vec};
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn test_lst_transfer_codec(
            token in any::<[u8; 32]>(),
            staker in any::<[u8; 32]>(),
            amount in any::<u128>(),
        ) {
            let data = LstTransferData::new(
                TokenId::new(token),
                StakerAddr::new(staker),
                Amount::from_wei(amount),
            );

            let encoded = encode_to_vec(&data).expect("Encoding should succeed");
            prop_assert_eq!(encoded.len(), 96);

            let decoded: LstTransferData =
                decode_buf_exact(&encoded).expect("Decoding should succeed");
            prop_assert_eq!(decoded, data);
        }

        #[test]
        fn test_nst_claim_codec(
            staker in any::<[u8; 32]>(),
            amount in any::<u128>(),
        ) {
            let data = NstClaimData::new(StakerAddr::new(staker), Amount::from_wei(amount));

            let encoded = encode_to_vec(&data).expect("Encoding should succeed");
            prop_assert_eq!(encoded.len(), 64);

            let decoded: NstClaimData =
                decode_buf_exact(&encoded).expect("Decoding should succeed");
            prop_assert_eq!(decoded, data);
        }
    }
}
