//! Delegation payloads and operator association payloads.

use causeway_codec::{Codec, CodecError, Decoder, Encoder};
use causeway_primitives::{Amount, OperatorAddr, StakerAddr, TokenId};

/// Payload shared by the delegation actions.
///
/// [`ActionKind::Delegate`], [`ActionKind::Undelegate`] and
/// [`ActionKind::DepositThenDelegate`] all carry this layout.
///
/// [`ActionKind::Delegate`]: crate::ActionKind::Delegate
/// [`ActionKind::Undelegate`]: crate::ActionKind::Undelegate
/// [`ActionKind::DepositThenDelegate`]: crate::ActionKind::DepositThenDelegate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationData {
    /// Token the delegated balance is denominated in.
    token: TokenId,

    /// Staker whose balance moves.
    staker: StakerAddr,

    /// Operator receiving or returning the delegation.
    operator: OperatorAddr,

    /// Amount to move, in the token's smallest unit.
    amount: Amount,
}

impl DelegationData {
    /// Create a new delegation payload.
    pub fn new(token: TokenId, staker: StakerAddr, operator: OperatorAddr, amount: Amount) -> Self {
        Self {
            token,
            staker,
            operator,
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

    /// Get the operator.
    pub fn operator(&self) -> &OperatorAddr {
        &self.operator
    }

    /// Get the delegation amount.
    pub fn amount(&self) -> Amount {
        self.amount
    }
}

impl Codec for DelegationData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.token.encode(enc)?;
        self.staker.encode(enc)?;
        self.operator.encode(enc)?;
        self.amount.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let token = TokenId::decode(dec)?;
        let staker = StakerAddr::decode(dec)?;
        let operator = OperatorAddr::decode(dec)?;
        let amount = Amount::decode(dec)?;
        Ok(Self {
            token,
            staker,
            operator,
            amount,
        })
    }
}

/// Payload binding a staker to an operator for reward attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorLinkData {
    /// Staker being bound.
    staker: StakerAddr,

    /// Operator the staker binds to.
    operator: OperatorAddr,
}

impl OperatorLinkData {
    /// Create a new operator association payload.
    pub fn new(staker: StakerAddr, operator: OperatorAddr) -> Self {
        Self { staker, operator }
    }

    /// Get the staker account.
    pub fn staker(&self) -> &StakerAddr {
        &self.staker
    }

    /// Get the operator.
    pub fn operator(&self) -> &OperatorAddr {
        &self.operator
    }
}

impl Codec for OperatorLinkData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.staker.encode(enc)?;
        self.operator.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let staker = StakerAddr::decode(dec)?;
        let operator = OperatorAddr::decode(dec)?;
        Ok(Self { staker, operator })
    }
}

/// Payload dropping a staker's operator binding.
///
/// Names only the staker; the settlement side knows the current binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorUnlinkData {
    /// Staker whose binding is dropped.
    staker: StakerAddr,
}

impl OperatorUnlinkData {
    /// Create a new operator dissociation payload.
    pub fn new(staker: StakerAddr) -> Self {
        Self { staker }
    }

    /// Get the staker account.
    pub fn staker(&self) -> &StakerAddr {
        &self.staker
    }
}

impl Codec for OperatorUnlinkData {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        self.staker.encode(enc)?;
        Ok(())
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let staker = StakerAddr::decode(dec)?;
        Ok(Self { staker })
    }
}

#[cfg(test)]
mod tests {
    use causeway_codec::{decode_buf_exact, encode_to_vec};
    use proptest::prelude::*;

    use super::*;

    fn test_operator() -> OperatorAddr {
        OperatorAddr::try_from_str("im13hasr43vvq8v44xpzh0l6yuym4kca9mvf6sh3aq").unwrap()
    }

    #[test]
    fn test_operator_link_layout() {
        let data = OperatorLinkData::new(StakerAddr::new([0x11; 32]), test_operator());
        let encoded = encode_to_vec(&data).expect("Encoding should succeed");
        assert_eq!(encoded.len(), 74);
        assert_eq!(&encoded[..32], &[0x11; 32]);
        assert_eq!(&encoded[32..], test_operator().as_str().as_bytes());
    }

    proptest! {
        #[test]
        fn test_delegation_codec(
            token in any::<[u8; 32]>(),
            staker in any::<[u8; 32]>(),
            amount in any::<u128>(),
        ) {
            let data = DelegationData::new(
                TokenId::new(token),
                StakerAddr::new(staker),
                test_operator(),
                Amount::from_wei(amount),
            );

            let encoded = encode_to_vec(&data).expect("Encoding should succeed");
            prop_assert_eq!(encoded.len(), 138);

            let decoded: DelegationData =
                decode_buf_exact(&encoded).expect("Decoding should succeed");
            prop_assert_eq!(decoded, data);
        }
    }
}
