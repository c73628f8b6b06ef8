//! The gateway message envelope and its wire form.
//!
//! On the wire every message is a single action tag byte followed by the
//! action's fixed payload layout. Parsing is staged so failures are
//! attributable: an empty buffer, an unknown tag, a length outside the
//! action's layout, and field-level garbage each surface as a different
//! [`MsgError`] variant.

use causeway_codec::{BufEncoder, Codec, decode_buf_exact};

use crate::{
    action::ActionKind,
    control::{BalanceSyncData, RespondData, TokenBudgetData},
    delegation::{DelegationData, OperatorLinkData, OperatorUnlinkData},
    errors::{MsgError, MsgResult},
    transfer::{LstTransferData, NstClaimData, NstDepositData},
};

/// A fully parsed gateway message.
///
/// Actions with identical payload layouts share a payload type; the
/// variant preserves which action was tagged on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayMsg {
    /// LST deposit credit.
    DepositLst(LstTransferData),

    /// Proven native-stake deposit credit.
    DepositNst(NstDepositData),

    /// LST principal unlock request.
    WithdrawLst(LstTransferData),

    /// Native-stake unlock request.
    WithdrawNst(NstClaimData),

    /// Reward unlock request.
    WithdrawReward(LstTransferData),

    /// Delegation request.
    Delegate(DelegationData),

    /// Undelegation request.
    Undelegate(DelegationData),

    /// Deposit and delegation in one message.
    DepositThenDelegate(DelegationData),

    /// Operator association request.
    AssociateOperator(OperatorLinkData),

    /// Operator dissociation request.
    DissociateOperator(OperatorUnlinkData),

    /// Settlement verdict for an earlier request.
    Respond(RespondData),

    /// Channel bootstrap marker, no payload.
    MarkBootstrap,

    /// Token registration with its deposit limit.
    AddWhitelistToken(TokenBudgetData),

    /// Deposit limit update for a registered token.
    UpdateWhitelistToken(TokenBudgetData),

    /// Absolute balance overwrite batch.
    BalanceSync(BalanceSyncData),
}

impl GatewayMsg {
    /// The action this message is tagged with on the wire.
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::DepositLst(_) => ActionKind::DepositLst,
            Self::DepositNst(_) => ActionKind::DepositNst,
            Self::WithdrawLst(_) => ActionKind::WithdrawLst,
            Self::WithdrawNst(_) => ActionKind::WithdrawNst,
            Self::WithdrawReward(_) => ActionKind::WithdrawReward,
            Self::Delegate(_) => ActionKind::Delegate,
            Self::Undelegate(_) => ActionKind::Undelegate,
            Self::DepositThenDelegate(_) => ActionKind::DepositThenDelegate,
            Self::AssociateOperator(_) => ActionKind::AssociateOperator,
            Self::DissociateOperator(_) => ActionKind::DissociateOperator,
            Self::Respond(_) => ActionKind::Respond,
            Self::MarkBootstrap => ActionKind::MarkBootstrap,
            Self::AddWhitelistToken(_) => ActionKind::AddWhitelistToken,
            Self::UpdateWhitelistToken(_) => ActionKind::UpdateWhitelistToken,
            Self::BalanceSync(_) => ActionKind::BalanceSync,
        }
    }

    /// Whether this message expects a [`GatewayMsg::Respond`] answer.
    pub fn expects_response(&self) -> bool {
        self.kind().expects_response()
    }

    /// Parses a message from its full wire form, tag byte included.
    ///
    /// The length gate runs before any payload decoding, so a message of
    /// the wrong size is rejected without inspecting its fields.
    pub fn decode(buf: &[u8]) -> MsgResult<Self> {
        let Some((&tag, body)) = buf.split_first() else {
            return Err(MsgError::Empty);
        };
        let action = ActionKind::try_from(tag).map_err(MsgError::UnsupportedRequest)?;

        let expected = action.wire_len();
        if !expected.admits(buf.len()) {
            return Err(MsgError::InvalidMessageLength {
                action,
                expected,
                got: buf.len(),
            });
        }

        let msg = match action {
            ActionKind::DepositLst => Self::DepositLst(decode_body(action, body)?),
            ActionKind::DepositNst => Self::DepositNst(decode_body(action, body)?),
            ActionKind::WithdrawLst => Self::WithdrawLst(decode_body(action, body)?),
            ActionKind::WithdrawNst => Self::WithdrawNst(decode_body(action, body)?),
            ActionKind::WithdrawReward => Self::WithdrawReward(decode_body(action, body)?),
            ActionKind::Delegate => Self::Delegate(decode_body(action, body)?),
            ActionKind::Undelegate => Self::Undelegate(decode_body(action, body)?),
            ActionKind::DepositThenDelegate => {
                Self::DepositThenDelegate(decode_body(action, body)?)
            }
            ActionKind::AssociateOperator => Self::AssociateOperator(decode_body(action, body)?),
            ActionKind::DissociateOperator => Self::DissociateOperator(decode_body(action, body)?),
            ActionKind::Respond => Self::Respond(decode_body(action, body)?),
            ActionKind::MarkBootstrap => Self::MarkBootstrap,
            ActionKind::AddWhitelistToken => Self::AddWhitelistToken(decode_body(action, body)?),
            ActionKind::UpdateWhitelistToken => {
                Self::UpdateWhitelistToken(decode_body(action, body)?)
            }
            ActionKind::BalanceSync => Self::BalanceSync(decode_body(action, body)?),
        };
        Ok(msg)
    }

    /// Serializes the message to its full wire form, tag byte included.
    pub fn to_wire(&self) -> MsgResult<Vec<u8>> {
        let mut enc = BufEncoder::new();
        u8::from(self.kind()).encode(&mut enc)?;
        match self {
            Self::DepositLst(data) | Self::WithdrawLst(data) | Self::WithdrawReward(data) => {
                data.encode(&mut enc)?
            }
            Self::DepositNst(data) => data.encode(&mut enc)?,
            Self::WithdrawNst(data) => data.encode(&mut enc)?,
            Self::Delegate(data) | Self::Undelegate(data) | Self::DepositThenDelegate(data) => {
                data.encode(&mut enc)?
            }
            Self::AssociateOperator(data) => data.encode(&mut enc)?,
            Self::DissociateOperator(data) => data.encode(&mut enc)?,
            Self::Respond(data) => data.encode(&mut enc)?,
            Self::MarkBootstrap => {}
            Self::AddWhitelistToken(data) | Self::UpdateWhitelistToken(data) => {
                data.encode(&mut enc)?
            }
            Self::BalanceSync(data) => data.encode(&mut enc)?,
        }
        Ok(enc.into_inner())
    }
}

fn decode_body<T: Codec>(action: ActionKind, body: &[u8]) -> MsgResult<T> {
    decode_buf_exact(body).map_err(|source| MsgError::MalformedPayload { action, source })
}

#[cfg(test)]
mod tests {
    use causeway_codec::CodecError;
    use causeway_primitives::{Amount, Nonce, OperatorAddr, PubkeyHash, StakerAddr, TokenId};
    use hex_literal::hex;

    use super::*;
    use crate::{
        action::WireLen,
        control::{BalanceKind, BalanceSyncEntry},
    };

    fn test_operator() -> OperatorAddr {
        OperatorAddr::try_from_str("im13hasr43vvq8v44xpzh0l6yuym4kca9mvf6sh3aq").unwrap()
    }

    #[test]
    fn test_respond_golden_vector() {
        let msg = GatewayMsg::Respond(RespondData::new(Nonce::new(7), true));
        let wire = msg.to_wire().unwrap();
        assert_eq!(wire, hex!("0a 0000000000000007 01"));
        assert_eq!(GatewayMsg::decode(&wire).unwrap(), msg);
    }

    #[test]
    fn test_deposit_lst_golden_vector() {
        // 1 ETH in wei is 0x0de0b6b3a7640000, right-aligned in the 32-byte
        // amount slot.
        let msg = GatewayMsg::DepositLst(LstTransferData::new(
            TokenId::new([0x11; 32]),
            StakerAddr::new([0x22; 32]),
            Amount::from_wei(1_000_000_000_000_000_000),
        ));
        let wire = msg.to_wire().unwrap();
        assert_eq!(
            wire,
            hex!(
                "00"
                "1111111111111111111111111111111111111111111111111111111111111111"
                "2222222222222222222222222222222222222222222222222222222222222222"
                "0000000000000000000000000000000000000000000000000de0b6b3a7640000"
            )
        );
        assert_eq!(GatewayMsg::decode(&wire).unwrap(), msg);
    }

    #[test]
    fn test_mark_bootstrap_golden_vector() {
        let wire = GatewayMsg::MarkBootstrap.to_wire().unwrap();
        assert_eq!(wire, hex!("0b"));
        assert_eq!(GatewayMsg::decode(&wire).unwrap(), GatewayMsg::MarkBootstrap);

        // The bootstrap marker carries no payload at all.
        let res = GatewayMsg::decode(&hex!("0b 00"));
        assert!(matches!(
            res,
            Err(MsgError::InvalidMessageLength {
                action: ActionKind::MarkBootstrap,
                expected: WireLen::Exact(1),
                got: 2,
            })
        ));
    }

    #[test]
    fn test_empty_message() {
        assert!(matches!(GatewayMsg::decode(&[]), Err(MsgError::Empty)));
    }

    #[test]
    fn test_unknown_tag_is_unsupported() {
        // A plausible-length message with an out-of-catalogue tag must be
        // reported as unsupported, not as a length failure.
        let mut buf = vec![0u8; 97];
        buf[0] = 0x0f;
        assert!(matches!(
            GatewayMsg::decode(&buf),
            Err(MsgError::UnsupportedRequest(0x0f))
        ));

        let mut buf = vec![0u8; 97];
        buf[0] = 0xff;
        assert!(matches!(
            GatewayMsg::decode(&buf),
            Err(MsgError::UnsupportedRequest(0xff))
        ));
    }

    #[test]
    fn test_known_tag_wrong_length() {
        // Truncated by one byte.
        let buf = vec![0u8; 96];
        assert!(matches!(
            GatewayMsg::decode(&buf),
            Err(MsgError::InvalidMessageLength {
                action: ActionKind::DepositLst,
                expected: WireLen::Exact(97),
                got: 96,
            })
        ));

        // Extended by one byte.
        let buf = vec![0u8; 98];
        assert!(matches!(
            GatewayMsg::decode(&buf),
            Err(MsgError::InvalidMessageLength {
                action: ActionKind::DepositLst,
                expected: WireLen::Exact(97),
                got: 98,
            })
        ));
    }

    #[test]
    fn test_amount_high_bytes_rejected() {
        let msg = GatewayMsg::DepositLst(LstTransferData::new(
            TokenId::new([0x11; 32]),
            StakerAddr::new([0x22; 32]),
            Amount::from_wei(1),
        ));
        let mut wire = msg.to_wire().unwrap();

        // Flip a bit in the amount slot's zero prefix.
        wire[65] = 0x01;
        let res = GatewayMsg::decode(&wire);
        assert!(matches!(
            res,
            Err(MsgError::MalformedPayload {
                action: ActionKind::DepositLst,
                source: CodecError::MalformedField("amount"),
            })
        ));
    }

    #[test]
    fn test_respond_bad_verdict_byte() {
        let mut wire = GatewayMsg::Respond(RespondData::new(Nonce::new(1), false))
            .to_wire()
            .unwrap();
        wire[9] = 0x02;
        assert!(matches!(
            GatewayMsg::decode(&wire),
            Err(MsgError::MalformedPayload {
                action: ActionKind::Respond,
                source: CodecError::InvalidVariant("bool"),
            })
        ));
    }

    #[test]
    fn test_balance_sync_lengths() {
        let entry = BalanceSyncEntry::new(
            TokenId::new([3; 32]),
            StakerAddr::new([4; 32]),
            BalanceKind::Reward,
            Amount::from_wei(42),
        );
        let msg =
            GatewayMsg::BalanceSync(BalanceSyncData::new(vec![entry.clone(), entry]).unwrap());
        let wire = msg.to_wire().unwrap();
        assert_eq!(wire.len(), 3 + 2 * 97);
        assert_eq!(GatewayMsg::decode(&wire).unwrap(), msg);

        // Below the one-entry minimum the length gate fires.
        let res = GatewayMsg::decode(&wire[..99]);
        assert!(matches!(
            res,
            Err(MsgError::InvalidMessageLength {
                action: ActionKind::BalanceSync,
                expected: WireLen::AtLeast(100),
                got: 99,
            })
        ));

        // Long enough for the gate but not a whole number of entries.
        let res = GatewayMsg::decode(&wire[..150]);
        assert!(matches!(
            res,
            Err(MsgError::MalformedPayload {
                action: ActionKind::BalanceSync,
                ..
            })
        ));
    }

    #[test]
    fn test_all_actions_roundtrip() {
        let lst = LstTransferData::new(
            TokenId::new([0xaa; 32]),
            StakerAddr::new([0xbb; 32]),
            Amount::from_wei(77),
        );
        let delegation = DelegationData::new(
            TokenId::new([0xaa; 32]),
            StakerAddr::new([0xbb; 32]),
            test_operator(),
            Amount::from_wei(88),
        );
        let sync = BalanceSyncData::new(vec![BalanceSyncEntry::new(
            TokenId::new([0xaa; 32]),
            StakerAddr::new([0xbb; 32]),
            BalanceKind::Principal,
            Amount::from_wei(99),
        )])
        .unwrap();

        let msgs = [
            GatewayMsg::DepositLst(lst.clone()),
            GatewayMsg::DepositNst(NstDepositData::new(
                PubkeyHash::new([0xcc; 32]),
                StakerAddr::new([0xbb; 32]),
                Amount::from_wei(66),
            )),
            GatewayMsg::WithdrawLst(lst.clone()),
            GatewayMsg::WithdrawNst(NstClaimData::new(
                StakerAddr::new([0xbb; 32]),
                Amount::from_wei(55),
            )),
            GatewayMsg::WithdrawReward(lst),
            GatewayMsg::Delegate(delegation.clone()),
            GatewayMsg::Undelegate(delegation.clone()),
            GatewayMsg::DepositThenDelegate(delegation),
            GatewayMsg::AssociateOperator(OperatorLinkData::new(
                StakerAddr::new([0xbb; 32]),
                test_operator(),
            )),
            GatewayMsg::DissociateOperator(OperatorUnlinkData::new(StakerAddr::new([0xbb; 32]))),
            GatewayMsg::Respond(RespondData::new(Nonce::new(12), false)),
            GatewayMsg::MarkBootstrap,
            GatewayMsg::AddWhitelistToken(TokenBudgetData::new(
                TokenId::new([0xaa; 32]),
                Amount::from_wei(1_000_000),
            )),
            GatewayMsg::UpdateWhitelistToken(TokenBudgetData::new(
                TokenId::new([0xaa; 32]),
                Amount::from_wei(2_000_000),
            )),
            GatewayMsg::BalanceSync(sync),
        ];

        for msg in msgs {
            let wire = msg.to_wire().unwrap();
            assert_eq!(wire[0], u8::from(msg.kind()));
            assert!(msg.kind().wire_len().admits(wire.len()));
            let decoded = GatewayMsg::decode(&wire).unwrap();
            assert_eq!(decoded, msg, "roundtrip failed for {}", msg.kind());
        }
    }
}
