use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use causeway_primitives::{
    Amount, OPERATOR_ADDR_LEN, PUBKEY_HASH_LEN, STAKER_ADDR_LEN, TOKEN_ID_LEN,
};
use int_enum::IntEnum;

/// Raw primitive version of an action tag. Defined here for convenience.
pub type RawActionKind = u8;

/// Length of the leading action tag byte.
pub const TAG_LEN: usize = 1;

const LST_TRANSFER_LEN: usize = TAG_LEN + TOKEN_ID_LEN + STAKER_ADDR_LEN + Amount::SIZE;
const NST_DEPOSIT_LEN: usize = TAG_LEN + PUBKEY_HASH_LEN + STAKER_ADDR_LEN + Amount::SIZE;
const NST_CLAIM_LEN: usize = TAG_LEN + STAKER_ADDR_LEN + Amount::SIZE;
const DELEGATION_LEN: usize =
    TAG_LEN + TOKEN_ID_LEN + STAKER_ADDR_LEN + OPERATOR_ADDR_LEN + Amount::SIZE;
const OPERATOR_LINK_LEN: usize = TAG_LEN + STAKER_ADDR_LEN + OPERATOR_ADDR_LEN;
const OPERATOR_UNLINK_LEN: usize = TAG_LEN + STAKER_ADDR_LEN;
const RESPOND_LEN: usize = TAG_LEN + size_of::<u64>() + 1;
const MARK_BOOTSTRAP_LEN: usize = TAG_LEN;
const TOKEN_BUDGET_LEN: usize = TAG_LEN + TOKEN_ID_LEN + Amount::SIZE;

/// Byte width of one balance sync entry: token, staker, kind tag, value.
pub const SYNC_ENTRY_LEN: usize = TOKEN_ID_LEN + STAKER_ADDR_LEN + 1 + Amount::SIZE;
const SYNC_HEADER_LEN: usize = TAG_LEN + size_of::<u16>();
const SYNC_MIN_LEN: usize = SYNC_HEADER_LEN + SYNC_ENTRY_LEN;

/// Distinguishes the message kinds carried between the gateways.
///
/// The tag values are a pinned wire contract shared with deployed peers;
/// they must never be renumbered.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, IntEnum, BorshSerialize,
    BorshDeserialize,
)]
#[borsh(use_discriminant = true)]
pub enum ActionKind {
    /// LST deposit credit, client to settlement.
    DepositLst = 0x00,

    /// Proven native-stake deposit credit, client to settlement.
    DepositNst = 0x01,

    /// Request to unlock LST principal.
    WithdrawLst = 0x02,

    /// Request to unlock native-stake balance.
    WithdrawNst = 0x03,

    /// Request to unlock accrued reward.
    WithdrawReward = 0x04,

    /// Request to delegate free balance to an operator.
    Delegate = 0x05,

    /// Request to return delegated balance from an operator.
    Undelegate = 0x06,

    /// Deposit immediately followed by a delegation of the same amount.
    DepositThenDelegate = 0x07,

    /// Request to bind a staker to an operator.
    AssociateOperator = 0x08,

    /// Request to drop a staker's operator binding.
    DissociateOperator = 0x09,

    /// Settlement verdict for an earlier request, matched by nonce.
    Respond = 0x0a,

    /// Marks the client channel as live for user operations.
    MarkBootstrap = 0x0b,

    /// Registers a token on the client, creating its vault.
    AddWhitelistToken = 0x0c,

    /// Updates the deposit limit of a registered token.
    UpdateWhitelistToken = 0x0d,

    /// Absolute balance overwrite for a batch of staker accounts.
    BalanceSync = 0x0e,
}

impl ActionKind {
    /// Whether the settlement side answers this action with a
    /// [`ActionKind::Respond`] carrying the request's nonce.
    ///
    /// Deposits are deliberately absent: a deposit that passed client
    /// admission cannot fail remotely, so it has no response path and no
    /// rollback path.
    pub fn expects_response(&self) -> bool {
        matches!(
            self,
            Self::WithdrawLst
                | Self::WithdrawNst
                | Self::WithdrawReward
                | Self::Delegate
                | Self::Undelegate
                | Self::DepositThenDelegate
                | Self::AssociateOperator
                | Self::DissociateOperator
        )
    }

    /// Whether this action originates on the client side of a channel.
    pub fn is_client_origin(&self) -> bool {
        matches!(
            self,
            Self::DepositLst
                | Self::DepositNst
                | Self::WithdrawLst
                | Self::WithdrawNst
                | Self::WithdrawReward
                | Self::Delegate
                | Self::Undelegate
                | Self::DepositThenDelegate
                | Self::AssociateOperator
                | Self::DissociateOperator
        )
    }

    /// Expected wire length of the full message, tag byte included.
    pub fn wire_len(&self) -> WireLen {
        match self {
            Self::DepositLst | Self::WithdrawLst | Self::WithdrawReward => {
                WireLen::Exact(LST_TRANSFER_LEN)
            }
            Self::DepositNst => WireLen::Exact(NST_DEPOSIT_LEN),
            Self::WithdrawNst => WireLen::Exact(NST_CLAIM_LEN),
            Self::Delegate | Self::Undelegate | Self::DepositThenDelegate => {
                WireLen::Exact(DELEGATION_LEN)
            }
            Self::AssociateOperator => WireLen::Exact(OPERATOR_LINK_LEN),
            Self::DissociateOperator => WireLen::Exact(OPERATOR_UNLINK_LEN),
            Self::Respond => WireLen::Exact(RESPOND_LEN),
            Self::MarkBootstrap => WireLen::Exact(MARK_BOOTSTRAP_LEN),
            Self::AddWhitelistToken | Self::UpdateWhitelistToken => {
                WireLen::Exact(TOKEN_BUDGET_LEN)
            }
            Self::BalanceSync => WireLen::AtLeast(SYNC_MIN_LEN),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DepositLst => "deposit_lst",
            Self::DepositNst => "deposit_nst",
            Self::WithdrawLst => "withdraw_lst",
            Self::WithdrawNst => "withdraw_nst",
            Self::WithdrawReward => "withdraw_reward",
            Self::Delegate => "delegate",
            Self::Undelegate => "undelegate",
            Self::DepositThenDelegate => "deposit_then_delegate",
            Self::AssociateOperator => "associate_operator",
            Self::DissociateOperator => "dissociate_operator",
            Self::Respond => "respond",
            Self::MarkBootstrap => "mark_bootstrap",
            Self::AddWhitelistToken => "add_whitelist_token",
            Self::UpdateWhitelistToken => "update_whitelist_token",
            Self::BalanceSync => "balance_sync",
        };
        write!(f, "{}", s)
    }
}

/// Wire length requirement for an action's full message.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WireLen {
    /// The message must be exactly this long.
    Exact(usize),

    /// The message must be at least this long (count-bearing payloads).
    AtLeast(usize),
}

impl WireLen {
    pub fn admits(&self, len: usize) -> bool {
        match self {
            Self::Exact(n) => len == *n,
            Self::AtLeast(n) => len >= *n,
        }
    }
}

impl fmt::Display for WireLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{}", n),
            Self::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_wire_lengths() {
        // These totals are part of the deployed wire contract.
        assert_eq!(ActionKind::DepositLst.wire_len(), WireLen::Exact(97));
        assert_eq!(ActionKind::DepositNst.wire_len(), WireLen::Exact(97));
        assert_eq!(ActionKind::WithdrawLst.wire_len(), WireLen::Exact(97));
        assert_eq!(ActionKind::WithdrawNst.wire_len(), WireLen::Exact(65));
        assert_eq!(ActionKind::WithdrawReward.wire_len(), WireLen::Exact(97));
        assert_eq!(ActionKind::Delegate.wire_len(), WireLen::Exact(139));
        assert_eq!(ActionKind::Undelegate.wire_len(), WireLen::Exact(139));
        assert_eq!(
            ActionKind::DepositThenDelegate.wire_len(),
            WireLen::Exact(139)
        );
        assert_eq!(ActionKind::AssociateOperator.wire_len(), WireLen::Exact(75));
        assert_eq!(
            ActionKind::DissociateOperator.wire_len(),
            WireLen::Exact(33)
        );
        assert_eq!(ActionKind::Respond.wire_len(), WireLen::Exact(10));
        assert_eq!(ActionKind::MarkBootstrap.wire_len(), WireLen::Exact(1));
        assert_eq!(
            ActionKind::AddWhitelistToken.wire_len(),
            WireLen::Exact(65)
        );
        assert_eq!(
            ActionKind::UpdateWhitelistToken.wire_len(),
            WireLen::Exact(65)
        );
        assert_eq!(ActionKind::BalanceSync.wire_len(), WireLen::AtLeast(100));
    }

    #[test]
    fn test_response_set() {
        let responding = [
            ActionKind::WithdrawLst,
            ActionKind::WithdrawNst,
            ActionKind::WithdrawReward,
            ActionKind::Delegate,
            ActionKind::Undelegate,
            ActionKind::DepositThenDelegate,
            ActionKind::AssociateOperator,
            ActionKind::DissociateOperator,
        ];
        for kind in responding {
            assert!(kind.expects_response(), "{kind} should expect a response");
        }

        assert!(!ActionKind::DepositLst.expects_response());
        assert!(!ActionKind::DepositNst.expects_response());
        assert!(!ActionKind::Respond.expects_response());
        assert!(!ActionKind::BalanceSync.expects_response());
    }

    #[test]
    fn test_tag_roundtrip() {
        for raw in 0x00u8..=0x0e {
            let kind = ActionKind::try_from(raw).unwrap();
            assert_eq!(u8::from(kind), raw);
        }
        assert_eq!(ActionKind::try_from(0x0fu8), Err(0x0f));
        assert_eq!(ActionKind::try_from(0xffu8), Err(0xff));
    }
}
