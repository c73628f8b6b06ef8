//! Observable outcomes of gateway operations.

use causeway_msg_types::{ActionKind, BalanceKind};
use causeway_primitives::{Amount, ChannelId, Nonce, OperatorAddr, PubkeyHash, StakerAddr, TokenId};

/// What a successful gateway operation did.
///
/// Operations return the events they produced, in application order;
/// failed operations apply nothing and so return none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayEvent {
    /// A message was handed to the transport.
    MessageSent {
        dest: ChannelId,
        nonce: Nonce,
        action: ActionKind,
    },

    /// An LST deposit was credited to its vault.
    DepositAccepted {
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    },

    /// A validator was proven and its stake counted as principal.
    ValidatorRegistered {
        staker: StakerAddr,
        pubkey_hash: PubkeyHash,
        restaked: Amount,
    },

    /// A native stake claim went in flight.
    ClaimStarted { staker: StakerAddr, amount: Amount },

    /// A settlement verdict arrived for a tracked request.
    RequestResolved {
        nonce: Nonce,
        action: ActionKind,
        success: bool,
    },

    /// Approved principal became withdrawable in its vault.
    PrincipalUnlocked {
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    },

    /// Approved reward became withdrawable in its vault.
    RewardUnlocked {
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    },

    /// An approved claim unlocked capsule balance.
    ClaimUnlocked { staker: StakerAddr, amount: Amount },

    /// Unlocked funds were paid out through custody.
    WithdrawalCompleted {
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    },

    /// A token vault was created from a whitelist push.
    TokenWhitelisted { token: TokenId, tvl_limit: Amount },

    /// A token's deposit limit was replaced.
    TvlLimitUpdated { token: TokenId, tvl_limit: Amount },

    /// A batch of balances was overwritten with settlement truth.
    BalanceSynced { entries: usize },

    /// The channel was marked live.
    BootstrapMarked { channel: ChannelId },

    /// An operator became available for delegation.
    OperatorRegistered { operator: OperatorAddr },

    /// A deposit was booked against a staker's position.
    DepositRecorded {
        channel: ChannelId,
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    },

    /// An unlock request was approved and its bucket debited.
    WithdrawalApproved {
        channel: ChannelId,
        token: TokenId,
        staker: StakerAddr,
        kind: BalanceKind,
        amount: Amount,
    },

    /// Externally distributed reward was booked for a staker.
    RewardCredited {
        channel: ChannelId,
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    },

    /// Free balance moved under an operator.
    DelegationApplied {
        channel: ChannelId,
        token: TokenId,
        staker: StakerAddr,
        operator: OperatorAddr,
        amount: Amount,
    },

    /// Delegated balance returned to the staker's free balance.
    UndelegationApplied {
        channel: ChannelId,
        token: TokenId,
        staker: StakerAddr,
        operator: OperatorAddr,
        amount: Amount,
    },

    /// A staker was bound to an operator.
    OperatorAssociated {
        channel: ChannelId,
        staker: StakerAddr,
        operator: OperatorAddr,
    },

    /// A staker's operator binding was dropped.
    OperatorDissociated {
        channel: ChannelId,
        staker: StakerAddr,
    },
}
