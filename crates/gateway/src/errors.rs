use causeway_capsule::CapsuleError;
use causeway_msg_types::{ActionKind, MsgError};
use causeway_primitives::{ChannelId, Nonce, OperatorAddr, StakerAddr, TokenId};
use causeway_vault::VaultError;
use thiserror::Error;

use crate::traits::{CustodyError, TransportError};

/// Errors from gateway operations.
///
/// A returned error means the message or call was not applied: either it
/// was rejected up front, or it is a protocol violation that leaves the
/// channel cursor where it was so nothing gets skipped. Remote
/// precondition failures are not errors; they travel back as a negative
/// verdict instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The inbound nonce was already consumed; the message is a
    /// redelivery and must not apply twice.
    #[error("duplicate inbound message, nonce {nonce} already applied")]
    DuplicateInbound { nonce: Nonce },

    /// The inbound nonce skips ahead, which the in-order transport
    /// should make impossible.
    #[error("inbound nonce gap: expected {expected}, got {got}")]
    InboundNonceGap { expected: Nonce, got: Nonce },

    /// The transport assigned a nonce out of sequence.
    #[error("transport assigned outbound nonce {got}, expected {expected}")]
    OutboundNonceMismatch { expected: Nonce, got: Nonce },

    /// A verdict arrived for a request that was never tracked, or was
    /// already settled.
    #[error("no pending request under nonce {0}")]
    UnknownPendingRequest(Nonce),

    /// The action cannot arrive on this side of a channel.
    #[error("unexpected inbound action {0}")]
    UnexpectedInboundAction(ActionKind),

    /// The channel has not been marked live yet.
    #[error("{0} is not bootstrapped")]
    NotBootstrapped(ChannelId),

    /// The channel was already marked live.
    #[error("{0} is already bootstrapped")]
    AlreadyBootstrapped(ChannelId),

    /// An inbound message from a channel this gateway does not serve.
    #[error("message from unknown {0}")]
    UnknownChannel(ChannelId),

    /// Zero-amount requests are rejected before they travel.
    #[error("zero amount request")]
    ZeroAmount,

    #[error("token {0} is not registered")]
    TokenNotRegistered(TokenId),

    #[error("token {0} is already registered")]
    TokenAlreadyRegistered(TokenId),

    #[error("operator {0} is already registered")]
    OperatorAlreadyRegistered(OperatorAddr),

    /// The staker has no capsule to operate on.
    #[error("no capsule for staker {0}")]
    UnknownCapsule(StakerAddr),

    #[error("staker {0} already has a capsule")]
    CapsuleAlreadyExists(StakerAddr),

    /// The oracle has no root for the proof's timestamp.
    #[error("no beacon block root known for timestamp {0}")]
    BeaconRootUnavailable(u64),

    /// A balance sync must carry at least one entry.
    #[error("balance sync batch is empty")]
    EmptyBalanceSync,

    #[error(transparent)]
    Msg(#[from] MsgError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Capsule(#[from] CapsuleError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Custody(#[from] CustodyError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
