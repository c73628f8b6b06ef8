//! Host abstractions the gateways are driven through.
//!
//! The gateways themselves are deterministic state machines. Everything
//! effectful (message passing, beacon roots, token movements) enters
//! through these traits, so hosts and tests supply their own plumbing.

use causeway_primitives::{Amount, ChannelId, Hash, Nonce, StakerAddr, TokenId};
use thiserror::Error;

/// Error surfaced by a [`MessageTransport`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The destination channel cannot currently accept messages.
    #[error("{0} is unavailable")]
    ChannelUnavailable(ChannelId),

    /// The transport refused the payload itself.
    #[error("payload rejected: {0}")]
    PayloadRejected(&'static str),
}

/// Error surfaced by a [`TokenCustody`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustodyError {
    /// The staker's funds did not cover the transfer.
    #[error("insufficient funds for a {token} transfer of {amount}")]
    InsufficientFunds { token: TokenId, amount: Amount },

    /// The custodian refused the transfer.
    #[error("transfer rejected: {0}")]
    TransferRejected(&'static str),
}

/// At-least-once, in-order message passing between the two chains.
///
/// The transport owns nonce assignment: each accepted send returns the
/// next nonce of a strictly increasing per-channel sequence starting at
/// 1. Delivery may repeat a message, but never reorders within a
/// channel.
pub trait MessageTransport {
    /// Hand a payload to the transport, receiving its assigned nonce.
    fn send(&mut self, dest: ChannelId, payload: &[u8]) -> Result<Nonce, TransportError>;
}

/// Read access to trusted beacon block roots, keyed by timestamp.
pub trait BeaconRootOracle {
    /// The block root recorded at `timestamp`, if one is known.
    fn block_root_at(&self, timestamp: u64) -> Option<Hash>;
}

/// Moves tokens between stakers and the gateway's escrow.
pub trait TokenCustody {
    /// Pull `amount` of `token` from the staker into escrow.
    fn collect(
        &mut self,
        token: &TokenId,
        staker: &StakerAddr,
        amount: Amount,
    ) -> Result<(), CustodyError>;

    /// Pay `amount` of `token` from escrow out to the staker.
    fn release(
        &mut self,
        token: &TokenId,
        staker: &StakerAddr,
        amount: Amount,
    ) -> Result<(), CustodyError>;
}
