//! Per-channel ordering state and in-flight request tracking.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use causeway_msg_types::ActionKind;
use causeway_primitives::{Amount, Nonce, OperatorAddr, StakerAddr, TokenId};

use crate::errors::{GatewayError, GatewayResult};

/// A request sent out but not yet answered, keyed by its outbound nonce.
///
/// Carries just enough of the original request to apply its verdict when
/// it comes back.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct PendingRequest {
    action: ActionKind,
    staker: StakerAddr,
    token: Option<TokenId>,
    operator: Option<OperatorAddr>,
    amount: Amount,
}

impl PendingRequest {
    pub(crate) fn new(
        action: ActionKind,
        staker: StakerAddr,
        token: Option<TokenId>,
        operator: Option<OperatorAddr>,
        amount: Amount,
    ) -> Self {
        Self {
            action,
            staker,
            token,
            operator,
            amount,
        }
    }

    pub fn action(&self) -> ActionKind {
        self.action
    }

    pub fn staker(&self) -> &StakerAddr {
        &self.staker
    }

    pub fn token(&self) -> Option<TokenId> {
        self.token
    }

    pub fn operator(&self) -> Option<OperatorAddr> {
        self.operator
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Nonce cursors and the pending table for one channel.
///
/// Cursors hold the highest consumed nonce in each direction, starting
/// at [`Nonce::ZERO`] before anything has moved. Inbound checking and
/// advancing are split so a message only consumes its nonce once it has
/// fully applied.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ChannelState {
    /// Highest nonce the transport has assigned to our sends.
    outbound_cursor: Nonce,

    /// Highest inbound nonce applied.
    inbound_cursor: Nonce,

    /// Sent requests awaiting a verdict.
    pending: BTreeMap<Nonce, PendingRequest>,
}

impl ChannelState {
    pub fn new() -> Self {
        Self {
            outbound_cursor: Nonce::ZERO,
            inbound_cursor: Nonce::ZERO,
            pending: BTreeMap::new(),
        }
    }

    pub fn outbound_cursor(&self) -> Nonce {
        self.outbound_cursor
    }

    pub fn inbound_cursor(&self) -> Nonce {
        self.inbound_cursor
    }

    /// Look at a tracked request without consuming it.
    pub fn pending(&self, nonce: Nonce) -> Option<&PendingRequest> {
        self.pending.get(&nonce)
    }

    /// Number of requests awaiting a verdict.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Record the transport's assigned nonce for a send.
    ///
    /// The transport promises exactly the next nonce of the sequence;
    /// anything else means its view of the channel has diverged from
    /// ours and nothing further can be trusted.
    pub(crate) fn record_outbound(&mut self, nonce: Nonce) -> GatewayResult<()> {
        let expected = self.outbound_cursor.incr();
        if nonce != expected {
            return Err(GatewayError::OutboundNonceMismatch {
                expected,
                got: nonce,
            });
        }
        self.outbound_cursor = nonce;
        Ok(())
    }

    /// Check an inbound nonce against the cursor without consuming it.
    pub(crate) fn ensure_inbound(&self, nonce: Nonce) -> GatewayResult<()> {
        let expected = self.inbound_cursor.incr();
        if nonce == expected {
            Ok(())
        } else if nonce <= self.inbound_cursor {
            Err(GatewayError::DuplicateInbound { nonce })
        } else {
            Err(GatewayError::InboundNonceGap {
                expected,
                got: nonce,
            })
        }
    }

    /// Consume an inbound nonce once its message has fully applied.
    pub(crate) fn commit_inbound(&mut self, nonce: Nonce) {
        debug_assert_eq!(nonce, self.inbound_cursor.incr());
        self.inbound_cursor = nonce;
    }

    pub(crate) fn track_pending(&mut self, nonce: Nonce, request: PendingRequest) {
        self.pending.insert(nonce, request);
    }

    pub(crate) fn take_pending(&mut self, nonce: Nonce) -> Option<PendingRequest> {
        self.pending.remove(&nonce)
    }
}

impl Default for ChannelState {
    fn default() -> Self {
        Self::new()
    }
}
