//! Mock transports, oracles and custodians for driving gateways in
//! tests.

#![allow(unreachable_pub, reason = "test utils module")]

use std::collections::{BTreeMap, VecDeque};

use causeway_primitives::{Amount, ChannelId, Hash, Nonce, StakerAddr, TokenId};

use crate::traits::{BeaconRootOracle, CustodyError, MessageTransport, TokenCustody, TransportError};

/// In-memory transport assigning nonces the way the real layer does:
/// strictly increasing from 1, independently per channel.
///
/// Messages queue per destination until drained; the last drained
/// message is kept around so redelivery can be simulated.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    cursors: BTreeMap<ChannelId, u64>,
    queues: BTreeMap<ChannelId, VecDeque<(Nonce, Vec<u8>)>>,
    delivered: BTreeMap<ChannelId, (Nonce, Vec<u8>)>,
    fail_next: bool,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next send fail, whatever its destination.
    pub fn fail_next_send(&mut self) {
        self.fail_next = true;
    }

    /// Take everything queued for `dest`, in order.
    pub fn drain(&mut self, dest: ChannelId) -> Vec<(Nonce, Vec<u8>)> {
        let drained: Vec<_> = self
            .queues
            .get_mut(&dest)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default();
        if let Some(last) = drained.last() {
            self.delivered.insert(dest, last.clone());
        }
        drained
    }

    /// Replay the most recently drained message for `dest`.
    pub fn redeliver_last(&self, dest: ChannelId) -> Option<(Nonce, Vec<u8>)> {
        self.delivered.get(&dest).cloned()
    }

    /// Number of messages queued (and not yet drained) for `dest`.
    pub fn queued(&self, dest: ChannelId) -> usize {
        self.queues.get(&dest).map(VecDeque::len).unwrap_or(0)
    }
}

impl MessageTransport for LoopbackTransport {
    fn send(&mut self, dest: ChannelId, payload: &[u8]) -> Result<Nonce, TransportError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(TransportError::ChannelUnavailable(dest));
        }
        let cursor = self.cursors.entry(dest).or_insert(0);
        *cursor += 1;
        let nonce = Nonce::new(*cursor);
        self.queues
            .entry(dest)
            .or_default()
            .push_back((nonce, payload.to_vec()));
        Ok(nonce)
    }
}

/// Oracle answering block roots from a fixed table.
#[derive(Debug, Default)]
pub struct StaticBeaconOracle {
    roots: BTreeMap<u64, Hash>,
}

impl StaticBeaconOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, timestamp: u64, root: Hash) -> Self {
        self.roots.insert(timestamp, root);
        self
    }
}

impl BeaconRootOracle for StaticBeaconOracle {
    fn block_root_at(&self, timestamp: u64) -> Option<Hash> {
        self.roots.get(&timestamp).copied()
    }
}

/// Custodian that records every transfer and can be told to refuse the
/// next one.
#[derive(Debug, Default)]
pub struct MockCustody {
    collected: Vec<(TokenId, StakerAddr, Amount)>,
    released: Vec<(TokenId, StakerAddr, Amount)>,
    fail_next_collect: bool,
    fail_next_release: bool,
}

impl MockCustody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_collect(&mut self) {
        self.fail_next_collect = true;
    }

    pub fn fail_next_release(&mut self) {
        self.fail_next_release = true;
    }

    pub fn collected(&self) -> &[(TokenId, StakerAddr, Amount)] {
        &self.collected
    }

    pub fn released(&self) -> &[(TokenId, StakerAddr, Amount)] {
        &self.released
    }
}

impl TokenCustody for MockCustody {
    fn collect(
        &mut self,
        token: &TokenId,
        staker: &StakerAddr,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        if self.fail_next_collect {
            self.fail_next_collect = false;
            return Err(CustodyError::TransferRejected("injected collect failure"));
        }
        self.collected.push((*token, *staker, amount));
        Ok(())
    }

    fn release(
        &mut self,
        token: &TokenId,
        staker: &StakerAddr,
        amount: Amount,
    ) -> Result<(), CustodyError> {
        if self.fail_next_release {
            self.fail_next_release = false;
            return Err(CustodyError::TransferRejected("injected release failure"));
        }
        self.released.push((*token, *staker, amount));
        Ok(())
    }
}
