//! Settlement-chain gateway: the authoritative half of the protocol.
//!
//! Settlement keeps the canonical balance positions for every client
//! channel and issues the verdicts the clients wait on. A request that
//! fails its preconditions here gets a failure verdict back, which is a
//! normal outcome; only messages a conforming client could never have
//! sent are treated as fatal, and those leave the inbound cursor where
//! it was so nothing is skipped past.

use std::collections::{BTreeMap, BTreeSet};

use borsh::{BorshDeserialize, BorshSerialize};
use causeway_msg_types::{
    ActionKind, BalanceKind, BalanceSyncData, BalanceSyncEntry, DelegationData, GatewayMsg,
    RespondData, TokenBudgetData,
};
use causeway_primitives::{Amount, ChannelId, Nonce, OperatorAddr, StakerAddr, TokenId};
use tracing::{debug, warn};

use crate::{
    channel::ChannelState,
    errors::{GatewayError, GatewayResult},
    events::GatewayEvent,
    traits::MessageTransport,
};

/// Key of a staker's balance position: one per (channel, token, staker).
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct PositionKey {
    channel: ChannelId,
    token: TokenId,
    staker: StakerAddr,
}

impl PositionKey {
    pub fn new(channel: ChannelId, token: TokenId, staker: StakerAddr) -> Self {
        Self {
            channel,
            token,
            staker,
        }
    }
}

/// Key of one delegation edge: a position plus the operator it backs.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, BorshSerialize, BorshDeserialize,
)]
pub struct DelegationKey {
    channel: ChannelId,
    token: TokenId,
    staker: StakerAddr,
    operator: OperatorAddr,
}

impl DelegationKey {
    pub fn new(
        channel: ChannelId,
        token: TokenId,
        staker: StakerAddr,
        operator: OperatorAddr,
    ) -> Self {
        Self {
            channel,
            token,
            staker,
            operator,
        }
    }
}

/// Canonical balances of one position.
///
/// `delegated` never exceeds `deposited`; the difference is the free
/// balance withdrawals and new delegations draw on.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct StakerPosition {
    deposited: Amount,
    delegated: Amount,
    reward: Amount,
}

impl StakerPosition {
    pub(crate) fn new() -> Self {
        Self {
            deposited: Amount::ZERO,
            delegated: Amount::ZERO,
            reward: Amount::ZERO,
        }
    }

    pub fn deposited(&self) -> Amount {
        self.deposited
    }

    pub fn delegated(&self) -> Amount {
        self.delegated
    }

    pub fn reward(&self) -> Amount {
        self.reward
    }

    /// Deposited balance not currently backing a delegation.
    pub fn free_balance(&self) -> Amount {
        self.deposited
            .checked_sub(self.delegated)
            .expect("gateway: delegated exceeds deposited")
    }

    pub(crate) fn credit_deposited(&mut self, amount: Amount) {
        self.deposited = self
            .deposited
            .checked_add(amount)
            .expect("gateway: deposited overflow");
    }

    pub(crate) fn debit_deposited(&mut self, amount: Amount) {
        self.deposited = self
            .deposited
            .checked_sub(amount)
            .expect("gateway: deposited underflow");
    }

    pub(crate) fn credit_delegated(&mut self, amount: Amount) {
        self.delegated = self
            .delegated
            .checked_add(amount)
            .expect("gateway: delegated overflow");
    }

    pub(crate) fn debit_delegated(&mut self, amount: Amount) {
        self.delegated = self
            .delegated
            .checked_sub(amount)
            .expect("gateway: delegated underflow");
    }

    pub(crate) fn credit_reward(&mut self, amount: Amount) {
        self.reward = self
            .reward
            .checked_add(amount)
            .expect("gateway: reward overflow");
    }

    pub(crate) fn debit_reward(&mut self, amount: Amount) {
        self.reward = self
            .reward
            .checked_sub(amount)
            .expect("gateway: reward underflow");
    }
}

/// Durable state of the settlement gateway.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SettlementState {
    /// Operators accepting delegations, across all channels.
    operators: BTreeSet<OperatorAddr>,

    /// Ordering state per client channel.
    channels: BTreeMap<ChannelId, ChannelState>,

    /// Channels whose genesis state has been sealed.
    bootstrapped: BTreeSet<ChannelId>,

    /// Whitelisted tokens per channel.
    tokens: BTreeMap<ChannelId, BTreeSet<TokenId>>,

    /// Canonical balances.
    positions: BTreeMap<PositionKey, StakerPosition>,

    /// Live delegation edges.
    delegations: BTreeMap<DelegationKey, Amount>,

    /// Operator binding per (channel, staker), at most one.
    associations: BTreeMap<(ChannelId, StakerAddr), OperatorAddr>,
}

impl SettlementState {
    pub fn new() -> Self {
        Self {
            operators: BTreeSet::new(),
            channels: BTreeMap::new(),
            bootstrapped: BTreeSet::new(),
            tokens: BTreeMap::new(),
            positions: BTreeMap::new(),
            delegations: BTreeMap::new(),
            associations: BTreeMap::new(),
        }
    }

    pub fn operator_registered(&self, operator: &OperatorAddr) -> bool {
        self.operators.contains(operator)
    }

    pub fn channel(&self, channel: ChannelId) -> Option<&ChannelState> {
        self.channels.get(&channel)
    }

    pub fn is_bootstrapped(&self, channel: ChannelId) -> bool {
        self.bootstrapped.contains(&channel)
    }

    pub fn token_registered(&self, channel: ChannelId, token: &TokenId) -> bool {
        self.tokens
            .get(&channel)
            .is_some_and(|set| set.contains(token))
    }

    pub fn position(&self, key: &PositionKey) -> Option<&StakerPosition> {
        self.positions.get(key)
    }

    /// Delegated amount on one edge; zero when the edge does not exist.
    pub fn delegation(&self, key: &DelegationKey) -> Amount {
        self.delegations.get(key).copied().unwrap_or(Amount::ZERO)
    }

    pub fn association(&self, channel: ChannelId, staker: &StakerAddr) -> Option<&OperatorAddr> {
        self.associations.get(&(channel, *staker))
    }

    fn position_mut(&mut self, key: PositionKey) -> &mut StakerPosition {
        self.positions.entry(key).or_insert_with(StakerPosition::new)
    }
}

impl Default for SettlementState {
    fn default() -> Self {
        Self::new()
    }
}

/// The settlement-side gateway state machine.
///
/// Like the client gateway this is a plain value; the transport is
/// passed into each call that sends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementGateway {
    state: SettlementState,
}

impl SettlementGateway {
    pub fn new() -> Self {
        Self {
            state: SettlementState::new(),
        }
    }

    /// Rebuild a gateway around previously captured state.
    pub fn from_state(state: SettlementState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SettlementState {
        &self.state
    }

    /// Make an operator available for delegation on every channel.
    pub fn register_operator(
        &mut self,
        operator: OperatorAddr,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        if !self.state.operators.insert(operator) {
            return Err(GatewayError::OperatorAlreadyRegistered(operator));
        }
        debug!(%operator, "operator registered");
        Ok(vec![GatewayEvent::OperatorRegistered { operator }])
    }

    /// Whitelist a token on a channel and push the vault parameters to
    /// the client. Runs before bootstrap so genesis vaults exist when
    /// the channel goes live.
    pub fn add_token(
        &mut self,
        transport: &mut impl MessageTransport,
        channel: ChannelId,
        token: TokenId,
        tvl_limit: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        if self.state.token_registered(channel, &token) {
            return Err(GatewayError::TokenAlreadyRegistered(token));
        }
        let msg = GatewayMsg::AddWhitelistToken(TokenBudgetData::new(token, tvl_limit));
        let nonce = self.send_message(transport, channel, &msg)?;
        self.state.tokens.entry(channel).or_default().insert(token);
        debug!(%channel, %token, %tvl_limit, "token whitelisted");
        Ok(vec![
            GatewayEvent::MessageSent {
                dest: channel,
                nonce,
                action: ActionKind::AddWhitelistToken,
            },
            GatewayEvent::TokenWhitelisted { token, tvl_limit },
        ])
    }

    /// Replace a whitelisted token's deposit budget on the client.
    pub fn update_token_limit(
        &mut self,
        transport: &mut impl MessageTransport,
        channel: ChannelId,
        token: TokenId,
        tvl_limit: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        if !self.state.token_registered(channel, &token) {
            return Err(GatewayError::TokenNotRegistered(token));
        }
        let msg = GatewayMsg::UpdateWhitelistToken(TokenBudgetData::new(token, tvl_limit));
        let nonce = self.send_message(transport, channel, &msg)?;
        debug!(%channel, %token, %tvl_limit, "deposit limit updated");
        Ok(vec![
            GatewayEvent::MessageSent {
                dest: channel,
                nonce,
                action: ActionKind::UpdateWhitelistToken,
            },
            GatewayEvent::TvlLimitUpdated { token, tvl_limit },
        ])
    }

    /// Seal a channel's genesis state and tell the client to open for
    /// business.
    pub fn mark_bootstrap(
        &mut self,
        transport: &mut impl MessageTransport,
        channel: ChannelId,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        if self.state.bootstrapped.contains(&channel) {
            return Err(GatewayError::AlreadyBootstrapped(channel));
        }
        let nonce = self.send_message(transport, channel, &GatewayMsg::MarkBootstrap)?;
        self.state.bootstrapped.insert(channel);
        debug!(%channel, "channel bootstrapped");
        Ok(vec![
            GatewayEvent::MessageSent {
                dest: channel,
                nonce,
                action: ActionKind::MarkBootstrap,
            },
            GatewayEvent::BootstrapMarked { channel },
        ])
    }

    /// Accrue reward onto a position. Settlement-local; the client only
    /// learns of it through a balance sync.
    pub fn credit_reward(
        &mut self,
        channel: ChannelId,
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        if amount.is_zero() {
            return Err(GatewayError::ZeroAmount);
        }
        if !self.state.token_registered(channel, &token) {
            return Err(GatewayError::TokenNotRegistered(token));
        }
        self.state
            .position_mut(PositionKey::new(channel, token, staker))
            .credit_reward(amount);
        debug!(%channel, %token, %staker, %amount, "reward credited");
        Ok(vec![GatewayEvent::RewardCredited {
            channel,
            token,
            staker,
            amount,
        }])
    }

    /// Push principal and reward balances for the given (token, staker)
    /// pairs to the client, overwriting its copies. Positions that never
    /// booked anything sync as zero.
    pub fn sync_balances(
        &mut self,
        transport: &mut impl MessageTransport,
        channel: ChannelId,
        targets: &[(TokenId, StakerAddr)],
    ) -> GatewayResult<Vec<GatewayEvent>> {
        if !self.state.bootstrapped.contains(&channel) {
            return Err(GatewayError::NotBootstrapped(channel));
        }

        let mut entries = Vec::with_capacity(targets.len() * 2);
        for (token, staker) in targets {
            if !self.state.token_registered(channel, token) {
                return Err(GatewayError::TokenNotRegistered(*token));
            }
            let key = PositionKey::new(channel, *token, *staker);
            let (principal, reward) = match self.state.positions.get(&key) {
                Some(position) => (position.deposited(), position.reward()),
                None => (Amount::ZERO, Amount::ZERO),
            };
            entries.push(BalanceSyncEntry::new(
                *token,
                *staker,
                BalanceKind::Principal,
                principal,
            ));
            entries.push(BalanceSyncEntry::new(
                *token,
                *staker,
                BalanceKind::Reward,
                reward,
            ));
        }

        let data = BalanceSyncData::new(entries).ok_or(GatewayError::EmptyBalanceSync)?;
        let count = data.entries().len();
        let msg = GatewayMsg::BalanceSync(data);
        let nonce = self.send_message(transport, channel, &msg)?;
        debug!(%channel, entries = count, "balances pushed");
        Ok(vec![
            GatewayEvent::MessageSent {
                dest: channel,
                nonce,
                action: ActionKind::BalanceSync,
            },
            GatewayEvent::BalanceSynced { entries: count },
        ])
    }

    /// Apply one inbound client message and send any verdict it calls
    /// for.
    ///
    /// Verdicts go out before the ledger moves, so a transport failure
    /// aborts with nothing applied and the message replays cleanly.
    pub fn on_receive(
        &mut self,
        transport: &mut impl MessageTransport,
        src: ChannelId,
        nonce: Nonce,
        payload: &[u8],
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let channel = self
            .state
            .channels
            .get(&src)
            .ok_or(GatewayError::UnknownChannel(src))?;
        if !self.state.bootstrapped.contains(&src) {
            return Err(GatewayError::NotBootstrapped(src));
        }
        channel.ensure_inbound(nonce)?;
        let msg = GatewayMsg::decode(payload)?;

        let events = match msg {
            GatewayMsg::DepositLst(data) => {
                self.apply_deposit(src, *data.token(), *data.staker(), data.amount())?
            }
            GatewayMsg::DepositNst(data) => {
                self.apply_deposit(src, TokenId::NATIVE_STAKE, *data.staker(), data.amount())?
            }
            GatewayMsg::WithdrawLst(data) => self.apply_withdrawal(
                transport,
                src,
                nonce,
                *data.token(),
                *data.staker(),
                BalanceKind::Principal,
                data.amount(),
            )?,
            GatewayMsg::WithdrawNst(data) => self.apply_withdrawal(
                transport,
                src,
                nonce,
                TokenId::NATIVE_STAKE,
                *data.staker(),
                BalanceKind::Principal,
                data.amount(),
            )?,
            GatewayMsg::WithdrawReward(data) => self.apply_withdrawal(
                transport,
                src,
                nonce,
                *data.token(),
                *data.staker(),
                BalanceKind::Reward,
                data.amount(),
            )?,
            GatewayMsg::Delegate(data) => self.apply_delegate(transport, src, nonce, &data)?,
            GatewayMsg::Undelegate(data) => self.apply_undelegate(transport, src, nonce, &data)?,
            GatewayMsg::DepositThenDelegate(data) => {
                self.apply_deposit_then_delegate(transport, src, nonce, &data)?
            }
            GatewayMsg::AssociateOperator(data) => {
                self.apply_associate(transport, src, nonce, *data.staker(), *data.operator())?
            }
            GatewayMsg::DissociateOperator(data) => {
                self.apply_dissociate(transport, src, nonce, *data.staker())?
            }
            other => return Err(GatewayError::UnexpectedInboundAction(other.kind())),
        };

        self.state
            .channels
            .get_mut(&src)
            .expect("gateway: channel looked up above")
            .commit_inbound(nonce);
        Ok(events)
    }

    /// Book a deposit. Deposits are final on the client by the time we
    /// see them, so there is no verdict; a deposit that fails its checks
    /// here can only come from a corrupt channel and is fatal.
    fn apply_deposit(
        &mut self,
        src: ChannelId,
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        if !self.state.token_registered(src, &token) {
            return Err(GatewayError::TokenNotRegistered(token));
        }
        if amount.is_zero() {
            return Err(GatewayError::ZeroAmount);
        }
        self.state
            .position_mut(PositionKey::new(src, token, staker))
            .credit_deposited(amount);
        debug!(channel = %src, %token, %staker, %amount, "deposit recorded");
        Ok(vec![GatewayEvent::DepositRecorded {
            channel: src,
            token,
            staker,
            amount,
        }])
    }

    fn apply_withdrawal(
        &mut self,
        transport: &mut impl MessageTransport,
        src: ChannelId,
        origin: Nonce,
        token: TokenId,
        staker: StakerAddr,
        kind: BalanceKind,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let key = PositionKey::new(src, token, staker);
        let available = match (self.state.positions.get(&key), kind) {
            (Some(position), BalanceKind::Principal) => position.free_balance(),
            (Some(position), BalanceKind::Reward) => position.reward(),
            (None, _) => Amount::ZERO,
        };
        let approved = !amount.is_zero()
            && self.state.token_registered(src, &token)
            && amount <= available;

        let sent = self.send_response(transport, src, origin, approved)?;
        let mut events = vec![sent];
        if approved {
            let position = self
                .state
                .positions
                .get_mut(&key)
                .expect("gateway: approved withdrawal without a position");
            match kind {
                BalanceKind::Principal => position.debit_deposited(amount),
                BalanceKind::Reward => position.debit_reward(amount),
            }
            debug!(channel = %src, %token, %staker, %kind, %amount, "withdrawal approved");
            events.push(GatewayEvent::WithdrawalApproved {
                channel: src,
                token,
                staker,
                kind,
                amount,
            });
        } else {
            warn!(channel = %src, %token, %staker, %kind, %amount, %available, "withdrawal denied");
        }
        Ok(events)
    }

    fn apply_delegate(
        &mut self,
        transport: &mut impl MessageTransport,
        src: ChannelId,
        origin: Nonce,
        data: &DelegationData,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let token = *data.token();
        let staker = *data.staker();
        let operator = *data.operator();
        let amount = data.amount();

        let key = PositionKey::new(src, token, staker);
        let free = self
            .state
            .positions
            .get(&key)
            .map(StakerPosition::free_balance)
            .unwrap_or(Amount::ZERO);
        let approved = !amount.is_zero()
            && self.state.operators.contains(&operator)
            && self.state.token_registered(src, &token)
            && amount <= free;

        let sent = self.send_response(transport, src, origin, approved)?;
        let mut events = vec![sent];
        if approved {
            self.state
                .positions
                .get_mut(&key)
                .expect("gateway: approved delegation without a position")
                .credit_delegated(amount);
            let slot = self
                .state
                .delegations
                .entry(DelegationKey::new(src, token, staker, operator))
                .or_insert(Amount::ZERO);
            *slot = slot
                .checked_add(amount)
                .expect("gateway: delegation overflow");
            debug!(channel = %src, %token, %staker, %operator, %amount, "delegation applied");
            events.push(GatewayEvent::DelegationApplied {
                channel: src,
                token,
                staker,
                operator,
                amount,
            });
        } else {
            warn!(channel = %src, %token, %staker, %operator, %amount, "delegation denied");
        }
        Ok(events)
    }

    fn apply_undelegate(
        &mut self,
        transport: &mut impl MessageTransport,
        src: ChannelId,
        origin: Nonce,
        data: &DelegationData,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let token = *data.token();
        let staker = *data.staker();
        let operator = *data.operator();
        let amount = data.amount();

        // An existing edge implies the operator and token checks held
        // when the delegation was made; only the amount matters now.
        let key = DelegationKey::new(src, token, staker, operator);
        let existing = self.state.delegation(&key);
        let approved = !amount.is_zero() && amount <= existing;

        let sent = self.send_response(transport, src, origin, approved)?;
        let mut events = vec![sent];
        if approved {
            let remaining = existing
                .checked_sub(amount)
                .expect("gateway: undelegation underflow");
            if remaining.is_zero() {
                self.state.delegations.remove(&key);
            } else {
                self.state.delegations.insert(key, remaining);
            }
            self.state
                .positions
                .get_mut(&PositionKey::new(src, token, staker))
                .expect("gateway: delegation edge without a position")
                .debit_delegated(amount);
            debug!(channel = %src, %token, %staker, %operator, %amount, "undelegation applied");
            events.push(GatewayEvent::UndelegationApplied {
                channel: src,
                token,
                staker,
                operator,
                amount,
            });
        } else {
            warn!(channel = %src, %token, %staker, %operator, %amount, "undelegation denied");
        }
        Ok(events)
    }

    /// The deposit half is final like any deposit; the verdict covers
    /// only the delegation half. Since the fresh deposit always covers
    /// the delegated amount, only the operator check can fail it.
    fn apply_deposit_then_delegate(
        &mut self,
        transport: &mut impl MessageTransport,
        src: ChannelId,
        origin: Nonce,
        data: &DelegationData,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let token = *data.token();
        let staker = *data.staker();
        let operator = *data.operator();
        let amount = data.amount();

        if !self.state.token_registered(src, &token) {
            return Err(GatewayError::TokenNotRegistered(token));
        }
        if amount.is_zero() {
            return Err(GatewayError::ZeroAmount);
        }

        let approved = self.state.operators.contains(&operator);
        let sent = self.send_response(transport, src, origin, approved)?;

        let key = PositionKey::new(src, token, staker);
        self.state.position_mut(key).credit_deposited(amount);
        debug!(channel = %src, %token, %staker, %amount, "deposit recorded");
        let mut events = vec![
            sent,
            GatewayEvent::DepositRecorded {
                channel: src,
                token,
                staker,
                amount,
            },
        ];
        if approved {
            self.state.position_mut(key).credit_delegated(amount);
            let slot = self
                .state
                .delegations
                .entry(DelegationKey::new(src, token, staker, operator))
                .or_insert(Amount::ZERO);
            *slot = slot
                .checked_add(amount)
                .expect("gateway: delegation overflow");
            debug!(channel = %src, %token, %staker, %operator, %amount, "delegation applied");
            events.push(GatewayEvent::DelegationApplied {
                channel: src,
                token,
                staker,
                operator,
                amount,
            });
        } else {
            warn!(channel = %src, %staker, %operator, "delegation half denied, unknown operator");
        }
        Ok(events)
    }

    fn apply_associate(
        &mut self,
        transport: &mut impl MessageTransport,
        src: ChannelId,
        origin: Nonce,
        staker: StakerAddr,
        operator: OperatorAddr,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let approved = self.state.operators.contains(&operator)
            && !self.state.associations.contains_key(&(src, staker));

        let sent = self.send_response(transport, src, origin, approved)?;
        let mut events = vec![sent];
        if approved {
            self.state.associations.insert((src, staker), operator);
            debug!(channel = %src, %staker, %operator, "operator associated");
            events.push(GatewayEvent::OperatorAssociated {
                channel: src,
                staker,
                operator,
            });
        } else {
            warn!(channel = %src, %staker, %operator, "association denied");
        }
        Ok(events)
    }

    fn apply_dissociate(
        &mut self,
        transport: &mut impl MessageTransport,
        src: ChannelId,
        origin: Nonce,
        staker: StakerAddr,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let approved = self.state.associations.contains_key(&(src, staker));

        let sent = self.send_response(transport, src, origin, approved)?;
        let mut events = vec![sent];
        if approved {
            self.state.associations.remove(&(src, staker));
            debug!(channel = %src, %staker, "operator dissociated");
            events.push(GatewayEvent::OperatorDissociated {
                channel: src,
                staker,
            });
        } else {
            warn!(channel = %src, %staker, "dissociation denied, no binding");
        }
        Ok(events)
    }

    fn send_response(
        &mut self,
        transport: &mut impl MessageTransport,
        dest: ChannelId,
        origin: Nonce,
        success: bool,
    ) -> GatewayResult<GatewayEvent> {
        let msg = GatewayMsg::Respond(RespondData::new(origin, success));
        let nonce = self.send_message(transport, dest, &msg)?;
        Ok(GatewayEvent::MessageSent {
            dest,
            nonce,
            action: ActionKind::Respond,
        })
    }

    fn send_message(
        &mut self,
        transport: &mut impl MessageTransport,
        dest: ChannelId,
        msg: &GatewayMsg,
    ) -> GatewayResult<Nonce> {
        let payload = msg.to_wire()?;
        let nonce = transport.send(dest, &payload)?;
        self.state
            .channels
            .entry(dest)
            .or_default()
            .record_outbound(nonce)?;
        debug!(%dest, %nonce, action = %msg.kind(), "message dispatched");
        Ok(nonce)
    }
}

impl Default for SettlementGateway {
    fn default() -> Self {
        Self::new()
    }
}
