//! Client-chain gateway: the user-facing half of the protocol.
//!
//! The client holds token vaults and native stake capsules, admits
//! deposits, and forwards everything that needs a settlement verdict as
//! a tracked request. Its ledgers only move on local admission checks
//! (deposits), settlement verdicts (unlocks) or custody payouts
//! (withdrawals).

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use causeway_beacon_verification::NativeStakeProof;
use causeway_capsule::Capsule;
use causeway_msg_types::{
    ActionKind, BalanceKind, DelegationData, GatewayMsg, LstTransferData, NstClaimData,
    NstDepositData, OperatorLinkData, OperatorUnlinkData, RespondData,
};
use causeway_primitives::{
    Amount, ChannelId, EVM_ADDR_LEN, Nonce, OperatorAddr, StakerAddr, TokenId,
};
use causeway_vault::Vault;
use tracing::{debug, warn};

use crate::{
    channel::{ChannelState, PendingRequest},
    errors::{GatewayError, GatewayResult},
    events::GatewayEvent,
    params::ClientParams,
    traits::{BeaconRootOracle, MessageTransport, TokenCustody},
};

/// Durable state of a client gateway.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ClientState {
    /// Set once the settlement side has seeded genesis state.
    bootstrapped: bool,

    /// Ordering state of the settlement channel.
    channel: ChannelState,

    /// One vault per whitelisted token.
    vaults: BTreeMap<TokenId, Vault>,

    /// One capsule per native staker.
    capsules: BTreeMap<StakerAddr, Capsule>,
}

impl ClientState {
    pub fn new() -> Self {
        Self {
            bootstrapped: false,
            channel: ChannelState::new(),
            vaults: BTreeMap::new(),
            capsules: BTreeMap::new(),
        }
    }

    pub fn bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    pub fn channel(&self) -> &ChannelState {
        &self.channel
    }

    pub fn vault(&self, token: &TokenId) -> Option<&Vault> {
        self.vaults.get(token)
    }

    pub fn capsule(&self, staker: &StakerAddr) -> Option<&Capsule> {
        self.capsules.get(staker)
    }
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new()
    }
}

/// The client-side gateway state machine.
///
/// Effectful collaborators (transport, custody, beacon oracle) are
/// passed into each call instead of being owned, which keeps the
/// gateway a plain value that snapshots and restores cleanly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientGateway {
    params: ClientParams,
    state: ClientState,
}

impl ClientGateway {
    /// Create a gateway with empty state.
    pub fn new(params: ClientParams) -> Self {
        Self {
            params,
            state: ClientState::new(),
        }
    }

    /// Rebuild a gateway around previously captured state.
    pub fn from_state(params: ClientParams, state: ClientState) -> Self {
        Self { params, state }
    }

    pub fn params(&self) -> &ClientParams {
        &self.params
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    /// Create the staker's capsule, returning its derived address.
    ///
    /// Purely local setup, so it works before bootstrap.
    pub fn create_capsule(&mut self, staker: StakerAddr) -> GatewayResult<[u8; EVM_ADDR_LEN]> {
        if self.state.capsules.contains_key(&staker) {
            return Err(GatewayError::CapsuleAlreadyExists(staker));
        }
        let capsule = Capsule::new(staker);
        let addr = *capsule.capsule_addr();
        self.state.capsules.insert(staker, capsule);
        debug!(%staker, "capsule created");
        Ok(addr)
    }

    /// Deposit LST into the token's vault and announce it to settlement.
    ///
    /// Deposits are final: there is no verdict and no rollback path, so
    /// admission (whitelist and TVL budget) is enforced here in full
    /// before any effect.
    pub fn deposit_lst(
        &mut self,
        transport: &mut impl MessageTransport,
        custody: &mut impl TokenCustody,
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        let vault = self
            .state
            .vaults
            .get(&token)
            .ok_or(GatewayError::TokenNotRegistered(token))?;
        vault.ensure_deposit_allowed(amount)?;

        custody.collect(&token, &staker, amount)?;

        let msg = GatewayMsg::DepositLst(LstTransferData::new(token, staker, amount));
        let nonce = match self.send_message(transport, &msg) {
            Ok(nonce) => nonce,
            Err(err) => {
                // The funds were already pulled; hand them back before
                // surfacing the send failure.
                custody.release(&token, &staker, amount)?;
                return Err(err);
            }
        };

        self.vault_mut(&token)?.credit_deposit(staker, amount);
        debug!(%token, %staker, %amount, "deposit accepted");
        Ok(vec![
            self.sent_event(nonce, ActionKind::DepositLst),
            GatewayEvent::DepositAccepted {
                token,
                staker,
                amount,
            },
        ])
    }

    /// Prove a validator's stake, count it as capsule principal and
    /// announce the deposit to settlement. Final, like all deposits.
    pub fn verify_native_stake(
        &mut self,
        transport: &mut impl MessageTransport,
        oracle: &impl BeaconRootOracle,
        staker: StakerAddr,
        proof: &NativeStakeProof,
        now: u64,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        let capsule = self
            .state
            .capsules
            .get(&staker)
            .ok_or(GatewayError::UnknownCapsule(staker))?;
        let block_root = oracle
            .block_root_at(proof.beacon_timestamp())
            .ok_or(GatewayError::BeaconRootUnavailable(proof.beacon_timestamp()))?;

        // Full validation first; the capsule only moves once the
        // announcement is out.
        let capsule_params = self.params.capsule_params();
        let restaked = capsule.validate_registration(
            proof,
            &block_root,
            self.params.beacon_fork,
            now,
            &capsule_params,
        )?;

        let pubkey_hash = proof.validator_container().pubkey_hash();
        let msg = GatewayMsg::DepositNst(NstDepositData::new(pubkey_hash, staker, restaked));
        let nonce = self.send_message(transport, &msg)?;

        self.capsule_mut(&staker)?.commit_registration(proof, restaked);
        debug!(%staker, %pubkey_hash, %restaked, "validator registered");
        Ok(vec![
            self.sent_event(nonce, ActionKind::DepositNst),
            GatewayEvent::ValidatorRegistered {
                staker,
                pubkey_hash,
                restaked,
            },
        ])
    }

    /// Ask settlement to unlock vault principal. The vault only moves
    /// when the verdict comes back approved.
    pub fn request_withdraw_principal(
        &mut self,
        transport: &mut impl MessageTransport,
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let msg = GatewayMsg::WithdrawLst(LstTransferData::new(token, staker, amount));
        self.send_vault_request(transport, msg, ActionKind::WithdrawLst, token, staker, amount)
    }

    /// Ask settlement to unlock accrued reward.
    pub fn request_withdraw_reward(
        &mut self,
        transport: &mut impl MessageTransport,
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let msg = GatewayMsg::WithdrawReward(LstTransferData::new(token, staker, amount));
        self.send_vault_request(
            transport,
            msg,
            ActionKind::WithdrawReward,
            token,
            staker,
            amount,
        )
    }

    /// Start a native stake claim and ask settlement to approve it.
    ///
    /// The in-flight flag is the only local effect; if the request
    /// cannot even be sent the flag is cleared again, so a transport
    /// hiccup does not lock the staker out.
    pub fn claim_native_stake(
        &mut self,
        transport: &mut impl MessageTransport,
        staker: StakerAddr,
        amount: Amount,
        now: u64,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        let capsule_params = self.params.capsule_params();
        self.capsule_mut(&staker)?
            .start_claim(amount, now, &capsule_params)?;

        let msg = GatewayMsg::WithdrawNst(NstClaimData::new(staker, amount));
        let nonce = match self.send_message(transport, &msg) {
            Ok(nonce) => nonce,
            Err(err) => {
                self.capsule_mut(&staker)?.end_claim();
                warn!(%staker, %amount, "claim abandoned, request could not be sent");
                return Err(err);
            }
        };
        self.state.channel.track_pending(
            nonce,
            PendingRequest::new(ActionKind::WithdrawNst, staker, None, None, amount),
        );
        debug!(%staker, %amount, "claim started");
        Ok(vec![
            self.sent_event(nonce, ActionKind::WithdrawNst),
            GatewayEvent::ClaimStarted { staker, amount },
        ])
    }

    /// Request delegation of free settlement balance to an operator.
    pub fn delegate(
        &mut self,
        transport: &mut impl MessageTransport,
        token: TokenId,
        staker: StakerAddr,
        operator: OperatorAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let msg = GatewayMsg::Delegate(DelegationData::new(token, staker, operator, amount));
        self.send_delegation_request(
            transport,
            msg,
            ActionKind::Delegate,
            token,
            staker,
            operator,
            amount,
        )
    }

    /// Request return of delegated balance from an operator.
    pub fn undelegate(
        &mut self,
        transport: &mut impl MessageTransport,
        token: TokenId,
        staker: StakerAddr,
        operator: OperatorAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        let msg = GatewayMsg::Undelegate(DelegationData::new(token, staker, operator, amount));
        self.send_delegation_request(
            transport,
            msg,
            ActionKind::Undelegate,
            token,
            staker,
            operator,
            amount,
        )
    }

    /// Deposit and delegate in one message. The deposit half is final
    /// like any deposit; only the delegation half carries a verdict.
    pub fn deposit_then_delegate(
        &mut self,
        transport: &mut impl MessageTransport,
        custody: &mut impl TokenCustody,
        token: TokenId,
        staker: StakerAddr,
        operator: OperatorAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        let vault = self
            .state
            .vaults
            .get(&token)
            .ok_or(GatewayError::TokenNotRegistered(token))?;
        vault.ensure_deposit_allowed(amount)?;

        custody.collect(&token, &staker, amount)?;

        let msg =
            GatewayMsg::DepositThenDelegate(DelegationData::new(token, staker, operator, amount));
        let nonce = match self.send_message(transport, &msg) {
            Ok(nonce) => nonce,
            Err(err) => {
                custody.release(&token, &staker, amount)?;
                return Err(err);
            }
        };

        self.vault_mut(&token)?.credit_deposit(staker, amount);
        self.state.channel.track_pending(
            nonce,
            PendingRequest::new(
                ActionKind::DepositThenDelegate,
                staker,
                Some(token),
                Some(operator),
                amount,
            ),
        );
        debug!(%token, %staker, %operator, %amount, "deposit accepted, delegation requested");
        Ok(vec![
            self.sent_event(nonce, ActionKind::DepositThenDelegate),
            GatewayEvent::DepositAccepted {
                token,
                staker,
                amount,
            },
        ])
    }

    /// Request binding this staker to an operator.
    pub fn associate_operator(
        &mut self,
        transport: &mut impl MessageTransport,
        staker: StakerAddr,
        operator: OperatorAddr,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        let msg = GatewayMsg::AssociateOperator(OperatorLinkData::new(staker, operator));
        let nonce = self.send_message(transport, &msg)?;
        self.state.channel.track_pending(
            nonce,
            PendingRequest::new(
                ActionKind::AssociateOperator,
                staker,
                None,
                Some(operator),
                Amount::ZERO,
            ),
        );
        Ok(vec![self.sent_event(nonce, ActionKind::AssociateOperator)])
    }

    /// Request dropping this staker's operator binding.
    pub fn dissociate_operator(
        &mut self,
        transport: &mut impl MessageTransport,
        staker: StakerAddr,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        let msg = GatewayMsg::DissociateOperator(OperatorUnlinkData::new(staker));
        let nonce = self.send_message(transport, &msg)?;
        self.state.channel.track_pending(
            nonce,
            PendingRequest::new(
                ActionKind::DissociateOperator,
                staker,
                None,
                None,
                Amount::ZERO,
            ),
        );
        Ok(vec![self.sent_event(nonce, ActionKind::DissociateOperator)])
    }

    /// Pay unlocked vault balance (principal or reward, they share the
    /// withdrawable bucket) out through custody to `recipient`.
    ///
    /// The staker's vault is debited first and restored from the
    /// receipt if the custodian refuses, so a failed payout changes
    /// nothing.
    pub fn withdraw_token(
        &mut self,
        custody: &mut impl TokenCustody,
        token: TokenId,
        staker: StakerAddr,
        recipient: StakerAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        let receipt = self.vault_mut(&token)?.withdraw(&staker, amount)?;
        if let Err(err) = custody.release(&token, &recipient, amount) {
            self.vault_mut(&token)?.undo_withdraw(receipt);
            warn!(%token, %staker, %amount, "withdrawal rolled back, custody refused release");
            return Err(err.into());
        }
        debug!(%token, %staker, %recipient, %amount, "withdrawal completed");
        Ok(vec![GatewayEvent::WithdrawalCompleted {
            token,
            staker,
            amount,
        }])
    }

    /// Pay unlocked native stake out through custody to `recipient`.
    pub fn withdraw_native_stake(
        &mut self,
        custody: &mut impl TokenCustody,
        staker: StakerAddr,
        recipient: StakerAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        let receipt = self.capsule_mut(&staker)?.withdraw(amount)?;
        if let Err(err) = custody.release(&TokenId::NATIVE_STAKE, &recipient, amount) {
            self.capsule_mut(&staker)?.undo_withdraw(receipt);
            warn!(%staker, %amount, "stake withdrawal rolled back, custody refused release");
            return Err(err.into());
        }
        debug!(%staker, %recipient, %amount, "stake withdrawal completed");
        Ok(vec![GatewayEvent::WithdrawalCompleted {
            token: TokenId::NATIVE_STAKE,
            staker,
            amount,
        }])
    }

    /// Apply one inbound settlement message.
    ///
    /// Duplicates are rejected by nonce with no effect. Gaps and
    /// structural failures are fatal and leave the cursor unmoved, so
    /// nothing is ever skipped past.
    pub fn on_receive(
        &mut self,
        src: ChannelId,
        nonce: Nonce,
        payload: &[u8],
        now: u64,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        if src != self.params.settlement_channel {
            return Err(GatewayError::UnknownChannel(src));
        }
        self.state.channel.ensure_inbound(nonce)?;
        let msg = GatewayMsg::decode(payload)?;

        let events = match msg {
            GatewayMsg::Respond(data) => self.apply_response(data, now)?,
            GatewayMsg::MarkBootstrap => {
                if self.state.bootstrapped {
                    return Err(GatewayError::AlreadyBootstrapped(src));
                }
                self.state.bootstrapped = true;
                debug!(channel = %src, "channel bootstrapped");
                vec![GatewayEvent::BootstrapMarked { channel: src }]
            }
            GatewayMsg::AddWhitelistToken(data) => {
                let token = *data.token();
                if self.state.vaults.contains_key(&token) {
                    return Err(GatewayError::TokenAlreadyRegistered(token));
                }
                self.state
                    .vaults
                    .insert(token, Vault::new(token, data.tvl_limit()));
                debug!(%token, tvl_limit = %data.tvl_limit(), "token whitelisted");
                vec![GatewayEvent::TokenWhitelisted {
                    token,
                    tvl_limit: data.tvl_limit(),
                }]
            }
            GatewayMsg::UpdateWhitelistToken(data) => {
                let token = *data.token();
                let vault = self
                    .state
                    .vaults
                    .get_mut(&token)
                    .ok_or(GatewayError::TokenNotRegistered(token))?;
                vault.set_tvl_limit(data.tvl_limit());
                debug!(%token, tvl_limit = %data.tvl_limit(), "deposit limit updated");
                vec![GatewayEvent::TvlLimitUpdated {
                    token,
                    tvl_limit: data.tvl_limit(),
                }]
            }
            GatewayMsg::BalanceSync(data) => {
                // Every entry must land before any is applied.
                for entry in data.entries() {
                    if !self.state.vaults.contains_key(entry.token()) {
                        return Err(GatewayError::TokenNotRegistered(*entry.token()));
                    }
                }
                let count = data.entries().len();
                for entry in data.entries() {
                    let vault = self
                        .state
                        .vaults
                        .get_mut(entry.token())
                        .expect("gateway: sync entry validated above");
                    match entry.kind() {
                        BalanceKind::Principal => {
                            vault.set_principal_balance(*entry.staker(), entry.value())
                        }
                        BalanceKind::Reward => {
                            vault.set_reward_balance(*entry.staker(), entry.value())
                        }
                    }
                }
                debug!(entries = count, "balances overwritten from settlement");
                vec![GatewayEvent::BalanceSynced { entries: count }]
            }
            other => return Err(GatewayError::UnexpectedInboundAction(other.kind())),
        };

        self.state.channel.commit_inbound(nonce);
        Ok(events)
    }

    /// Settle a verdict against its pending request.
    fn apply_response(&mut self, data: RespondData, now: u64) -> GatewayResult<Vec<GatewayEvent>> {
        let origin = data.origin_nonce();
        let Some(request) = self.state.channel.pending(origin) else {
            return Err(GatewayError::UnknownPendingRequest(origin));
        };
        let action = request.action();
        let staker = *request.staker();
        let token = request.token();
        let amount = request.amount();
        let success = data.success();

        let mut events = vec![GatewayEvent::RequestResolved {
            nonce: origin,
            action,
            success,
        }];
        if success {
            match action {
                ActionKind::WithdrawLst => {
                    let token = token.expect("gateway: principal request tracked without token");
                    self.vault_mut(&token)?.unlock_principal(&staker, amount)?;
                    events.push(GatewayEvent::PrincipalUnlocked {
                        token,
                        staker,
                        amount,
                    });
                }
                ActionKind::WithdrawReward => {
                    let token = token.expect("gateway: reward request tracked without token");
                    self.vault_mut(&token)?.unlock_reward(&staker, amount)?;
                    events.push(GatewayEvent::RewardUnlocked {
                        token,
                        staker,
                        amount,
                    });
                }
                ActionKind::WithdrawNst => {
                    let capsule = self.capsule_mut(&staker)?;
                    capsule.unlock_balance(amount, now);
                    capsule.end_claim();
                    events.push(GatewayEvent::ClaimUnlocked { staker, amount });
                }
                // Delegation and association verdicts have no
                // client-side ledger to move.
                _ => {}
            }
        } else if action == ActionKind::WithdrawNst {
            // A denied claim only clears the in-flight flag.
            self.capsule_mut(&staker)?.end_claim();
            warn!(%staker, %amount, "claim denied by settlement");
        } else {
            warn!(origin = %origin, %action, "request denied by settlement");
        }

        self.state
            .channel
            .take_pending(origin)
            .expect("gateway: pending entry vanished mid-apply");
        debug!(origin = %origin, %action, success, "request resolved");
        Ok(events)
    }

    fn send_vault_request(
        &mut self,
        transport: &mut impl MessageTransport,
        msg: GatewayMsg,
        action: ActionKind,
        token: TokenId,
        staker: StakerAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        if amount.is_zero() {
            return Err(GatewayError::ZeroAmount);
        }
        if !self.state.vaults.contains_key(&token) {
            return Err(GatewayError::TokenNotRegistered(token));
        }
        let nonce = self.send_message(transport, &msg)?;
        self.state.channel.track_pending(
            nonce,
            PendingRequest::new(action, staker, Some(token), None, amount),
        );
        Ok(vec![self.sent_event(nonce, action)])
    }

    fn send_delegation_request(
        &mut self,
        transport: &mut impl MessageTransport,
        msg: GatewayMsg,
        action: ActionKind,
        token: TokenId,
        staker: StakerAddr,
        operator: OperatorAddr,
        amount: Amount,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        self.ensure_bootstrapped()?;
        if amount.is_zero() {
            return Err(GatewayError::ZeroAmount);
        }
        if !self.state.vaults.contains_key(&token) {
            return Err(GatewayError::TokenNotRegistered(token));
        }
        let nonce = self.send_message(transport, &msg)?;
        self.state.channel.track_pending(
            nonce,
            PendingRequest::new(action, staker, Some(token), Some(operator), amount),
        );
        Ok(vec![self.sent_event(nonce, action)])
    }

    fn send_message(
        &mut self,
        transport: &mut impl MessageTransport,
        msg: &GatewayMsg,
    ) -> GatewayResult<Nonce> {
        let payload = msg.to_wire()?;
        let dest = self.params.settlement_channel;
        let nonce = transport.send(dest, &payload)?;
        self.state.channel.record_outbound(nonce)?;
        debug!(%dest, %nonce, action = %msg.kind(), "message dispatched");
        Ok(nonce)
    }

    fn sent_event(&self, nonce: Nonce, action: ActionKind) -> GatewayEvent {
        GatewayEvent::MessageSent {
            dest: self.params.settlement_channel,
            nonce,
            action,
        }
    }

    fn ensure_bootstrapped(&self) -> GatewayResult<()> {
        if !self.state.bootstrapped {
            return Err(GatewayError::NotBootstrapped(self.params.settlement_channel));
        }
        Ok(())
    }

    fn vault_mut(&mut self, token: &TokenId) -> GatewayResult<&mut Vault> {
        self.state
            .vaults
            .get_mut(token)
            .ok_or(GatewayError::TokenNotRegistered(*token))
    }

    fn capsule_mut(&mut self, staker: &StakerAddr) -> GatewayResult<&mut Capsule> {
        self.state
            .capsules
            .get_mut(staker)
            .ok_or(GatewayError::UnknownCapsule(*staker))
    }
}

#[cfg(test)]
mod tests {
    use causeway_beacon_verification::{
        BeaconFork, VALIDATOR_FIELD_COUNT, ValidatorContainer, test_utils::ProofBuilder,
    };
    use causeway_capsule::CredentialMode;
    use causeway_msg_types::TokenBudgetData;
    use causeway_vault::VaultError;

    use super::*;
    use crate::test_utils::{LoopbackTransport, MockCustody, StaticBeaconOracle};

    const SETTLEMENT: ChannelId = ChannelId::new(7);
    const NOW: u64 = 1_700_010_000;

    fn token() -> TokenId {
        TokenId::from_evm_address([0xaa; EVM_ADDR_LEN])
    }

    fn staker() -> StakerAddr {
        StakerAddr::from_evm_address([0x42; EVM_ADDR_LEN])
    }

    fn wei(n: u64) -> Amount {
        Amount::from_wei(n as u128)
    }

    fn push(
        client: &mut ClientGateway,
        nonce: u64,
        msg: &GatewayMsg,
    ) -> GatewayResult<Vec<GatewayEvent>> {
        client.on_receive(SETTLEMENT, Nonce::new(nonce), &msg.to_wire().unwrap(), NOW)
    }

    /// A client with one whitelisted token and a live channel. The next
    /// inbound nonce after setup is 3.
    fn ready_client(tvl_limit: Amount) -> ClientGateway {
        let params = ClientParams {
            settlement_channel: SETTLEMENT,
            ..ClientParams::default()
        };
        let mut client = ClientGateway::new(params);
        push(
            &mut client,
            1,
            &GatewayMsg::AddWhitelistToken(TokenBudgetData::new(token(), tvl_limit)),
        )
        .unwrap();
        push(&mut client, 2, &GatewayMsg::MarkBootstrap).unwrap();
        client
    }

    #[test]
    fn test_ops_gated_on_bootstrap() {
        let params = ClientParams {
            settlement_channel: SETTLEMENT,
            ..ClientParams::default()
        };
        let mut client = ClientGateway::new(params);
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();

        let res = client.deposit_lst(&mut transport, &mut custody, token(), staker(), wei(10));
        assert!(matches!(res, Err(GatewayError::NotBootstrapped(_))));
        let res = client.claim_native_stake(&mut transport, staker(), wei(10), NOW);
        assert!(matches!(res, Err(GatewayError::NotBootstrapped(_))));
        assert_eq!(transport.queued(SETTLEMENT), 0);
    }

    #[test]
    fn test_whitelist_and_bootstrap_sequencing() {
        let client = ready_client(wei(100));
        let vault = client.state().vault(&token()).unwrap();
        assert_eq!(vault.tvl_limit(), wei(100));
        assert!(client.state().bootstrapped());

        // Duplicates of either control message are fatal and do not
        // consume their nonce.
        let mut client = client;
        let res = push(&mut client, 3, &GatewayMsg::MarkBootstrap);
        assert!(matches!(res, Err(GatewayError::AlreadyBootstrapped(_))));
        let res = push(
            &mut client,
            3,
            &GatewayMsg::AddWhitelistToken(TokenBudgetData::new(token(), wei(5))),
        );
        assert!(matches!(res, Err(GatewayError::TokenAlreadyRegistered(_))));
        assert_eq!(client.state().channel().inbound_cursor(), Nonce::new(2));
    }

    #[test]
    fn test_deposit_respects_tvl_budget() {
        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();

        client
            .deposit_lst(&mut transport, &mut custody, token(), staker(), wei(60))
            .unwrap();
        assert_eq!(transport.queued(SETTLEMENT), 1);
        assert_eq!(custody.collected().len(), 1);

        // Over budget: rejected before any message or transfer.
        let res = client.deposit_lst(&mut transport, &mut custody, token(), staker(), wei(50));
        assert!(matches!(
            res,
            Err(GatewayError::Vault(VaultError::TvlLimitExceeded { .. }))
        ));
        assert_eq!(transport.queued(SETTLEMENT), 1);
        assert_eq!(custody.collected().len(), 1);

        let account = client.state().vault(&token()).unwrap().account(&staker()).unwrap();
        assert_eq!(account.principal(), wei(60));
    }

    #[test]
    fn test_deposit_send_failure_refunds_custody() {
        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();

        transport.fail_next_send();
        let res = client.deposit_lst(&mut transport, &mut custody, token(), staker(), wei(60));
        assert!(matches!(res, Err(GatewayError::Transport(_))));

        // Pulled and returned; no vault credit, nothing outbound.
        assert_eq!(custody.collected().len(), 1);
        assert_eq!(custody.released().len(), 1);
        assert!(client.state().vault(&token()).unwrap().account(&staker()).is_none());
        assert_eq!(client.state().channel().outbound_cursor(), Nonce::ZERO);
    }

    #[test]
    fn test_withdraw_request_and_approval() {
        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();
        client
            .deposit_lst(&mut transport, &mut custody, token(), staker(), wei(60))
            .unwrap();

        let events = client
            .request_withdraw_principal(&mut transport, token(), staker(), wei(20))
            .unwrap();
        assert!(
            matches!(events[0], GatewayEvent::MessageSent { nonce, .. } if nonce == Nonce::new(2))
        );
        assert_eq!(client.state().channel().pending_count(), 1);

        // Approval unlocks exactly the requested amount.
        let events = push(
            &mut client,
            3,
            &GatewayMsg::Respond(RespondData::new(Nonce::new(2), true)),
        )
        .unwrap();
        assert!(events.contains(&GatewayEvent::RequestResolved {
            nonce: Nonce::new(2),
            action: ActionKind::WithdrawLst,
            success: true,
        }));
        assert!(events.contains(&GatewayEvent::PrincipalUnlocked {
            token: token(),
            staker: staker(),
            amount: wei(20),
        }));
        assert_eq!(client.state().channel().pending_count(), 0);

        let account = client.state().vault(&token()).unwrap().account(&staker()).unwrap();
        assert_eq!(account.withdrawable(), wei(20));

        // Physical payout through custody, to a recipient other than
        // the debited staker.
        let payee = StakerAddr::from_evm_address([0x77; EVM_ADDR_LEN]);
        client
            .withdraw_token(&mut custody, token(), staker(), payee, wei(20))
            .unwrap();
        assert_eq!(custody.released(), &[(token(), payee, wei(20))]);
        let vault = client.state().vault(&token()).unwrap();
        assert_eq!(vault.consumed_tvl(), wei(40));
        assert_eq!(vault.account(&staker()).unwrap().withdrawable(), Amount::ZERO);
    }

    /// A refused custody release restores the vault from the receipt,
    /// leaving the payout retryable.
    #[test]
    fn test_refused_release_rolls_the_vault_back() {
        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();
        client
            .deposit_lst(&mut transport, &mut custody, token(), staker(), wei(60))
            .unwrap();
        client
            .request_withdraw_principal(&mut transport, token(), staker(), wei(20))
            .unwrap();
        push(
            &mut client,
            3,
            &GatewayMsg::Respond(RespondData::new(Nonce::new(2), true)),
        )
        .unwrap();

        custody.fail_next_release();
        let res = client.withdraw_token(&mut custody, token(), staker(), staker(), wei(20));
        assert!(matches!(res, Err(GatewayError::Custody(_))));
        assert!(custody.released().is_empty());
        let vault = client.state().vault(&token()).unwrap();
        assert_eq!(vault.consumed_tvl(), wei(60));
        assert_eq!(vault.account(&staker()).unwrap().withdrawable(), wei(20));

        // Nothing was lost; the retry goes through.
        client
            .withdraw_token(&mut custody, token(), staker(), staker(), wei(20))
            .unwrap();
        assert_eq!(custody.released(), &[(token(), staker(), wei(20))]);
        assert_eq!(client.state().vault(&token()).unwrap().consumed_tvl(), wei(40));
    }

    #[test]
    fn test_denied_request_applies_nothing() {
        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();
        client
            .deposit_lst(&mut transport, &mut custody, token(), staker(), wei(60))
            .unwrap();
        client
            .request_withdraw_principal(&mut transport, token(), staker(), wei(1000))
            .unwrap();

        let before = client.state().clone();
        let events = push(
            &mut client,
            3,
            &GatewayMsg::Respond(RespondData::new(Nonce::new(2), false)),
        )
        .unwrap();
        assert_eq!(
            events,
            vec![GatewayEvent::RequestResolved {
                nonce: Nonce::new(2),
                action: ActionKind::WithdrawLst,
                success: false,
            }]
        );

        // Only the pending entry and the cursor moved.
        assert_eq!(client.state().channel().pending_count(), 0);
        assert_eq!(client.state().channel().inbound_cursor(), Nonce::new(3));
        assert_eq!(client.state().vault(&token()), before.vault(&token()));
    }

    #[test]
    fn test_duplicate_verdict_cannot_double_unlock() {
        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();
        client
            .deposit_lst(&mut transport, &mut custody, token(), staker(), wei(60))
            .unwrap();
        client
            .request_withdraw_principal(&mut transport, token(), staker(), wei(20))
            .unwrap();

        let verdict = GatewayMsg::Respond(RespondData::new(Nonce::new(2), true));
        push(&mut client, 3, &verdict).unwrap();
        let before = client.state().clone();

        let res = push(&mut client, 3, &verdict);
        assert!(matches!(
            res,
            Err(GatewayError::DuplicateInbound { nonce }) if nonce == Nonce::new(3)
        ));
        assert_eq!(client.state(), &before);
    }

    #[test]
    fn test_verdict_for_unknown_request_is_fatal() {
        let mut client = ready_client(wei(100));
        let res = push(
            &mut client,
            3,
            &GatewayMsg::Respond(RespondData::new(Nonce::new(99), true)),
        );
        assert!(matches!(
            res,
            Err(GatewayError::UnknownPendingRequest(nonce)) if nonce == Nonce::new(99)
        ));
        assert_eq!(client.state().channel().inbound_cursor(), Nonce::new(2));
    }

    #[test]
    fn test_inbound_gap_is_fatal() {
        let mut client = ready_client(wei(100));
        let res = push(&mut client, 5, &GatewayMsg::MarkBootstrap);
        assert!(matches!(
            res,
            Err(GatewayError::InboundNonceGap { expected, got })
                if expected == Nonce::new(3) && got == Nonce::new(5)
        ));
    }

    #[test]
    fn test_request_actions_cannot_arrive_inbound() {
        let mut client = ready_client(wei(100));
        let res = push(
            &mut client,
            3,
            &GatewayMsg::DepositLst(LstTransferData::new(token(), staker(), wei(5))),
        );
        assert!(matches!(
            res,
            Err(GatewayError::UnexpectedInboundAction(ActionKind::DepositLst))
        ));
    }

    #[test]
    fn test_messages_from_other_channels_rejected() {
        let mut client = ready_client(wei(100));
        let res = client.on_receive(
            ChannelId::new(99),
            Nonce::new(1),
            &GatewayMsg::MarkBootstrap.to_wire().unwrap(),
            NOW,
        );
        assert!(matches!(res, Err(GatewayError::UnknownChannel(_))));
    }

    #[test]
    fn test_capsule_creation_is_unique() {
        let mut client = ready_client(wei(100));
        let addr = client.create_capsule(staker()).unwrap();
        assert_eq!(client.state().capsule(&staker()).unwrap().capsule_addr(), &addr);
        assert!(matches!(
            client.create_capsule(staker()),
            Err(GatewayError::CapsuleAlreadyExists(_))
        ));
    }

    fn stake_proof(
        client: &ClientGateway,
        balance_gwei: u64,
    ) -> (StaticBeaconOracle, NativeStakeProof) {
        let capsule = client.state().capsule(&staker()).unwrap();
        let mut fields = [[0u8; 32]; VALIDATOR_FIELD_COUNT];
        fields[0] = [0x11; 32];
        fields[1] = capsule.expected_credentials(CredentialMode::Legacy);
        fields[2][..8].copy_from_slice(&balance_gwei.to_le_bytes());
        let (block_root, proof) =
            ProofBuilder::new(BeaconFork::Deneb, ValidatorContainer::new(fields))
                .with_validator_index(205)
                .with_beacon_timestamp(NOW - 60)
                .build();
        let oracle = StaticBeaconOracle::new().with_root(NOW - 60, block_root);
        (oracle, proof)
    }

    #[test]
    fn test_native_stake_lifecycle() {
        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();
        client.create_capsule(staker()).unwrap();

        let (oracle, proof) = stake_proof(&client, 32_000_000_000);
        let events = client
            .verify_native_stake(&mut transport, &oracle, staker(), &proof, NOW)
            .unwrap();
        let restaked = Amount::from_gwei(32_000_000_000);
        assert!(events.contains(&GatewayEvent::ValidatorRegistered {
            staker: staker(),
            pubkey_hash: proof.validator_container().pubkey_hash(),
            restaked,
        }));
        assert_eq!(client.state().capsule(&staker()).unwrap().principal(), restaked);

        // Claim, get approved, withdraw physically.
        let claim = Amount::from_gwei(10_000_000_000);
        client
            .claim_native_stake(&mut transport, staker(), claim, NOW)
            .unwrap();
        assert!(client.state().capsule(&staker()).unwrap().claim().in_progress());

        let events = push(
            &mut client,
            3,
            &GatewayMsg::Respond(RespondData::new(Nonce::new(2), true)),
        )
        .unwrap();
        assert!(events.contains(&GatewayEvent::ClaimUnlocked {
            staker: staker(),
            amount: claim,
        }));
        let capsule = client.state().capsule(&staker()).unwrap();
        assert!(!capsule.claim().in_progress());
        assert_eq!(capsule.withdrawable(), claim);

        client
            .withdraw_native_stake(&mut custody, staker(), staker(), claim)
            .unwrap();
        assert_eq!(custody.released(), &[(TokenId::NATIVE_STAKE, staker(), claim)]);
        let capsule = client.state().capsule(&staker()).unwrap();
        assert_eq!(capsule.withdrawable(), Amount::ZERO);
        assert_eq!(capsule.principal(), restaked.checked_sub(claim).unwrap());
    }

    #[test]
    fn test_claim_send_failure_clears_flag() {
        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        client.create_capsule(staker()).unwrap();

        let (oracle, proof) = stake_proof(&client, 32_000_000_000);
        client
            .verify_native_stake(&mut transport, &oracle, staker(), &proof, NOW)
            .unwrap();

        transport.fail_next_send();
        let res = client.claim_native_stake(
            &mut transport,
            staker(),
            Amount::from_gwei(1_000_000_000),
            NOW,
        );
        assert!(matches!(res, Err(GatewayError::Transport(_))));
        assert!(!client.state().capsule(&staker()).unwrap().claim().in_progress());
        assert_eq!(client.state().channel().pending_count(), 0);

        // The staker is not locked out; the claim can be retried.
        client
            .claim_native_stake(&mut transport, staker(), Amount::from_gwei(1_000_000_000), NOW)
            .unwrap();
    }

    #[test]
    fn test_balance_sync_is_all_or_nothing() {
        use causeway_msg_types::{BalanceSyncData, BalanceSyncEntry};

        let mut client = ready_client(wei(100));
        let mut transport = LoopbackTransport::new();
        let mut custody = MockCustody::new();
        client
            .deposit_lst(&mut transport, &mut custody, token(), staker(), wei(60))
            .unwrap();

        let unknown = TokenId::from_evm_address([0xbb; EVM_ADDR_LEN]);
        let batch = BalanceSyncData::new(vec![
            BalanceSyncEntry::new(token(), staker(), BalanceKind::Principal, wei(55)),
            BalanceSyncEntry::new(unknown, staker(), BalanceKind::Reward, wei(5)),
        ])
        .unwrap();
        let res = push(&mut client, 3, &GatewayMsg::BalanceSync(batch));
        assert!(matches!(res, Err(GatewayError::TokenNotRegistered(t)) if t == unknown));

        // The valid entry was not applied either.
        let account = client.state().vault(&token()).unwrap().account(&staker()).unwrap();
        assert_eq!(account.principal(), wei(60));

        let batch = BalanceSyncData::new(vec![
            BalanceSyncEntry::new(token(), staker(), BalanceKind::Principal, wei(55)),
            BalanceSyncEntry::new(token(), staker(), BalanceKind::Reward, wei(5)),
        ])
        .unwrap();
        let events = push(&mut client, 3, &GatewayMsg::BalanceSync(batch)).unwrap();
        assert_eq!(events, vec![GatewayEvent::BalanceSynced { entries: 2 }]);
        let account = client.state().vault(&token()).unwrap().account(&staker()).unwrap();
        assert_eq!(account.principal(), wei(55));
        assert_eq!(account.reward(), wei(5));
    }
}
