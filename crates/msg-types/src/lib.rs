//! Message types exchanged between the client and settlement gateways.
//!
//! Every message is one action tag byte followed by a fixed binary
//! layout. [`GatewayMsg::decode`] is the single parsing entry point and
//! [`GatewayMsg::to_wire`] the single serializer.

mod action;
mod control;
mod delegation;
mod errors;
mod message;
mod transfer;

pub use action::{ActionKind, RawActionKind, SYNC_ENTRY_LEN, TAG_LEN, WireLen};
pub use control::{
    BalanceKind, BalanceSyncData, BalanceSyncEntry, RawBalanceKind, RespondData, TokenBudgetData,
};
pub use delegation::{DelegationData, OperatorLinkData, OperatorUnlinkData};
pub use errors::{MsgError, MsgResult};
pub use message::GatewayMsg;
pub use transfer::{LstTransferData, NstClaimData, NstDepositData};
