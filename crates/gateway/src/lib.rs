//! The two gateway state machines of the restaking protocol.
//!
//! A client gateway lives next to the funds: it owns token vaults and
//! native-stake capsules, admits deposits, and forwards everything that
//! needs settlement approval as a nonce-tracked request. The settlement
//! gateway owns the canonical positions and answers those requests with
//! verdicts. The two speak the `causeway-msg-types` wire protocol over
//! an at-least-once, in-order-per-channel transport.
//!
//! Both gateways are plain values. Effectful collaborators (transport,
//! custody, beacon root oracle) are passed into each call behind the
//! traits in [`traits`], and each side's durable state serializes
//! through its versioned snapshot pair, e.g. [`encode_client_snapshot`]
//! / [`decode_client_snapshot`].

mod channel;
mod client;
mod errors;
mod events;
mod params;
mod settlement;
mod snapshot;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use channel::{ChannelState, PendingRequest};
pub use client::{ClientGateway, ClientState};
pub use errors::{GatewayError, GatewayResult};
pub use events::GatewayEvent;
pub use params::ClientParams;
pub use settlement::{
    DelegationKey, PositionKey, SettlementGateway, SettlementState, StakerPosition,
};
pub use snapshot::{
    SNAPSHOT_VERSION, SnapshotError, decode_client_snapshot, decode_settlement_snapshot,
    encode_client_snapshot, encode_settlement_snapshot,
};
pub use traits::{BeaconRootOracle, CustodyError, MessageTransport, TokenCustody, TransportError};
