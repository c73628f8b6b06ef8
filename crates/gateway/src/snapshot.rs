//! Versioned snapshots of the durable gateway state.
//!
//! Each side serializes independently (the two gateways live on
//! different chains). A snapshot is a little-endian `u16` version word
//! followed by the borsh encoding of the state; the version is checked
//! before any body bytes are read, so a decoder never half-parses a
//! layout it does not understand. New fields go behind a version bump.

use borsh::BorshDeserialize;
use thiserror::Error;

use crate::{client::ClientState, settlement::SettlementState};

/// Layout version written into every snapshot.
pub const SNAPSHOT_VERSION: u16 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot was written by a layout this build does not know.
    #[error("unsupported snapshot version {0}, expected {SNAPSHOT_VERSION}")]
    UnsupportedVersion(u16),

    /// Too short to even carry the version word.
    #[error("snapshot truncated before the version word")]
    Truncated,

    /// Bytes left over after the state was fully decoded.
    #[error("{0} trailing bytes after snapshot body")]
    TrailingBytes(usize),

    /// The body did not decode as the expected state layout.
    #[error("malformed snapshot body")]
    Malformed(#[from] std::io::Error),
}

/// Snapshot the client gateway's durable state.
pub fn encode_client_snapshot(state: &ClientState) -> Vec<u8> {
    encode_envelope(borsh::to_vec(state).expect("snapshot: client state serialization"))
}

/// Restore a client state captured by [`encode_client_snapshot`].
pub fn decode_client_snapshot(buf: &[u8]) -> Result<ClientState, SnapshotError> {
    decode_envelope(buf)
}

/// Snapshot the settlement gateway's durable state.
pub fn encode_settlement_snapshot(state: &SettlementState) -> Vec<u8> {
    encode_envelope(borsh::to_vec(state).expect("snapshot: settlement state serialization"))
}

/// Restore a settlement state captured by [`encode_settlement_snapshot`].
pub fn decode_settlement_snapshot(buf: &[u8]) -> Result<SettlementState, SnapshotError> {
    decode_envelope(buf)
}

fn encode_envelope(body: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + body.len());
    out.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    out.extend_from_slice(&body);
    out
}

fn decode_envelope<T: BorshDeserialize>(buf: &[u8]) -> Result<T, SnapshotError> {
    let Some((version_bytes, mut body)) = buf.split_at_checked(2) else {
        return Err(SnapshotError::Truncated);
    };
    let version = u16::from_le_bytes([version_bytes[0], version_bytes[1]]);
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(version));
    }

    let state = T::deserialize(&mut body)?;
    if !body.is_empty() {
        return Err(SnapshotError::TrailingBytes(body.len()));
    }
    Ok(state)
}
