use causeway_codec::CodecError;
use thiserror::Error;

use crate::action::{ActionKind, WireLen};

#[derive(Debug, Error)]
pub enum MsgError {
    /// Zero-length input with no action tag to dispatch on.
    #[error("empty message")]
    Empty,

    /// The action tag is outside the catalogue.
    ///
    /// Distinct from a length failure so peers can tell "we don't speak
    /// this" apart from "we speak it and you sent garbage".
    #[error("unsupported action tag {0:#04x}")]
    UnsupportedRequest(u8),

    /// Message length inconsistent with the action's fixed layout.
    #[error("invalid length for {action}: expected {expected} bytes, got {got}")]
    InvalidMessageLength {
        action: ActionKind,
        expected: WireLen,
        got: usize,
    },

    /// The payload bytes failed field-level decoding.
    #[error("malformed {action} payload")]
    MalformedPayload {
        action: ActionKind,
        #[source]
        source: CodecError,
    },

    /// An underlying codec failure while encoding.
    #[error("codec: {0}")]
    Codec(#[from] CodecError),
}

pub type MsgResult<T> = Result<T, MsgError>;
