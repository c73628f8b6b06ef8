//! Core identifier and amount types shared across the gateway protocol.

#[macro_use]
mod macros;

mod amount;
pub mod hash;
mod ident;

pub use amount::Amount;
pub use hash::Hash;
pub use ident::{
    ChannelId, EVM_ADDR_LEN, Nonce, OPERATOR_ADDR_LEN, OperatorAddr, OperatorAddrError,
    PUBKEY_HASH_LEN, PubkeyHash, STAKER_ADDR_LEN, StakerAddr, TOKEN_ID_LEN, TokenId,
};

// Re-export for macro use
#[doc(hidden)]
pub use causeway_codec;
