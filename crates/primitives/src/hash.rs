//! Common hash type for Merkle material.

/// Raw 32-byte hash value.
pub type Hash = [u8; 32];
