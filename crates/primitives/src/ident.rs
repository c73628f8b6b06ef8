use std::fmt;

use arbitrary::Arbitrary;
use borsh::{BorshDeserialize, BorshSerialize};
use causeway_codec::{Codec, CodecError, Decoder, Encoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TOKEN_ID_LEN: usize = 32;
pub const STAKER_ADDR_LEN: usize = 32;
pub const PUBKEY_HASH_LEN: usize = 32;
pub const OPERATOR_ADDR_LEN: usize = 42;

/// Length of a raw EVM account address.
pub const EVM_ADDR_LEN: usize = 20;

const EVM_PAD_LEN: usize = TOKEN_ID_LEN - EVM_ADDR_LEN;

type RawTokenId = [u8; TOKEN_ID_LEN];

/// Asset identifier: a 20-byte EVM token address left-padded to 32 bytes.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct TokenId(#[serde(with = "hex::serde")] RawTokenId);

impl_opaque_thin_wrapper!(TokenId => RawTokenId);
impl_wrapper_codec!(TokenId => RawTokenId);

impl TokenId {
    /// Virtual token id standing in for natively staked ether.
    pub const NATIVE_STAKE: TokenId = {
        let mut buf = [0u8; TOKEN_ID_LEN];
        let mut i = EVM_PAD_LEN;
        while i < TOKEN_ID_LEN {
            buf[i] = 0xee;
            i += 1;
        }
        TokenId(buf)
    };

    /// Builds a token id from a raw EVM token address, left-padding it to
    /// the full width.
    pub const fn from_evm_address(addr: [u8; EVM_ADDR_LEN]) -> Self {
        let mut buf = [0u8; TOKEN_ID_LEN];
        let mut i = 0;
        while i < EVM_ADDR_LEN {
            buf[EVM_PAD_LEN + i] = addr[i];
            i += 1;
        }
        Self(buf)
    }

    /// The low 20 bytes interpreted as an EVM address.
    pub fn evm_address(&self) -> [u8; EVM_ADDR_LEN] {
        let mut out = [0u8; EVM_ADDR_LEN];
        out.copy_from_slice(&self.0[EVM_PAD_LEN..]);
        out
    }

    pub fn is_native_stake(&self) -> bool {
        *self == Self::NATIVE_STAKE
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0; TOKEN_ID_LEN * 2];
        hex::encode_to_slice(self.0, &mut buf).expect("ident/token: encode hex");
        // SAFETY: correct lengths
        f.write_str(unsafe { str::from_utf8_unchecked(&buf) })
    }
}

type RawStakerAddr = [u8; STAKER_ADDR_LEN];

/// Depositor identity: a 20-byte EVM account address left-padded to 32
/// bytes.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct StakerAddr(#[serde(with = "hex::serde")] RawStakerAddr);

impl_opaque_thin_wrapper!(StakerAddr => RawStakerAddr);
impl_wrapper_codec!(StakerAddr => RawStakerAddr);

impl StakerAddr {
    /// Builds a staker address from a raw EVM account address,
    /// left-padding it to the full width.
    pub const fn from_evm_address(addr: [u8; EVM_ADDR_LEN]) -> Self {
        let mut buf = [0u8; STAKER_ADDR_LEN];
        let mut i = 0;
        while i < EVM_ADDR_LEN {
            buf[EVM_PAD_LEN + i] = addr[i];
            i += 1;
        }
        Self(buf)
    }

    /// The low 20 bytes interpreted as an EVM address.
    pub fn evm_address(&self) -> [u8; EVM_ADDR_LEN] {
        let mut out = [0u8; EVM_ADDR_LEN];
        out.copy_from_slice(&self.0[EVM_PAD_LEN..]);
        out
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for StakerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0; STAKER_ADDR_LEN * 2];
        hex::encode_to_slice(self.0, &mut buf).expect("ident/staker: encode hex");
        // SAFETY: correct lengths
        f.write_str(unsafe { str::from_utf8_unchecked(&buf) })
    }
}

type RawPubkeyHash = [u8; PUBKEY_HASH_LEN];

/// Hash of a validator BLS public key.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct PubkeyHash(#[serde(with = "hex::serde")] RawPubkeyHash);

impl_opaque_thin_wrapper!(PubkeyHash => RawPubkeyHash);
impl_wrapper_codec!(PubkeyHash => RawPubkeyHash);

impl PubkeyHash {
    pub const fn zero() -> Self {
        Self([0; PUBKEY_HASH_LEN])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Display for PubkeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0; PUBKEY_HASH_LEN * 2];
        hex::encode_to_slice(self.0, &mut buf).expect("ident/pubkey: encode hex");
        // SAFETY: correct lengths
        f.write_str(unsafe { str::from_utf8_unchecked(&buf) })
    }
}

/// Error type for [`OperatorAddr`] construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OperatorAddrError {
    /// Bytes outside the operator address alphabet.
    #[error("operator address contains non-alphanumeric bytes")]
    NotAlphanumeric,

    /// Wrong input length.
    #[error("operator address length {0}, expected {OPERATOR_ADDR_LEN}")]
    BadLength(usize),
}

type RawOperatorAddr = [u8; OPERATOR_ADDR_LEN];

/// Bech32-style settlement-chain operator address, fixed at 42 ASCII
/// bytes.
///
/// The alphabet is enforced at construction, so the raw form never needs
/// re-validation on the way out.
#[derive(
    Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, BorshSerialize, BorshDeserialize,
)]
pub struct OperatorAddr(RawOperatorAddr);

impl OperatorAddr {
    pub fn try_new(raw: RawOperatorAddr) -> Result<Self, OperatorAddrError> {
        if !raw.iter().all(|b| b.is_ascii_alphanumeric()) {
            return Err(OperatorAddrError::NotAlphanumeric);
        }

        Ok(Self(raw))
    }

    pub fn try_from_str(s: &str) -> Result<Self, OperatorAddrError> {
        let raw: RawOperatorAddr = s
            .as_bytes()
            .try_into()
            .map_err(|_| OperatorAddrError::BadLength(s.len()))?;
        Self::try_new(raw)
    }

    pub fn inner(&self) -> &RawOperatorAddr {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // SAFETY: contents validated as ASCII at construction
        unsafe { str::from_utf8_unchecked(&self.0) }
    }
}

impl Codec for OperatorAddr {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        enc.write_buf(&self.0)
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        let raw = dec.read_arr::<OPERATOR_ADDR_LEN>()?;
        Self::try_new(raw).map_err(|_| CodecError::MalformedField("operator address"))
    }
}

impl fmt::Display for OperatorAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'a> Arbitrary<'a> for OperatorAddr {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let mut raw = [0u8; OPERATOR_ADDR_LEN];
        u.fill_buffer(&mut raw)?;
        for b in raw.iter_mut() {
            *b = b'a' + (*b % 26);
        }
        // Safe to unwrap since every byte was forced into the alphabet
        Ok(Self::try_new(raw).unwrap())
    }
}

type RawChannelId = u32;

/// Identifier for a remote chain endpoint, one per (local, remote) pair.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct ChannelId(RawChannelId);

impl_opaque_thin_wrapper!(ChannelId => RawChannelId);
impl_wrapper_codec!(ChannelId => RawChannelId);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel:{}", self.0)
    }
}

type RawNonce = u64;

/// Per-channel message sequence number.
///
/// Nonces are assigned by the transport starting at 1; zero is only ever a
/// cursor value meaning "nothing sent or received yet".
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Arbitrary,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct Nonce(RawNonce);

impl_opaque_thin_wrapper!(Nonce => RawNonce);
impl_wrapper_codec!(Nonce => RawNonce);

impl Nonce {
    /// The zero nonce, preceding any assigned sequence number.
    pub const ZERO: Nonce = Nonce(0);

    pub fn incr(self) -> Nonce {
        let next = self.0.checked_add(1).expect("nonce: sequence overflow");
        Nonce::new(next)
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use causeway_codec::{decode_buf_exact, encode_to_vec};

    use super::*;

    #[test]
    fn test_native_stake_token() {
        let native = TokenId::NATIVE_STAKE;
        assert_eq!(native.evm_address(), [0xee; EVM_ADDR_LEN]);
        assert!(native.inner()[..EVM_PAD_LEN].iter().all(|b| *b == 0));
        assert!(native.is_native_stake());
        assert!(!TokenId::new([0; TOKEN_ID_LEN]).is_native_stake());
    }

    #[test]
    fn test_left_padding_roundtrip() {
        let addr = [0xab; EVM_ADDR_LEN];
        let staker = StakerAddr::from_evm_address(addr);
        assert_eq!(staker.evm_address(), addr);
        assert!(staker.inner()[..EVM_PAD_LEN].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_display_full_hex() {
        let token = TokenId::new([0x5a; TOKEN_ID_LEN]);
        assert_eq!(token.to_string(), "5a".repeat(TOKEN_ID_LEN));
    }

    #[test]
    fn test_serde_hex() {
        let staker = StakerAddr::from_evm_address([0x11; EVM_ADDR_LEN]);
        let json = serde_json::to_string(&staker).unwrap();
        assert_eq!(json, format!("\"{}\"", hex::encode(staker.inner())));

        let back: StakerAddr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, staker);
    }

    #[test]
    fn test_operator_addr_alphabet() {
        let valid = [b'a'; OPERATOR_ADDR_LEN];
        let op = OperatorAddr::try_new(valid).unwrap();
        assert_eq!(op.as_str(), "a".repeat(OPERATOR_ADDR_LEN));

        let mut invalid = valid;
        invalid[7] = 0x00;
        assert_eq!(
            OperatorAddr::try_new(invalid),
            Err(OperatorAddrError::NotAlphanumeric)
        );

        assert_eq!(
            OperatorAddr::try_from_str("too-short"),
            Err(OperatorAddrError::BadLength(9))
        );
    }

    #[test]
    fn test_operator_addr_codec_validates() {
        let op = OperatorAddr::try_from_str(&"x".repeat(OPERATOR_ADDR_LEN)).unwrap();
        let buf = encode_to_vec(&op).unwrap();
        assert_eq!(buf.len(), OPERATOR_ADDR_LEN);

        let back: OperatorAddr = decode_buf_exact(&buf).unwrap();
        assert_eq!(back, op);

        let mut bad = buf.clone();
        bad[0] = 0xff;
        assert!(decode_buf_exact::<OperatorAddr>(&bad).is_err());
    }

    #[test]
    fn test_nonce_incr() {
        let n = Nonce::ZERO;
        assert_eq!(n.incr(), Nonce::new(1));
        assert_eq!(n.incr().incr(), Nonce::new(2));
    }
}
