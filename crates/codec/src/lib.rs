//! Byte-level codec for fixed-layout wire structures.
//!
//! Multi-byte integers are big-endian (network byte order). Message formats
//! build fixed-width fields on top of these primitives, so decoders are
//! strict: short input, leftover input, and out-of-range tag bytes are all
//! distinct errors rather than best-effort reads.

mod buf;
mod errors;
mod impls;
mod traits;

pub use buf::{BufDecoder, BufEncoder};
pub use errors::{CodecError, CodecResult};
pub use traits::{Codec, Decoder, Encoder};

/// Encodes a value into a fresh byte vec.
pub fn encode_to_vec(value: &impl Codec) -> CodecResult<Vec<u8>> {
    let mut enc = BufEncoder::new();
    value.encode(&mut enc)?;
    Ok(enc.into_inner())
}

/// Decodes a value from a buffer, requiring that every input byte is
/// consumed.
pub fn decode_buf_exact<T: Codec>(buf: &[u8]) -> CodecResult<T> {
    let mut dec = BufDecoder::new(buf);
    let value = T::decode(&mut dec)?;

    if dec.remaining() > 0 {
        return Err(CodecError::TrailingBytes(dec.remaining()));
    }

    Ok(value)
}
