use crate::errors::{CodecError, CodecResult};

/// Sink that encoded bytes are written into.
pub trait Encoder {
    /// Appends raw bytes to the output.
    fn write_buf(&mut self, buf: &[u8]) -> CodecResult<()>;
}

/// Source that decoded bytes are read out of.
pub trait Decoder {
    /// Fills the provided buffer from the input, failing if fewer bytes
    /// remain than the buffer holds.
    fn read_buf(&mut self, buf: &mut [u8]) -> CodecResult<()>;

    /// Number of unread bytes.
    fn remaining(&self) -> usize;

    /// Reads a fixed-size array from the input.
    fn read_arr<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let mut arr = [0u8; N];
        self.read_buf(&mut arr)?;
        Ok(arr)
    }
}

/// Types with a canonical wire encoding.
///
/// Multi-byte integers are always big-endian. Implementations must consume
/// exactly the bytes they produce so that concatenated fields stay framed.
pub trait Codec: Sized {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError>;
    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError>;
}
