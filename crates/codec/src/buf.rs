use crate::{
    errors::{CodecError, CodecResult},
    traits::{Decoder, Encoder},
};

/// Encoder that appends into a growable byte vec.
#[derive(Debug, Default)]
pub struct BufEncoder {
    buf: Vec<u8>,
}

impl BufEncoder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Encoder for BufEncoder {
    fn write_buf(&mut self, buf: &[u8]) -> CodecResult<()> {
        self.buf.extend_from_slice(buf);
        Ok(())
    }
}

/// Decoder reading from a borrowed byte slice.
#[derive(Debug)]
pub struct BufDecoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BufDecoder<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl Decoder for BufDecoder<'_> {
    fn read_buf(&mut self, out: &mut [u8]) -> CodecResult<()> {
        let remaining = self.remaining();
        if out.len() > remaining {
            return Err(CodecError::UnexpectedEnd {
                needed: out.len(),
                remaining,
            });
        }

        out.copy_from_slice(&self.buf[self.pos..self.pos + out.len()]);
        self.pos += out.len();
        Ok(())
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_past_end() {
        let mut dec = BufDecoder::new(&[1, 2, 3]);
        let mut out = [0u8; 2];
        dec.read_buf(&mut out).unwrap();
        assert_eq!(out, [1, 2]);

        let mut out = [0u8; 2];
        let err = dec.read_buf(&mut out).unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnexpectedEnd {
                needed: 2,
                remaining: 1
            }
        ));

        // A failed read must not consume anything.
        assert_eq!(dec.remaining(), 1);
    }

    #[test]
    fn test_encoder_append() {
        let mut enc = BufEncoder::new();
        enc.write_buf(&[1, 2]).unwrap();
        enc.write_buf(&[3]).unwrap();
        assert_eq!(enc.len(), 3);
        assert_eq!(enc.into_inner(), vec![1, 2, 3]);
    }
}
