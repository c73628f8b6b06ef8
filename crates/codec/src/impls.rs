use crate::{
    errors::CodecError,
    traits::{Codec, Decoder, Encoder},
};

macro_rules! impl_int_codec {
    ($($int:ty),*) => {
        $(impl Codec for $int {
            fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
                enc.write_buf(&self.to_be_bytes())
            }

            fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
                Ok(<$int>::from_be_bytes(dec.read_arr()?))
            }
        })*
    };
}

impl_int_codec!(u8, u16, u32, u64, u128);

impl Codec for bool {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        (*self as u8).encode(enc)
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        match u8::decode(dec)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(CodecError::InvalidVariant("bool")),
        }
    }
}

impl<const N: usize> Codec for [u8; N] {
    fn encode(&self, enc: &mut impl Encoder) -> Result<(), CodecError> {
        enc.write_buf(self)
    }

    fn decode(dec: &mut impl Decoder) -> Result<Self, CodecError> {
        dec.read_arr()
    }
}
