/// Generates impls for shims wrapping a type as another.
///
/// This must be a newtype a la `struct Foo(Bar);`.
#[macro_export]
macro_rules! impl_opaque_thin_wrapper {
    ($target:ty => $inner:ty) => {
        impl $target {
            pub const fn new(v: $inner) -> Self {
                Self(v)
            }

            pub fn inner(&self) -> &$inner {
                &self.0
            }

            pub fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $target {
            fn from(value: $inner) -> $target {
                <$target>::new(value)
            }
        }

        impl From<$target> for $inner {
            fn from(value: $target) -> $inner {
                value.into_inner()
            }
        }
    };
}

/// Generates a passthrough `Codec` impl for a newtype whose inner type
/// already has one.
#[macro_export]
macro_rules! impl_wrapper_codec {
    ($target:ty => $inner:ty) => {
        impl $crate::causeway_codec::Codec for $target {
            fn encode(
                &self,
                enc: &mut impl $crate::causeway_codec::Encoder,
            ) -> Result<(), $crate::causeway_codec::CodecError> {
                self.0.encode(enc)
            }

            fn decode(
                dec: &mut impl $crate::causeway_codec::Decoder,
            ) -> Result<Self, $crate::causeway_codec::CodecError> {
                let inner = <$inner as $crate::causeway_codec::Codec>::decode(dec)?;
                Ok(Self(inner))
            }
        }
    };
}
