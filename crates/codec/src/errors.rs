use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// Ran off the end of the input buffer.
    #[error("needed {needed} more bytes with {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// Input had bytes left over after the value was fully decoded.
    #[error("{0} trailing bytes after decode")]
    TrailingBytes(usize),

    /// A count or length field exceeded what its container permits.
    #[error("container length out of bounds")]
    OverflowContainer,

    /// A fixed-width conversion was handed the wrong number of bytes.
    #[error("invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// A tag byte did not correspond to any known variant.
    #[error("invalid variant for {0}")]
    InvalidVariant(&'static str),

    /// A field decoded structurally but failed validation.
    #[error("malformed field '{0}'")]
    MalformedField(&'static str),
}

pub type CodecResult<T> = Result<T, CodecError>;
