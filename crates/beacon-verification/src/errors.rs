use thiserror::Error;

/// Errors from native-stake proof verification.
///
/// Verification fails closed: every variant means the proof proves
/// nothing, never a partial result.
#[derive(Debug, Error)]
pub enum ProofError {
    /// A branch has the wrong number of siblings for its tree.
    #[error("invalid proof length: expected {expected}, got {got}")]
    InvalidProofLength { expected: usize, got: usize },

    /// The claimed state root is not in the block header.
    #[error("state root not proven against block root")]
    StateRootMismatch,

    /// The validator container root is not in the state registry.
    #[error("validator record not proven against state root")]
    ValidatorRecordMismatch,

    /// The validator container itself is structurally invalid.
    #[error("malformed validator container: {0}")]
    MalformedContainer(&'static str),
}

pub type ProofResult<T> = Result<T, ProofError>;
