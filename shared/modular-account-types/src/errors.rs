use thiserror::Error;

/// Errors while reading execution calldata.
///
/// All of these surface to callers as a malformed payload; the variant only narrows down why.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PayloadError {
    /// Fewer bytes than the fixed `target || value` prefix.
    #[error("execution calldata truncated: {len} bytes, need at least {min}")]
    Truncated { len: usize, min: usize },
    /// The batch body is not a valid `abi.encode(Execution[])`.
    #[error("execution batch is not a valid ABI-encoded Execution[]")]
    InvalidBatchEncoding,
    /// A delegated call cannot carry value.
    #[error("delegatecall execution carries non-zero value")]
    DelegateCallWithValue,
}
