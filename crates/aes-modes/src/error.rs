//! Error type shared by every mode.

use aes_core::KeyLengthError;

/// Failures reported by the block cipher modes and their collaborators.
///
/// On any error the unprocessed tail of the output buffer, and any carry state
/// passed in, must be treated as unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    /// Key size not supported by the engine or the mode.
    #[error("invalid key length: {bits} bits")]
    InvalidKeyLength {
        /// Supplied key size in bits.
        bits: usize,
    },
    /// Input length is not acceptable for the mode.
    #[error("invalid input length: {len} bytes")]
    InvalidInputLength {
        /// Supplied input length in bytes.
        len: usize,
    },
    /// Malformed carry state, undersized output or missing key.
    #[error("bad input data: {0}")]
    BadInputData(&'static str),
    /// The block cipher collaborator failed.
    #[error("hardware accelerator failed: {0}")]
    HardwareAccelFailed(String),
}

impl From<KeyLengthError> for ModeError {
    fn from(err: KeyLengthError) -> Self {
        ModeError::InvalidKeyLength { bits: err.got * 8 }
    }
}

/// Rejects stream offsets outside `[0, 16)`.
pub(crate) fn check_offset(offset: usize) -> Result<(), ModeError> {
    if offset >= aes_core::BLOCK_SIZE {
        return Err(ModeError::BadInputData("stream offset must be below 16"));
    }
    Ok(())
}
