//! Result and error types of the verification, and the status codes they map to
//! at the foreign-call boundary.
use crate::input::INPUT_LENGTH;

/// Verification result type.
pub type VerifyResult = Result<(), VerifyError>;

/// Reason a verification did not succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum VerifyError {
    /// Input is not exactly [`INPUT_LENGTH`] bytes long.
    #[error("invalid input length: expected {expected} bytes, got {actual}")]
    InvalidInputLength {
        /// Required length.
        expected: usize,
        /// Length that was passed.
        actual: usize,
    },
    /// Input buffer pointer is null.
    #[error("input buffer is null")]
    NullInput,
    /// `r` or `s` is zero or not below the curve order.
    #[error("signature scalar out of range")]
    InvalidSignature,
    /// Public key is not a point on the curve.
    #[error("public key is not on the curve")]
    InvalidPublicKey,
    /// Signature does not verify against the digest and key.
    #[error("signature verification failed")]
    VerificationFailed,
}

impl VerifyError {
    /// Returns the error for an input of the given length.
    pub const fn invalid_length(actual: usize) -> Self {
        Self::InvalidInputLength {
            expected: INPUT_LENGTH,
            actual,
        }
    }

    /// Returns `true` if the input could not be decoded or the key is malformed.
    pub const fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidInputLength { .. } | Self::NullInput | Self::InvalidPublicKey
        )
    }
}

/// Detailed status returned by the status-reporting entry points.
///
/// The primary entry points collapse this to a single byte with [`P256Status::as_byte`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub enum P256Status {
    /// Signature is valid.
    Success = 1,
    /// Signature scalars are out of range or the signature does not verify.
    InvalidSignature = 2,
    /// Public key is not a valid curve point.
    InvalidKeys = 3,
    /// Input is null or has the wrong length.
    InvalidInput = 4,
}

impl P256Status {
    /// Returns `true` if the status is [`P256Status::Success`].
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Collapses the status to `1` for a valid signature and `0` for anything else.
    pub const fn as_byte(self) -> u8 {
        self.is_success() as u8
    }
}

impl From<VerifyError> for P256Status {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::InvalidInputLength { .. } | VerifyError::NullInput => {
                Self::InvalidInput
            }
            VerifyError::InvalidSignature | VerifyError::VerificationFailed => {
                Self::InvalidSignature
            }
            VerifyError::InvalidPublicKey => Self::InvalidKeys,
        }
    }
}

impl From<VerifyResult> for P256Status {
    fn from(result: VerifyResult) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(err) => err.into(),
        }
    }
}
