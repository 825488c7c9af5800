use thiserror::Error;

/// Errors raised by the curve schemes and the Paillier cryptosystem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("input must not be empty")]
    EmptyInput,

    #[error("input must be composed of hex chars")]
    InvalidHex,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key")]
    InvalidPrivateKey,

    #[error("unsupported point encoding tag 0x{0:02x}")]
    InvalidPointTag(u8),

    #[error("point is not on the curve")]
    NotOnCurve,

    #[error("scalar multiplication by zero")]
    ZeroScalar,

    #[error("point addition would produce the point at infinity")]
    PointAtInfinity,

    #[error("value has no modular inverse")]
    NotInvertible,

    #[error("x-coordinate has no square root on the curve")]
    NoSquareRoot,

    #[error("recovery id must be 0 or 1, got {0}")]
    InvalidRecoveryId(u8),

    #[error("no usable nonce after {0} attempts")]
    RetryLimitExceeded(usize),

    #[error("cipher of {0} bytes is too short")]
    CipherTooShort(usize),

    #[error("cipher integrity check failed")]
    IntegrityCheckFailed,

    #[error("plaintext is not valid utf-8")]
    InvalidUtf8,

    #[error("user id of {0} bytes is too long")]
    UserIdTooLong(usize),

    #[error("value out of range")]
    ValueOutOfRange,
}

pub type Result<T> = std::result::Result<T, Error>;
