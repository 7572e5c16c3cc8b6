//! Errors for jwtscope

use thiserror::Error;

/// Coarse classification of an [`Error`], stable across message changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MalformedToken,
    UnsupportedAlgorithm,
    MissingKey,
    SignatureMismatch,
    KeyConversionFailure,
    NetworkFailure,
}

/// jwtscope errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not supported")]
    UnsupportedAlgorithm(String),

    // ============================================================================
    // Key Errors
    // ============================================================================
    #[error("No usable key: {0}")]
    MissingKey(String),

    #[error("Key conversion failed: {0}")]
    KeyConversionFailure(String),

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signature verification failed")]
    SignatureMismatch,

    // ============================================================================
    // Remote Errors
    // ============================================================================
    #[error("Key set fetch failed: {0}")]
    NetworkFailure(String),
}

impl Error {
    /// The kind of failure, without the detail message
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MalformedToken(_) => ErrorKind::MalformedToken,
            Error::UnsupportedAlgorithm(_) => ErrorKind::UnsupportedAlgorithm,
            Error::MissingKey(_) => ErrorKind::MissingKey,
            Error::KeyConversionFailure(_) => ErrorKind::KeyConversionFailure,
            Error::SignatureMismatch => ErrorKind::SignatureMismatch,
            Error::NetworkFailure(_) => ErrorKind::NetworkFailure,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
