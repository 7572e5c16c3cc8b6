//! Outcome of one validation

use crate::algorithm::Algorithm;
use crate::claims::is_expired;
use crate::error::{Error, Result};
use crate::keys::KeySource;
use crate::token::Token;
use miniserde::json::{self, Object};

/// Parsing outcome for raw input
#[derive(Debug, Clone)]
pub enum ParseState {
    /// Empty or malformed input
    Empty,
    Parsed(Token),
}

impl ParseState {
    pub fn token(&self) -> Option<&Token> {
        match self {
            ParseState::Empty => None,
            ParseState::Parsed(token) => Some(token),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ParseState::Empty)
    }
}

/// Everything known about a token after one validation
///
/// `valid` starts out `false` and only becomes `true` once a signature check
/// (or the `none` rule) succeeded. `expired` is evaluated independently.
#[derive(Clone, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub expired: bool,
    pub algorithm: Option<Algorithm>,
    pub header: Option<Object>,
    pub payload: Option<Object>,
    pub signature: Option<String>,
    pub key_source: Option<KeySource>,
    pub error: Option<Error>,
}

impl ValidationResult {
    /// Result for input that is not a token
    pub(crate) fn malformed(error: Error) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    /// Decoded parts of `token`, not yet verified
    pub(crate) fn unverified(token: &Token, expired: bool) -> Self {
        Self {
            valid: false,
            expired,
            algorithm: None,
            header: Some(token.header().clone()),
            payload: Some(token.payload().clone()),
            signature: Some(token.signature_segment().to_string()),
            key_source: None,
            error: None,
        }
    }

    /// Invalid result for `raw` when verification could not run
    pub(crate) fn interrupted(raw: &str, error: Error) -> Self {
        match Token::parse(raw) {
            Ok(token) => Self {
                algorithm: token.algorithm().ok(),
                ..Self::unverified(&token, is_expired(token.payload()))
            }
            .settle(Err(error)),
            Err(_) => Self::malformed(error),
        }
    }

    /// Record the outcome of the single verification attempt
    pub(crate) fn settle(mut self, outcome: Result<()>) -> Self {
        match outcome {
            Ok(()) => {
                self.valid = true;
                self.error = None;
            }
            Err(error) => {
                self.valid = false;
                self.error = Some(error);
            }
        }
        self
    }

    pub fn header_json(&self) -> Option<String> {
        self.header.as_ref().map(json::to_string)
    }

    pub fn payload_json(&self) -> Option<String> {
        self.payload.as_ref().map(json::to_string)
    }
}

impl std::fmt::Debug for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationResult")
            .field("valid", &self.valid)
            .field("expired", &self.expired)
            .field("algorithm", &self.algorithm)
            .field("header", &self.header_json())
            .field("payload", &self.payload_json())
            .field("signature", &self.signature)
            .field("key_source", &self.key_source)
            .field("error", &self.error)
            .finish()
    }
}
