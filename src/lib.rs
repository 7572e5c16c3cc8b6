//! # jwtscope - JWT Inspection and Validation
//!
//! **jwtscope** decodes JSON Web Tokens, verifies their signatures with keys
//! from several sources and reports everything it learned along the way in a
//! single [`ValidationResult`]. It is built for tools that show a token to a
//! person: a failed check never hides the decoded header and payload.
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtscope::*;
//!
//! let validator = TokenValidator::new().key("your-256-bit-secret").build();
//! let result = validator.validate(token_str).await?;
//!
//! println!("valid: {} expired: {}", result.valid, result.expired);
//! println!("{}", result.payload_json().unwrap_or_default());
//! ```
//!
//! ## Validation Flow
//!
//! ```text
//! raw text
//!     │ Token::parse            malformed → invalid result, nothing decoded
//!     ▼
//! Token (header, payload, signature segment)
//!     │ alg from header         unknown or absent → UnsupportedAlgorithm
//!     ▼
//! Algorithm
//!     │ key set entry by kid    first source that yields a key decides
//!     │ explicit / named / placeholder key
//!     ▼
//! one signature check → ValidationResult { valid, expired, ... }
//! ```
//!
//! Expiration (`exp < now`) is evaluated for every decoded token and never
//! affects `valid`.
//!
//! ## Algorithm Support
//!
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA PKCS#1 v1.5**: RS256, RS384, RS512
//! - **RSA-PSS**: PS256, PS384, PS512
//! - **ECDSA**: ES256 (P-256), ES384 (P-384), ES512 (P-521)
//! - **none**: accepted only with an empty signature segment
//!
//! ## Keys
//!
//! Key text is either an HMAC secret or a PEM block. Public keys are accepted
//! as SPKI (`PUBLIC KEY`) or PKCS#1 (`RSA PUBLIC KEY`), private keys as PKCS#8,
//! PKCS#1 or SEC1. PEM text is never used as an HMAC secret. Keys that were
//! never configured resolve to a placeholder, which cannot verify or sign.
//!
//! ## Features
//!
//! - **`remote`** (default): [`HttpFetcher`] for key sets over HTTPS (rustls)
//! - **`cli`** (default): the `jwtscope` binary
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515): JSON Web Signature (JWS)
//! - [RFC 7517](https://datatracker.ietf.org/doc/html/rfc7517): JSON Web Key (JWK)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519): JSON Web Token (JWT)

// Core modules
pub mod error;
pub(crate) mod limits;
pub(crate) mod utils;

// Algorithms and keys
pub mod algorithm;
pub mod keys;

// Tokens and claims
pub mod claims;
pub mod token;

// Key sets
pub mod jwks;

// Validation (main public API)
pub mod result;
pub mod session;
pub mod validator;

#[cfg(test)]
mod testing;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use validator::TokenValidator;
pub use result::{ParseState, ValidationResult};
pub use session::ValidationSession;

pub use algorithm::{
    Algorithm, Curve, Family, HashSize, SignatureAlgorithm, SignatureStrategy, family_of,
    signature_strategy,
};
pub use claims::{StandardClaims, is_expired, is_expired_at};
pub use error::{Error, ErrorKind, Result};
pub use keys::{
    KeyConfig, KeyMaterial, KeyResolver, KeyRole, KeySource, PrivateKey, PrivateKeyFormat,
    PublicKey, PublicKeyKind, ResolvedKey,
};
pub use token::{
    Token, TokenOptions, create_token, encode, get_algorithm, is_valid_format, sample_payload,
    sign,
};

#[cfg(feature = "remote")]
pub use jwks::HttpFetcher;
pub use jwks::{Jwk, JwkSet, KeySetFetcher, fetch_key_set, find_key_by_kid, match_key};
