//! Algorithm registry: identifiers, families and per-family signature strategies

pub(crate) mod ecdsa;
pub(crate) mod hmac;
pub(crate) mod none;
pub(crate) mod rsa;
mod traits;

pub use traits::{SignatureAlgorithm, SignatureStrategy, signature_strategy};

use crate::error::{Error, Result};
use der::asn1::ObjectIdentifier;

/// Longest identifier worth looking at; everything registered is five bytes or less
const MAX_ALG_LENGTH: usize = 16;

/// Signing algorithm identifier from the `alg` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
    PS256,
    PS384,
    PS512,
    ES256,
    ES384,
    ES512,
    /// Unsecured JWS (`"none"`)
    None,
}

/// Cryptographic primitive behind an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Hmac,
    Rsa,
    RsaPss,
    Ecdsa,
    None,
}

/// Digest size used by an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashSize {
    Sha256,
    Sha384,
    Sha512,
}

/// Elliptic curves used by the ES* algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Curve {
    P256,
    P384,
    P521,
}

impl Algorithm {
    /// Every registered algorithm, in display order
    pub const ALL: [Algorithm; 13] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::PS256,
        Algorithm::PS384,
        Algorithm::PS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::ES512,
        Algorithm::None,
    ];

    /// Parse an identifier. Matching is exact and case-sensitive.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::UnsupportedAlgorithm(format!(
                "identifier too long: {} bytes",
                s.len()
            )));
        }

        match s {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            "RS256" => Ok(Algorithm::RS256),
            "RS384" => Ok(Algorithm::RS384),
            "RS512" => Ok(Algorithm::RS512),
            "PS256" => Ok(Algorithm::PS256),
            "PS384" => Ok(Algorithm::PS384),
            "PS512" => Ok(Algorithm::PS512),
            "ES256" => Ok(Algorithm::ES256),
            "ES384" => Ok(Algorithm::ES384),
            "ES512" => Ok(Algorithm::ES512),
            "none" => Ok(Algorithm::None),
            _ => Err(Error::UnsupportedAlgorithm(s.into())),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::PS256 => "PS256",
            Algorithm::PS384 => "PS384",
            Algorithm::PS512 => "PS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::ES512 => "ES512",
            Algorithm::None => "none",
        }
    }

    pub const fn family(&self) -> Family {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Family::Hmac,
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => Family::Rsa,
            Algorithm::PS256 | Algorithm::PS384 | Algorithm::PS512 => Family::RsaPss,
            Algorithm::ES256 | Algorithm::ES384 | Algorithm::ES512 => Family::Ecdsa,
            Algorithm::None => Family::None,
        }
    }

    /// Digest size, absent for `none`
    pub const fn hash_size(&self) -> Option<HashSize> {
        match self {
            Algorithm::HS256 | Algorithm::RS256 | Algorithm::PS256 | Algorithm::ES256 => {
                Some(HashSize::Sha256)
            }
            Algorithm::HS384 | Algorithm::RS384 | Algorithm::PS384 | Algorithm::ES384 => {
                Some(HashSize::Sha384)
            }
            Algorithm::HS512 | Algorithm::RS512 | Algorithm::PS512 | Algorithm::ES512 => {
                Some(HashSize::Sha512)
            }
            Algorithm::None => None,
        }
    }

    /// Curve required by an ES* algorithm
    pub const fn curve(&self) -> Option<Curve> {
        match self {
            Algorithm::ES256 => Some(Curve::P256),
            Algorithm::ES384 => Some(Curve::P384),
            Algorithm::ES512 => Some(Curve::P521),
            _ => None,
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Family of an identifier, or `None` when it is not registered
pub fn family_of(id: &str) -> Option<Family> {
    Algorithm::from_str(id).ok().map(|alg| alg.family())
}

impl Family {
    pub const fn is_symmetric(&self) -> bool {
        matches!(self, Family::Hmac)
    }

    /// What a person supplying key material for this family is asked for
    pub const fn key_label(&self) -> &'static str {
        match self {
            Family::Hmac => "Secret",
            _ => "Public Key",
        }
    }
}

impl HashSize {
    pub const fn bits(&self) -> u16 {
        match self {
            HashSize::Sha256 => 256,
            HashSize::Sha384 => 384,
            HashSize::Sha512 => 512,
        }
    }
}

impl Curve {
    /// JWK `crv` name
    pub const fn name(&self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(Curve::P256),
            "P-384" => Some(Curve::P384),
            "P-521" => Some(Curve::P521),
            _ => None,
        }
    }

    /// Byte length of one affine coordinate
    pub const fn coordinate_len(&self) -> usize {
        match self {
            Curve::P256 => 32,
            Curve::P384 => 48,
            Curve::P521 => 66,
        }
    }

    pub(crate) const fn oid(&self) -> ObjectIdentifier {
        match self {
            Curve::P256 => ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7"),
            Curve::P384 => ObjectIdentifier::new_unwrap("1.3.132.0.34"),
            Curve::P521 => ObjectIdentifier::new_unwrap("1.3.132.0.35"),
        }
    }

    pub(crate) fn from_oid(oid: &ObjectIdentifier) -> Option<Self> {
        [Curve::P256, Curve::P384, Curve::P521]
            .into_iter()
            .find(|curve| curve.oid() == *oid)
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
