//! Key material handles
//!
//! Keys come in as text (an HMAC secret or a PEM document) and are turned into
//! one of the [`KeyMaterial`] variants for the algorithm family that will use
//! them. Public and private keys are kept apart: a verification never accepts a
//! private key, and signing never accepts a public one.

pub(crate) mod resolver;

pub use resolver::{KeyConfig, KeyResolver, KeySource, ResolvedKey, placeholder};

use crate::algorithm::{Curve, Family};
use crate::error::{Error, Result};
use crate::utils::der::{self, SpkiContent};
use crate::utils::pem;

/// What a key is needed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRole {
    Signing,
    Verification,
}

impl KeyRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyRole::Signing => "signing",
            KeyRole::Verification => "verification",
        }
    }
}

impl std::fmt::Display for KeyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concrete key for one signing or verification call
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Shared secret for HMAC
    Secret(Vec<u8>),
    /// Public key for RSA, RSA-PSS or ECDSA verification
    Public(PublicKey),
    /// Private key for RSA, RSA-PSS or ECDSA signing
    Private(PrivateKey),
    /// Stand-in used when nothing is configured. Never verifies anything.
    Placeholder(String),
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyMaterial::Secret(bytes) => write!(f, "Secret({} bytes)", bytes.len()),
            KeyMaterial::Public(key) => f.debug_tuple("Public").field(&key.kind).finish(),
            KeyMaterial::Private(key) => f.debug_tuple("Private").field(&key.format).finish(),
            KeyMaterial::Placeholder(text) => f.debug_tuple("Placeholder").field(text).finish(),
        }
    }
}

impl KeyMaterial {
    pub fn secret(secret: impl Into<Vec<u8>>) -> Self {
        KeyMaterial::Secret(secret.into())
    }

    /// Interpret key text for an algorithm family and role
    ///
    /// HMAC text is used as the secret bytes. Asymmetric text must be a PEM
    /// document of the kind the role requires.
    pub fn from_text(text: &str, family: Family, role: KeyRole) -> Result<Self> {
        if resolver::is_placeholder(text) {
            return Ok(KeyMaterial::Placeholder(text.to_string()));
        }

        match family {
            Family::Hmac => {
                // An armoured public key used as an HMAC secret is the classic
                // RS256 -> HS256 confusion; refuse it outright.
                if pem::is_armoured(text) {
                    return Err(Error::KeyConversionFailure(
                        "pem key material cannot be used as an HMAC secret".into(),
                    ));
                }
                Ok(KeyMaterial::Secret(text.as_bytes().to_vec()))
            }
            Family::Rsa | Family::RsaPss | Family::Ecdsa => match role {
                KeyRole::Verification => PublicKey::from_pem(text).map(KeyMaterial::Public),
                KeyRole::Signing => PrivateKey::from_pem(text).map(KeyMaterial::Private),
            },
            Family::None => Err(Error::MissingKey(
                "the none algorithm takes no key".into(),
            )),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, KeyMaterial::Placeholder(_))
    }

    /// Key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            KeyMaterial::Secret(_) => "secret",
            KeyMaterial::Public(_) => "public key",
            KeyMaterial::Private(_) => "private key",
            KeyMaterial::Placeholder(_) => "placeholder",
        }
    }

    pub fn as_secret(&self) -> Result<&[u8]> {
        match self {
            KeyMaterial::Secret(bytes) if !bytes.is_empty() => Ok(bytes),
            KeyMaterial::Secret(_) => Err(Error::MissingKey("secret is empty".into())),
            other => Err(other.mismatch("secret")),
        }
    }

    pub fn as_public(&self) -> Result<&PublicKey> {
        match self {
            KeyMaterial::Public(key) => Ok(key),
            other => Err(other.mismatch("public key")),
        }
    }

    pub fn as_private(&self) -> Result<&PrivateKey> {
        match self {
            KeyMaterial::Private(key) => Ok(key),
            other => Err(other.mismatch("private key")),
        }
    }

    fn mismatch(&self, expected: &str) -> Error {
        match self {
            KeyMaterial::Placeholder(text) => {
                Error::MissingKey(format!("no {expected} configured ({text})"))
            }
            _ => Error::KeyConversionFailure(format!(
                "expected a {expected}, found a {}",
                self.key_type()
            )),
        }
    }
}

/// Kind of a public key, with the curve for EC keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicKeyKind {
    Rsa,
    Ec(Curve),
}

/// Verification-ready public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    kind: PublicKeyKind,
    spki: Vec<u8>,
    raw: Vec<u8>,
}

impl PublicKey {
    /// Build from DER-encoded SubjectPublicKeyInfo
    pub fn from_spki_der(spki: &[u8]) -> Result<Self> {
        let (kind, raw) = match der::parse_spki(spki)? {
            SpkiContent::Rsa(pkcs1) => (PublicKeyKind::Rsa, pkcs1),
            SpkiContent::Ec(curve, point) => (PublicKeyKind::Ec(curve), point),
        };
        Ok(Self {
            kind,
            spki: spki.to_vec(),
            raw,
        })
    }

    /// Build from a `PUBLIC KEY` or `RSA PUBLIC KEY` PEM document
    pub fn from_pem(text: &str) -> Result<Self> {
        let block = pem::parse(text)?;
        match block.tag() {
            pem::TAG_PUBLIC_KEY => Self::from_spki_der(block.contents()),
            pem::TAG_RSA_PUBLIC_KEY => {
                Self::from_spki_der(&der::rsa_spki_from_pkcs1(block.contents())?)
            }
            pem::TAG_PRIVATE_KEY | pem::TAG_RSA_PRIVATE_KEY | pem::TAG_EC_PRIVATE_KEY => {
                Err(Error::KeyConversionFailure(
                    "a private key was supplied where a public key is required".into(),
                ))
            }
            other => Err(Error::KeyConversionFailure(format!(
                "unsupported pem block '{other}' for a public key"
            ))),
        }
    }

    pub fn kind(&self) -> PublicKeyKind {
        self.kind
    }

    pub fn as_spki_der(&self) -> &[u8] {
        &self.spki
    }

    /// PKCS#1 `RSAPublicKey` for RSA, uncompressed point for EC
    pub(crate) fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// SPKI as a `PUBLIC KEY` PEM document
    pub fn to_pem(&self) -> String {
        pem::encode(pem::TAG_PUBLIC_KEY, &self.spki)
    }
}

/// Encoding of a private key's DER
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivateKeyFormat {
    /// `PRIVATE KEY` (RSA or EC)
    Pkcs8,
    /// `RSA PRIVATE KEY`
    Pkcs1,
    /// `EC PRIVATE KEY` (RFC 5915)
    Sec1,
}

/// Signing key. The DER is only parsed when a signature is produced.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey {
    format: PrivateKeyFormat,
    der: Vec<u8>,
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

impl PrivateKey {
    pub fn from_der(format: PrivateKeyFormat, der: impl Into<Vec<u8>>) -> Self {
        Self {
            format,
            der: der.into(),
        }
    }

    /// Build from a `PRIVATE KEY`, `RSA PRIVATE KEY` or `EC PRIVATE KEY` PEM document
    pub fn from_pem(text: &str) -> Result<Self> {
        let block = pem::parse(text)?;
        let format = match block.tag() {
            pem::TAG_PRIVATE_KEY => PrivateKeyFormat::Pkcs8,
            pem::TAG_RSA_PRIVATE_KEY => PrivateKeyFormat::Pkcs1,
            pem::TAG_EC_PRIVATE_KEY => PrivateKeyFormat::Sec1,
            pem::TAG_PUBLIC_KEY | pem::TAG_RSA_PUBLIC_KEY => {
                return Err(Error::KeyConversionFailure(
                    "a public key was supplied where a private key is required".into(),
                ));
            }
            other => {
                return Err(Error::KeyConversionFailure(format!(
                    "unsupported pem block '{other}' for a private key"
                )));
            }
        };
        Ok(Self::from_der(format, block.into_contents()))
    }

    pub fn format(&self) -> PrivateKeyFormat {
        self.format
    }

    pub(crate) fn der(&self) -> &[u8] {
        &self.der
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::der::ec_spki_from_point;

    fn ec_public_pem() -> String {
        let mut point = vec![0x04];
        point.extend_from_slice(&[0x01; 64]);
        let spki = ec_spki_from_point(&point, Curve::P256).unwrap();
        pem::encode(pem::TAG_PUBLIC_KEY, &spki)
    }

    #[test]
    fn test_hmac_text_is_secret() {
        let key = KeyMaterial::from_text("your-256-bit-secret", Family::Hmac, KeyRole::Verification)
            .unwrap();
        assert_eq!(key.as_secret().unwrap(), b"your-256-bit-secret");
    }

    #[test]
    fn test_hmac_rejects_pem() {
        let result = KeyMaterial::from_text(&ec_public_pem(), Family::Hmac, KeyRole::Verification);
        assert!(matches!(result, Err(Error::KeyConversionFailure(_))));
    }

    #[test]
    fn test_empty_secret_is_missing() {
        let key = KeyMaterial::secret(Vec::new());
        assert!(matches!(key.as_secret(), Err(Error::MissingKey(_))));
    }

    #[test]
    fn test_public_pem_for_verification() {
        let key = KeyMaterial::from_text(&ec_public_pem(), Family::Ecdsa, KeyRole::Verification)
            .unwrap();
        let public = key.as_public().unwrap();
        assert_eq!(public.kind(), PublicKeyKind::Ec(Curve::P256));
        assert_eq!(public.raw().len(), 65);
        assert_eq!(public.to_pem(), ec_public_pem());
    }

    #[test]
    fn test_public_pem_rejected_for_signing() {
        let result = KeyMaterial::from_text(&ec_public_pem(), Family::Ecdsa, KeyRole::Signing);
        assert!(matches!(result, Err(Error::KeyConversionFailure(msg)) if msg.contains("public key")));
    }

    #[test]
    fn test_private_pem_rejected_for_verification() {
        let text = pem::encode(pem::TAG_PRIVATE_KEY, &[0x30, 0x00]);
        let result = KeyMaterial::from_text(&text, Family::Rsa, KeyRole::Verification);
        assert!(matches!(result, Err(Error::KeyConversionFailure(msg)) if msg.contains("private key")));

        let key = KeyMaterial::from_text(&text, Family::Rsa, KeyRole::Signing).unwrap();
        assert_eq!(key.as_private().unwrap().format(), PrivateKeyFormat::Pkcs8);
    }

    #[test]
    fn test_placeholder_text() {
        let key = KeyMaterial::from_text(
            "RS256-verification-key-placeholder",
            Family::Rsa,
            KeyRole::Verification,
        )
        .unwrap();
        assert!(key.is_placeholder());
        assert!(matches!(key.as_public(), Err(Error::MissingKey(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = KeyMaterial::secret("hunter2");
        assert_eq!(format!("{key:?}"), "Secret(7 bytes)");
    }
}
