//! JWK (JSON Web Key) struct and conversion

use crate::algorithm::{Algorithm, Curve, Family};
use crate::error::{Error, Result};
use crate::keys::{PublicKey, PublicKeyKind};
use crate::limits::{MAX_JWK_COORDINATE_SIZE, MAX_JWK_E_SIZE, MAX_JWK_N_SIZE};
use crate::utils::{base64url, der};
use miniserde::Deserialize;

/// JSON Web Key (JWK) structure
///
/// Only the members needed to rebuild an RSA or EC public key are read;
/// anything else in the document is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Jwk {
    /// Key type ("RSA" or "EC")
    pub kty: Option<String>,
    /// Key ID
    pub kid: Option<String>,
    /// Algorithm (advisory per RFC 7517)
    pub alg: Option<String>,
    /// Key use (RFC 7517 Section 4.2). When present it must be "sig".
    #[serde(rename = "use")]
    pub key_use: Option<String>,
    /// RSA modulus (Base64URL-encoded)
    pub n: Option<String>,
    /// RSA exponent (Base64URL-encoded)
    pub e: Option<String>,
    /// Elliptic curve name ("P-256", "P-384", "P-521")
    pub crv: Option<String>,
    /// EC x-coordinate (Base64URL-encoded)
    pub x: Option<String>,
    /// EC y-coordinate (Base64URL-encoded)
    pub y: Option<String>,
}

fn jwk_error(details: impl std::fmt::Display) -> Error {
    Error::KeyConversionFailure(format!("jwk: {details}"))
}

impl Jwk {
    /// Key kind implied by the JWK's own `kty` and `crv`
    pub fn key_kind(&self) -> Result<PublicKeyKind> {
        match self.kty.as_deref() {
            Some("RSA") => Ok(PublicKeyKind::Rsa),
            Some("EC") => {
                let crv = self
                    .crv
                    .as_deref()
                    .ok_or_else(|| jwk_error("missing curve (crv)"))?;
                Curve::from_name(crv)
                    .map(PublicKeyKind::Ec)
                    .ok_or_else(|| jwk_error(format!("unsupported curve {crv}")))
            }
            Some(other) => Err(jwk_error(format!("unsupported key type {other}"))),
            None => Err(jwk_error("missing key type (kty)")),
        }
    }

    /// Whether a key of this JWK's kind can verify `algorithm`
    ///
    /// RSA keys serve both RS* and PS*; EC keys serve the ES* algorithm of
    /// their curve only.
    pub fn supports(&self, algorithm: Algorithm) -> bool {
        match self.key_kind() {
            Ok(PublicKeyKind::Rsa) => matches!(algorithm.family(), Family::Rsa | Family::RsaPss),
            Ok(PublicKeyKind::Ec(curve)) => algorithm.curve() == Some(curve),
            Err(_) => false,
        }
    }

    /// Convert to a verification-ready public key
    pub fn to_public_key(&self) -> Result<PublicKey> {
        if let Some(key_use) = self.key_use.as_deref() {
            if key_use != "sig" {
                return Err(jwk_error(format!(
                    "key use '{key_use}' is not for signatures"
                )));
            }
        }

        let spki = match self.key_kind()? {
            PublicKeyKind::Rsa => {
                let n = decode_member("n", self.n.as_deref(), MAX_JWK_N_SIZE)?;
                let e = decode_member("e", self.e.as_deref(), MAX_JWK_E_SIZE)?;
                der::rsa_spki_from_n_e(&n, &e)?
            }
            PublicKeyKind::Ec(curve) => {
                let x = decode_member("x", self.x.as_deref(), MAX_JWK_COORDINATE_SIZE)?;
                let y = decode_member("y", self.y.as_deref(), MAX_JWK_COORDINATE_SIZE)?;
                der::ec_spki_from_x_y(&x, &y, curve)?
            }
        };

        PublicKey::from_spki_der(&spki)
    }

    /// The public key as a `PUBLIC KEY` PEM document
    pub fn to_pem(&self) -> Result<String> {
        self.to_public_key().map(|key| key.to_pem())
    }
}

fn decode_member(name: &str, value: Option<&str>, max_size: usize) -> Result<Vec<u8>> {
    let value = value.ok_or_else(|| jwk_error(format!("missing {name}")))?;
    base64url::decode_bytes(value, max_size)
        .map_err(|e| jwk_error(format!("failed to decode {name}: {e}")))
}
