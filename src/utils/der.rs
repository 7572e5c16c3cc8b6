//! DER helpers for SubjectPublicKeyInfo
//!
//! Builds SPKI documents from JWK members and unwraps them into the raw key
//! encodings aws-lc-rs verifies against (PKCS#1 `RSAPublicKey` for RSA and the
//! uncompressed SEC1 point for EC). Uses the RustCrypto `spki` and `der` crates.

use crate::algorithm::Curve;
use crate::error::{Error, Result};
use der::asn1::{Any, AnyRef, BitString, ObjectIdentifier, UintRef};
use der::{Decode, Encode, Sequence};
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned, SubjectPublicKeyInfoRef};

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Largest RSA modulus accepted (65536 bits)
const MAX_RSA_MODULUS_SIZE: usize = 8192;

fn conversion_error(operation: &str, details: impl std::fmt::Display) -> Error {
    Error::KeyConversionFailure(format!("{operation}: {details}"))
}

/// RSAPublicKey as defined in RFC 8017:
/// RSAPublicKey ::= SEQUENCE {
///     modulus           INTEGER,  -- n
///     publicExponent    INTEGER   -- e
/// }
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

/// Algorithm-specific content of a parsed SubjectPublicKeyInfo
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SpkiContent {
    /// DER `RSAPublicKey`
    Rsa(Vec<u8>),
    /// Uncompressed point `04 || x || y`
    Ec(Curve, Vec<u8>),
}

/// Build DER-encoded SPKI for an RSA key from modulus (n) and exponent (e) bytes
pub(crate) fn rsa_spki_from_n_e(n: &[u8], e: &[u8]) -> Result<Vec<u8>> {
    if n.is_empty() || e.is_empty() {
        return Err(conversion_error("rsa key", "missing n or e"));
    }
    if n.len() > MAX_RSA_MODULUS_SIZE {
        return Err(conversion_error(
            "rsa key",
            format!(
                "modulus too large: {} bytes (maximum: {MAX_RSA_MODULUS_SIZE} bytes)",
                n.len()
            ),
        ));
    }

    let modulus = UintRef::new(n).map_err(|e| conversion_error("rsa modulus", e))?;
    let public_exponent = UintRef::new(e).map_err(|e| conversion_error("rsa exponent", e))?;

    let pkcs1 = RsaPublicKey {
        modulus,
        public_exponent,
    }
    .to_der()
    .map_err(|e| conversion_error("rsa public key", e))?;

    rsa_spki_from_pkcs1(&pkcs1)
}

/// Wrap a PKCS#1 `RSAPublicKey` in SPKI
pub(crate) fn rsa_spki_from_pkcs1(pkcs1: &[u8]) -> Result<Vec<u8>> {
    // Reject anything that is not an RSAPublicKey before wrapping it
    RsaPublicKey::from_der(pkcs1).map_err(|e| conversion_error("rsa public key", e))?;

    let algorithm = AlgorithmIdentifierOwned {
        oid: RSA_ENCRYPTION_OID,
        parameters: Some(AnyRef::NULL.into()),
    };
    encode_spki(algorithm, pkcs1)
}

/// Build DER-encoded SPKI for an EC key from affine coordinates
///
/// Coordinates shorter than the curve size are left-padded with zeros.
pub(crate) fn ec_spki_from_x_y(x: &[u8], y: &[u8], curve: Curve) -> Result<Vec<u8>> {
    let len = curve.coordinate_len();
    if x.is_empty() || y.is_empty() {
        return Err(conversion_error("ec key", "missing x or y"));
    }
    if x.len() > len || y.len() > len {
        return Err(conversion_error(
            "ec key",
            format!("coordinate longer than {len} bytes for {curve}"),
        ));
    }

    let mut point = Vec::with_capacity(1 + 2 * len);
    point.push(0x04);
    point.resize(1 + len - x.len(), 0);
    point.extend_from_slice(x);
    point.resize(1 + 2 * len - y.len(), 0);
    point.extend_from_slice(y);

    ec_spki_from_point(&point, curve)
}

/// Wrap an uncompressed EC point in SPKI
pub(crate) fn ec_spki_from_point(point: &[u8], curve: Curve) -> Result<Vec<u8>> {
    let parameters = Any::encode_from(&curve.oid()).map_err(|e| conversion_error("ec curve", e))?;
    let algorithm = AlgorithmIdentifierOwned {
        oid: EC_PUBLIC_KEY_OID,
        parameters: Some(parameters),
    };
    encode_spki(algorithm, point)
}

fn encode_spki(algorithm: AlgorithmIdentifierOwned, key: &[u8]) -> Result<Vec<u8>> {
    let subject_public_key =
        BitString::new(0, key).map_err(|e| conversion_error("bit string", e))?;

    SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key,
    }
    .to_der()
    .map_err(|e| conversion_error("spki", e))
}

/// Parse SPKI and return the key in the form the verifier consumes
pub(crate) fn parse_spki(der: &[u8]) -> Result<SpkiContent> {
    let spki = SubjectPublicKeyInfoRef::from_der(der).map_err(|e| conversion_error("spki", e))?;
    let key = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| conversion_error("spki", "public key has unused bits"))?;

    if spki.algorithm.oid == RSA_ENCRYPTION_OID {
        RsaPublicKey::from_der(key).map_err(|e| conversion_error("rsa public key", e))?;
        return Ok(SpkiContent::Rsa(key.to_vec()));
    }

    if spki.algorithm.oid == EC_PUBLIC_KEY_OID {
        let curve_oid: ObjectIdentifier = spki
            .algorithm
            .parameters
            .ok_or_else(|| conversion_error("ec key", "missing curve parameter"))?
            .decode_as()
            .map_err(|e| conversion_error("ec curve", e))?;
        let curve = Curve::from_oid(&curve_oid)
            .ok_or_else(|| conversion_error("ec key", format!("unsupported curve {curve_oid}")))?;
        if key.len() != 1 + 2 * curve.coordinate_len() || key[0] != 0x04 {
            return Err(conversion_error(
                "ec key",
                "expected an uncompressed point",
            ));
        }
        return Ok(SpkiContent::Ec(curve, key.to_vec()));
    }

    Err(conversion_error(
        "spki",
        format!("unsupported key algorithm {}", spki.algorithm.oid),
    ))
}
