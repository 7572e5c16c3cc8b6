use crate::algorithm::traits::decode_signature;
use crate::algorithm::{Algorithm, Curve, SignatureAlgorithm};
use crate::error::{Error, Result};
use crate::keys::{KeyMaterial, PrivateKeyFormat, PublicKeyKind};
use crate::utils::base64url;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaKeyPair, EcdsaSigningAlgorithm, UnparsedPublicKey};

/// ES256, ES384 and ES512
///
/// Signatures use the fixed-length `R || S` layout from RFC 7518 Section 3.4,
/// not ASN.1 DER.
pub(crate) struct Ecdsa {
    algorithm: Algorithm,
}

impl Ecdsa {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    fn curve(&self) -> Result<Curve> {
        self.algorithm
            .curve()
            .ok_or_else(|| Error::UnsupportedAlgorithm(self.algorithm.to_string()))
    }
}

fn verification_algorithm(curve: Curve) -> &'static dyn signature::VerificationAlgorithm {
    match curve {
        Curve::P256 => &signature::ECDSA_P256_SHA256_FIXED,
        Curve::P384 => &signature::ECDSA_P384_SHA384_FIXED,
        Curve::P521 => &signature::ECDSA_P521_SHA512_FIXED,
    }
}

fn signing_algorithm(curve: Curve) -> &'static EcdsaSigningAlgorithm {
    match curve {
        Curve::P256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
        Curve::P384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
        Curve::P521 => &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
    }
}

impl SignatureAlgorithm for Ecdsa {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &KeyMaterial) -> Result<()> {
        let curve = self.curve()?;
        let public_key = key.as_public()?;
        if public_key.kind() != PublicKeyKind::Ec(curve) {
            return Err(Error::KeyConversionFailure(format!(
                "{} requires an EC {curve} public key, found {:?}",
                self.algorithm,
                public_key.kind()
            )));
        }

        let signature_bytes = decode_signature(signature)?;
        UnparsedPublicKey::new(verification_algorithm(curve), public_key.raw())
            .verify(signing_input.as_bytes(), &signature_bytes)
            .map_err(|_| Error::SignatureMismatch)
    }

    fn sign(&self, signing_input: &str, key: &KeyMaterial) -> Result<String> {
        let curve = self.curve()?;
        let private_key = key.as_private()?;
        let alg = signing_algorithm(curve);
        let key_pair = match private_key.format() {
            PrivateKeyFormat::Pkcs8 => EcdsaKeyPair::from_pkcs8(alg, private_key.der()),
            PrivateKeyFormat::Sec1 => EcdsaKeyPair::from_private_key_der(alg, private_key.der()),
            PrivateKeyFormat::Pkcs1 => {
                return Err(Error::KeyConversionFailure(format!(
                    "{} requires an EC private key, found an RSA key",
                    self.algorithm
                )));
            }
        }
        .map_err(|e| Error::KeyConversionFailure(format!("ec {curve} private key: {e}")))?;

        let signature = key_pair
            .sign(&SystemRandom::new(), signing_input.as_bytes())
            .map_err(|_| Error::KeyConversionFailure(format!("{} signing failed", self.algorithm)))?;

        Ok(base64url::encode(signature.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{PrivateKey, PublicKey};
    use crate::testing;

    const SIGNING_INPUT: &str = "eyJhbGciOiJFUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    #[test]
    fn test_every_curve_sign_and_verify() {
        for alg in [Algorithm::ES256, Algorithm::ES384, Algorithm::ES512] {
            let curve = alg.curve().unwrap();
            let (private_pem, public_pem) = testing::ec_key_pair_pem(curve);
            let private_key = KeyMaterial::Private(PrivateKey::from_pem(&private_pem).unwrap());
            let public_key = KeyMaterial::Public(PublicKey::from_pem(&public_pem).unwrap());

            let es = Ecdsa::new(alg);
            let signature = es.sign(SIGNING_INPUT, &private_key).unwrap();
            let bytes = base64url::decode_bytes(&signature, 1024).unwrap();
            assert_eq!(bytes.len(), 2 * curve.coordinate_len(), "{alg}");
            assert!(es.verify(SIGNING_INPUT, &signature, &public_key).is_ok(), "{alg}");
        }
    }

    #[test]
    fn test_es256_wrong_key() {
        let (private_pem, _) = testing::ec_key_pair_pem(Curve::P256);
        let (_, other_public_pem) = testing::ec_key_pair_pem(Curve::P256);

        let es256 = Ecdsa::new(Algorithm::ES256);
        let signature = es256
            .sign(
                SIGNING_INPUT,
                &KeyMaterial::Private(PrivateKey::from_pem(&private_pem).unwrap()),
            )
            .unwrap();
        let result = es256.verify(
            SIGNING_INPUT,
            &signature,
            &KeyMaterial::Public(PublicKey::from_pem(&other_public_pem).unwrap()),
        );
        assert_eq!(result, Err(Error::SignatureMismatch));
    }

    #[test]
    fn test_curve_mismatch() {
        let (_, public_pem) = testing::ec_key_pair_pem(Curve::P384);
        let key = KeyMaterial::Public(PublicKey::from_pem(&public_pem).unwrap());
        let result = Ecdsa::new(Algorithm::ES256).verify(SIGNING_INPUT, "", &key);
        assert!(matches!(result, Err(Error::KeyConversionFailure(msg)) if msg.contains("P-256")));
    }

    #[test]
    fn test_signing_with_wrong_curve_key() {
        let (private_pem, _) = testing::ec_key_pair_pem(Curve::P256);
        let key = KeyMaterial::Private(PrivateKey::from_pem(&private_pem).unwrap());
        assert!(matches!(
            Ecdsa::new(Algorithm::ES384).sign(SIGNING_INPUT, &key),
            Err(Error::KeyConversionFailure(_))
        ));
    }
}
