use crate::algorithm::traits::decode_signature;
use crate::algorithm::{Algorithm, HashSize, SignatureAlgorithm};
use crate::error::{Error, Result};
use crate::keys::KeyMaterial;
use crate::utils::base64url;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac as HmacCore, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// HS256, HS384 and HS512
pub(crate) struct Hmac {
    algorithm: Algorithm,
}

impl Hmac {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    fn compute(&self, signing_input: &str, key: &KeyMaterial) -> Result<Vec<u8>> {
        let secret = key.as_secret()?;
        let hash = self
            .algorithm
            .hash_size()
            .ok_or_else(|| Error::UnsupportedAlgorithm(self.algorithm.to_string()))?;
        compute_mac(hash, secret, signing_input.as_bytes())
    }
}

impl SignatureAlgorithm for Hmac {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &KeyMaterial) -> Result<()> {
        // Key problems surface before the signature is even looked at
        let expected = self.compute(signing_input, key)?;
        let provided = decode_signature(signature)?;

        if provided.len() != expected.len() {
            return Err(Error::SignatureMismatch);
        }

        if constant_time_eq(&provided, &expected) {
            Ok(())
        } else {
            Err(Error::SignatureMismatch)
        }
    }

    fn sign(&self, signing_input: &str, key: &KeyMaterial) -> Result<String> {
        self.compute(signing_input, key).map(base64url::encode)
    }
}

fn compute_mac(hash: HashSize, secret: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    macro_rules! mac {
        ($digest:ty) => {{
            let mut mac = HmacCore::<$digest>::new_from_slice(secret)
                .map_err(|_| Error::MissingKey("invalid HMAC secret".into()))?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }};
    }

    Ok(match hash {
        HashSize::Sha256 => mac!(Sha256),
        HashSize::Sha384 => mac!(Sha384),
        HashSize::Sha512 => mac!(Sha512),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNING_INPUT: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ";

    #[test]
    fn test_hs256_known_vector() {
        let key = KeyMaterial::secret("your-256-bit-secret");
        let hs256 = Hmac::new(Algorithm::HS256);

        let signature = hs256.sign(SIGNING_INPUT, &key).unwrap();
        assert_eq!(signature, "SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c");
        assert!(hs256.verify(SIGNING_INPUT, &signature, &key).is_ok());
    }

    #[test]
    fn test_hs256_wrong_secret() {
        let hs256 = Hmac::new(Algorithm::HS256);
        let signature = hs256
            .sign(SIGNING_INPUT, &KeyMaterial::secret("your-256-bit-secret"))
            .unwrap();

        let result = hs256.verify(SIGNING_INPUT, &signature, &KeyMaterial::secret("wrong-secret"));
        assert_eq!(result, Err(Error::SignatureMismatch));
    }

    #[test]
    fn test_signature_lengths() {
        let key = KeyMaterial::secret("your-384-bit-secret-which-is-longer-than-hs256");
        for (alg, len) in [
            (Algorithm::HS256, 32),
            (Algorithm::HS384, 48),
            (Algorithm::HS512, 64),
        ] {
            let signature = Hmac::new(alg).sign(SIGNING_INPUT, &key).unwrap();
            let bytes = base64url::decode_bytes(&signature, 1024).unwrap();
            assert_eq!(bytes.len(), len, "{alg}");
        }
    }

    #[test]
    fn test_cross_hash_signature_rejected() {
        let key = KeyMaterial::secret("shared");
        let hs512_signature = Hmac::new(Algorithm::HS512).sign(SIGNING_INPUT, &key).unwrap();
        assert_eq!(
            Hmac::new(Algorithm::HS256).verify(SIGNING_INPUT, &hs512_signature, &key),
            Err(Error::SignatureMismatch)
        );
    }

    #[test]
    fn test_empty_secret_fails_fast() {
        let result = Hmac::new(Algorithm::HS256).verify(SIGNING_INPUT, "", &KeyMaterial::secret(""));
        assert!(matches!(result, Err(Error::MissingKey(_))));
    }

    #[test]
    fn test_placeholder_never_verifies() {
        let key = KeyMaterial::Placeholder("HS256-signing-key-placeholder".into());
        let hs256 = Hmac::new(Algorithm::HS256);
        let forged = hs256
            .sign(SIGNING_INPUT, &KeyMaterial::secret("HS256-signing-key-placeholder"))
            .unwrap();
        assert!(matches!(
            hs256.verify(SIGNING_INPUT, &forged, &key),
            Err(Error::MissingKey(_))
        ));
    }
}
