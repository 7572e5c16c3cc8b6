use crate::algorithm::{Algorithm, SignatureAlgorithm};
use crate::error::{Error, Result};
use crate::keys::KeyMaterial;

/// Unsecured JWS: the signature segment is empty and no key is involved
pub(crate) struct Unsecured;

impl SignatureAlgorithm for Unsecured {
    fn algorithm(&self) -> Algorithm {
        Algorithm::None
    }

    fn verify(&self, _signing_input: &str, signature: &str, _key: &KeyMaterial) -> Result<()> {
        if signature.is_empty() {
            Ok(())
        } else {
            Err(Error::SignatureMismatch)
        }
    }

    fn sign(&self, _signing_input: &str, _key: &KeyMaterial) -> Result<String> {
        Ok(String::new())
    }
}
