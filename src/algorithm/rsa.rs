use crate::algorithm::traits::decode_signature;
use crate::algorithm::{Algorithm, SignatureAlgorithm};
use crate::error::{Error, Result};
use crate::keys::{KeyMaterial, PrivateKeyFormat, PublicKeyKind};
use crate::utils::base64url;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaEncoding, RsaKeyPair, UnparsedPublicKey};

/// RS256, RS384 and RS512 (RSASSA-PKCS1-v1_5)
pub(crate) struct RsaPkcs1 {
    algorithm: Algorithm,
}

/// PS256, PS384 and PS512 (RSASSA-PSS, MGF1 with the same hash)
pub(crate) struct RsaPss {
    algorithm: Algorithm,
}

impl RsaPkcs1 {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }
}

impl RsaPss {
    pub(crate) fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }
}

impl SignatureAlgorithm for RsaPkcs1 {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &KeyMaterial) -> Result<()> {
        verify_rsa(self.algorithm, signing_input, signature, key)
    }

    fn sign(&self, signing_input: &str, key: &KeyMaterial) -> Result<String> {
        sign_rsa(self.algorithm, signing_input, key)
    }
}

impl SignatureAlgorithm for RsaPss {
    fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn verify(&self, signing_input: &str, signature: &str, key: &KeyMaterial) -> Result<()> {
        verify_rsa(self.algorithm, signing_input, signature, key)
    }

    fn sign(&self, signing_input: &str, key: &KeyMaterial) -> Result<String> {
        sign_rsa(self.algorithm, signing_input, key)
    }
}

fn verification_algorithm(
    algorithm: Algorithm,
) -> Result<&'static dyn signature::VerificationAlgorithm> {
    Ok(match algorithm {
        Algorithm::RS256 => &signature::RSA_PKCS1_2048_8192_SHA256,
        Algorithm::RS384 => &signature::RSA_PKCS1_2048_8192_SHA384,
        Algorithm::RS512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        Algorithm::PS256 => &signature::RSA_PSS_2048_8192_SHA256,
        Algorithm::PS384 => &signature::RSA_PSS_2048_8192_SHA384,
        Algorithm::PS512 => &signature::RSA_PSS_2048_8192_SHA512,
        other => return Err(Error::UnsupportedAlgorithm(other.to_string())),
    })
}

fn signing_encoding(algorithm: Algorithm) -> Result<&'static dyn RsaEncoding> {
    Ok(match algorithm {
        Algorithm::RS256 => &signature::RSA_PKCS1_SHA256,
        Algorithm::RS384 => &signature::RSA_PKCS1_SHA384,
        Algorithm::RS512 => &signature::RSA_PKCS1_SHA512,
        Algorithm::PS256 => &signature::RSA_PSS_SHA256,
        Algorithm::PS384 => &signature::RSA_PSS_SHA384,
        Algorithm::PS512 => &signature::RSA_PSS_SHA512,
        other => return Err(Error::UnsupportedAlgorithm(other.to_string())),
    })
}

fn verify_rsa(
    algorithm: Algorithm,
    signing_input: &str,
    signature: &str,
    key: &KeyMaterial,
) -> Result<()> {
    let public_key = key.as_public()?;
    if public_key.kind() != PublicKeyKind::Rsa {
        return Err(Error::KeyConversionFailure(format!(
            "{algorithm} requires an RSA public key, found {:?}",
            public_key.kind()
        )));
    }

    let signature_bytes = decode_signature(signature)?;
    UnparsedPublicKey::new(verification_algorithm(algorithm)?, public_key.raw())
        .verify(signing_input.as_bytes(), &signature_bytes)
        .map_err(|_| Error::SignatureMismatch)
}

fn sign_rsa(algorithm: Algorithm, signing_input: &str, key: &KeyMaterial) -> Result<String> {
    let private_key = key.as_private()?;
    let key_pair = match private_key.format() {
        PrivateKeyFormat::Pkcs8 => RsaKeyPair::from_pkcs8(private_key.der()),
        PrivateKeyFormat::Pkcs1 => RsaKeyPair::from_der(private_key.der()),
        PrivateKeyFormat::Sec1 => {
            return Err(Error::KeyConversionFailure(format!(
                "{algorithm} requires an RSA private key, found an EC key"
            )));
        }
    }
    .map_err(|e| Error::KeyConversionFailure(format!("rsa private key: {e}")))?;

    let mut signature = vec![0u8; key_pair.public_modulus_len()];
    key_pair
        .sign(
            signing_encoding(algorithm)?,
            &SystemRandom::new(),
            signing_input.as_bytes(),
            &mut signature,
        )
        .map_err(|_| Error::KeyConversionFailure(format!("{algorithm} signing failed")))?;

    Ok(base64url::encode(signature))
}
