use crate::algorithm::{Algorithm, Family};
use crate::error::{Error, Result};
use crate::keys::KeyMaterial;
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;
use crate::utils::base64url;

/// Signing and verification for one algorithm
///
/// Implemented once per family; the concrete hash size or curve comes from the
/// [`Algorithm`] the strategy was built for.
pub trait SignatureAlgorithm {
    /// The algorithm this strategy serves
    fn algorithm(&self) -> Algorithm;

    /// Verify a signature
    ///
    /// # Arguments
    /// * `signing_input` - The signed data, `header.payload` exactly as it appears in the token
    /// * `signature` - The Base64URL-encoded signature segment
    /// * `key` - Verification key
    fn verify(&self, signing_input: &str, signature: &str, key: &KeyMaterial) -> Result<()>;

    /// Produce the Base64URL-encoded signature segment for `signing_input`
    fn sign(&self, signing_input: &str, key: &KeyMaterial) -> Result<String>;
}

/// Boxed strategy, shareable across threads
pub type SignatureStrategy = Box<dyn SignatureAlgorithm + Send + Sync>;

/// Strategy for an algorithm, chosen by its family
pub fn signature_strategy(algorithm: Algorithm) -> SignatureStrategy {
    match algorithm.family() {
        Family::Hmac => Box::new(super::hmac::Hmac::new(algorithm)),
        Family::Rsa => Box::new(super::rsa::RsaPkcs1::new(algorithm)),
        Family::RsaPss => Box::new(super::rsa::RsaPss::new(algorithm)),
        Family::Ecdsa => Box::new(super::ecdsa::Ecdsa::new(algorithm)),
        Family::None => Box::new(super::none::Unsecured),
    }
}

/// Decode a signature segment. Undecodable input can never match, so it is a mismatch.
pub(crate) fn decode_signature(signature: &str) -> Result<Vec<u8>> {
    base64url::decode_bytes(signature, MAX_DECODED_SIGNATURE_SIZE)
        .map_err(|_| Error::SignatureMismatch)
}
