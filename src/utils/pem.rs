//! PEM armour for key material

use crate::error::{Error, Result};
use crate::limits::MAX_PEM_SIZE;
use pem::{EncodeConfig, LineEnding, Pem};

pub(crate) const TAG_PUBLIC_KEY: &str = "PUBLIC KEY";
pub(crate) const TAG_RSA_PUBLIC_KEY: &str = "RSA PUBLIC KEY";
pub(crate) const TAG_PRIVATE_KEY: &str = "PRIVATE KEY";
pub(crate) const TAG_RSA_PRIVATE_KEY: &str = "RSA PRIVATE KEY";
pub(crate) const TAG_EC_PRIVATE_KEY: &str = "EC PRIVATE KEY";

/// Whether the text looks like PEM armour at all
pub(crate) fn is_armoured(text: &str) -> bool {
    text.trim_start().starts_with("-----BEGIN ")
}

/// Parse a single PEM block
pub(crate) fn parse(text: &str) -> Result<Pem> {
    if text.len() > MAX_PEM_SIZE {
        return Err(Error::KeyConversionFailure(format!(
            "pem: input too large: {} bytes (maximum: {MAX_PEM_SIZE} bytes)",
            text.len()
        )));
    }
    pem::parse(text.trim()).map_err(|e| Error::KeyConversionFailure(format!("pem: {e}")))
}

/// Encode DER contents with LF line endings
pub(crate) fn encode(tag: &str, der: &[u8]) -> String {
    let block = Pem::new(tag, der.to_vec());
    pem::encode_config(&block, EncodeConfig::new().set_line_ending(LineEnding::LF))
}
