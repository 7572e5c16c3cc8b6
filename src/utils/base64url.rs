//! Base64URL encoding/decoding per RFC 4648 without padding

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Decode Base64URL string to bytes with maximum size limit
pub(crate) fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    // Reject before decoding: 4 chars carry 3 bytes
    if input.len() / 4 * 3 > max_size {
        return Err(Error::MalformedToken(format!(
            "encoded segment exceeds limit of {max_size} bytes"
        )));
    }

    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::MalformedToken(format!("base64url decode failed: {e}")))?;

    if result.len() > max_size {
        return Err(Error::MalformedToken(format!(
            "decoded size exceeds limit: {} bytes (max: {})",
            result.len(),
            max_size
        )));
    }

    Ok(result)
}

/// Decode Base64URL string to UTF-8 string with size limit
pub(crate) fn decode_string(input: &str, max_size: usize) -> Result<String> {
    decode_bytes(input, max_size).and_then(|bytes| {
        String::from_utf8(bytes).map_err(|e| Error::MalformedToken(format!("invalid UTF-8: {e}")))
    })
}

pub(crate) fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}
