//! Compact serialization: `header.payload.signature`

use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use crate::limits::{MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_TOKEN_LENGTH};
use crate::utils::base64url;
use miniserde::json::{self, Object, Value};

/// A decoded token
///
/// Exists only for well-formed input: exactly three `.`-separated segments,
/// with header and payload each decoding to a JSON object. The signature
/// segment is kept verbatim and never decoded here.
#[derive(Clone)]
pub struct Token {
    raw: String,
    header_len: usize,
    payload_len: usize,
    header: Object,
    payload: Object,
}

impl Token {
    /// Decode a compact token. Any malformation yields `None`.
    pub fn decode(raw: &str) -> Option<Self> {
        Self::parse(raw).ok()
    }

    /// Decode a compact token, reporting why it is malformed
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.len() > MAX_TOKEN_LENGTH {
            return Err(Error::MalformedToken(format!(
                "token too large: {} bytes (maximum: {MAX_TOKEN_LENGTH} bytes)",
                raw.len()
            )));
        }

        let mut parts = raw.split('.');
        let (Some(header_b64), Some(payload_b64), Some(_), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::MalformedToken(
                "expected three segments separated by '.'".into(),
            ));
        };

        let header = decode_object("header", header_b64, MAX_DECODED_HEADER_SIZE)?;
        let payload = decode_object("payload", payload_b64, MAX_DECODED_PAYLOAD_SIZE)?;

        Ok(Self {
            raw: raw.to_string(),
            header_len: header_b64.len(),
            payload_len: payload_b64.len(),
            header,
            payload,
        })
    }

    /// The original input
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn header_segment(&self) -> &str {
        &self.raw[..self.header_len]
    }

    pub fn payload_segment(&self) -> &str {
        let start = self.header_len + 1;
        &self.raw[start..start + self.payload_len]
    }

    pub fn signature_segment(&self) -> &str {
        &self.raw[self.header_len + self.payload_len + 2..]
    }

    /// `header.payload` exactly as it appears in the input
    pub fn signing_input(&self) -> &str {
        &self.raw[..self.header_len + 1 + self.payload_len]
    }

    pub fn header(&self) -> &Object {
        &self.header
    }

    pub fn payload(&self) -> &Object {
        &self.payload
    }

    pub fn header_value(&self, name: &str) -> Option<&Value> {
        self.header.get(name)
    }

    pub fn claim(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    /// The `alg` header when it is a string
    pub fn algorithm_str(&self) -> Option<&str> {
        string_member(&self.header, "alg")
    }

    /// The `alg` header resolved against the registry
    pub fn algorithm(&self) -> Result<Algorithm> {
        match self.algorithm_str() {
            Some(alg) => Algorithm::from_str(alg),
            None => Err(Error::UnsupportedAlgorithm("missing alg header".into())),
        }
    }

    /// The `kid` header when it is a string
    pub fn key_id(&self) -> Option<&str> {
        string_member(&self.header, "kid")
    }

    /// The `typ` header when it is a string
    pub fn token_type(&self) -> Option<&str> {
        string_member(&self.header, "typ")
    }

    /// Header as compact JSON with sorted keys
    pub fn header_json(&self) -> String {
        json::to_string(&self.header)
    }

    /// Payload as compact JSON with sorted keys
    pub fn payload_json(&self) -> String {
        json::to_string(&self.payload)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("header", &self.header_json())
            .field("payload", &self.payload_json())
            .field("signature", &self.signature_segment())
            .finish()
    }
}

fn string_member<'a>(object: &'a Object, name: &str) -> Option<&'a str> {
    match object.get(name) {
        Some(Value::String(value)) => Some(value),
        _ => None,
    }
}

fn decode_object(segment: &str, input: &str, max_size: usize) -> Result<Object> {
    let text = base64url::decode_string(input, max_size).map_err(|e| match e {
        Error::MalformedToken(reason) => Error::MalformedToken(format!("{segment}: {reason}")),
        other => other,
    })?;
    json::from_str::<Object>(&text)
        .map_err(|_| Error::MalformedToken(format!("{segment}: not a JSON object")))
}

/// Encode header and payload into the signing input `header.payload`
///
/// JSON is compact with object keys in sorted order, so equal objects always
/// encode to the same text.
pub fn encode(header: &Object, payload: &Object) -> String {
    format!(
        "{}.{}",
        base64url::encode(json::to_string(header)),
        base64url::encode(json::to_string(payload))
    )
}

/// Whether `raw` decodes as a token
pub fn is_valid_format(raw: &str) -> bool {
    Token::decode(raw).is_some()
}

/// The `alg` header of `raw`, if it decodes
pub fn get_algorithm(raw: &str) -> Option<String> {
    Token::decode(raw).and_then(|token| token.algorithm_str().map(str::to_string))
}
