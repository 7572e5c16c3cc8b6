//! Token construction for every registered algorithm

use crate::algorithm::{Algorithm, signature_strategy};
use crate::claims::current_timestamp;
use crate::error::Result;
use crate::keys::KeyMaterial;
use crate::token::codec::encode;
use miniserde::json::{Number, Object, Value};
use tracing::debug;

/// Lifetime used by [`create_token`] when none is given (one hour)
pub const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Options for [`create_token`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenOptions {
    /// Seconds between `iat` and `exp`
    pub expires_in: u64,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            expires_in: DEFAULT_EXPIRES_IN,
        }
    }
}

/// Sign `payload` with `algorithm`
///
/// The header is `{"alg": <algorithm>, "typ": "JWT"}`. Signed algorithms get
/// an `iat` of now unless the payload already has one. `none` produces
/// `header.payload.` with an empty signature segment.
pub fn sign(algorithm: Algorithm, payload: &Object, key: &KeyMaterial) -> Result<String> {
    sign_at(algorithm, payload, key, current_timestamp())
}

/// [`sign`] with a fixed clock
pub fn sign_at(algorithm: Algorithm, payload: &Object, key: &KeyMaterial, now: u64) -> Result<String> {
    let mut header = Object::new();
    header.insert("alg".into(), Value::String(algorithm.as_str().into()));
    header.insert("typ".into(), Value::String("JWT".into()));

    let mut payload = payload.clone();
    if algorithm != Algorithm::None && !payload.contains_key("iat") {
        payload.insert("iat".into(), timestamp(now));
    }

    let signing_input = encode(&header, &payload);
    let signature = signature_strategy(algorithm).sign(&signing_input, key)?;
    debug!(%algorithm, "signed token");

    Ok(format!("{signing_input}.{signature}"))
}

/// Sign `claims` after adding `iat` and `exp`
///
/// `iat` is now and `exp` is now plus [`TokenOptions::expires_in`]. Claims
/// supplied by the caller take precedence over both.
pub fn create_token(
    algorithm: Algorithm,
    claims: &Object,
    key: &KeyMaterial,
    options: TokenOptions,
) -> Result<String> {
    create_token_at(algorithm, claims, key, options, current_timestamp())
}

/// [`create_token`] with a fixed clock
pub fn create_token_at(
    algorithm: Algorithm,
    claims: &Object,
    key: &KeyMaterial,
    options: TokenOptions,
    now: u64,
) -> Result<String> {
    let mut payload = Object::new();
    payload.insert("iat".into(), timestamp(now));
    payload.insert(
        "exp".into(),
        timestamp(now.saturating_add(options.expires_in)),
    );
    for (name, value) in claims.iter() {
        payload.insert(name.clone(), value.clone());
    }

    sign_at(algorithm, &payload, key, now)
}

/// Demonstration claim set issued at `now` and valid for an hour
pub fn sample_payload(now: u64) -> Object {
    let mut payload = Object::new();
    payload.insert("sub".into(), Value::String("1234567890".into()));
    payload.insert("name".into(), Value::String("John Doe".into()));
    payload.insert("iat".into(), timestamp(now));
    payload.insert(
        "exp".into(),
        timestamp(now.saturating_add(DEFAULT_EXPIRES_IN)),
    );
    payload.insert("aud".into(), Value::String("jwt-debugger-app".into()));
    payload.insert("iss".into(), Value::String("jwt-debugger".into()));
    payload.insert(
        "jti".into(),
        Value::String(uuid::Uuid::new_v4().to_string()),
    );
    payload
}

fn timestamp(seconds: u64) -> Value {
    Value::Number(Number::U64(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::{StandardClaims, is_expired_at};
    use crate::token::Token;

    fn claims(json: &str) -> Object {
        miniserde::json::from_str(json).unwrap()
    }

    #[test]
    fn test_sign_none() {
        let token = sign_at(
            Algorithm::None,
            &claims(r#"{"sub":"1"}"#),
            &KeyMaterial::Placeholder("unused".into()),
            1000,
        )
        .unwrap();

        assert!(token.ends_with('.'));
        let decoded = Token::decode(&token).unwrap();
        assert_eq!(decoded.header_json(), r#"{"alg":"none","typ":"JWT"}"#);
        assert_eq!(decoded.payload_json(), r#"{"sub":"1"}"#);
        assert_eq!(decoded.signature_segment(), "");
    }

    #[test]
    fn test_sign_hs256_adds_iat() {
        let key = KeyMaterial::secret("your-256-bit-secret");
        let token = sign_at(Algorithm::HS256, &claims(r#"{"sub":"1"}"#), &key, 1000).unwrap();

        let decoded = Token::decode(&token).unwrap();
        assert_eq!(decoded.header_json(), r#"{"alg":"HS256","typ":"JWT"}"#);
        assert_eq!(decoded.payload().issued_at(), Some(1000.0));
        assert!(
            signature_strategy(Algorithm::HS256)
                .verify(decoded.signing_input(), decoded.signature_segment(), &key)
                .is_ok()
        );
    }

    #[test]
    fn test_sign_keeps_existing_iat() {
        let key = KeyMaterial::secret("s");
        let token = sign_at(Algorithm::HS384, &claims(r#"{"iat":5}"#), &key, 1000).unwrap();
        assert_eq!(Token::decode(&token).unwrap().payload().issued_at(), Some(5.0));
    }

    #[test]
    fn test_create_token_sets_lifetime() {
        let key = KeyMaterial::secret("s");
        let token = create_token_at(
            Algorithm::HS256,
            &claims(r#"{"sub":"1"}"#),
            &key,
            TokenOptions::default(),
            1000,
        )
        .unwrap();

        let payload = Token::decode(&token).unwrap().payload().clone();
        assert_eq!(payload.issued_at(), Some(1000.0));
        assert_eq!(payload.expiration(), Some(4600.0));
        assert!(!is_expired_at(&payload, 4600));
        assert!(is_expired_at(&payload, 4601));
    }

    #[test]
    fn test_create_token_claims_override() {
        let key = KeyMaterial::secret("s");
        let token = create_token_at(
            Algorithm::HS256,
            &claims(r#"{"exp":10}"#),
            &key,
            TokenOptions { expires_in: 60 },
            1000,
        )
        .unwrap();
        let payload = Token::decode(&token).unwrap().payload().clone();
        assert_eq!(payload.expiration(), Some(10.0));
    }

    #[test]
    fn test_sign_with_placeholder_fails() {
        let key = KeyMaterial::Placeholder("HS256-signing-key-placeholder".into());
        assert!(sign(Algorithm::HS256, &Object::new(), &key).is_err());
    }

    #[test]
    fn test_sample_payload() {
        let payload = sample_payload(1000);
        assert_eq!(payload.subject(), Some("1234567890"));
        assert_eq!(payload.issuer(), Some("jwt-debugger"));
        assert_eq!(payload.audience(), vec!["jwt-debugger-app"]);
        assert_eq!(payload.expiration(), Some(4600.0));
        let jti = payload.jwt_id().unwrap();
        assert_eq!(jti.len(), 36);
        assert_eq!(jti.as_bytes()[14], b'4');
    }
}
