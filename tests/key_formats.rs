//! Accepted and rejected key text formats

use jwtscope::*;
use miniserde::json::Object;
use rsa::RsaPrivateKey;
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use std::sync::OnceLock;

fn rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("Failed to generate key")
    })
}

fn pkcs8_private_pem() -> String {
    rsa_key().to_pkcs8_pem(LineEnding::LF).unwrap().to_string()
}

fn pkcs1_private_pem() -> String {
    rsa_key().to_pkcs1_pem(LineEnding::LF).unwrap().to_string()
}

fn spki_public_pem() -> String {
    rsa_key().to_public_key().to_public_key_pem(LineEnding::LF).unwrap()
}

fn pkcs1_public_pem() -> String {
    rsa_key().to_public_key().to_pkcs1_pem(LineEnding::LF).unwrap()
}

async fn verifies(token: &str, public_pem: &str) -> ValidationResult {
    TokenValidator::new()
        .key(public_pem)
        .build()
        .validate(token)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_private_key_formats_sign() {
    for private_pem in [pkcs8_private_pem(), pkcs1_private_pem()] {
        let key = KeyMaterial::from_text(&private_pem, Family::Rsa, KeyRole::Signing).unwrap();
        let token = sign(Algorithm::RS512, &Object::new(), &key).unwrap();
        assert!(verifies(&token, &spki_public_pem()).await.valid);
    }
}

#[test]
fn test_private_key_format_detected() {
    let pkcs8 = PrivateKey::from_pem(&pkcs8_private_pem()).unwrap();
    let pkcs1 = PrivateKey::from_pem(&pkcs1_private_pem()).unwrap();
    assert_eq!(pkcs8.format(), PrivateKeyFormat::Pkcs8);
    assert_eq!(pkcs1.format(), PrivateKeyFormat::Pkcs1);
}

#[tokio::test]
async fn test_public_key_formats_verify() {
    let key = KeyMaterial::from_text(&pkcs8_private_pem(), Family::RsaPss, KeyRole::Signing).unwrap();
    let token = sign(Algorithm::PS256, &Object::new(), &key).unwrap();

    for public_pem in [spki_public_pem(), pkcs1_public_pem()] {
        let result = verifies(&token, &public_pem).await;
        assert!(result.valid, "{:?}", result.error);
    }
}

#[test]
fn test_public_key_forms_are_equivalent() {
    let spki = PublicKey::from_pem(&spki_public_pem()).unwrap();
    let pkcs1 = PublicKey::from_pem(&pkcs1_public_pem()).unwrap();
    assert_eq!(spki, pkcs1);
    assert_eq!(pkcs1.to_pem().trim_end(), spki_public_pem().trim_end());
}

#[tokio::test]
async fn test_private_key_rejected_for_verification() {
    let key = KeyMaterial::from_text(&pkcs8_private_pem(), Family::Rsa, KeyRole::Signing).unwrap();
    let token = sign(Algorithm::RS256, &Object::new(), &key).unwrap();

    for private_pem in [pkcs8_private_pem(), pkcs1_private_pem()] {
        let result = verifies(&token, &private_pem).await;
        assert!(!result.valid);
        assert!(matches!(result.error, Some(Error::KeyConversionFailure(_))));
    }
}

#[tokio::test]
async fn test_garbage_key_text() {
    let key = KeyMaterial::from_text(&pkcs8_private_pem(), Family::Rsa, KeyRole::Signing).unwrap();
    let token = sign(Algorithm::RS256, &Object::new(), &key).unwrap();

    for text in [
        "not a pem at all",
        "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n",
        "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n",
    ] {
        let result = verifies(&token, text).await;
        assert!(!result.valid, "{text}");
        assert!(
            matches!(result.error, Some(Error::KeyConversionFailure(_))),
            "{text}: {:?}",
            result.error
        );
    }
}

#[tokio::test]
async fn test_named_keys_from_json() {
    let key = KeyMaterial::from_text(&pkcs8_private_pem(), Family::Rsa, KeyRole::Signing).unwrap();
    let token = sign(Algorithm::RS256, &Object::new(), &key).unwrap();

    let document = serde_json::json!({
        "RS256_verification": spki_public_pem(),
        "HS256_signing": "shared-secret",
    })
    .to_string();
    let config = KeyConfig::from_json(&document).unwrap();
    assert_eq!(config.len(), 2);
    assert_eq!(config.get("HS256_signing"), Some("shared-secret"));

    let result = TokenValidator::new()
        .named_keys(config)
        .build()
        .validate(&token)
        .await
        .unwrap();
    assert!(result.valid);
    assert_eq!(
        result.key_source,
        Some(KeySource::Named("RS256_verification".into()))
    );
}

#[test]
fn test_named_keys_must_be_strings() {
    assert!(matches!(
        KeyConfig::from_json(r#"{"HS256_signing": 42}"#),
        Err(Error::KeyConversionFailure(_))
    ));
    assert!(KeyConfig::from_json("[]").is_err());
}
