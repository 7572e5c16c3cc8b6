//! Key fixtures for unit tests

use crate::algorithm::Curve;
use crate::utils::{der, pem};
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    ECDSA_P256_SHA256_FIXED_SIGNING, ECDSA_P384_SHA384_FIXED_SIGNING,
    ECDSA_P521_SHA512_FIXED_SIGNING, EcdsaKeyPair, KeyPair,
};
use rsa::RsaPrivateKey;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use std::sync::OnceLock;

fn rsa_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        RsaPrivateKey::new(&mut rand::thread_rng(), 2048).expect("Failed to generate key")
    })
}

/// PKCS#8 `PRIVATE KEY` PEM for a shared 2048-bit RSA key
pub(crate) fn rsa_private_pem() -> String {
    rsa_key()
        .to_pkcs8_pem(LineEnding::LF)
        .expect("Failed to serialize to PKCS#8")
        .to_string()
}

/// SPKI `PUBLIC KEY` PEM matching [`rsa_private_pem`]
pub(crate) fn rsa_public_pem() -> String {
    rsa_key()
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("Failed to serialize public key")
}

/// Fresh EC key pair as (`PRIVATE KEY` PEM, `PUBLIC KEY` PEM)
pub(crate) fn ec_key_pair_pem(curve: Curve) -> (String, String) {
    let alg = match curve {
        Curve::P256 => &ECDSA_P256_SHA256_FIXED_SIGNING,
        Curve::P384 => &ECDSA_P384_SHA384_FIXED_SIGNING,
        Curve::P521 => &ECDSA_P521_SHA512_FIXED_SIGNING,
    };
    let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &SystemRandom::new()).expect("Failed to generate key");
    let key_pair = EcdsaKeyPair::from_pkcs8(alg, pkcs8.as_ref()).expect("Failed to parse key");
    let spki = der::ec_spki_from_point(key_pair.public_key().as_ref(), curve).expect("Failed to encode spki");

    (
        pem::encode(pem::TAG_PRIVATE_KEY, pkcs8.as_ref()),
        pem::encode(pem::TAG_PUBLIC_KEY, &spki),
    )
}

pub(crate) fn ec_public_pem_p256() -> String {
    ec_key_pair_pem(Curve::P256).1
}
