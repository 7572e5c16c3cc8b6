//! Key lookup by `kid`

use crate::algorithm::Algorithm;
use crate::error::Error;
use crate::jwks::{Jwk, JwkSet};
use crate::keys::{KeyMaterial, PublicKey};
use tracing::{debug, warn};

/// Result of looking a token up in a key set
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum KeyMatch {
    /// Entry found and converted
    Found { kid: String, key: PublicKey },
    /// Token has no `kid`, or no entry carries it
    NotFound,
    /// Entry found but unusable for the token's algorithm
    Rejected { kid: String, reason: Error },
}

/// First entry whose `kid` equals `kid`
pub fn find_key_by_kid<'a>(set: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    let mut matches = set
        .keys()
        .iter()
        .filter(|jwk| jwk.kid.as_deref() == Some(kid));
    let first = matches.next()?;

    let extra = matches.count();
    if extra > 0 {
        warn!(kid, count = extra + 1, "multiple keys share a kid, using the first");
    }
    Some(first)
}

pub(crate) fn lookup(set: &JwkSet, kid: Option<&str>, algorithm: Algorithm) -> KeyMatch {
    let Some(kid) = kid else {
        debug!("token has no kid, skipping key set");
        return KeyMatch::NotFound;
    };
    let Some(jwk) = find_key_by_kid(set, kid) else {
        debug!(kid, "no key set entry for kid");
        return KeyMatch::NotFound;
    };

    if let Some(jwk_alg) = jwk.alg.as_deref() {
        if jwk_alg != algorithm.as_str() {
            warn!(kid, jwk_alg, token_alg = %algorithm, "key set entry advertises a different alg");
        }
    }

    // The entry's own kty/crv decide what it is, never the token's alg
    if !jwk.supports(algorithm) {
        let reason = Error::KeyConversionFailure(format!(
            "jwk '{kid}' ({}) cannot verify {algorithm}",
            jwk.kty.as_deref().unwrap_or("no kty")
        ));
        warn!(kid, %reason, "key set entry rejected");
        return KeyMatch::Rejected {
            kid: kid.to_string(),
            reason,
        };
    }

    match jwk.to_public_key() {
        Ok(key) => KeyMatch::Found {
            kid: kid.to_string(),
            key,
        },
        Err(reason) => {
            warn!(kid, %reason, "key set entry rejected");
            KeyMatch::Rejected {
                kid: kid.to_string(),
                reason,
            }
        }
    }
}

/// Verification key for a token from a key set
///
/// Returns `None` when the token has no `kid`, no entry carries it, or the
/// entry cannot serve `algorithm`.
pub fn match_key(set: &JwkSet, kid: Option<&str>, algorithm: Algorithm) -> Option<KeyMaterial> {
    match lookup(set, kid, algorithm) {
        KeyMatch::Found { key, .. } => Some(KeyMaterial::Public(key)),
        KeyMatch::NotFound | KeyMatch::Rejected { .. } => None,
    }
}
