//! JSON Web Key Set (JWKS) module
//!
//! Parsing of key set documents ([RFC 7517](https://datatracker.ietf.org/doc/html/rfc7517)),
//! lookup by key ID (`kid`) and the [`KeySetFetcher`] seam through which a
//! document is obtained. Nothing is cached: every lookup works on the set it
//! is handed.

mod fetch;
mod jwk;
mod matcher;

#[cfg(feature = "remote")]
pub use fetch::HttpFetcher;
pub use fetch::{FetchFuture, KeySetFetcher, fetch_key_set};
pub use jwk::Jwk;
pub(crate) use matcher::{KeyMatch, lookup};
pub use matcher::{find_key_by_kid, match_key};

use crate::error::{Error, Result};
use miniserde::Deserialize;

/// JSON Web Key Set (JWKS)
///
/// An absent or empty `keys` array is a valid set with no keys.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwkSet {
    keys: Option<Vec<Jwk>>,
}

impl JwkSet {
    pub fn new(keys: Vec<Jwk>) -> Self {
        Self { keys: Some(keys) }
    }

    /// Parse a key set document
    ///
    /// # Errors
    ///
    /// [`Error::KeyConversionFailure`] when `json` is not a key set document.
    pub fn from_json(json: &str) -> Result<Self> {
        miniserde::json::from_str(json)
            .map_err(|_| Error::KeyConversionFailure("jwks: invalid key set document".into()))
    }

    pub fn keys(&self) -> &[Jwk] {
        self.keys.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set() {
        let set = JwkSet::from_json(
            r#"{
                "keys": [
                    {"kty":"RSA","kid":"k1","n":"abc","e":"AQAB"},
                    {"kty":"EC","kid":"k2","crv":"P-256","x":"xx","y":"yy"}
                ]
            }"#,
        )
        .expect("jwks parse");
        assert_eq!(set.keys().len(), 2);
        assert_eq!(set.keys()[0].kid.as_deref(), Some("k1"));
        assert_eq!(set.keys()[1].crv.as_deref(), Some("P-256"));
    }

    #[test]
    fn test_absent_or_empty_keys() {
        assert!(JwkSet::from_json("{}").unwrap().is_empty());
        assert!(JwkSet::from_json(r#"{"keys":[]}"#).unwrap().is_empty());
        assert!(JwkSet::from_json(r#"{"keys":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            JwkSet::from_json("<html>"),
            Err(Error::KeyConversionFailure(_))
        ));
    }
}
