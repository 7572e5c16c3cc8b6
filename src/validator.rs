use crate::algorithm::{Algorithm, signature_strategy};
use crate::claims::is_expired;
use crate::error::{Error, Result};
use crate::jwks::{JwkSet, KeyMatch, KeySetFetcher, fetch_key_set, lookup};
use crate::keys::{KeyConfig, KeyMaterial, KeyResolver, KeyRole, KeySource};
use crate::result::{ParseState, ValidationResult};
use crate::token::Token;
use std::sync::Arc;
use tracing::debug;

/// Where the validator looks for a key set
#[derive(Clone)]
enum KeySetSource {
    /// A set supplied up front
    Static(Arc<JwkSet>),
    /// Fetched again for every verification
    Remote {
        uri: Arc<str>,
        fetcher: Arc<dyn KeySetFetcher>,
    },
}

/// Token validator
///
/// Configured once and reusable for any number of validations. Validations
/// share no mutable state, so a validator can be cloned into concurrent tasks.
///
/// Each verification makes exactly one signature check. A key set entry whose
/// `kid` matches the token decides the outcome when one exists; otherwise the
/// locally resolved key does.
#[derive(Clone, Default)]
pub struct TokenValidator {
    config_key: Option<Arc<str>>,
    config_keys: KeyResolver,
    config_key_set: Option<KeySetSource>,
}

impl TokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the key text used for verification (a secret or a public key PEM)
    ///
    /// Empty text counts as no key.
    pub fn key(&mut self, key: &str) -> &mut Self {
        self.config_key = Some(key.into());
        self
    }

    /// Configure named keys consulted when no explicit key applies
    pub fn named_keys(&mut self, config: KeyConfig) -> &mut Self {
        self.config_keys = KeyResolver::new(config);
        self
    }

    /// Configure a key set held in memory
    pub fn key_set(&mut self, set: JwkSet) -> &mut Self {
        self.config_key_set = Some(KeySetSource::Static(Arc::new(set)));
        self
    }

    /// Configure a key set fetched from `uri` on every verification
    ///
    /// An empty URI disables key set lookup.
    pub fn jwks(&mut self, uri: &str, fetcher: Arc<dyn KeySetFetcher>) -> &mut Self {
        self.config_key_set = if uri.trim().is_empty() {
            None
        } else {
            Some(KeySetSource::Remote {
                uri: uri.into(),
                fetcher,
            })
        };
        self
    }

    pub fn build(&mut self) -> Self {
        self.clone()
    }
}

impl TokenValidator {
    /// Parse raw input. Empty and malformed input are both [`ParseState::Empty`].
    pub fn parse(&self, raw: &str) -> ParseState {
        match Token::decode(raw) {
            Some(token) => ParseState::Parsed(token),
            None => ParseState::Empty,
        }
    }

    /// Parse and verify raw input
    ///
    /// Malformed input gives an invalid result carrying
    /// [`Error::MalformedToken`].
    ///
    /// # Errors
    ///
    /// Only a failed key set fetch is an error; it is returned unchanged.
    pub async fn validate(&self, raw: &str) -> Result<ValidationResult> {
        match Token::parse(raw) {
            Ok(token) => self.verify(&token).await,
            Err(error) => Ok(ValidationResult::malformed(error)),
        }
    }

    /// Verify a parsed token
    ///
    /// # Errors
    ///
    /// Only a failed key set fetch is an error; it is returned unchanged.
    /// Every other failure is reported in [`ValidationResult::error`].
    pub async fn verify(&self, token: &Token) -> Result<ValidationResult> {
        // 1. Expiration is independent of validity
        let result = ValidationResult::unverified(token, is_expired(token.payload()));

        // 2. Algorithm from the header; never inferred from key material
        let algorithm = match token.algorithm() {
            Ok(algorithm) => algorithm,
            Err(error) => return Ok(result.settle(Err(error))),
        };
        let mut result = ValidationResult {
            algorithm: Some(algorithm),
            ..result
        };
        let strategy = signature_strategy(algorithm);

        // 3. none: the signature segment must be empty, keys play no part
        if algorithm == Algorithm::None {
            let outcome = strategy.verify(
                token.signing_input(),
                token.signature_segment(),
                &KeyMaterial::Placeholder(String::new()),
            );
            return Ok(result.settle(outcome));
        }

        // 4. Key set entry matching the token's kid
        let mut rejected = None;
        if let Some(set) = self.load_key_set().await? {
            match lookup(&set, token.key_id(), algorithm) {
                KeyMatch::Found { kid, key } => {
                    debug!(%algorithm, kid = %kid, "verifying with key set entry");
                    let outcome = strategy.verify(
                        token.signing_input(),
                        token.signature_segment(),
                        &KeyMaterial::Public(key),
                    );
                    result.key_source = Some(KeySource::Jwks(kid));
                    return Ok(result.settle(outcome));
                }
                KeyMatch::Rejected { reason, .. } => rejected = Some(reason),
                KeyMatch::NotFound => {}
            }
        }

        // 5. Locally resolved key
        let resolved = match self.config_keys.resolve(
            algorithm,
            KeyRole::Verification,
            self.config_key.as_deref(),
        ) {
            Ok(resolved) => resolved,
            Err(error) => return Ok(result.settle(Err(error))),
        };
        debug!(%algorithm, source = ?resolved.source, "verifying with local key");
        result.key_source = Some(resolved.source);

        let outcome = strategy.verify(
            token.signing_input(),
            token.signature_segment(),
            &resolved.material,
        );

        // A kid that matched an unusable entry explains a missing local key better
        let outcome = match (outcome, rejected) {
            (Err(Error::MissingKey(_)), Some(reason)) => Err(reason),
            (outcome, _) => outcome,
        };

        Ok(result.settle(outcome))
    }

    async fn load_key_set(&self) -> Result<Option<Arc<JwkSet>>> {
        match &self.config_key_set {
            None => Ok(None),
            Some(KeySetSource::Static(set)) => Ok(Some(set.clone())),
            Some(KeySetSource::Remote { uri, fetcher }) => {
                let set = fetch_key_set(fetcher.as_ref(), uri).await?;
                Ok(Some(Arc::new(set)))
            }
        }
    }
}
