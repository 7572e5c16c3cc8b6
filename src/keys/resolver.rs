//! Key resolution: explicit key, then named configuration, then placeholder

use crate::algorithm::{Algorithm, Family};
use crate::error::{Error, Result};
use crate::keys::{KeyMaterial, KeyRole};
use miniserde::json::Value;
use std::collections::BTreeMap;
use tracing::debug;

const PLACEHOLDER_SUFFIX: &str = "-key-placeholder";

/// Where a resolved key came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Key passed in for this call
    Explicit,
    /// Named configuration entry
    Named(String),
    /// Nothing configured
    Placeholder,
    /// Key set entry with this `kid`
    Jwks(String),
}

/// Key material together with its origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    pub material: KeyMaterial,
    pub source: KeySource,
}

/// Named key texts keyed `"<ALG>_<role>"`, e.g. `HS256_signing` or `RS256_verification`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyConfig {
    entries: BTreeMap<String, String>,
}

impl KeyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry name for an algorithm and role. HMAC shares the signing entry for both roles.
    pub fn entry_name(algorithm: Algorithm, role: KeyRole) -> String {
        format!("{}_{}", algorithm.as_str(), effective_role(algorithm, role))
    }

    /// Store key text for an algorithm and role
    pub fn insert(&mut self, algorithm: Algorithm, role: KeyRole, text: impl Into<String>) -> &mut Self {
        self.entries
            .insert(Self::entry_name(algorithm, role), text.into());
        self
    }

    /// Store key text under an explicit entry name
    pub fn insert_named(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.entries.insert(name.into(), text.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a JSON object whose members are key texts
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = miniserde::json::from_str(json)
            .map_err(|_| Error::KeyConversionFailure("key config: invalid json".into()))?;
        let Value::Object(object) = value else {
            return Err(Error::KeyConversionFailure(
                "key config: expected a json object".into(),
            ));
        };

        let mut config = Self::new();
        for (name, value) in object.iter() {
            match value {
                Value::String(text) => {
                    config.insert_named(name.clone(), text.clone());
                }
                _ => {
                    return Err(Error::KeyConversionFailure(format!(
                        "key config: entry '{name}' is not a string"
                    )));
                }
            }
        }
        Ok(config)
    }
}

/// Deterministic stand-in text when nothing is configured
pub fn placeholder(algorithm: Algorithm, role: KeyRole) -> String {
    format!(
        "{}-{}{PLACEHOLDER_SUFFIX}",
        algorithm.as_str(),
        effective_role(algorithm, role)
    )
}

pub(crate) fn is_placeholder(text: &str) -> bool {
    let Some(rest) = text.strip_suffix(PLACEHOLDER_SUFFIX) else {
        return false;
    };
    let Some((alg, role)) = rest.split_once('-') else {
        return false;
    };
    Algorithm::from_str(alg).is_ok()
        && (role == KeyRole::Signing.as_str() || role == KeyRole::Verification.as_str())
}

fn effective_role(algorithm: Algorithm, role: KeyRole) -> KeyRole {
    if algorithm.family() == Family::Hmac {
        KeyRole::Signing
    } else {
        role
    }
}

/// Maps an algorithm and role to key material
///
/// Lookup order is the explicit key for the call (empty text counts as not
/// supplied), then the named configuration, then a placeholder. The resolver
/// never creates key material of its own.
#[derive(Debug, Clone, Default)]
pub struct KeyResolver {
    config: KeyConfig,
}

impl KeyResolver {
    pub fn new(config: KeyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    pub fn resolve(
        &self,
        algorithm: Algorithm,
        role: KeyRole,
        explicit: Option<&str>,
    ) -> Result<ResolvedKey> {
        let family = algorithm.family();
        if family == Family::None {
            return Err(Error::MissingKey("the none algorithm takes no key".into()));
        }

        if let Some(text) = explicit.filter(|text| !text.is_empty()) {
            debug!(%algorithm, %role, "using explicit key");
            return Ok(ResolvedKey {
                material: KeyMaterial::from_text(text, family, role)?,
                source: KeySource::Explicit,
            });
        }

        let name = KeyConfig::entry_name(algorithm, role);
        if let Some(text) = self.config.get(&name).filter(|text| !text.is_empty()) {
            debug!(%algorithm, %role, entry = %name, "using named key");
            return Ok(ResolvedKey {
                material: KeyMaterial::from_text(text, family, role)?,
                source: KeySource::Named(name),
            });
        }

        debug!(%algorithm, %role, "no key configured, using placeholder");
        Ok(ResolvedKey {
            material: KeyMaterial::Placeholder(placeholder(algorithm, role)),
            source: KeySource::Placeholder,
        })
    }

    /// Whether real key text is configured for every role the algorithm needs
    pub fn has_real_keys(&self, algorithm: Algorithm) -> bool {
        if algorithm.family() == Family::None {
            return false;
        }
        [KeyRole::Signing, KeyRole::Verification].iter().all(|role| {
            self.config
                .get(&KeyConfig::entry_name(algorithm, *role))
                .is_some_and(|text| !text.is_empty() && !is_placeholder(text))
        })
    }
}
