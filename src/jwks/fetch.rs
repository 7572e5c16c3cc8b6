//! Key set retrieval

use crate::error::{Error, Result};
use crate::jwks::JwkSet;
use crate::limits::MAX_JWKS_RESPONSE_SIZE;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Future returned by [`KeySetFetcher::fetch`]
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;

/// Capability to retrieve a key set document
///
/// Implementations return the raw response body. Transport problems should be
/// reported as [`Error::NetworkFailure`]; they reach the caller unchanged.
///
/// Error messages should follow the pattern `"component: error description"`
/// (e.g. `"network: connection refused"`, `"http: status 404"`).
pub trait KeySetFetcher: Send + Sync {
    fn fetch<'a>(&'a self, uri: &'a str) -> FetchFuture<'a>;
}

/// Fetch and parse a key set document
///
/// # Errors
///
/// Errors from the fetcher are returned as they are. An empty URI, an
/// oversized body or a body that is not a key set document is a
/// [`Error::NetworkFailure`].
pub async fn fetch_key_set(fetcher: &dyn KeySetFetcher, uri: &str) -> Result<JwkSet> {
    if uri.trim().is_empty() {
        return Err(Error::NetworkFailure("jwks: empty uri".into()));
    }

    let bytes = fetcher.fetch(uri).await?;
    if bytes.len() > MAX_JWKS_RESPONSE_SIZE {
        return Err(Error::NetworkFailure(format!(
            "jwks: response too large: {} bytes (maximum: {MAX_JWKS_RESPONSE_SIZE} bytes)",
            bytes.len()
        )));
    }

    let body = std::str::from_utf8(&bytes)
        .map_err(|e| Error::NetworkFailure(format!("jwks: utf8 decode failed: {e}")))?;
    let set = JwkSet::from_json(body).map_err(|e| match e {
        Error::KeyConversionFailure(reason) => Error::NetworkFailure(reason),
        other => other,
    })?;
    debug!(uri, keys = set.keys().len(), "fetched key set");

    Ok(set)
}

/// [`KeySetFetcher`] over HTTP(S) using reqwest
#[cfg(feature = "remote")]
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

#[cfg(feature = "remote")]
impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[cfg(feature = "remote")]
impl KeySetFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, uri: &'a str) -> FetchFuture<'a> {
        Box::pin(async move {
            let response = self
                .client
                .get(uri)
                .send()
                .await
                .map_err(|e| Error::NetworkFailure(format!("network: {e}")))?;

            if !response.status().is_success() {
                return Err(Error::NetworkFailure(format!(
                    "http: status {}",
                    response.status()
                )));
            }

            if response
                .content_length()
                .is_some_and(|len| len > MAX_JWKS_RESPONSE_SIZE as u64)
            {
                return Err(Error::NetworkFailure(format!(
                    "jwks: response too large (maximum: {MAX_JWKS_RESPONSE_SIZE} bytes)"
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| Error::NetworkFailure(format!("network: {e}")))?;
            Ok(bytes.to_vec())
        })
    }
}
