//! Latest-submission-wins ordering for one caller
//!
//! A caller that validates on every keystroke must never see an older
//! validation overwrite a newer one. [`ValidationSession`] numbers each
//! submission and publishes a result only while no newer submission exists.

use crate::error::Result;
use crate::result::ValidationResult;
use crate::validator::TokenValidator;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

type Published = Option<Arc<ValidationResult>>;

/// Shared handle; clones publish to the same channel
#[derive(Clone)]
pub struct ValidationSession {
    inner: Arc<Inner>,
}

struct Inner {
    validator: TokenValidator,
    generation: AtomicU64,
    sender: watch::Sender<Published>,
}

impl ValidationSession {
    pub fn new(validator: TokenValidator) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                validator,
                generation: AtomicU64::new(0),
                sender,
            }),
        }
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.inner.validator
    }

    /// Validate `raw` and publish the result unless a newer submission started meanwhile
    ///
    /// Returns `Ok(None)` when the result was discarded as stale, whether or
    /// not its key set fetch succeeded.
    ///
    /// # Errors
    ///
    /// A failed key set fetch. An invalid result carrying the failure is
    /// published first so the previous token's result does not stay visible.
    pub async fn submit(&self, raw: &str) -> Result<Option<Arc<ValidationResult>>> {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (result, failure) = match self.inner.validator.validate(raw).await {
            Ok(result) => (result, None),
            Err(error) => (ValidationResult::interrupted(raw, error.clone()), Some(error)),
        };
        let result = Arc::new(result);

        let published = self.inner.sender.send_if_modified(|current| {
            // Checked under the channel lock so a newer publish cannot interleave
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *current = Some(result.clone());
            true
        });

        if !published {
            debug!(generation, failed = failure.is_some(), "discarding stale validation result");
            return Ok(None);
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(Some(result)),
        }
    }

    /// Receiver observing every published result
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.inner.sender.subscribe()
    }

    /// Most recently published result
    pub fn latest(&self) -> Published {
        self.inner.sender.borrow().clone()
    }
}
