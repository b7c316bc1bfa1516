//! Bounded retry loop for optimistically-locked mutations
//!
//! This module provides the `RetryPolicy` struct, which re-runs a
//! mutation attempt when it loses the version race at commit time.
//! Optimistic concurrency makes conflicts an expected, transient outcome
//! under contention; a small fixed retry budget turns them into eventual
//! success without holding locks across validation and persistence.
//!
//! Only version conflicts are retried. Validation and lookup failures
//! propagate on the first occurrence, and an attempt that failed
//! validation has written nothing, so aborting leaves no partial state.

use crate::types::WalletError;
use std::time::Duration;
use tracing::warn;

/// Retry budget and backoff for conflicting mutation attempts
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,

    /// Fixed pause between attempts
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Create a new RetryPolicy with custom values
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        let max_attempts = max_attempts.max(1);
        Self {
            max_attempts,
            backoff,
        }
    }

    /// A policy that never sleeps, for tests that provoke conflicts
    pub fn without_backoff() -> Self {
        Self {
            backoff: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Run an attempt up to `max_attempts` times
    ///
    /// The closure receives the 1-based attempt number and must perform
    /// the whole read-validate-mutate-write sequence so every retry
    /// starts from fresh state. A [`WalletError::VersionConflict`] from
    /// the closure triggers a backoff sleep and another attempt; any
    /// other outcome is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`WalletError::RetriesExhausted`] wrapping the final
    /// conflict when the budget is spent.
    pub fn run<T, F>(&self, operation: &str, mut attempt_fn: F) -> Result<T, WalletError>
    where
        F: FnMut(u32) -> Result<T, WalletError>,
    {
        let mut last_conflict = None;

        for attempt in 1..=self.max_attempts {
            match attempt_fn(attempt) {
                Err(conflict) if conflict.is_retryable() => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        %conflict,
                        "version conflict, retrying"
                    );
                    last_conflict = Some(conflict);
                    if attempt < self.max_attempts && !self.backoff.is_zero() {
                        std::thread::sleep(self.backoff);
                    }
                }
                other => return other,
            }
        }

        // max_attempts >= 1, so a conflict was recorded on the way here
        let source = last_conflict.unwrap_or_else(|| WalletError::version_conflict(0, 0, 0));
        Err(WalletError::retries_exhausted(
            operation,
            self.max_attempts,
            source,
        ))
    }
}
