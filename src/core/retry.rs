//! Retry-with-fallback around an unreliable remote call.
//!
//! The remote call produces semi-structured text. A local parser and validator
//! turn it into trusted items, and a pure fallback producer guarantees output
//! when the remote side is unavailable or its answer cannot be used.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use serde::Serialize;
use tracing::warn;

/// Fixed-delay retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Why the fallback producer was used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackCause {
    /// Retries exhausted, or the response held no non-empty list
    Unusable,
    /// The response parsed, but every item was rejected
    NothingValidated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    Generated,
    Fallback(FallbackCause),
    /// Nothing to rank, the remote call was never made
    Skipped,
}

impl ResolutionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionSource::Generated => "generated",
            ResolutionSource::Fallback(_) => "fallback",
            ResolutionSource::Skipped => "none",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ResolutionSource::Fallback(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    pub items: Vec<T>,
    pub source: ResolutionSource,
}

/// Invoke `op` until it succeeds or `max_attempts` is spent
///
/// Every error class is retried. Attempts are numbered from 1 and separated by
/// the fixed policy delay. Returns `None` once attempts run out.
pub async fn call_with_retry<T, E, F, Fut>(policy: &RetryPolicy, mut op: F) -> Option<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    for attempt in 1..=policy.max_attempts {
        match op(attempt).await {
            Ok(value) => return Some(value),
            Err(e) => {
                warn!(
                    "Remote call attempt {}/{} failed: {}",
                    attempt, policy.max_attempts, e
                );
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.delay).await;
                }
            }
        }
    }

    warn!("Remote call gave up after {} attempts", policy.max_attempts);
    None
}

/// Retry the remote call, then parse, validate, or fall back
///
/// An exhausted remote call is treated as an empty response. `parse` returning
/// `None` or an empty list and `validate` returning nothing both hand control
/// to `fallback` with the matching cause.
pub async fn resolve_with_fallback<T, P, E, F, Fut, Parse, Validate, Fallback>(
    policy: &RetryPolicy,
    remote: F,
    parse: Parse,
    validate: Validate,
    fallback: Fallback,
) -> Resolution<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<String, E>>,
    E: Display,
    Parse: FnOnce(&str) -> Option<Vec<P>>,
    Validate: FnOnce(Vec<P>) -> Vec<T>,
    Fallback: FnOnce(FallbackCause) -> Vec<T>,
{
    let raw = call_with_retry(policy, remote).await.unwrap_or_default();

    let parsed = match parse(&raw) {
        Some(items) if !items.is_empty() => items,
        _ => {
            warn!("Remote response unusable, using fallback");
            return Resolution {
                items: fallback(FallbackCause::Unusable),
                source: ResolutionSource::Fallback(FallbackCause::Unusable),
            };
        }
    };

    let validated = validate(parsed);
    if validated.is_empty() {
        warn!("No remote item passed validation, using fallback");
        return Resolution {
            items: fallback(FallbackCause::NothingValidated),
            source: ResolutionSource::Fallback(FallbackCause::NothingValidated),
        };
    }

    Resolution {
        items: validated,
        source: ResolutionSource::Generated,
    }
}
