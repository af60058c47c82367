//! Generic poll-until-status helpers.
//!
//! Share-service resources transition asynchronously (`creating` →
//! `available`, `deleting` → gone), so every mutating API call is paired
//! with a bounded wait. The two primitives here back all the
//! `wait_for_*` methods on [`crate::SharesClient`]:
//!
//! - [`wait_for_status`] polls a fetch closure until the observed status
//!   matches one of the targets, failing fast on an `error` state and
//!   deterministically on timeout.
//! - [`wait_for_deletion`] polls a `gone` probe until the resource stops
//!   existing.
//!
//! Waits are sequential and block the calling task; there is no parallel
//! wait primitive. Batch helpers interleave several waits in one task
//! instead (see the env-tests fixtures).

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, Instant};

use crate::error::ApiError;

/// Poll pacing and budget for one wait call.
#[derive(Debug, Clone, Copy)]
pub struct WaitConfig {
    /// Sleep between polls.
    pub interval: Duration,
    /// Maximum total wall-clock wait, sampled at second granularity.
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(300),
        }
    }
}

/// Terminal wait failures.
///
/// A fetch failure is neither of these; it propagates as [`WaitError::Api`]
/// immediately, without consuming the remaining budget.
#[derive(Debug, Error)]
pub enum WaitError {
    #[error(
        "{resource} failed to transition to {target} within {budget_secs}s \
         (elapsed {elapsed_secs}s, last status: {last_status})"
    )]
    Timeout {
        resource: String,
        target: String,
        budget_secs: u64,
        elapsed_secs: u64,
        last_status: String,
    },

    #[error("{resource} went to an error state while waiting: {status}")]
    BuildError { resource: String, status: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Wait until `fetch` observes one of `targets`.
///
/// The first fetch happens before any sleep, so a resource already in the
/// target state returns immediately. After that the loop always sleeps
/// one interval before re-fetching, which guarantees the timeout check
/// can never fire with zero elapsed time even though elapsed time is
/// sampled at whole-second granularity.
///
/// A status containing `error` (case-insensitive) fails fast with
/// [`WaitError::BuildError`]: unless it is itself one of the targets,
/// so waiting for an admin-reset `error` status works.
pub async fn wait_for_status<F, Fut>(
    resource: &str,
    targets: &[&str],
    config: WaitConfig,
    mut fetch: F,
) -> Result<String, WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, ApiError>>,
{
    let start = Instant::now();
    let mut status = fetch().await?;
    if targets.contains(&status.as_str()) {
        return Ok(status);
    }

    loop {
        sleep(config.interval).await;
        status = fetch().await?;
        if targets.contains(&status.as_str()) {
            return Ok(status);
        }
        if status.to_lowercase().contains("error") {
            return Err(WaitError::BuildError {
                resource: resource.to_string(),
                status,
            });
        }
        let elapsed_secs = start.elapsed().as_secs();
        if elapsed_secs >= config.timeout.as_secs() {
            tracing::warn!(resource, ?targets, elapsed_secs, last_status = %status, "wait timed out");
            return Err(WaitError::Timeout {
                resource: resource.to_string(),
                target: targets.join("|"),
                budget_secs: config.timeout.as_secs(),
                elapsed_secs,
                last_status: status,
            });
        }
    }
}

/// Wait until `gone` reports the resource no longer exists.
///
/// `gone` is expected to map a 404 on the resource GET to `Ok(true)`;
/// any other fetch failure propagates immediately.
pub async fn wait_for_deletion<F, Fut>(
    resource: &str,
    config: WaitConfig,
    mut gone: F,
) -> Result<(), WaitError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, ApiError>>,
{
    let start = Instant::now();
    loop {
        if gone().await? {
            return Ok(());
        }
        let elapsed_secs = start.elapsed().as_secs();
        if elapsed_secs >= config.timeout.as_secs() {
            return Err(WaitError::Timeout {
                resource: resource.to_string(),
                target: "deleted".to_string(),
                budget_secs: config.timeout.as_secs(),
                elapsed_secs,
                last_status: "still present".to_string(),
            });
        }
        sleep(config.interval).await;
    }
}
