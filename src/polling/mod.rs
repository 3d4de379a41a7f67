//! Wait for a server-side job to reach a terminal status.
//!
//! The waiter calls a fetch collaborator, classifies the returned resource as
//! terminal or not, and sleeps between polls. It has two entry points:
//!
//! - [`wait_until_ready`] for tokio; the sleep yields to the runtime and
//!   races a [`CancellationToken`].
//! - [`blocking::wait_until_ready`] for synchronous callers; the sleep blocks
//!   the calling thread.
//!
//! Elapsed time is measured on a monotonic clock, so wall-clock adjustments
//! cannot shorten or extend the timeout.
//!
//! With an unbounded timeout (the default) the waiter polls until the job
//! finishes. If the server never finishes the job, neither does the waiter;
//! pass a timeout or a cancellation token when that matters.

pub mod blocking;

use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default delay between polls, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 3000;

/// Millisecond timeout sentinel meaning "poll forever".
pub const NO_TIMEOUT: i64 = -1;

/// A resource whose status the waiter can classify.
pub trait Pollable {
    fn is_terminal(&self) -> bool;
}

/// Async fetch collaborator. Errors propagate out of the waiter unchanged.
#[async_trait]
pub trait Fetch<R: Send>: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<R>;
}

/// Interval and timeout for one wait.
///
/// Always valid once built: the interval is non-zero and a bounded timeout is
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingOptions {
    interval: Duration,
    timeout: Option<Duration>,
}

impl Default for PollingOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_INTERVAL_MS),
            timeout: None,
        }
    }
}

impl PollingOptions {
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Result<Self> {
        check_interval(interval)?;
        if let Some(timeout) = timeout {
            check_timeout(timeout)?;
        }
        Ok(Self { interval, timeout })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `None` polls without a deadline.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build from millisecond values, with [`NO_TIMEOUT`] meaning unbounded.
    pub fn from_millis(interval_ms: u64, timeout_ms: i64) -> Result<Self> {
        let timeout = match timeout_ms {
            NO_TIMEOUT => None,
            ms if ms > 0 => Some(Duration::from_millis(ms as u64)),
            ms => {
                return Err(Error::configuration_with_context(
                    "timeout must be positive or -1",
                    ErrorContext::new()
                        .with_field_path("polling.timeout")
                        .with_details(format!("got {ms}"))
                        .with_source("polling"),
                ))
            }
        };
        Self::new(Duration::from_millis(interval_ms), timeout)
    }

    pub fn with_interval(mut self, interval: Duration) -> Result<Self> {
        check_interval(interval)?;
        self.interval = interval;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        check_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Poll until terminal, however long it takes.
    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// How long to sleep after a non-terminal poll, or `None` once the
    /// deadline has passed.
    pub(crate) fn next_pause(&self, elapsed: Duration) -> Option<Duration> {
        match self.timeout {
            Some(timeout) if elapsed >= timeout => None,
            Some(timeout) => Some(self.interval.min(timeout - elapsed)),
            None => Some(self.interval),
        }
    }
}

fn check_interval(interval: Duration) -> Result<()> {
    if interval.is_zero() {
        return Err(invalid("polling.interval", "interval must be greater than zero"));
    }
    Ok(())
}

fn check_timeout(timeout: Duration) -> Result<()> {
    if timeout.is_zero() {
        return Err(invalid(
            "polling.timeout",
            "timeout must be positive, or omitted for no timeout",
        ));
    }
    Ok(())
}

fn invalid(field: &str, msg: &str) -> Error {
    Error::configuration_with_context(
        msg,
        ErrorContext::new()
            .with_field_path(field)
            .with_source("polling"),
    )
}

pub(crate) fn timed_out(id: &str, elapsed: Duration, options: &PollingOptions) -> Error {
    Error::PollingTimeout {
        id: id.to_string(),
        elapsed,
        timeout: options.timeout.unwrap_or_default(),
    }
}

/// Poll `fetcher` until the resource for `id` is terminal.
///
/// Returns the terminal resource, including one that finished with an error
/// status. Fails with [`Error::PollingTimeout`] when a bounded timeout elapses
/// and with [`Error::Cancelled`] when `cancel` fires. Polls are strictly
/// sequential.
pub async fn wait_until_ready<R, F>(
    fetcher: &F,
    id: &str,
    options: &PollingOptions,
    cancel: Option<&CancellationToken>,
) -> Result<R>
where
    R: Pollable + Send,
    F: Fetch<R> + ?Sized,
{
    let start = Instant::now();
    let mut polls: u64 = 0;

    loop {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled { id: id.to_string() });
        }

        let resource = fetcher.fetch(id).await?;
        polls += 1;

        if resource.is_terminal() {
            info!(id, polls, elapsed_ms = start.elapsed().as_millis() as u64, "job reached terminal status");
            return Ok(resource);
        }

        let elapsed = start.elapsed();
        let Some(pause) = options.next_pause(elapsed) else {
            warn!(id, polls, elapsed_ms = elapsed.as_millis() as u64, "polling timed out");
            return Err(timed_out(id, elapsed, options));
        };

        debug!(id, polls, pause_ms = pause.as_millis() as u64, "job not ready");
        match cancel {
            Some(token) => {
                tokio::select! {
                    _ = token.cancelled() => return Err(Error::Cancelled { id: id.to_string() }),
                    _ = tokio::time::sleep(pause) => {}
                }
            }
            None => tokio::time::sleep(pause).await,
        }
    }
}
