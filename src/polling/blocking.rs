//! Thread-blocking variant of the waiter.

use super::{timed_out, Pollable, PollingOptions};
use crate::{Error, Result};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Blocking fetch collaborator.
pub trait BlockingFetch<R> {
    fn fetch(&self, id: &str) -> Result<R>;
}

/// Poll `fetcher` on the current thread until the resource for `id` is terminal.
///
/// Same contract as [`super::wait_until_ready`]. Cancellation is observed
/// before each poll, so a cancelled wait may still sleep one interval.
pub fn wait_until_ready<R, F>(
    fetcher: &F,
    id: &str,
    options: &PollingOptions,
    cancel: Option<&CancellationToken>,
) -> Result<R>
where
    R: Pollable,
    F: BlockingFetch<R> + ?Sized,
{
    let start = Instant::now();
    let mut polls: u64 = 0;

    loop {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled { id: id.to_string() });
        }

        let resource = fetcher.fetch(id)?;
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
        std::thread::sleep(pause);
    }
}
