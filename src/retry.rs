//! Fixed-delay retry for whole pipeline runs.
//!
//! The extractor itself is stateless and has no retry logic. The mail command
//! wraps its fetch+send step in [`Retry`], which re-runs the step up to a fixed
//! number of attempts with a fixed pause in between.
//!
//! # Architecture
//!
//! - [`Attempt`]: one fallible async unit of work
//! - [`Retry`]: decorator that re-runs any [`Attempt`] on failure

use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// One fallible async unit of work that is safe to run again.
#[allow(async_fn_in_trait)]
pub trait Attempt {
    /// Value produced by a successful run.
    type Output;
    /// Failure of a single run.
    type Error: fmt::Display;

    async fn attempt(&self) -> Result<Self::Output, Self::Error>;
}

/// Re-runs an [`Attempt`] until it succeeds or `max_attempts` runs have failed.
pub struct Retry<T> {
    inner: T,
    /// Total runs, the first one included.
    max_attempts: usize,
    /// Pause between a failed run and the next one.
    delay: Duration,
}

impl<T> Retry<T>
where
    T: Attempt,
{
    /// `max_attempts` is clamped to at least one run.
    pub fn new(inner: T, max_attempts: usize, delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}

impl<T> fmt::Debug for Retry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish()
    }
}

impl<T> Attempt for Retry<T>
where
    T: Attempt,
{
    type Output = T::Output;
    type Error = T::Error;

    #[instrument(level = "info", skip_all)]
    async fn attempt(&self) -> Result<Self::Output, Self::Error> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            attempt += 1;
            info!(attempt, max = self.max_attempts, "Starting attempt");
            match self.inner.attempt().await {
                Ok(out) => {
                    info!(
                        attempt,
                        elapsed_ms_total = total_t0.elapsed().as_millis(),
                        "Attempt succeeded"
                    );
                    return Ok(out);
                }
                Err(e) if attempt >= self.max_attempts => {
                    error!(
                        attempt,
                        max = self.max_attempts,
                        elapsed_ms_total = total_t0.elapsed().as_millis(),
                        error = %e,
                        "All attempts failed"
                    );
                    return Err(e);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        delay = ?self.delay,
                        error = %e,
                        "Attempt failed; retrying after delay"
                    );
                    sleep(self.delay).await;
                }
            }
        }
    }
}
