//! Bounded polling.

use std::future::Future;
use std::time::Duration;

use searchlens_protocols::CancellationToken;

/// Attempt counter for one polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionAttempt {
    pub count: u32,
    pub max_attempts: u32,
    pub interval: Duration,
}

impl ExtractionAttempt {
    fn exhausted(&self) -> bool {
        self.count >= self.max_attempts
    }
}

/// How a polling loop ended.
#[derive(Debug, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Found { value: T, attempts: u32 },
    Exhausted { attempts: u32 },
    Cancelled { attempts: u32 },
}

/// Runs a probe up to `max_attempts` times, `interval` apart.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    max_attempts: u32,
    interval: Duration,
}

impl Poller {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Call `probe` until it yields a value, the attempts run out, or `cancel`
    /// fires. The probe receives the attempt state; no sleep follows the last
    /// attempt.
    pub async fn run<T, F, Fut>(&self, cancel: &CancellationToken, mut probe: F) -> PollOutcome<T>
    where
        F: FnMut(ExtractionAttempt) -> Fut,
        Fut: Future<Output = Option<T>>,
    {
        let mut attempt = ExtractionAttempt {
            count: 0,
            max_attempts: self.max_attempts,
            interval: self.interval,
        };

        while !attempt.exhausted() {
            if cancel.is_cancelled() {
                return PollOutcome::Cancelled {
                    attempts: attempt.count,
                };
            }

            attempt.count += 1;
            if let Some(value) = probe(attempt).await {
                return PollOutcome::Found {
                    value,
                    attempts: attempt.count,
                };
            }

            if attempt.exhausted() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = cancel.cancelled() => {
                    return PollOutcome::Cancelled { attempts: attempt.count };
                }
            }
        }

        PollOutcome::Exhausted {
            attempts: attempt.count,
        }
    }
}

/// Sleep for `duration` unless `cancel` fires first. Returns false if cancelled.
pub async fn pause(duration: Duration, cancel: &CancellationToken) -> bool {
    if duration.is_zero() {
        return !cancel.is_cancelled();
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => true,
        _ = cancel.cancelled() => false,
    }
}
