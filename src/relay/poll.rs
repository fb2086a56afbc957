//! Timeout-bounded polling
//!
//! A flat-interval poll with a wall-clock deadline. Fetch errors end the
//! loop immediately; there are no retries.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Interval and deadline for a poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_duration: Duration,
}

impl PollPolicy {
    pub fn new(interval: Duration, max_duration: Duration) -> Self {
        Self {
            interval,
            max_duration,
        }
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(1200), Duration::from_secs(60))
    }
}

/// How a poll loop ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome<T> {
    /// A terminal value was observed
    Terminal { value: T, attempts: u32 },
    /// The deadline passed; carries the last value seen
    TimedOut { last: T, attempts: u32 },
}

/// Poll `fetch` until `is_terminal` holds or the policy deadline passes.
///
/// `initial` is the value already in hand (e.g. returned by the start call);
/// when it is terminal no fetch is made. The last sleep is cut short at the
/// deadline and the deadline is checked again before fetching, so no poll
/// starts once `max_duration` has elapsed.
pub async fn poll_until<T, E, F, Fut, P>(
    policy: &PollPolicy,
    initial: T,
    mut fetch: F,
    is_terminal: P,
) -> Result<PollOutcome<T>, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();
    let mut current = initial;
    let mut attempts = 0u32;

    while !is_terminal(&current) {
        let remaining = policy.max_duration.saturating_sub(started.elapsed());
        if !remaining.is_zero() {
            sleep(policy.interval.min(remaining)).await;
        }
        if started.elapsed() >= policy.max_duration {
            return Ok(PollOutcome::TimedOut {
                last: current,
                attempts,
            });
        }

        attempts += 1;
        current = fetch(attempts).await?;
    }

    Ok(PollOutcome::Terminal {
        value: current,
        attempts,
    })
}
