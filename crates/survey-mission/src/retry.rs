use serde::{Deserialize, Serialize};

/// Bounded-retry settings for a single commanded action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Re-invocations after the first failed attempt; an action runs at
    /// most `max_retries + 1` times.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 5 }
    }
}

/// What the mission does when an action exhausts its retries.
///
/// `Continue` logs and keeps flying, treating the run as best-effort;
/// `Abort` fails the mission instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnExhausted {
    #[default]
    Continue,
    Abort,
}

/// Result of a bounded-retry loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryOutcome {
    pub succeeded: bool,
    pub attempts: u32,
}

/// Run `action` until it succeeds or the retry budget is spent.
///
/// Attempts are back-to-back with no delay; each invocation is a complete,
/// independent execution of the same request, and the loop returns on the
/// first success without invoking the action again.
pub fn run_with_retry<F>(policy: &RetryPolicy, label: &str, mut action: F) -> RetryOutcome
where
    F: FnMut() -> bool,
{
    let max_attempts = policy.max_retries + 1;
    for attempt in 1..=max_attempts {
        if action() {
            if attempt > 1 {
                log::info!("{label}: succeeded on attempt {attempt}");
            }
            return RetryOutcome {
                succeeded: true,
                attempts: attempt,
            };
        }
        log::warn!("{label}: attempt {attempt} of {max_attempts} failed");
    }
    RetryOutcome {
        succeeded: false,
        attempts: max_attempts,
    }
}
