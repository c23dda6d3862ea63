use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::time::Sleeper;

/// Bounded retry with exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; at least one attempt is always made
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        RetryPolicy {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay after the failure of `attempt` (0-based): base, 2x base, 4x base, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds or the attempts are used up.
    ///
    /// `op` receives the 0-based attempt index. The last error is returned
    /// once every attempt has failed; no delay follows the final attempt.
    pub fn run<T, E, F>(&self, sleeper: &dyn Sleeper, label: &str, mut op: F) -> Result<T, E>
    where
        E: fmt::Display,
        F: FnMut(u32) -> Result<T, E>,
    {
        let mut attempt = 0;

        loop {
            match op(attempt) {
                Ok(value) => {
                    if attempt > 0 {
                        debug!("{} succeeded on attempt {}", label, attempt + 1);
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!("Attempt {} failed for {}: {}", attempt + 1, label, e);

                    if attempt + 1 >= self.max_attempts {
                        return Err(e);
                    }

                    sleeper.sleep(self.delay_for(attempt));
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::new(3, Duration::from_secs(1))
    }
}
