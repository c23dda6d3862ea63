use anyhow::{anyhow, Result};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Parse a time duration from a string with optional suffix
///
/// Examples:
/// - "90s" or "90S" → 90 seconds
/// - "5m" or "5M" → 5 minutes
/// - "1h" or "1H" → 1 hour
/// - "30" → 30 seconds (default)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeDuration {
    pub seconds: u64,
}

impl TimeDuration {
    pub const fn from_secs(seconds: u64) -> Self {
        TimeDuration { seconds }
    }

    pub const fn from_mins(minutes: u64) -> Self {
        TimeDuration {
            seconds: minutes * 60,
        }
    }

    /// Convert to a std duration
    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.seconds)
    }
}

impl FromStr for TimeDuration {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() {
            return Err(anyhow!("Invalid time duration: cannot be empty"));
        }

        // Check for suffix
        let (number_part, suffix) = match s.chars().last() {
            Some(last_char) if last_char.is_ascii_alphabetic() => {
                let (num, suf) = s.split_at(s.len() - 1);
                (num, Some(suf.to_lowercase()))
            }
            _ => (s, None),
        };

        let number: u64 = number_part
            .parse()
            .map_err(|_| anyhow!("Invalid time duration number: '{}'", number_part))?;

        let seconds = match suffix.as_deref() {
            Some("s") | None => number,
            Some("m") => number * 60,
            Some("h") => number * 3600,
            Some(other) => {
                return Err(anyhow!(
                    "Invalid time suffix '{}'. Use 's' for seconds, 'm' for minutes, or 'h' for hours",
                    other
                ))
            }
        };

        Ok(TimeDuration { seconds })
    }
}

impl TryFrom<String> for TimeDuration {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<TimeDuration> for String {
    fn from(value: TimeDuration) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for TimeDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.seconds {
            s if s > 0 && s % 3600 == 0 => write!(f, "{}h", s / 3600),
            s if s > 0 && s % 60 == 0 => write!(f, "{}m", s / 60),
            s => write!(f, "{}s", s),
        }
    }
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Suspends the current retrieval between attempts
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
pub use testing::{ManualClock, RecordingSleeper};
