//! Time source abstraction.
//!
//! Alert status depends on "now". Components that need the current time take
//! a [`Clock`] instead of reading the system clock directly, so tests can pin
//! time to a known instant.

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// # Example
///
/// ```
/// use alert_courier::time::{Clock, FixedClock};
///
/// let clock = FixedClock::from_unix_secs(1_700_000_000);
/// assert_eq!(clock.now().to_rfc3339(), "2023-11-14T22:13:20+00:00");
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by [`Utc::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Creates a clock that always reports `at`.
    #[must_use]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    /// Creates a clock at the given number of seconds after the Unix epoch.
    ///
    /// Out-of-range values clamp to the epoch.
    #[must_use]
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(DateTime::from_timestamp(secs, 0).unwrap_or_default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
