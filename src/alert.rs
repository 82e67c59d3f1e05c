//! Alert model consumed by notifiers.
//!
//! An [`Alert`] is a set of labels (its identity) plus annotations (free-form
//! metadata). One reserved annotation, [`IMAGE_TOKEN_ANNOTATION`], carries
//! the opaque token of a screenshot kept by an image store.

use std::collections::BTreeMap;
use std::fmt;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::Clock;

#[cfg(test)]
#[path = "alert_tests.rs"]
mod tests;

/// Annotation key holding the image token of an alert.
pub const IMAGE_TOKEN_ANNOTATION: &str = "__alertImageToken__";

/// Label key holding the alert's name.
pub const ALERT_NAME_LABEL: &str = "alertname";

/// Colour used by chat providers for firing alerts.
pub const COLOR_ALERT_FIRING: &str = "#D63232";

/// Colour used by chat providers for resolved alerts.
pub const COLOR_ALERT_RESOLVED: &str = "#36a64f";

/// A single alert instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Identifying labels.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    /// Descriptive annotations.
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    /// When the alert started firing.
    #[serde(
        default,
        deserialize_with = "zero_time::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub starts_at: Option<DateTime<Utc>>,

    /// When the alert stopped (or is expected to stop) firing.
    #[serde(
        default,
        deserialize_with = "zero_time::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub ends_at: Option<DateTime<Utc>>,

    /// Link back to the rule that generated the alert.
    #[serde(
        default,
        rename = "generatorURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub generator_url: Option<String>,
}

impl Alert {
    /// Creates an alert with no labels or annotations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label, replacing any previous value for `name`.
    #[must_use]
    pub fn with_label(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(name.into(), value.into());
        self
    }

    /// Adds an annotation, replacing any previous value for `name`.
    #[must_use]
    pub fn with_annotation(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(name.into(), value.into());
        self
    }

    /// Attaches an image token annotation.
    #[must_use]
    pub fn with_image_token(self, token: impl Into<String>) -> Self {
        self.with_annotation(IMAGE_TOKEN_ANNOTATION, token)
    }

    /// Sets the start time.
    #[must_use]
    pub const fn with_starts_at(mut self, starts_at: DateTime<Utc>) -> Self {
        self.starts_at = Some(starts_at);
        self
    }

    /// Sets the end time.
    #[must_use]
    pub const fn with_ends_at(mut self, ends_at: DateTime<Utc>) -> Self {
        self.ends_at = Some(ends_at);
        self
    }

    /// Returns the value of the `alertname` label, or `""`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.labels.get(ALERT_NAME_LABEL).map_or("", String::as_str)
    }

    /// Returns the image token, if the alert carries a non-empty one.
    #[must_use]
    pub fn image_token(&self) -> Option<&str> {
        self.annotations
            .get(IMAGE_TOKEN_ANNOTATION)
            .map(String::as_str)
            .filter(|token| !token.is_empty())
    }

    /// Returns the fingerprint of the alert's label set.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of_labels(&self.labels)
    }

    /// Returns true once `ends_at` has passed according to `clock`.
    #[must_use]
    pub fn is_resolved(&self, clock: &impl Clock) -> bool {
        self.ends_at.is_some_and(|ends_at| ends_at <= clock.now())
    }

    /// Returns the status of the alert according to `clock`.
    #[must_use]
    pub fn status(&self, clock: &impl Clock) -> AlertStatus {
        if self.is_resolved(clock) {
            AlertStatus::Resolved
        } else {
            AlertStatus::Firing
        }
    }
}

/// Short identity used in log records: `name[fingerprint-prefix]`.
impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fingerprint = self.fingerprint().to_string();
        write!(f, "{}[{}]", self.name(), &fingerprint[..7])
    }
}

/// Whether an alert is still firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// The alert is active.
    Firing,
    /// The alert has ended.
    Resolved,
}

impl AlertStatus {
    /// Status of a notification carrying several alerts: firing if any is.
    #[must_use]
    pub fn of_batch(alerts: &[Alert], clock: &impl Clock) -> Self {
        if alerts.iter().any(|a| !a.is_resolved(clock)) {
            Self::Firing
        } else {
            Self::Resolved
        }
    }

    /// Returns the lowercase status name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Firing => "firing",
            Self::Resolved => "resolved",
        }
    }

    /// Returns the hex colour chat providers use for this status.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Firing => COLOR_ALERT_FIRING,
            Self::Resolved => COLOR_ALERT_RESOLVED,
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 64-bit FNV-1a hash over a sorted label set.
///
/// Each label contributes its name, a `0xff` separator, its value and
/// another separator, so `{a="bc"}` and `{ab="c"}` hash differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub u64);

impl Fingerprint {
    const OFFSET: u64 = 14_695_981_039_346_656_037;
    const PRIME: u64 = 1_099_511_628_211;
    const SEPARATOR: u8 = 0xff;

    /// Hashes a label set. `BTreeMap` iteration order is already sorted.
    #[must_use]
    pub fn of_labels(labels: &BTreeMap<String, String>) -> Self {
        let mut hash = Self::OFFSET;
        let mut add = |bytes: &[u8]| {
            for byte in bytes {
                hash ^= u64::from(*byte);
                hash = hash.wrapping_mul(Self::PRIME);
            }
        };

        for (name, value) in labels {
            add(name.as_bytes());
            add(&[Self::SEPARATOR]);
            add(value.as_bytes());
            add(&[Self::SEPARATOR]);
        }

        Self(hash)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// RFC 3339 timestamps where the zero time means "unset".
///
/// Upstream alert sources emit `0001-01-01T00:00:00Z` for a time that was
/// never set; it reads as `None` here.
mod zero_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    /// Seconds from the Unix epoch to `0001-01-01T00:00:00Z`.
    pub(super) const ZERO_UNIX_SECS: i64 = -62_135_596_800;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let time = Option::<DateTime<Utc>>::deserialize(deserializer)?;
        Ok(time.filter(|t| t.timestamp() != ZERO_UNIX_SECS))
    }
}
