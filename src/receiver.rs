//! Receiver identity and validation errors.

use std::error::Error;
use std::fmt;

/// Name and integration type of a configured receiver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ReceiverRef {
    /// User-facing receiver name; may be empty.
    pub name: String,
    /// Integration type, e.g. `webhook` or `discord`.
    pub kind: String,
}

impl ReceiverRef {
    /// Creates a receiver reference.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
        }
    }
}

/// A receiver's settings failed validation.
///
/// Renders as
/// `failed to validate receiver "<name>" of type "<type>": <reason>[: <cause>]`,
/// leaving out the name when it is empty. The cause is exposed through
/// [`Error::source`].
#[derive(Debug)]
pub struct ReceiverValidationError {
    reason: String,
    source: Option<Box<dyn Error + Send + Sync>>,
    receiver: ReceiverRef,
}

impl ReceiverValidationError {
    /// Creates an error with no underlying cause.
    #[must_use]
    pub fn new(receiver: ReceiverRef, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            source: None,
            receiver,
        }
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns what failed.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Returns the receiver being validated.
    #[must_use]
    pub const fn receiver(&self) -> &ReceiverRef {
        &self.receiver
    }
}

impl fmt::Display for ReceiverValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("failed to validate receiver ")?;
        if !self.receiver.name.is_empty() {
            write!(f, "{:?} ", self.receiver.name)?;
        }
        write!(f, "of type {:?}: {}", self.receiver.kind, self.reason)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for ReceiverValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn Error + 'static))
    }
}
