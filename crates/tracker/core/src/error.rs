//! Common error infrastructure for tracker-core.
//!
//! Domain errors (e.g. [`crate::engine::EngineError`]) live next to the code
//! that raises them and implement [`TrackerError`] so collaborators can route
//! them by severity without matching on every variant.
//!
//! No error here is fatal: every rejection leaves the battle state exactly as
//! it was, and resubmitting a corrected event is always safe.

/// Severity level of an error, used for categorization and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The target vanished or the request no longer applies; the event is a
    /// no-op.
    ///
    /// Examples: battle id not on the roster, condition not present
    Recoverable,

    /// The request is invalid and must be changed before resubmitting.
    ///
    /// Examples: negative damage, tie choice outside the tied set,
    /// Weak requested while Elite is active
    Validation,

    /// Unexpected state inconsistency. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all tracker-core errors.
pub trait TrackerError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str;
}
