//! Result of a best-effort, model-dependent pipeline stage

use std::fmt;

/// Why a stage substituted its fallback value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The completion text was not the expected JSON shape
    MalformedOutput(String),
    /// The provider call failed
    Provider(String),
    /// The stage exceeded its configured deadline
    Timeout,
}

impl FallbackReason {
    pub fn kind(&self) -> &'static str {
        match self {
            FallbackReason::MalformedOutput(_) => "malformed_output",
            FallbackReason::Provider(_) => "provider",
            FallbackReason::Timeout => "timeout",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::MalformedOutput(detail) => write!(f, "malformed output: {}", detail),
            FallbackReason::Provider(detail) => write!(f, "provider error: {}", detail),
            FallbackReason::Timeout => write!(f, "timed out"),
        }
    }
}

/// Either the parsed value or the stage's predefined fallback
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Parsed(T),
    Fallback { value: T, reason: FallbackReason },
}

impl<T> StageOutcome<T> {
    pub fn fallback(value: T, reason: FallbackReason) -> Self {
        Self::Fallback { value, reason }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn reason(&self) -> Option<&FallbackReason> {
        match self {
            Self::Parsed(_) => None,
            Self::Fallback { reason, .. } => Some(reason),
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Parsed(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Parsed(value) | Self::Fallback { value, .. } => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_outcome() {
        let outcome = StageOutcome::Parsed(5);

        assert!(!outcome.is_fallback());
        assert!(outcome.reason().is_none());
        assert_eq!(outcome.into_value(), 5);
    }

    #[test]
    fn test_fallback_outcome() {
        let outcome = StageOutcome::fallback(0, FallbackReason::Timeout);

        assert!(outcome.is_fallback());
        assert_eq!(outcome.reason().map(FallbackReason::kind), Some("timeout"));
        assert_eq!(*outcome.value(), 0);
    }

    #[test]
    fn test_reason_display() {
        let reason = FallbackReason::MalformedOutput("expected value at line 1".into());
        assert_eq!(reason.to_string(), "malformed output: expected value at line 1");
    }
}
