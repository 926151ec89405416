//! Insert direction relative to a target unit.

use crate::error::PipelineError;
use std::fmt;
use std::str::FromStr;

/// Where a new unit lands relative to the unit it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Immediately before the target; the target shifts back by one.
    Before,
    /// Immediately after the target.
    After,
}

impl Position {
    /// Offset added to the target index to obtain the insertion index.
    #[must_use]
    pub const fn offset(self) -> usize {
        match self {
            Self::Before => 0,
            Self::After => 1,
        }
    }

    /// Returns the lowercase name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = PipelineError;

    /// Parses `"before"` or `"after"` (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use stagehand_core::{PipelineError, Position};
    ///
    /// assert_eq!("after".parse::<Position>(), Ok(Position::After));
    /// assert!(matches!(
    ///     "beside".parse::<Position>(),
    ///     Err(PipelineError::InvalidDirection { .. })
    /// ));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            _ => Err(PipelineError::invalid_direction(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        assert_eq!(Position::Before.offset(), 0);
        assert_eq!(Position::After.offset(), 1);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("BEFORE".parse::<Position>(), Ok(Position::Before));
        assert_eq!(" After ".parse::<Position>(), Ok(Position::After));
    }

    #[test]
    fn test_parse_rejects_unknown_direction() {
        let err = "middle".parse::<Position>().unwrap_err();
        assert_eq!(err, PipelineError::invalid_direction("middle"));
        assert!(err.to_string().contains("middle"));
    }
}
