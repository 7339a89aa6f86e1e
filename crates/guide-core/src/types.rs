use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CompletionStatus
// ---------------------------------------------------------------------------

/// Terminal status reported to the assistant endpoint when a tour closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionStatus {
    Viewed,
    Dismissed,
}

impl CompletionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CompletionStatus::Viewed => "viewed",
            CompletionStatus::Dismissed => "dismissed",
        }
    }
}

impl fmt::Display for CompletionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CompletionStatus {
    type Err = crate::error::GuideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewed" => Ok(CompletionStatus::Viewed),
            "dismissed" => Ok(CompletionStatus::Dismissed),
            _ => Err(crate::error::GuideError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tour id validation
// ---------------------------------------------------------------------------

/// Tour ids are slugs: lowercase alphanumeric with underscores, non-empty,
/// starting with a letter.
pub fn is_valid_tour_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_roundtrip() {
        for status in [CompletionStatus::Viewed, CompletionStatus::Dismissed] {
            let parsed = CompletionStatus::from_str(status.as_str()).unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn status_rejects_unknown() {
        assert!(CompletionStatus::from_str("snoozed").is_err());
        assert!(CompletionStatus::from_str("").is_err());
    }

    #[test]
    fn tour_id_validation() {
        assert!(is_valid_tour_id("issue_stream"));
        assert!(is_valid_tour_id("alerts2"));
        assert!(!is_valid_tour_id(""));
        assert!(!is_valid_tour_id("Issue"));
        assert!(!is_valid_tour_id("2fast"));
        assert!(!is_valid_tour_id("has-dash"));
    }
}
