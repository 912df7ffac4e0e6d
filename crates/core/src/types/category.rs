//! Submission category.
//!
//! The wire value (form field and database column) is the lowercase ASCII
//! code returned by [`Category::code`]; [`Category::label`] is what the form
//! shows to visitors.

use serde::{Deserialize, Serialize};

/// Error returned when a string is not a known category code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// Topic of a support submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    /// General question.
    #[default]
    #[serde(rename = "dotaz")]
    Question,
    /// Something does not work.
    #[serde(rename = "problem")]
    Problem,
    /// Complaint about a product or service.
    #[serde(rename = "reklamace")]
    Complaint,
    /// Suggestion for improvement.
    #[serde(rename = "navrh")]
    Suggestion,
    /// Anything else.
    #[serde(rename = "jine")]
    Other,
}

impl Category {
    /// Every category, in the order the form lists them.
    pub const ALL: [Self; 5] = [
        Self::Question,
        Self::Problem,
        Self::Complaint,
        Self::Suggestion,
        Self::Other,
    ];

    /// Stable code stored in the database and submitted by the form.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Question => "dotaz",
            Self::Problem => "problem",
            Self::Complaint => "reklamace",
            Self::Suggestion => "navrh",
            Self::Other => "jine",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Question => "Dotaz",
            Self::Problem => "Technický problém",
            Self::Complaint => "Reklamace",
            Self::Suggestion => "Návrh na zlepšení",
            Self::Other => "Jiné",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_codes() {
        for category in Category::ALL {
            assert_eq!(category.code().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_unknown_code() {
        let err = "spam".parse::<Category>().unwrap_err();
        assert_eq!(err, CategoryError("spam".to_owned()));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Dotaz".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_code() {
        let json = serde_json::to_string(&Category::Complaint).unwrap();
        assert_eq!(json, "\"reklamace\"");
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Category::Suggestion.to_string(), "navrh");
    }
}
