//! Password strength hint for the entry form
//!
//! A UI signal only. It says nothing about how guessable a password really is.

use serde::{Deserialize, Serialize};

/// Minimum length that earns the length point
pub const MIN_LENGTH: usize = 8;

/// Highest possible score
pub const MAX_SCORE: u8 = 4;

/// Score a candidate password in `0..=4`, one point each for: at least eight
/// UTF-16 code units, an uppercase letter, a digit, and a character outside
/// `[A-Za-z0-9]`.
///
/// Length is measured the way browser string lengths are, so a character
/// outside the Basic Multilingual Plane counts twice.
pub fn score(candidate: &str) -> u8 {
    let criteria = [
        candidate.encode_utf16().count() >= MIN_LENGTH,
        candidate.chars().any(|c| c.is_ascii_uppercase()),
        candidate.chars().any(|c| c.is_ascii_digit()),
        candidate.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];

    criteria.iter().filter(|met| **met).count() as u8
}

/// Display label for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl StrengthLabel {
    /// Label for a score; anything above the maximum counts as very strong
    pub fn from_score(score: u8) -> Self {
        match score {
            0 => Self::VeryWeak,
            1 => Self::Weak,
            2 => Self::Fair,
            3 => Self::Strong,
            _ => Self::VeryStrong,
        }
    }

    /// Score and label a candidate in one go
    pub fn of(candidate: &str) -> Self {
        Self::from_score(score(candidate))
    }
}

impl std::fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::VeryWeak => "Very weak",
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Strong => "Strong",
            Self::VeryStrong => "Very strong",
        };
        f.write_str(label)
    }
}
