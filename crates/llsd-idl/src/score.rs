//! # Compatibility Scores
//!
//! Comparing a value against a matcher yields one of six totally ordered
//! grades. Aggregates take the minimum of their parts (the weakest element
//! decides); variant alternatives take the maximum.
//!
//! | Score | Grade | Meaning |
//! |-------|-------|---------|
//! | `Matched` | 4 | exact kind and shape |
//! | `Converted` | 3 | coerced from another kind without loss |
//! | `Defaulted` | 2.2 | missing data that defaults cleanly |
//! | `Additional` | 2.1 | unexpected extra data |
//! | `Mixed` | 1 | both additions and losses |
//! | `Incompatible` | 0 | cannot be read as declared |

use std::fmt;

use serde::{Deserialize, Serialize};

/// A graded structural compatibility level.
///
/// Variants are declared in ascending order so the derived `Ord` matches the
/// numeric grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Score {
    /// Cannot be read as declared.
    Incompatible,
    /// Both additions and losses.
    Mixed,
    /// Carries data the schema does not declare.
    Additional,
    /// Missing data that defaults cleanly.
    Defaulted,
    /// Coerced from another kind without loss.
    Converted,
    /// Exact kind and shape.
    Matched,
}

impl Score {
    /// All scores, weakest first.
    pub fn all() -> &'static [Score] {
        &[
            Self::Incompatible,
            Self::Mixed,
            Self::Additional,
            Self::Defaulted,
            Self::Converted,
            Self::Matched,
        ]
    }

    /// The numeric grade.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Incompatible => 0.0,
            Self::Mixed => 1.0,
            Self::Additional => 2.1,
            Self::Defaulted => 2.2,
            Self::Converted => 3.0,
            Self::Matched => 4.0,
        }
    }

    /// Uppercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incompatible => "INCOMPATIBLE",
            Self::Mixed => "MIXED",
            Self::Additional => "ADDITIONAL",
            Self::Defaulted => "DEFAULTED",
            Self::Converted => "CONVERTED",
            Self::Matched => "MATCHED",
        }
    }

    /// The value can be read at all.
    pub fn is_valid(&self) -> bool {
        *self > Self::Incompatible
    }

    /// The value can be read and carries nothing unexpected.
    pub fn is_match(&self) -> bool {
        *self > Self::Additional
    }

    /// The value carries data the schema does not declare.
    pub fn has_additional(&self) -> bool {
        (Self::Mixed..=Self::Additional).contains(self)
    }

    /// The value cannot be read as declared.
    pub fn is_incompatible(&self) -> bool {
        *self == Self::Incompatible
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
