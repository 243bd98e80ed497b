//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The label offset was NaN or infinite.
    #[error("offset must be finite, got {value}")]
    NonFiniteOffset { value: f64 },

    /// The label duration was negative, NaN or infinite.
    #[error("duration must be finite and non-negative, got {value}")]
    InvalidDuration { value: f64 },

    /// A match tolerance was negative or NaN.
    #[error("delta must be a non-negative number, got {value}")]
    InvalidDelta { value: f64 },

    /// Invalid outcome name.
    #[error("invalid outcome: {value}")]
    InvalidOutcome { value: String },
}

/// How a label was classified by a comparison.
///
/// Labels of the first schema are either true or false positives; labels of
/// the second schema that nothing claimed are false negatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "TP")]
    TruePositive,
    #[serde(rename = "FP")]
    FalsePositive,
    #[serde(rename = "FN")]
    FalseNegative,
}

impl Outcome {
    /// All outcomes, in reporting order.
    pub const ALL: [Self; 3] = [Self::TruePositive, Self::FalsePositive, Self::FalseNegative];

    /// Short name used in partition ids and reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TruePositive => "TP",
            Self::FalsePositive => "FP",
            Self::FalseNegative => "FN",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Outcome {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TP" => Ok(Self::TruePositive),
            "FP" => Ok(Self::FalsePositive),
            "FN" => Ok(Self::FalseNegative),
            _ => Err(ValidationError::InvalidOutcome {
                value: s.to_string(),
            }),
        }
    }
}

/// One value per [`Outcome`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ByOutcome<T> {
    #[serde(rename = "TP")]
    pub true_positives: T,
    #[serde(rename = "FP")]
    pub false_positives: T,
    #[serde(rename = "FN")]
    pub false_negatives: T,
}

impl<T> ByOutcome<T> {
    /// Builds a value for each outcome from a constructor.
    pub fn from_fn(mut f: impl FnMut(Outcome) -> T) -> Self {
        Self {
            true_positives: f(Outcome::TruePositive),
            false_positives: f(Outcome::FalsePositive),
            false_negatives: f(Outcome::FalseNegative),
        }
    }

    pub const fn get(&self, outcome: Outcome) -> &T {
        match outcome {
            Outcome::TruePositive => &self.true_positives,
            Outcome::FalsePositive => &self.false_positives,
            Outcome::FalseNegative => &self.false_negatives,
        }
    }

    pub const fn get_mut(&mut self, outcome: Outcome) -> &mut T {
        match outcome {
            Outcome::TruePositive => &mut self.true_positives,
            Outcome::FalsePositive => &mut self.false_positives,
            Outcome::FalseNegative => &mut self.false_negatives,
        }
    }

    /// Iterates `(outcome, value)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Outcome, &T)> {
        Outcome::ALL.into_iter().map(move |o| (o, self.get(o)))
    }
}
