//! Analysis labels: timed annotations over a shared timeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// An analysis label spanning `[offset, offset + duration]`.
///
/// A zero duration marks an instantaneous event (a cadence, a mark).
/// `kind` drives matching and per-kind statistics; `tag` is free text that
/// only matters when tag checking is enabled; `weight` is carried along and
/// never used in matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LabelRecord")]
pub struct Label {
    offset: f64,
    duration: f64,
    kind: String,
    tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    weight: Option<f64>,
}

/// Unvalidated wire form of a [`Label`].
#[derive(Deserialize)]
struct LabelRecord {
    offset: f64,
    #[serde(default)]
    duration: f64,
    kind: String,
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    weight: Option<f64>,
}

impl TryFrom<LabelRecord> for Label {
    type Error = ValidationError;

    fn try_from(record: LabelRecord) -> Result<Self, Self::Error> {
        let mut label = Self::new(record.offset, record.duration, record.kind)?;
        if let Some(tag) = record.tag {
            label.tag = tag;
        }
        label.weight = record.weight;
        Ok(label)
    }
}

/// Which fields [`Label::compare`] checks, and how far apart the end points
/// may be.
///
/// Both deltas always apply: a start within `start_delta` is not a match
/// unless the end is also within `end_delta`. Deltas are never negative or
/// NaN, so a label always matches itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCriteria {
    pub check_kind: bool,
    pub check_tag: bool,
    start_delta: f64,
    end_delta: f64,
}

/// Checks that `value` can serve as a start or end tolerance.
///
/// Infinity is accepted and means "any distance".
pub fn validate_delta(value: f64) -> Result<f64, ValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::InvalidDelta { value });
    }
    Ok(value)
}

impl Default for MatchCriteria {
    fn default() -> Self {
        Self {
            check_kind: true,
            check_tag: false,
            start_delta: 0.0,
            end_delta: 0.0,
        }
    }
}

impl MatchCriteria {
    /// Criteria that only look at start and end proximity.
    #[must_use]
    pub fn positional() -> Self {
        Self {
            check_kind: false,
            ..Self::default()
        }
    }

    pub fn with_start_delta(mut self, delta: f64) -> Result<Self, ValidationError> {
        self.start_delta = validate_delta(delta)?;
        Ok(self)
    }

    pub fn with_end_delta(mut self, delta: f64) -> Result<Self, ValidationError> {
        self.end_delta = validate_delta(delta)?;
        Ok(self)
    }

    pub const fn start_delta(&self) -> f64 {
        self.start_delta
    }

    pub const fn end_delta(&self) -> f64 {
        self.end_delta
    }

    #[must_use]
    pub const fn with_check_tag(mut self, check_tag: bool) -> Self {
        self.check_tag = check_tag;
        self
    }

    #[must_use]
    pub const fn with_check_kind(mut self, check_kind: bool) -> Self {
        self.check_kind = check_kind;
        self
    }
}

impl Label {
    /// Creates a label whose tag defaults to its kind.
    pub fn new(offset: f64, duration: f64, kind: impl Into<String>) -> Result<Self, ValidationError> {
        if !offset.is_finite() {
            return Err(ValidationError::NonFiniteOffset { value: offset });
        }
        if !duration.is_finite() || duration < 0.0 {
            return Err(ValidationError::InvalidDuration { value: duration });
        }
        let kind = kind.into();
        Ok(Self {
            offset,
            duration,
            tag: kind.clone(),
            kind,
            weight: None,
        })
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub const fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub const fn offset(&self) -> f64 {
        self.offset
    }

    pub const fn duration(&self) -> f64 {
        self.duration
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub const fn weight(&self) -> Option<f64> {
        self.weight
    }

    /// `offset + duration`.
    pub fn end(&self) -> f64 {
        self.offset + self.duration
    }

    /// Whether `x` lies in the closed span of this label.
    pub fn contains_offset(&self, x: f64) -> bool {
        self.offset <= x && x <= self.end()
    }

    /// Whether the two closed spans share at least one point.
    pub fn intersects(&self, other: &Self) -> bool {
        self.offset <= other.end() && other.offset <= self.end()
    }

    /// Length of the common part of the two spans, zero when disjoint.
    pub fn overlap_length(&self, other: &Self) -> f64 {
        let start = self.offset.max(other.offset);
        let end = self.end().min(other.end());
        (end - start).max(0.0)
    }

    /// Threshold test used by every matcher.
    ///
    /// True when the checked fields agree and both the start and the end
    /// points lie within the configured deltas.
    pub fn compare(&self, other: &Self, criteria: &MatchCriteria) -> bool {
        if criteria.check_kind && self.kind != other.kind {
            return false;
        }
        if criteria.check_tag && self.tag != other.tag {
            return false;
        }
        if (self.offset - other.offset).abs() > criteria.start_delta {
            return false;
        }
        (self.end() - other.end()).abs() <= criteria.end_delta
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.kind, self.tag)?;
        match self.weight {
            Some(weight) => write!(f, "{weight}")?,
            None => write!(f, "-")?,
        }
        write!(f, " offset={} duration={}", self.offset, self.duration)
    }
}
