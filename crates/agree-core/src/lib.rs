//! Core comparison logic for analysis schemas.
//!
//! This crate contains the fundamental types and logic for:
//! - Labels: timed annotations with a kind, a tag and an optional weight
//! - Diff: greedy label matching into true/false positives and negatives
//! - Counts: sensitivity, precision and F1, overall and per kind
//! - Mutual information: entropy-based over/under-segmentation scores

mod counts;
mod diff;
mod label;
pub mod mutual_info;
mod partition;
pub mod types;

pub use counts::{Counts, Tally};
pub use diff::{DiffPart, KindBreakdown, KindCounts, PartDiff, SchemaDiff};
pub use label::{Label, MatchCriteria, validate_delta};
pub use mutual_info::MutualInformation;
pub use partition::{Partition, Schema, matching_partition};
pub use types::{ByOutcome, Outcome, ValidationError};
