//! Label-by-label comparison of two analysis schemas.
//!
//! # Algorithm Summary
//!
//! For each partition of the first schema, the partition with the same id is
//! looked up in the second schema (see [`matching_partition`]). Then, for each
//! label of the first partition in order, the second partition is scanned in
//! order and the first unclaimed label satisfying [`Label::compare`] is
//! claimed. Claimed pairs are true positives, labels left on the first side
//! are false positives, labels left on the second side are false negatives.
//!
//! Matching is greedy and first-fit, not a global optimum: on ambiguous
//! inputs the earliest compatible counterpart always wins.

use std::fmt::{self, Write};

use serde::Serialize;

use crate::counts::{Counts, Tally};
use crate::label::{Label, MatchCriteria};
use crate::partition::{Partition, Schema, matching_partition};
use crate::types::{ByOutcome, Outcome};

/// Stand-in for a kind name on the aggregate line of a report.
const ALL_KINDS: &str = "::::::::";

/// Labels of one partition that received the same classification.
///
/// Labels are borrowed from the compared schemas, never copied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffPart<'a> {
    pub id: String,
    pub labels: Vec<&'a Label>,
}

impl<'a> DiffPart<'a> {
    fn new(id: String) -> Self {
        Self {
            id,
            labels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Label> + '_ {
        self.labels.iter().copied()
    }
}

impl Tally for DiffPart<'_> {
    fn tally(&self) -> usize {
        self.labels.len()
    }
}

/// Result of comparing one pair of partitions.
pub type PartDiff<'a> = ByOutcome<DiffPart<'a>>;

/// Per-kind counts plus the aggregate over every kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindBreakdown {
    pub kinds: Vec<KindCounts>,
    pub all: Counts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindCounts {
    pub kind: String,
    #[serde(flatten)]
    pub counts: Counts,
}

/// Accumulated differences between analysis schemas.
///
/// `diff` only ever grows: each comparison appends one [`DiffPart`] per
/// outcome and partition.
#[derive(Debug, Clone)]
pub struct SchemaDiff<'a> {
    pub basename: String,
    /// Kinds seen so far, in first-seen order.
    pub kinds: Vec<String>,
    /// Labels of these kinds are skipped on both sides.
    pub kinds_ignore: Vec<String>,
    pub diff: ByOutcome<Vec<DiffPart<'a>>>,
}

impl<'a> SchemaDiff<'a> {
    pub fn new(basename: impl Into<String>) -> Self {
        Self {
            basename: basename.into(),
            kinds: Vec::new(),
            kinds_ignore: Vec::new(),
            diff: ByOutcome::default(),
        }
    }

    /// Reports these kinds first, in this order.
    #[must_use]
    pub fn with_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kinds = kinds.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_kinds_ignore<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.kinds_ignore = kinds.into_iter().map(Into::into).collect();
        self
    }

    fn is_ignored(&self, label: &Label) -> bool {
        self.kinds_ignore.iter().any(|k| k == label.kind())
    }

    fn note_kind(&mut self, kind: &str) {
        if !self.kinds.iter().any(|k| k == kind) {
            self.kinds.push(kind.to_string());
        }
    }

    fn record(&self, diff: &mut PartDiff<'a>, outcome: Outcome, label: &'a Label) {
        let part = diff.get_mut(outcome);
        tracing::debug!(basename = %self.basename, part = %part.id, %label, "{outcome}");
        part.labels.push(label);
    }

    /// Compares the labels of two partitions.
    ///
    /// Returns one [`DiffPart`] per outcome, with ids `<part1.id>-TP`,
    /// `<part1.id>-FP` and `<part1.id>-FN`. Kinds met on either side are added
    /// to [`SchemaDiff::kinds`]; `self.diff` is left untouched.
    pub fn compare_parts(
        &mut self,
        part1: &'a Partition,
        part2: &'a Partition,
        criteria: &MatchCriteria,
    ) -> PartDiff<'a> {
        let mut diff = ByOutcome::from_fn(|o| DiffPart::new(format!("{}-{o}", part1.id)));
        let mut claimed = vec![false; part2.len()];

        for label1 in part1 {
            if self.is_ignored(label1) {
                continue;
            }
            self.note_kind(label1.kind());

            let found = part2.iter().enumerate().position(|(i, label2)| {
                !claimed[i] && !self.is_ignored(label2) && label1.compare(label2, criteria)
            });

            if let Some(i) = found {
                claimed[i] = true;
                self.record(&mut diff, Outcome::TruePositive, label1);
            } else {
                self.record(&mut diff, Outcome::FalsePositive, label1);
            }
        }

        for (i, label2) in part2.iter().enumerate() {
            if self.is_ignored(label2) {
                continue;
            }
            self.note_kind(label2.kind());

            if !claimed[i] {
                self.record(&mut diff, Outcome::FalseNegative, label2);
            }
        }

        diff
    }

    /// Compares two schemas partition by partition and appends the result to
    /// `self.diff`.
    ///
    /// When `cumulative` is given, the same partitions are appended to it as
    /// well, and the kinds seen here are merged into its kind list.
    pub fn compare_schemas(
        &mut self,
        schema1: &'a Schema,
        schema2: &'a Schema,
        criteria: &MatchCriteria,
        mut cumulative: Option<&mut SchemaDiff<'a>>,
    ) -> &ByOutcome<Vec<DiffPart<'a>>> {
        for part1 in &schema1.partitions {
            let part2 = matching_partition(part1, schema2);
            let part_diff = self.compare_parts(part1, part2, criteria);

            for outcome in Outcome::ALL {
                let part = part_diff.get(outcome);
                if let Some(total) = cumulative.as_deref_mut() {
                    total.diff.get_mut(outcome).push(part.clone());
                }
                self.diff.get_mut(outcome).push(part.clone());
            }
        }

        if let Some(total) = cumulative {
            for kind in &self.kinds {
                total.note_kind(kind);
            }
        }

        &self.diff
    }

    /// Number of labels per outcome, over every partition appended so far.
    pub fn totals(&self) -> ByOutcome<usize> {
        ByOutcome::from_fn(|o| self.diff.get(o).iter().map(DiffPart::len).sum())
    }

    /// Counts labels of `kind` in the accumulated diff, or of every kind when
    /// `kind` is `None`.
    pub fn counts_of_kind(&self, kind: Option<&str>) -> Counts {
        let counts = ByOutcome::from_fn(|o| {
            self.diff
                .get(o)
                .iter()
                .flat_map(DiffPart::iter)
                .filter(|label| kind.is_none_or(|k| label.kind() == k))
                .count()
        });
        Counts::from_counts(&counts)
    }

    /// Counts for each kind seen, in first-seen order, plus the aggregate.
    pub fn breakdown(&self) -> KindBreakdown {
        KindBreakdown {
            kinds: self
                .kinds
                .iter()
                .map(|kind| KindCounts {
                    kind: kind.clone(),
                    counts: self.counts_of_kind(Some(kind.as_str())),
                })
                .collect(),
            all: self.counts_of_kind(None),
        }
    }

    /// One line per kind and a final aggregate line.
    ///
    /// Each line is prefixed with `tag`, which may be empty.
    pub fn stats_by_kind(&self, tag: &str) -> String {
        let mut out = String::new();
        let breakdown = self.breakdown();
        let lines = breakdown
            .kinds
            .iter()
            .map(|k| (k.kind.as_str(), &k.counts))
            .chain(std::iter::once((ALL_KINDS, &breakdown.all)));
        for (kind, counts) in lines {
            writeln!(out, " {tag}   {kind:<8} ==> {counts}").unwrap();
        }
        out
    }

    /// Full text report: a header naming the comparison and its tolerances,
    /// followed by [`SchemaDiff::stats_by_kind`].
    pub fn report(&self, criteria: &MatchCriteria) -> String {
        let mut out = String::new();
        writeln!(
            out,
            "==> {}  (start delta: {}, end delta: {})",
            self.basename,
            criteria.start_delta(),
            criteria.end_delta()
        )
        .unwrap();
        out.push_str(&self.stats_by_kind(""));
        out
    }
}

impl fmt::Display for SchemaDiff<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stats_by_kind(""))
    }
}
