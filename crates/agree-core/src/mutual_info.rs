//! Entropy-based segmentation scores between two analysis schemas.
//!
//! Every label of the first schema is paired with the first label of the
//! second schema that satisfies [`Label::compare`]. Unlike the diff engine,
//! a label of the second schema may be paired any number of times. Each pair
//! is reduced to a pair of classes through an affectation function, and the
//! joint class distribution yields two conditional entropies:
//!
//! ```text
//! so = 1 - H(class2 | class1) / log2(|classes2|)
//! su = 1 - H(class1 | class2) / log2(|classes1|)
//! ```
//!
//! `so` is 1 when the classes of the first schema fully predict those of the
//! second (no over-segmentation), `su` is the converse.

use std::collections::BTreeMap;

use crate::label::{Label, MatchCriteria};
use crate::partition::Schema;

/// Maps a label to its class: the tag.
pub fn by_tag(label: &Label) -> String {
    label.tag().to_string()
}

/// Maps a label to its class: the kind.
pub fn by_kind(label: &Label) -> String {
    label.kind().to_string()
}

/// Joint and marginal class counts of paired labels.
#[derive(Debug, Clone, Default)]
pub struct MutualInformation<'a> {
    joint: BTreeMap<(String, String), usize>,
    classes1: BTreeMap<String, usize>,
    classes2: BTreeMap<String, usize>,
    total: usize,
    unmatched: Vec<&'a Label>,
}

impl<'a> MutualInformation<'a> {
    /// Pairs the labels of `schema1` with those of `schema2` and counts
    /// classes with the default tag affectation and positional criteria.
    pub fn new(schema1: &'a Schema, schema2: &Schema) -> Self {
        Self::compute(schema1, schema2, by_tag, &MatchCriteria::positional())
    }

    /// Pairs the labels of `schema1` with those of `schema2` and counts
    /// `(affectation(a), affectation(b))` for every pair.
    ///
    /// Labels of `schema1` without any counterpart are logged, kept in
    /// [`MutualInformation::unmatched`] and left out of every count.
    pub fn compute<F>(
        schema1: &'a Schema,
        schema2: &Schema,
        affectation: F,
        criteria: &MatchCriteria,
    ) -> Self
    where
        F: Fn(&Label) -> String,
    {
        let mut mi = Self::default();

        for label1 in schema1.labels() {
            let Some(label2) = schema2.labels().find(|l2| label1.compare(l2, criteria)) else {
                tracing::warn!(schema = %schema1.id, label = %label1, "no matching label, ignored");
                mi.unmatched.push(label1);
                continue;
            };

            let class1 = affectation(label1);
            let class2 = affectation(label2);
            *mi.classes1.entry(class1.clone()).or_insert(0) += 1;
            *mi.classes2.entry(class2.clone()).or_insert(0) += 1;
            *mi.joint.entry((class1, class2)).or_insert(0) += 1;
            mi.total += 1;
        }

        mi
    }

    /// Number of paired labels.
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Labels of the first schema that found no counterpart.
    pub fn unmatched(&self) -> &[&'a Label] {
        &self.unmatched
    }

    /// Distinct classes of the first schema, with their counts.
    pub const fn classes1(&self) -> &BTreeMap<String, usize> {
        &self.classes1
    }

    /// Distinct classes of the second schema, with their counts.
    pub const fn classes2(&self) -> &BTreeMap<String, usize> {
        &self.classes2
    }

    /// Number of pairs with these classes.
    pub fn joint(&self, class1: &str, class2: &str) -> usize {
        self.joint
            .get(&(class1.to_string(), class2.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// p(class1).
    pub fn p_class1(&self, class1: &str) -> f64 {
        ratio(self.classes1.get(class1).copied().unwrap_or(0), self.total)
    }

    /// p(class2).
    pub fn p_class2(&self, class2: &str) -> f64 {
        ratio(self.classes2.get(class2).copied().unwrap_or(0), self.total)
    }

    /// p(class2 | class1).
    pub fn p_class2_given_class1(&self, class2: &str, class1: &str) -> f64 {
        ratio(
            self.joint(class1, class2),
            self.classes1.get(class1).copied().unwrap_or(0),
        )
    }

    /// p(class1 | class2).
    pub fn p_class1_given_class2(&self, class1: &str, class2: &str) -> f64 {
        ratio(
            self.joint(class1, class2),
            self.classes2.get(class2).copied().unwrap_or(0),
        )
    }

    /// H(class2 | class1), in bits.
    pub fn entropy_class2_given_class1(&self) -> f64 {
        let mut h = 0.0;
        for class1 in self.classes1.keys() {
            let inner: f64 = self
                .classes2
                .keys()
                .map(|class2| self.p_class2_given_class1(class2, class1))
                .filter(|&p| p > 0.0)
                .map(|p| p * p.log2())
                .sum();
            h -= self.p_class1(class1) * inner;
        }
        h
    }

    /// H(class1 | class2), in bits.
    pub fn entropy_class1_given_class2(&self) -> f64 {
        let mut h = 0.0;
        for class2 in self.classes2.keys() {
            let inner: f64 = self
                .classes1
                .keys()
                .map(|class1| self.p_class1_given_class2(class1, class2))
                .filter(|&p| p > 0.0)
                .map(|p| p * p.log2())
                .sum();
            h -= self.p_class2(class2) * inner;
        }
        h
    }

    /// Over-segmentation score `so`.
    pub fn over_segmentation(&self) -> f64 {
        normalized_score(
            self.entropy_class2_given_class1(),
            self.classes2.len(),
        )
    }

    /// Under-segmentation score `su`.
    pub fn under_segmentation(&self) -> f64 {
        normalized_score(
            self.entropy_class1_given_class2(),
            self.classes1.len(),
        )
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[allow(clippy::cast_precision_loss)]
fn normalized_score(entropy: f64, classes: usize) -> f64 {
    if classes <= 1 {
        1.0
    } else {
        1.0 - entropy / (classes as f64).log2()
    }
}
