//! True/false positive counts and the precision/recall measures built on them.

use std::fmt;

use serde::Serialize;

use crate::types::ByOutcome;

/// Something that can stand for a count: a number, or a collection whose
/// length is the count.
pub trait Tally {
    fn tally(&self) -> usize;
}

impl Tally for usize {
    fn tally(&self) -> usize {
        *self
    }
}

impl<T> Tally for [T] {
    fn tally(&self) -> usize {
        self.len()
    }
}

impl<T> Tally for Vec<T> {
    fn tally(&self) -> usize {
        self.len()
    }
}

impl<T: Tally + ?Sized> Tally for &T {
    fn tally(&self) -> usize {
        (**self).tally()
    }
}

/// TP/FP/FN counts with sensitivity, precision and F1.
///
/// `sensitivity` and `precision` are percentages; `f1` is a fraction. Each is
/// NaN when its denominator is zero.
#[derive(Debug, Clone, Serialize)]
pub struct Counts {
    #[serde(flatten)]
    pub counts: ByOutcome<usize>,
    #[serde(rename = "TP+FP")]
    pub tp_fp: usize,
    #[serde(rename = "TP+FN")]
    pub tp_fn: usize,
    pub sensitivity: f64,
    pub precision: f64,
    #[serde(rename = "F1")]
    pub f1: f64,
}

impl Counts {
    /// Computes the derived measures from anything countable.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute<A, B, C>(tp: &A, fp: &B, fn_: &C) -> Self
    where
        A: Tally + ?Sized,
        B: Tally + ?Sized,
        C: Tally + ?Sized,
    {
        let nb_tp = tp.tally();
        let nb_fp = fp.tally();
        let nb_fn = fn_.tally();

        let sens = if nb_tp + nb_fn > 0 {
            nb_tp as f64 / (nb_tp + nb_fn) as f64
        } else {
            f64::NAN
        };
        let prec = if nb_tp + nb_fp > 0 {
            nb_tp as f64 / (nb_tp + nb_fp) as f64
        } else {
            f64::NAN
        };
        // NaN on either side fails the comparison and leaves F1 undefined.
        let f1 = if sens + prec > 0.0 {
            2.0 * sens * prec / (sens + prec)
        } else {
            f64::NAN
        };

        Self {
            counts: ByOutcome {
                true_positives: nb_tp,
                false_positives: nb_fp,
                false_negatives: nb_fn,
            },
            tp_fp: nb_tp + nb_fp,
            tp_fn: nb_tp + nb_fn,
            sensitivity: sens * 100.0,
            precision: prec * 100.0,
            f1,
        }
    }

    /// Computes from already tallied counts.
    pub fn from_counts(counts: &ByOutcome<usize>) -> Self {
        Self::compute(
            &counts.true_positives,
            &counts.false_positives,
            &counts.false_negatives,
        )
    }

    pub const fn true_positives(&self) -> usize {
        self.counts.true_positives
    }

    pub const fn false_positives(&self) -> usize {
        self.counts.false_positives
    }

    pub const fn false_negatives(&self) -> usize {
        self.counts.false_negatives
    }
}

impl PartialEq for Counts {
    /// NaN fields compare equal to each other.
    fn eq(&self, other: &Self) -> bool {
        fn same(a: f64, b: f64) -> bool {
            (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
        }
        self.counts == other.counts
            && self.tp_fp == other.tp_fp
            && self.tp_fn == other.tp_fn
            && same(self.sensitivity, other.sensitivity)
            && same(self.precision, other.precision)
            && same(self.f1, other.f1)
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tp = self.counts.true_positives;
        write!(
            f,
            "TP: {tp:>3}   FP: {:>3}   FN: {:>3}",
            self.counts.false_positives, self.counts.false_negatives
        )?;
        if !self.sensitivity.is_nan() {
            write!(f, "  sens:{tp:>3}/{:>3} {:>6.1}%", self.tp_fn, self.sensitivity)?;
        }
        if !self.precision.is_nan() {
            write!(f, "  prec:{tp:>3}/{:>3} {:>6.1}%", self.tp_fp, self.precision)?;
        }
        if !self.f1.is_nan() {
            write!(f, "  F1: {:.3}", self.f1)?;
        }
        Ok(())
    }
}
