//! Segmentation command: over- and under-segmentation scores of one schema
//! against another.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use agree_core::mutual_info::{by_kind, by_tag};
use agree_core::{Label, MatchCriteria, MutualInformation, Schema};
use anyhow::Result;
use serde::Serialize;

use crate::cli::Affectation;
use crate::input::load_schema;

/// Settings for one `agree segmentation` run.
#[derive(Debug, Clone)]
pub struct SegmentationOptions {
    pub criteria: MatchCriteria,
    pub by: Affectation,
    pub json: bool,
}

/// Scores and class counts of one comparison.
#[derive(Debug, Serialize)]
pub struct SegmentationSummary {
    pub schema1: String,
    pub schema2: String,
    pub by: &'static str,
    pub over_segmentation: f64,
    pub under_segmentation: f64,
    pub matched: usize,
    pub unmatched: usize,
    pub classes1: BTreeMap<String, usize>,
    pub classes2: BTreeMap<String, usize>,
}

/// Pairs the labels of both schemas and computes the scores.
pub fn summarize(schema1: &Schema, schema2: &Schema, options: &SegmentationOptions) -> SegmentationSummary {
    let affectation: fn(&Label) -> String = match options.by {
        Affectation::Tag => by_tag,
        Affectation::Kind => by_kind,
    };
    let mi = MutualInformation::compute(schema1, schema2, affectation, &options.criteria);

    SegmentationSummary {
        schema1: schema1.id.clone(),
        schema2: schema2.id.clone(),
        by: options.by.as_str(),
        over_segmentation: mi.over_segmentation(),
        under_segmentation: mi.under_segmentation(),
        matched: mi.total(),
        unmatched: mi.unmatched().len(),
        classes1: mi.classes1().clone(),
        classes2: mi.classes2().clone(),
    }
}

/// Formats a summary for humans.
pub fn format_summary(summary: &SegmentationSummary) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "==> {} vs {}  (by {})",
        summary.schema1, summary.schema2, summary.by
    )
    .unwrap();
    writeln!(
        out,
        "  so: {:.3}   su: {:.3}",
        summary.over_segmentation, summary.under_segmentation
    )
    .unwrap();
    writeln!(
        out,
        "  matched: {}   unmatched: {}   classes: {} / {}",
        summary.matched,
        summary.unmatched,
        summary.classes1.len(),
        summary.classes2.len()
    )
    .unwrap();
    out
}

/// Runs the segmentation command.
pub fn run(left: &Path, right: &Path, options: &SegmentationOptions) -> Result<()> {
    let schema1 = load_schema(left)?;
    let schema2 = load_schema(right)?;
    let summary = summarize(&schema1, &schema2, options);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", format_summary(&summary));
    }

    Ok(())
}
