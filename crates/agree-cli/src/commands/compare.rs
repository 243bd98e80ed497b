//! Compare command: label-by-label agreement between pairs of schemas.
//!
//! Files are compared two by two. When several pairs are given, every pair
//! also feeds a cumulative diff named "all", reported after the others.

use std::path::PathBuf;

use agree_core::{KindBreakdown, MatchCriteria, Schema, SchemaDiff};
use anyhow::{Result, bail};
use serde::Serialize;

use crate::input::load_schemas;

/// Name of the diff accumulating every pair.
const CUMULATIVE_NAME: &str = "all";

/// Settings for one `agree compare` run.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub criteria: MatchCriteria,
    pub kinds_ignore: Vec<String>,
    pub json: bool,
}

/// Diffs of every pair, plus the cumulative diff when there is more than one
/// pair.
#[derive(Debug)]
pub struct Comparison<'a> {
    pub pairs: Vec<SchemaDiff<'a>>,
    pub cumulative: Option<SchemaDiff<'a>>,
}

impl<'a> Comparison<'a> {
    /// Per-pair diffs followed by the cumulative one.
    pub fn diffs(&self) -> impl Iterator<Item = &SchemaDiff<'a>> {
        self.pairs.iter().chain(self.cumulative.iter())
    }
}

fn ensure_pairs(count: usize) -> Result<()> {
    if count < 2 || count % 2 != 0 {
        bail!("files are compared in pairs, got {count} file(s)");
    }
    Ok(())
}

/// Compares `schemas[0]` with `schemas[1]`, `schemas[2]` with `schemas[3]`,
/// and so on.
pub fn compare_schemas<'a>(schemas: &'a [Schema], options: &CompareOptions) -> Result<Comparison<'a>> {
    ensure_pairs(schemas.len())?;

    let pair_count = schemas.len() / 2;
    let mut cumulative = (pair_count > 1).then(|| SchemaDiff::new(CUMULATIVE_NAME));
    let mut pairs = Vec::with_capacity(pair_count);

    for pair in schemas.chunks_exact(2) {
        let (schema1, schema2) = (&pair[0], &pair[1]);
        let mut diff = SchemaDiff::new(format!("{} vs {}", schema1.id, schema2.id))
            .with_kinds_ignore(options.kinds_ignore.iter().cloned());
        diff.compare_schemas(schema1, schema2, &options.criteria, cumulative.as_mut());

        let totals = diff.totals();
        tracing::debug!(
            comparison = %diff.basename,
            tp = totals.true_positives,
            fp = totals.false_positives,
            fn_ = totals.false_negatives,
            "compared pair"
        );
        pairs.push(diff);
    }

    Ok(Comparison { pairs, cumulative })
}

// ========== Output Formatting ==========

/// Text reports, one block per diff, separated by blank lines.
pub fn format_comparison(comparison: &Comparison<'_>, criteria: &MatchCriteria) -> String {
    comparison
        .diffs()
        .map(|diff| diff.report(criteria))
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub start_delta: f64,
    pub end_delta: f64,
    pub check_tag: bool,
    pub kinds_ignore: Vec<String>,
    pub comparisons: Vec<JsonComparison>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cumulative: Option<JsonComparison>,
}

#[derive(Debug, Serialize)]
pub struct JsonComparison {
    pub name: String,
    #[serde(flatten)]
    pub breakdown: KindBreakdown,
}

impl From<&SchemaDiff<'_>> for JsonComparison {
    fn from(diff: &SchemaDiff<'_>) -> Self {
        Self {
            name: diff.basename.clone(),
            breakdown: diff.breakdown(),
        }
    }
}

/// Formats the comparison as JSON.
pub fn format_comparison_json(comparison: &Comparison<'_>, options: &CompareOptions) -> Result<String> {
    let report = JsonReport {
        start_delta: options.criteria.start_delta(),
        end_delta: options.criteria.end_delta(),
        check_tag: options.criteria.check_tag,
        kinds_ignore: options.kinds_ignore.clone(),
        comparisons: comparison.pairs.iter().map(JsonComparison::from).collect(),
        cumulative: comparison.cumulative.as_ref().map(JsonComparison::from),
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

// ========== Public Interface ==========

/// Runs the compare command.
pub fn run(files: &[PathBuf], options: &CompareOptions) -> Result<()> {
    ensure_pairs(files.len())?;
    let schemas = load_schemas(files)?;
    let comparison = compare_schemas(&schemas, options)?;

    if options.json {
        let output = format_comparison_json(&comparison, options)?;
        println!("{output}");
    } else {
        let output = format_comparison(&comparison, &options.criteria);
        print!("{output}");
    }

    Ok(())
}
