//! Command-line argument definitions.

use std::path::PathBuf;

use agree_core::{MatchCriteria, ValidationError, validate_delta};
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Compare analysis schemas.
///
/// Reads label collections from JSON files and measures how well two
/// analyses of the same piece agree.
#[derive(Debug, Parser)]
#[command(name = "agree", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Match labels one to one and report TP/FP/FN statistics per kind.
    ///
    /// Files are read in pairs: the first of each pair is the analysis under
    /// test, the second the reference. With several pairs, a cumulative
    /// report follows the per-pair reports.
    Compare {
        /// Schema files, taken two by two.
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        tolerance: ToleranceArgs,

        /// Require tags to match as well as kinds.
        #[arg(long)]
        check_tag: bool,

        /// Ignore labels of this kind (repeatable).
        #[arg(long = "ignore-kind", value_name = "KIND")]
        ignore_kinds: Vec<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Score over- and under-segmentation with conditional entropies.
    Segmentation {
        /// First schema file.
        left: PathBuf,

        /// Second schema file.
        right: PathBuf,

        /// What a label's class is.
        #[arg(long, value_enum, default_value_t = Affectation::Tag)]
        by: Affectation,

        #[command(flatten)]
        tolerance: ToleranceArgs,

        /// Only pair labels of the same kind.
        #[arg(long)]
        check_kind: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Start and end tolerances; unset values fall back to the configuration.
#[derive(Debug, Clone, Copy, Args)]
pub struct ToleranceArgs {
    /// Maximum distance between start offsets.
    #[arg(long, value_name = "DELTA", value_parser = parse_delta)]
    pub start_delta: Option<f64>,

    /// Maximum distance between end offsets.
    #[arg(long, value_name = "DELTA", value_parser = parse_delta)]
    pub end_delta: Option<f64>,
}

impl ToleranceArgs {
    /// Overrides the tolerances of `criteria` with the ones given on the
    /// command line.
    pub fn apply(self, mut criteria: MatchCriteria) -> Result<MatchCriteria, ValidationError> {
        if let Some(delta) = self.start_delta {
            criteria = criteria.with_start_delta(delta)?;
        }
        if let Some(delta) = self.end_delta {
            criteria = criteria.with_end_delta(delta)?;
        }
        Ok(criteria)
    }
}

/// Parses a tolerance, rejecting negative and NaN values.
fn parse_delta(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("invalid number: {e}"))?;
    validate_delta(value).map_err(|e| e.to_string())
}

/// Label classes used for segmentation scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Affectation {
    Tag,
    Kind,
}

impl Affectation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tag => "tag",
            Self::Kind => "kind",
        }
    }
}
