//! Configuration loading and management.

use std::path::{Path, PathBuf};

use agree_core::{MatchCriteria, ValidationError};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Default comparison settings, overridden by command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum distance between start offsets of matched labels.
    pub start_delta: f64,
    /// Maximum distance between end offsets of matched labels.
    pub end_delta: f64,
    /// Whether tags must match as well as kinds.
    pub check_tag: bool,
    /// Kinds left out of every comparison.
    pub kinds_ignore: Vec<String>,
}

impl Config {
    /// Loads configuration from default locations, then optionally from a
    /// specific file, then from the environment.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // AGREE_START_DELTA, AGREE_CHECK_TAG, ...
        figment = figment.merge(Env::prefixed("AGREE_"));

        figment.extract()
    }

    /// Matching criteria for `compare`: kinds always checked, the rest from
    /// the configuration.
    pub fn criteria(&self) -> Result<MatchCriteria, ValidationError> {
        self.with_deltas(MatchCriteria::default().with_check_tag(self.check_tag))
    }

    /// Matching criteria for `segmentation`: positions only.
    pub fn positional_criteria(&self) -> Result<MatchCriteria, ValidationError> {
        self.with_deltas(MatchCriteria::positional())
    }

    fn with_deltas(&self, criteria: MatchCriteria) -> Result<MatchCriteria, ValidationError> {
        criteria
            .with_start_delta(self.start_delta)?
            .with_end_delta(self.end_delta)
    }
}

/// Returns the platform-specific config directory for agree.
///
/// On Linux: `~/.config/agree`
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("agree"))
}
