//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use dtm_core::{DetectorTable, MergeOptions, PatternTable, TimezoneTable};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration: option flags plus the locale pattern tables.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pipeline switches; CLI flags are OR-ed on top.
    pub options: MergeOptions,

    /// Arbitration and refinement patterns.
    pub patterns: PatternTable,

    /// Detector patterns per category.
    pub detectors: DetectorTable,

    /// Words stripped before detection in preview mode.
    pub superfluous_words: Vec<String>,

    /// Spelled-out numbers accepted after a time ("to four").
    pub number_words: Vec<String>,

    /// Timezone detection, used in preview mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<TimezoneTable>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("options", &self.options)
            .field("detectors", &self.detectors.len())
            .field("superfluous_words", &self.superfluous_words.len())
            .field("number_words", &self.number_words.len())
            .field("timezone", &self.timezone.is_some())
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Environment overrides (DTM_OPTIONS__CALENDAR_MODE=true)
        figment = figment.merge(Env::prefixed("DTM_").split("__"));

        figment.extract()
    }
}

/// Returns the platform-specific config directory for dtm.
///
/// On Linux: `~/.config/dtm`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dtm"))
}
