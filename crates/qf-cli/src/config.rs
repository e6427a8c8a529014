//! Configuration loading and management.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use qf_core::FlattenConfig;

/// Zone in which validity dates are turned into instants unless configured otherwise.
const DEFAULT_TIME_ZONE: &str = "Europe/Helsinki";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which quay versions are flattened and which count as drafts.
    pub flatten: FlattenConfig,

    /// IANA time zone in which validity dates are turned into instants.
    pub time_zone: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flatten: FlattenConfig::default(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
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

        // Load from environment variables (QF_*, nested with QF_FLATTEN__MAX_PRIORITY)
        figment = figment.merge(Env::prefixed("QF_").split("__"));

        figment.extract()
    }

    /// Looks up the configured time zone.
    pub fn zone(&self) -> anyhow::Result<Tz> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|err| anyhow::anyhow!("invalid time_zone {}: {err}", self.time_zone))
    }
}

/// Returns the platform-specific config directory for qf.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("qf"))
}
