//! Player configuration

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Start playing a newly selected episode as soon as it is loaded (default: true)
    #[serde(default = "default_autoplay")]
    pub autoplay: bool,

    /// Initial loop preference (default: false)
    #[serde(default)]
    pub looping: bool,

    /// Initial shuffle preference (default: false)
    #[serde(default)]
    pub shuffling: bool,

    /// Seed for the shuffle RNG; `None` draws from OS entropy
    #[serde(default)]
    pub shuffle_seed: Option<u64>,
}

impl PlayerConfig {
    /// Load configuration from an optional TOML file and the environment
    ///
    /// Environment variables are prefixed with `PODCASTR_`
    /// (e.g. `PODCASTR_AUTOPLAY=false`) and override the file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(PlaybackError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("PODCASTR").try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;
        tracing::debug!("Player config loaded: {:?}", config);
        Ok(config)
    }
}

fn default_autoplay() -> bool {
    true
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            autoplay: default_autoplay(),
            looping: false,
            shuffling: false,
            shuffle_seed: None,
        }
    }
}
