use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::FormatKind;

/// Service configuration. Every field has a default so a missing or partial
/// config file is fine; the values are passed into the extractor at
/// construction, never looked up ambiently.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server listens on.
    pub bind: String,
    /// Videos longer than this (seconds) are rejected before any caption fetch.
    pub max_video_duration: u64,
    /// Caption language; there is no silent fallback to other languages.
    pub default_lang: String,
    /// Caption wire formats in selection preference order.
    pub format_preference: Vec<FormatKind>,
    /// Timeout (seconds) applied to every platform request.
    pub request_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            max_video_duration: 7200,
            default_lang: "en".to_string(),
            format_preference: vec![FormatKind::Vtt, FormatKind::Json3, FormatKind::Srv],
            request_timeout: 15,
        }
    }
}

impl Config {
    /// Load config from an explicit path (hard error if unreadable), or from
    /// the default location if it exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = config_path();
                if !p.exists() {
                    debug!("No config file found at {}", p.display());
                    return Ok(Config::default());
                }
                p
            }
        };

        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(&path)
            .wrap_err_with(|| format!("could not read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("could not parse config file {}", path.display()))?;
        Ok(config)
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytcaps")
        .join("config.toml")
}
