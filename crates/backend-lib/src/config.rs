// ============================
// backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Prefix of environment overrides, e.g. `MERGINGTON_BIND_ADDR`
pub const ENV_PREFIX: &str = "MERGINGTON_";

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Log filter directive, e.g. `info` or `backend_lib=debug`
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Directory served under `/static`
    pub static_dir: Option<PathBuf>,
    /// JSON seed file; the built-in activities are used when unset
    pub seed_file: Option<PathBuf>,
    /// Reject sign-ups once an activity reaches `max_participants`
    pub enforce_capacity: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            static_dir: Some(PathBuf::from("static")),
            seed_file: None,
            enforce_capacity: false,
        }
    }
}

impl Settings {
    /// Defaults, then `config.toml` if present, then `MERGINGTON_*` variables
    pub fn load() -> Result<Self> {
        let settings = Self::figment()
            .merge(Toml::file(DEFAULT_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;

        Ok(settings)
    }

    /// Like [`Settings::load`] but with an explicit config file, which must exist
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("config file not found: {}", path.display());
        }

        let settings = Self::figment()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;

        Ok(settings)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<()> {
        if let Err(e) = EnvFilter::try_new(&self.log_level) {
            bail!("invalid log level {:?}: {e}", self.log_level);
        }

        if self.bind_addr.port() == 0 {
            bail!("bind address must name a port");
        }

        Ok(())
    }
}
