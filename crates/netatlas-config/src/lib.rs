//! Shared configuration for the netatlas CLI.
//!
//! TOML file + environment loading, backend connection settings, and the
//! default area catalog. The CLI adds flag-aware overrides on top.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netatlas_core::{Area, AreaCatalog};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: Backend,

    /// Seconds between periodic diagram refreshes. Zero disables the
    /// periodic refresh.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,

    /// Whether area nodes are rendered initially.
    #[serde(default = "default_show_areas")]
    pub show_areas: bool,

    /// Directory for diagram snapshots. Defaults to the platform data
    /// directory.
    pub data_dir: Option<PathBuf>,

    /// The area catalog. Defaults to the built-in site plan.
    #[serde(default = "default_areas")]
    pub areas: Vec<Area>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            refresh_interval: default_refresh_interval(),
            show_areas: default_show_areas(),
            data_dir: None,
            areas: default_areas(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Backend {
    /// Backend base URL.
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8080".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_refresh_interval() -> u64 {
    30
}
fn default_show_areas() -> bool {
    true
}

impl Config {
    /// The area catalog as configured.
    pub fn catalog(&self) -> AreaCatalog {
        AreaCatalog::new(self.areas.clone())
    }

    /// Parse and validate the backend URL.
    pub fn backend_url(&self) -> Result<url::Url, ConfigError> {
        self.backend
            .url
            .parse()
            .map_err(|_| ConfigError::Validation {
                field: "backend.url".into(),
                reason: format!("invalid URL: {}", self.backend.url),
            })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval)
    }

    /// Resolve the snapshot directory: explicit config wins, then the
    /// platform data directory.
    pub fn resolve_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(data_path)
    }
}

// ── Config file paths ───────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "netatlas", "netatlas").map_or_else(
        || {
            let mut p = dirs_fallback(".config");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Resolve the data directory for diagram snapshots.
pub fn data_path() -> PathBuf {
    ProjectDirs::from("com", "netatlas", "netatlas").map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn dirs_fallback(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("netatlas");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Env vars use the `NETATLAS_` prefix with `__` as the nesting
/// separator, e.g. `NETATLAS_BACKEND__URL`.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("NETATLAS_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning the defaults if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Default area catalog ────────────────────────────────────────────

/// The built-in site plan: three rows of areas laid out left to right.
pub fn default_areas() -> Vec<Area> {
    fn area(id: &str, name: &str, color: &str, x: f64, y: f64, width: f64, height: f64) -> Area {
        Area {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            x,
            y,
            width,
            height,
        }
    }

    vec![
        // First row
        area("PGCIL", "PGCIL", "#1d4ed8", 20.0, 20.0, 300.0, 250.0),
        area("sophos", "Sophos", "#dc2626", 340.0, 20.0, 200.0, 180.0),
        area("hop-bung", "Hop Bung", "#047857", 560.0, 20.0, 200.0, 180.0),
        area("ssc-build", "SSC Build", "#7c2d12", 780.0, 20.0, 300.0, 250.0),
        // Second row
        area("plant-area", "Plant Area", "#7c3aed", 20.0, 290.0, 500.0, 350.0),
        area("it-dept", "IT Dept", "#ea580c", 540.0, 290.0, 400.0, 300.0),
        area("admin-build", "Admin Build", "#be185d", 960.0, 290.0, 450.0, 320.0),
        // Third row
        area("sankalp-2", "Sankalp #2", "#059669", 20.0, 660.0, 400.0, 300.0),
        area("township", "Township", "#0369a1", 440.0, 660.0, 350.0, 280.0),
        area("et-hostel", "ET-Hostel", "#7c2d12", 810.0, 660.0, 320.0, 260.0),
        area("rli-office", "RLI Office", "#4338ca", 1150.0, 660.0, 500.0, 350.0),
    ]
}
