//! Configuration types for nmdc.
//!
//! [`Config::load`] reads `~/.config/nmdc/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then applies `NMDC_`-prefixed
//! environment overrides (`NMDC_SERVER__PORT=9000`). [`Config::defaults`]
//! returns the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 3434

[ontology]
selector       = "builtin:envo"
ecosystem_root = "ENVO:00000428"
field          = "env_broad_scale"
eager          = true

[portal]
base_url     = "https://data-dev.microbiomedata.org/api"
offset       = 0
limit        = 10
timeout_secs = 30
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub ontology: OntologySettings,
    #[serde(default)]
    pub portal: PortalSettings,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3434 }

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// `[ontology]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OntologySettings {
    /// Provider selector, e.g. `builtin:envo` or `obo:/data/envo.obo`.
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Root whose is-a descendants are eligible for normalization.
    #[serde(default = "default_ecosystem_root")]
    pub ecosystem_root: String,
    /// Query field whose values get normalized.
    #[serde(default = "default_field")]
    pub field: String,
    /// Build the provider at startup instead of on the first request.
    #[serde(default = "default_eager")]
    pub eager: bool,
}

fn default_selector() -> String { "builtin:envo".to_string() }
fn default_ecosystem_root() -> String { crate::normalizer::ECOSYSTEM_ROOT.to_string() }
fn default_field() -> String { crate::normalizer::ENV_BROAD_SCALE.to_string() }
fn default_eager() -> bool { true }

impl Default for OntologySettings {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            ecosystem_root: default_ecosystem_root(),
            field: default_field(),
            eager: default_eager(),
        }
    }
}

/// `[portal]` section, the external NMDC search API.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String { "https://data-dev.microbiomedata.org/api".to_string() }
fn default_limit() -> u32 { 10 }
fn default_timeout_secs() -> u64 { 30 }

impl Default for PortalSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            offset: 0,
            limit: default_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/nmdc/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit file, layered on top of the built-in defaults.
    /// The file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(true))
            .add_source(
                config::Environment::with_prefix("NMDC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// `host:port` the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("nmdc")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
