//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.threadline/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::core::feed::Author;
use crate::core::thread::DEFAULT_MAX_DEPTH;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ThreadlineConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub max_depth: Option<usize>,
    pub fixture: Option<PathBuf>,
}

/// The signed-in user. Leave `user_id` out to comment as a guest only.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct IdentityConfig {
    pub user_id: Option<Uuid>,
    pub fname: Option<String>,
    pub lname: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub user_id: Uuid,
    pub author: Author,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub max_depth: usize,
    /// `None` = embedded fixture.
    pub fixture: Option<PathBuf>,
    pub identity: Option<Identity>,
    /// `None` = log submissions instead of sending them.
    pub endpoint_url: Option<String>,
    pub submit_timeout_secs: u64,
}

/// Values given on the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub max_depth: Option<usize>,
    pub fixture: Option<PathBuf>,
    pub endpoint: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.threadline/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".threadline").join("config.toml"))
}

/// Load config from `~/.threadline/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ThreadlineConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ThreadlineConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ThreadlineConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ThreadlineConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ThreadlineConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ThreadlineConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Threadline Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# max_depth = 3                      # Deepest reply level that is drawn
# fixture = "/path/to/posts.json"    # Omit to use the bundled posts

# [identity]
# user_id = "dace4d2e-d909-4f9e-aed0-2ec185eed08e"   # Omit to comment as a guest
# fname = "Cynthia"
# lname = "Adaji"

# [endpoint]
# url = "http://localhost:8080/api"  # Or set THREADLINE_ENDPOINT_URL; omit to only log
# timeout_secs = 10
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ThreadlineConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Max depth: CLI → env → config → default
    let max_depth = cli
        .max_depth
        .or_else(|| env_var("THREADLINE_MAX_DEPTH").and_then(|v| v.parse().ok()))
        .or(config.general.max_depth)
        .unwrap_or(DEFAULT_MAX_DEPTH);

    // Fixture: CLI → env → config → embedded
    let fixture = cli
        .fixture
        .clone()
        .or_else(|| env_var("THREADLINE_FIXTURE").map(PathBuf::from))
        .or_else(|| config.general.fixture.clone());

    // Endpoint URL: CLI → env → config → logging only
    let endpoint_url = cli
        .endpoint
        .clone()
        .or_else(|| env_var("THREADLINE_ENDPOINT_URL"))
        .or_else(|| config.endpoint.url.clone());

    ResolvedConfig {
        max_depth,
        fixture,
        identity: resolve_identity(&config.identity),
        endpoint_url,
        submit_timeout_secs: config
            .endpoint
            .timeout_secs
            .unwrap_or(DEFAULT_SUBMIT_TIMEOUT_SECS),
    }
}

/// An identity needs a user id; the name falls back to "Me".
fn resolve_identity(config: &IdentityConfig) -> Option<Identity> {
    let user_id = config.user_id?;
    let fname = config
        .fname
        .clone()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| {
            warn!("identity.user_id set without identity.fname, using \"Me\"");
            "Me".to_string()
        });
    Some(Identity {
        user_id,
        author: Author {
            fname,
            lname: config.lname.clone(),
            avatar_url: None,
        },
    })
}
