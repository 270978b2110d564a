//! Configuration management for eksirss.
//!
//! Configuration is read from `~/.config/eksirss/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base URL of the dictionary site entries are scraped from.
pub const DEFAULT_BASE_URL: &str = "http://sozluk.sourtimes.org";

/// Display name appended to every channel description.
pub const DEFAULT_SITE_NAME: &str = "Ekşi Sözlük";

/// Cached feeds stay fresh for three hours.
pub const DEFAULT_TTL_SECS: u64 = 3 * 60 * 60;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
}

/// HTTP front-end settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to (default: 127.0.0.1:3000)
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

/// Settings for talking to the dictionary site.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Site root, without a trailing slash
    pub base_url: String,

    /// Name used in channel descriptions
    pub site_name: String,

    /// Request timeout in seconds (default: 20)
    pub timeout_secs: u64,

    /// User agent string to use
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            timeout_secs: 20,
            user_agent: "Mozilla/5.0 (Windows NT 6.1) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/41.0.2228.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// On-disk feed cache settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one `.xml` file per search term.
    /// Defaults to the platform cache directory.
    pub dir: Option<PathBuf>,

    /// Freshness window in seconds (default: 10800)
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Resolve the cache directory, falling back to `~/.cache/eksirss`.
    pub fn resolve_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.dir {
            Some(dir) => Ok(dir.clone()),
            None => {
                let cache_dir = dirs::cache_dir().ok_or(ConfigError::NoCacheDir)?;
                Ok(cache_dir.join("eksirss"))
            }
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/eksirss/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("eksirss").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# eksirss configuration

[server]
# Address the feed server listens on
bind = "127.0.0.1:3000"

[upstream]
# Dictionary site the entries are scraped from
base_url = "http://sozluk.sourtimes.org"

# Appended to channel descriptions: "<title> on <site_name>"
site_name = "Ekşi Sözlük"

# Give up on the upstream request after this many seconds
timeout_secs = 20

[cache]
# Where rendered feeds are stored (default: platform cache dir + /eksirss)
# dir = "/var/cache/eksirss"

# How long a rendered feed is served before it is refetched (seconds)
ttl_secs = 10800
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Could not determine cache directory")]
    NoCacheDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
