//! Configuration discovery and typed accessors.
//!
//! Configuration lives in an INI file with a single `[hipchat]` section:
//!
//! ```ini
//! [hipchat]
//! access_token = abc123
//! base_url = https://hipchat.example.com/
//! ```
//!
//! Three locations are searched in order and the first readable file wins.
//! Files are never merged.

use std::path::{Path, PathBuf};

use ini::{Ini, ParseError, ParseOption};
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Application name used to derive the candidate paths.
pub const APP_NAME: &str = "hipcat";

/// Base URL used when `hipchat.base_url` is not configured.
pub const DEFAULT_BASE_URL: &str = "https://www.hipchat.com";

const SECTION: &str = "hipchat";
const FILE_NAME: &str = "config.ini";

/// Ordered list of configuration file candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    paths: Vec<PathBuf>,
}

impl ConfigPaths {
    /// Builds the candidate list for `app_name` from explicit directories.
    ///
    /// The order is:
    ///
    /// 1. `<home>/.<app_name>.ini`
    /// 2. `<config_dir>/<app_name>/config.ini`
    /// 3. `<home>/.<app_name>/config.ini`
    ///
    /// When `config_dir` is `None`, `<home>/.config` is used.
    #[must_use]
    pub fn new(home: &Path, config_dir: Option<&Path>, app_name: &str) -> Self {
        let config_dir = config_dir.map_or_else(|| home.join(".config"), Path::to_path_buf);

        Self {
            paths: vec![
                home.join(format!(".{app_name}.ini")),
                config_dir.join(app_name).join(FILE_NAME),
                home.join(format!(".{app_name}")).join(FILE_NAME),
            ],
        }
    }

    /// Builds the candidate list from the platform's home and config directories.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHomeDirectory`] if the home directory cannot be
    /// determined.
    pub fn discover(app_name: &str) -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        let config_dir = dirs::config_dir();
        Ok(Self::new(&home, config_dir.as_deref(), app_name))
    }

    /// Wraps an explicit list of candidates.
    #[must_use]
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// The candidates in priority order.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    ini: Ini,
}

impl Config {
    /// Loads configuration from the default candidate paths.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from_paths`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_paths(&ConfigPaths::discover(APP_NAME)?)
    }

    /// Loads the first readable candidate.
    ///
    /// Candidates that are missing or unreadable are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if a readable candidate is not valid INI,
    /// and [`ConfigError::NotFound`] listing every candidate if none could be
    /// read.
    pub fn load_from_paths(candidates: &ConfigPaths) -> Result<Self, ConfigError> {
        for path in candidates.paths() {
            let text = match std::fs::read_to_string(path) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    debug!(path = %path.display(), "config candidate not present");
                    continue;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable config candidate");
                    continue;
                }
            };

            let config = Self::from_ini_str(&text).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "loaded configuration");
            return Ok(config);
        }

        Err(ConfigError::NotFound {
            paths: candidates.paths().to_vec(),
        })
    }

    /// Parses configuration from INI text.
    ///
    /// Values are kept as written: quotes and backslashes are not interpreted.
    ///
    /// # Errors
    ///
    /// Returns the parser diagnostic if `text` is not valid INI.
    pub fn from_ini_str(text: &str) -> Result<Self, ParseError> {
        let options = ParseOption {
            enabled_quote: false,
            enabled_escape: false,
            ..ParseOption::default()
        };
        let ini = Ini::load_from_str_opt(text, options)?;
        Ok(Self { ini })
    }

    /// The bearer token from `hipchat.access_token`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAccessToken`] if the key is absent or empty.
    pub fn access_token(&self) -> Result<&str, ConfigError> {
        self.get("access_token")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingAccessToken)
    }

    /// The API base URL without trailing slashes.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.get("base_url")
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    /// Looks up `key` in `[hipchat]`. Key names are case-insensitive, the
    /// section name is not. The last matching entry wins.
    fn get(&self, key: &str) -> Option<&str> {
        self.ini
            .section(Some(SECTION))?
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
            .last()
    }
}
