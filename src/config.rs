//! Configuration for kiloview.
//!
//! Settings are read from `~/.kiloview/config.toml`. Every key is optional:
//!
//! ```toml
//! [view]
//! # Marker drawn on rows past the end of the file
//! row_marker = "~"
//!
//! [log]
//! # tracing filter used when RUST_LOG is not set
//! level = "info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub view: ViewConfig,
    pub log: LogConfig,
}

/// Viewport drawing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub row_marker: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            row_marker: "~".to_string(),
        }
    }
}

/// Log settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// A missing file gives defaults; a broken one gives defaults plus the parse error.
    pub fn load() -> (Self, Option<String>) {
        match Self::config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => (config, None),
                Err(e) => (Self::default(), Some(e)),
            },
            _ => (Self::default(), None),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::parse(&content).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get config file path
    fn config_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.toml"))
    }
}

/// `~/.kiloview`, home of the config and log files
pub fn data_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".kiloview"))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.view.row_marker, "~");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse("[view]\nrow_marker = \".\"\n").unwrap();
        assert_eq!(config.view.row_marker, ".");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[log\nlevel = 3").unwrap();
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.starts_with("Failed to parse"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[log]\nlevel = \"debug\"\n").unwrap();
        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.log.level, "debug");
    }
}
