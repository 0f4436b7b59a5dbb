//! Configuration management for taller.
//!
//! Loads configuration from ${TALLER_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default config template with comments, embedded at compile time.
const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Environment variable that overrides the configured base URL.
pub const BASE_URL_ENV: &str = "TALLER_API_URL";

pub mod paths {
    //! Path resolution for taller configuration and data files.
    //!
    //! TALLER_HOME resolution order:
    //! 1. TALLER_HOME environment variable (if set)
    //! 2. ~/.config/taller (default)

    use std::path::PathBuf;

    /// Returns the taller home directory.
    pub fn taller_home() -> PathBuf {
        if let Ok(home) = std::env::var("TALLER_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".taller"),
            |h| h.join(".config").join("taller"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        taller_home().join("config.toml")
    }

    /// Returns the path to the persisted session file.
    pub fn session_path() -> PathBuf {
        taller_home().join("session.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record service URL
    pub base_url: String,

    /// Per-request timeout in seconds (0 disables)
    pub request_timeout_secs: u32,

    /// Page size for list calls
    pub per_page: u32,
}

impl Config {
    pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8090";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u32 = 30;
    const DEFAULT_PER_PAGE: u32 = 200;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the base URL with precedence: env > config > default.
    ///
    /// Empty values are treated as unset. Trailing slashes are removed.
    pub fn effective_base_url(&self) -> Result<String> {
        let env_url = std::env::var(BASE_URL_ENV).ok();
        resolve_base_url(env_url.as_deref(), Some(&self.base_url))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(u64::from(self.request_timeout_secs)))
        }
    }

    /// Page size for list calls, never zero.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.max(1)
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, DEFAULT_CONFIG_TEMPLATE)
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Uses the embedded template for structure/comments and overwrites its
    /// values with the ones serialized from `Config::default()`.
    pub fn generate() -> Result<String> {
        use toml_edit::{DocumentMut, Item};

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = DEFAULT_CONFIG_TEMPLATE
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        // Overwrite values in place; the template keys keep their comments.
        for (key, value) in generated_doc.as_table() {
            if let Item::Value(v) = value {
                doc[key] = Item::Value(v.clone());
            }
        }

        Ok(doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            per_page: Self::DEFAULT_PER_PAGE,
        }
    }
}

/// Picks the first non-empty candidate (env, then config), falling back to the default.
fn resolve_base_url(env_url: Option<&str>, config_url: Option<&str>) -> Result<String> {
    let chosen = [env_url, config_url]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(Config::DEFAULT_BASE_URL);

    url::Url::parse(chosen).with_context(|| format!("Invalid base URL: {chosen}"))?;
    Ok(chosen.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "http://127.0.0.1:8090");
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "base_url = \"https://pb.example.com\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.base_url, "https://pb.example.com");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.per_page, 200);
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "base_url = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("base_url ="));
        assert!(contents.contains("# Per-request timeout"));
        assert_eq!(Config::load_from(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_generate_keeps_comments_and_defaults() {
        let generated = Config::generate().unwrap();
        assert!(generated.contains("# Record service URL"));
        let parsed: Config = toml::from_str(&generated).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_base_url_env_wins_over_config() {
        let url = resolve_base_url(Some("http://env:9000/"), Some("http://config:8090")).unwrap();
        assert_eq!(url, "http://env:9000");
    }

    #[test]
    fn test_base_url_blank_values_fall_through() {
        let url = resolve_base_url(Some("  "), Some("")).unwrap();
        assert_eq!(url, Config::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_base_url_invalid_is_rejected() {
        assert!(resolve_base_url(None, Some("not a url")).is_err());
    }
}
