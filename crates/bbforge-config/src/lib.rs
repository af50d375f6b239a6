//! Configuration management for bbforge.
//!
//! Parses `bbforge.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `cache.dir`
//! - `board.url`
//! - `board.smilies_path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "bbforge.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Cache configuration (directory is a relative string from TOML).
    cache: CacheConfigRaw,
    /// Generated renderer configuration.
    pub renderer: RendererConfig,
    /// Board-level settings used while assembling the configuration.
    pub board: BoardConfig,

    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw cache configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    dir: Option<String>,
    parser_key: Option<String>,
    renderer_key: Option<String>,
}

/// Resolved cache configuration with an absolute directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Directory holding generated renderer files.
    pub dir: PathBuf,
    /// Key under which the compiled parser is stored.
    pub parser_key: String,
    /// Key under which the renderer record is stored.
    pub renderer_key: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("cache"),
            parser_key: DEFAULT_PARSER_KEY.to_owned(),
            renderer_key: DEFAULT_RENDERER_KEY.to_owned(),
        }
    }
}

const DEFAULT_PARSER_KEY: &str = "_bbforge_parser";
const DEFAULT_RENDERER_KEY: &str = "_bbforge_renderer";

/// Generated renderer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Prefix of every generated renderer class name (and file name).
    pub class_prefix: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            class_prefix: "bbforge_renderer_".to_owned(),
        }
    }
}

/// Board-level settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Public board URL, prepended to `{LOCAL_URL}` tokens.
    pub url: String,
    /// Smilies path relative to the board root.
    pub smilies_path: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost".to_owned(),
            smilies_path: "images/smilies".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`board.url`").
        field: String,
        /// Error message (e.g., "${`BOARD_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `bbforge.toml` in current directory and parents,
    /// falling back to defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }
        match Self::discover_config() {
            Some(discovered) => Self::load_from_file(&discovered),
            None => Ok(Self::default_with_cwd()),
        }
    }

    /// Board URL without trailing slash.
    #[must_use]
    pub fn board_url(&self) -> &str {
        self.board.url.trim_end_matches('/')
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        Self {
            cache: CacheConfigRaw::default(),
            renderer: RendererConfig::default(),
            board: BoardConfig::default(),
            cache_resolved: CacheConfig {
                dir: base.join("cache"),
                ..CacheConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_cache()?;
        self.validate_renderer()?;
        require_non_empty(&self.board.url, "board.url")?;
        require_http_url(&self.board.url, "board.url")?;
        Ok(())
    }

    fn validate_cache(&self) -> Result<(), ConfigError> {
        let cache = &self.cache_resolved;
        require_non_empty(&cache.parser_key, "cache.parser_key")?;
        require_non_empty(&cache.renderer_key, "cache.renderer_key")?;
        if cache.parser_key == cache.renderer_key {
            return Err(ConfigError::Validation(
                "cache.parser_key and cache.renderer_key must differ".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_renderer(&self) -> Result<(), ConfigError> {
        let prefix = &self.renderer.class_prefix;
        require_non_empty(prefix, "renderer.class_prefix")?;
        // The prefix doubles as a glob pattern when tidying the cache dir
        if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ConfigError::Validation(
                "renderer.class_prefix may only contain ASCII letters, digits and '_'".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.cache.dir {
            self.cache.dir = Some(expand::expand_env(dir, "cache.dir")?);
        }
        self.board.url = expand::expand_env(&self.board.url, "board.url")?;
        self.board.smilies_path =
            expand::expand_env(&self.board.smilies_path, "board.smilies_path")?;
        Ok(())
    }

    /// Resolve the cache directory against the config file directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = CacheConfig::default();
        self.cache_resolved = CacheConfig {
            dir: config_dir.join(self.cache.dir.as_deref().unwrap_or("cache")),
            parser_key: self.cache.parser_key.clone().unwrap_or(defaults.parser_key),
            renderer_key: self
                .cache
                .renderer_key
                .clone()
                .unwrap_or(defaults.renderer_key),
        };
    }
}
