//! Configuration management for dochook.
//!
//! Parses `dochook.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [site]
//! docs_dir = "docs"
//! site_dir = "site"
//!
//! [graphviz]
//! command = "dot"
//! timeout_secs = 30
//!
//! [accessibility]
//! lookahead = 10
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.docs_dir`
//! - `site.site_dir`
//! - `graphviz.command`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override markdown source directory.
    pub docs_dir: Option<PathBuf>,
    /// Override rendered site directory.
    pub site_dir: Option<PathBuf>,
    /// Override Graphviz executable.
    pub graphviz_command: Option<String>,
    /// Override Graphviz timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Override resolver lookahead.
    pub lookahead: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dochook.toml";

/// Largest accepted resolver lookahead.
const MAX_LOOKAHEAD: usize = 100;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site layout (paths are relative strings from TOML).
    site: SiteConfigRaw,
    /// Graphviz rendering configuration.
    pub graphviz: GraphvizConfig,
    /// Marker resolution configuration.
    pub accessibility: AccessibilityConfig,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site_resolved: SiteConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw site configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SiteConfigRaw {
    docs_dir: Option<String>,
    site_dir: Option<String>,
}

/// Resolved site layout with absolute paths.
#[derive(Debug, Default)]
pub struct SiteConfig {
    /// Markdown sources.
    pub docs_dir: PathBuf,
    /// Rendered output root. The diagram cache lives under it.
    pub site_dir: PathBuf,
}

/// Graphviz rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GraphvizConfig {
    /// Executable invoked as `<command> -Tsvg`.
    pub command: String,
    /// Seconds before a render is killed.
    pub timeout_secs: u64,
}

impl Default for GraphvizConfig {
    fn default() -> Self {
        Self {
            command: "dot".to_owned(),
            timeout_secs: 30,
        }
    }
}

impl GraphvizConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Marker resolution configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AccessibilityConfig {
    /// Elements inspected after each marker.
    pub lookahead: usize,
}

impl Default for AccessibilityConfig {
    fn default() -> Self {
        Self { lookahead: 10 }
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
        /// Config field path (e.g., "`graphviz.command`").
        field: String,
        /// Error message (e.g., "${`DOT_PATH`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `dochook.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated after overrides.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value is out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(docs_dir) = &settings.docs_dir {
            self.site_resolved.docs_dir.clone_from(docs_dir);
        }
        if let Some(site_dir) = &settings.site_dir {
            self.site_resolved.site_dir.clone_from(site_dir);
        }
        if let Some(command) = &settings.graphviz_command {
            self.graphviz.command.clone_from(command);
        }
        if let Some(timeout_secs) = settings.timeout_secs {
            self.graphviz.timeout_secs = timeout_secs;
        }
        if let Some(lookahead) = settings.lookahead {
            self.accessibility.lookahead = lookahead;
        }
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
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfigRaw::default(),
            graphviz: GraphvizConfig::default(),
            accessibility: AccessibilityConfig::default(),
            site_resolved: SiteConfig {
                docs_dir: base.join("docs"),
                site_dir: base.join("site"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_graphviz()?;
        self.validate_accessibility()?;
        Ok(())
    }

    fn validate_graphviz(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.graphviz.command, "graphviz.command")?;
        if self.graphviz.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "graphviz.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_accessibility(&self) -> Result<(), ConfigError> {
        let lookahead = self.accessibility.lookahead;
        if !(1..=MAX_LOOKAHEAD).contains(&lookahead) {
            return Err(ConfigError::Validation(format!(
                "accessibility.lookahead must be between 1 and {MAX_LOOKAHEAD}"
            )));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.site.docs_dir {
            self.site.docs_dir = Some(expand::expand_env(dir, "site.docs_dir")?);
        }
        if let Some(ref dir) = self.site.site_dir {
            self.site.site_dir = Some(expand::expand_env(dir, "site.site_dir")?);
        }
        self.graphviz.command = expand::expand_env(&self.graphviz.command, "graphviz.command")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.site_resolved = SiteConfig {
            docs_dir: resolve(self.site.docs_dir.as_deref(), "docs"),
            site_dir: resolve(self.site.site_dir.as_deref(), "site"),
        };
    }
}
