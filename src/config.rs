//! This module defines configuration structures, loading logic, and provenance tracking for docreflow.
//! Configuration is read from TOML files with two sections, `[format]` for the
//! reflow engine and `[quick-format]` for the rule pipeline.

use crate::options::{FormatOptions, FormatOverrides};
use crate::rules::{FormatRules, FormatRulesOverrides};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Project configuration file names, in precedence order
pub const CONFIG_FILES: &[&str] = &[".docreflow.toml", "docreflow.toml", ".config/docreflow.toml"];

/// File names looked up in the user configuration directory
const USER_CONFIG_FILES: &[&str] = &[".docreflow.toml", "docreflow.toml"];

/// Prevent infinite traversal
const MAX_DEPTH: usize = 100;

/// Contents of a docreflow configuration file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Options for the reflow engine
    pub format: FormatOverrides,
    /// Rules enabled for quick formatting
    #[serde(alias = "quick_format")]
    pub quick_format: FormatRulesOverrides,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Layer `other` on top of `self`; values set in `other` win
    pub fn overlay(&mut self, other: &Config) {
        self.format.overlay(&other.format);
        self.quick_format.overlay(&other.quick_format);
    }

    /// Engine options with this configuration applied to the defaults
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions::default().merge(&self.format)
    }

    /// Quick-format rules with this configuration applied to the defaults
    pub fn format_rules(&self) -> FormatRules {
        FormatRules::default().merge(&self.quick_format)
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Configuration file already exists
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },
}

/// Where a layer of configuration came from
///
/// Later variants take precedence over earlier ones:
/// - Default: built-in defaults
/// - UserConfig: `~/.config/docreflow/docreflow.toml`
/// - ProjectConfig: `.docreflow.toml` found in or above the working directory
/// - Cli: command-line flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in default configuration
    Default,
    /// User-level configuration
    UserConfig,
    /// Project-level configuration, discovered or passed with `--config`
    ProjectConfig,
    /// Command-line flags (highest precedence)
    Cli,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::UserConfig => write!(f, "user config"),
            Self::ProjectConfig => write!(f, "project config"),
            Self::Cli => write!(f, "cli"),
        }
    }
}

/// One configuration layer that contributed to the final value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLayer {
    pub source: ConfigSource,
    /// File the layer was read from, if any
    pub path: Option<PathBuf>,
    pub config: Config,
}

/// Merged configuration together with the layers it was built from
#[derive(Debug, Clone, Default)]
pub struct SourcedConfig {
    pub config: Config,
    pub layers: Vec<ConfigLayer>,
}

impl SourcedConfig {
    /// Load and merge configurations from files and CLI overrides
    pub fn load(config_path: Option<&Path>, cli_overrides: Option<&Config>) -> Result<Self, ConfigError> {
        Self::load_with_discovery(config_path, cli_overrides, false, None)
    }

    /// Load configuration, optionally skipping automatic discovery (`--isolated`)
    ///
    /// Project discovery starts at `discovery_dir`, or the working directory
    /// when none is given.
    pub fn load_with_discovery(
        config_path: Option<&Path>,
        cli_overrides: Option<&Config>,
        skip_auto_discovery: bool,
        discovery_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let start_dir = discovery_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok());
        log::debug!("[docreflow-config] Discovery starts at: {start_dir:?}");
        let user_dir = if skip_auto_discovery {
            None
        } else {
            user_config_dir()
        };
        Self::load_with_discovery_impl(
            config_path,
            cli_overrides,
            skip_auto_discovery,
            start_dir.as_deref(),
            user_dir.as_deref(),
        )
    }

    /// Internal implementation that accepts the search directories for testing
    #[doc(hidden)]
    pub fn load_with_discovery_impl(
        config_path: Option<&Path>,
        cli_overrides: Option<&Config>,
        skip_auto_discovery: bool,
        start_dir: Option<&Path>,
        user_config_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut sourced = SourcedConfig::default();

        // 1. User configuration is the base layer project configs build upon
        if !skip_auto_discovery
            && let Some(path) = user_config_dir.and_then(user_configuration_path_impl)
        {
            sourced.push_file(ConfigSource::UserConfig, &path)?;
        }

        // 2. Explicit config path, or the first project config found walking up
        if let Some(path) = config_path {
            log::debug!("[docreflow-config] Explicit config_path provided: {}", path.display());
            sourced.push_file(ConfigSource::ProjectConfig, path)?;
        } else if skip_auto_discovery {
            log::debug!("[docreflow-config] Skipping auto-discovery due to --isolated flag");
        } else if let Some(path) = start_dir.and_then(discover_config_upward) {
            sourced.push_file(ConfigSource::ProjectConfig, &path)?;
        }

        // 3. Command-line flags
        if let Some(cli) = cli_overrides {
            sourced.push(ConfigSource::Cli, None, *cli);
        }

        Ok(sourced)
    }

    fn push_file(&mut self, source: ConfigSource, path: &Path) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            source: e,
            path: path.display().to_string(),
        })?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;
        log::debug!("[docreflow-config] Loaded {source} from {}", path.display());
        self.push(source, Some(path.to_path_buf()), config);
        Ok(())
    }

    fn push(&mut self, source: ConfigSource, path: Option<PathBuf>, config: Config) {
        self.config.overlay(&config);
        self.layers.push(ConfigLayer { source, path, config });
    }

    /// Files that contributed to this configuration, in load order
    pub fn loaded_files(&self) -> Vec<&Path> {
        self.layers.iter().filter_map(|layer| layer.path.as_deref()).collect()
    }

    /// The highest-precedence source that set the `[format]` key `key`
    pub fn format_source(&self, key: &str) -> ConfigSource {
        self.layers
            .iter()
            .rev()
            .find(|layer| format_key_is_set(&layer.config.format, key))
            .map_or(ConfigSource::Default, |layer| layer.source)
    }

    /// The highest-precedence source that set the `[quick-format]` key `key`
    pub fn quick_format_source(&self, key: &str) -> ConfigSource {
        self.layers
            .iter()
            .rev()
            .find(|layer| rules_key_is_set(&layer.config.quick_format, key))
            .map_or(ConfigSource::Default, |layer| layer.source)
    }
}

impl From<SourcedConfig> for Config {
    fn from(sourced: SourcedConfig) -> Self {
        sourced.config
    }
}

fn format_key_is_set(format: &FormatOverrides, key: &str) -> bool {
    match normalize_key(key).as_str() {
        "line-width" => format.line_width.is_some(),
        "preserve-paragraphs" => format.preserve_paragraphs.is_some(),
        "remove-extra-spaces" => format.remove_extra_spaces.is_some(),
        "normalize-newlines" => format.normalize_newlines.is_some(),
        "smart-quotes" => format.smart_quotes.is_some(),
        "normalize-unicode" => format.normalize_unicode.is_some(),
        "preserve-indentation" => format.preserve_indentation.is_some(),
        "language-hint" | "language" => format.language_hint.is_some(),
        _ => false,
    }
}

fn rules_key_is_set(rules: &FormatRulesOverrides, key: &str) -> bool {
    match normalize_key(key).as_str() {
        "remove-extra-spaces" => rules.remove_extra_spaces.is_some(),
        "normalize-newlines" => rules.normalize_newlines.is_some(),
        "smart-quotes" => rules.smart_quotes.is_some(),
        "capitalize-first-letter" => rules.capitalize_first_letter.is_some(),
        "fix-punctuation" => rules.fix_punctuation.is_some(),
        "remove-empty-lines" => rules.remove_empty_lines.is_some(),
        "trim-lines" => rules.trim_lines.is_some(),
        "line-width" => rules.line_width.is_some(),
        _ => false,
    }
}

/// Normalize configuration keys to kebab-case
pub fn normalize_key(key: &str) -> String {
    key.to_ascii_lowercase().replace('_', "-")
}

/// Discover a configuration file by walking up from `start_dir`
///
/// The search stops at the first directory containing `.git`.
pub fn discover_config_upward(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = start_dir.to_path_buf();

    for _ in 0..MAX_DEPTH {
        log::debug!("[docreflow-config] Searching for config in: {}", current_dir.display());

        for config_name in CONFIG_FILES {
            let config_path = current_dir.join(config_name);
            if config_path.is_file() {
                log::debug!("[docreflow-config] Found config file: {}", config_path.display());
                return Some(config_path);
            }
        }

        if current_dir.join(".git").exists() {
            log::debug!("[docreflow-config] Stopping at .git directory");
            return None;
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                log::debug!("[docreflow-config] Reached filesystem root");
                return None;
            }
        }
    }

    log::debug!("[docreflow-config] Maximum traversal depth reached");
    None
}

/// Look for a user configuration file under `<config_dir>/docreflow/`
fn user_configuration_path_impl(config_dir: &Path) -> Option<PathBuf> {
    let config_dir = config_dir.join("docreflow");
    log::debug!(
        "[docreflow-config] Checking for user configuration in: {}",
        config_dir.display()
    );

    USER_CONFIG_FILES
        .iter()
        .map(|filename| config_dir.join(filename))
        .find(|path| path.is_file())
}

/// Platform-specific user configuration directory
#[cfg(feature = "native")]
fn user_config_dir() -> Option<PathBuf> {
    use etcetera::{BaseStrategy, choose_base_strategy};

    match choose_base_strategy() {
        Ok(strategy) => Some(strategy.config_dir()),
        Err(e) => {
            log::debug!("[docreflow-config] Failed to determine user config directory: {e}");
            None
        }
    }
}

/// Stub for WASM builds - user config not supported
#[cfg(not(feature = "native"))]
fn user_config_dir() -> Option<PathBuf> {
    None
}

const DEFAULT_CONFIG: &str = r#"# docreflow configuration file

# Options for `docreflow format` and `docreflow parse`
[format]
# Maximum characters per line
line-width = 80

# Keep blank-line separated paragraphs apart
preserve-paragraphs = true

# Collapse repeated spaces and tabs
remove-extra-spaces = true

# Convert CRLF/CR to LF and allow at most one blank line
normalize-newlines = true

# Replace curly quotes with straight quotes
smart-quotes = true

# Compose characters to Unicode NFC
normalize-unicode = true

# Indent wrapped lines like the first line of their paragraph
preserve-indentation = true

# Language used for line breaking: "auto", "vi" or "en"
language-hint = "auto"

# Rules for `docreflow quick` (all disabled unless enabled here or on the command line)
[quick-format]
# remove-extra-spaces = true
# normalize-newlines = true
# smart-quotes = true
# capitalize-first-letter = true
# fix-punctuation = true
# remove-empty-lines = true
# trim-lines = true
# line-width = 80  # 0 disables wrapping
"#;

/// Content written by [`create_default_config`]
pub fn default_config_content() -> &'static str {
    DEFAULT_CONFIG
}

/// Create a default configuration file at the specified path
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Err(ConfigError::FileExists {
            path: path.display().to_string(),
        });
    }

    fs::write(path, DEFAULT_CONFIG).map_err(|err| ConfigError::IoError {
        source: err,
        path: path.display().to_string(),
    })
}

/// JSON schema describing the configuration file
pub fn config_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}
