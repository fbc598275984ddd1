//! Configuration management for nsite.
//!
//! Parses `nsite.toml` with serde and discovers it in the current directory
//! or its parents. Relative paths are resolved against the directory holding
//! the config file.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `source.database_id`
//! - `source.api_key`

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "nsite.toml";

/// Collection names reserved for the generator.
const RESERVED_COLLECTIONS: [&str; 2] = ["combined", "nav"];

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override snapshot cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Override output directory.
    pub output_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "source")]
    source_raw: SourceConfigRaw,
    #[serde(rename = "export")]
    export_raw: ExportConfigRaw,
    #[serde(rename = "output")]
    output_raw: OutputConfigRaw,
    /// Layout template settings.
    pub layouts: LayoutsConfig,
    /// Collection settings.
    pub collections: CollectionsConfig,

    /// Resolved content source configuration (set after loading).
    #[serde(skip)]
    pub source: SourceConfig,
    /// Resolved debug export configuration (set after loading).
    #[serde(skip)]
    pub export: ExportConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SourceConfigRaw {
    cache_dir: Option<String>,
    database_id: Option<String>,
    api_key: Option<String>,
}

/// Resolved content source configuration.
#[derive(Debug, Default)]
pub struct SourceConfig {
    /// Directory holding the content snapshot.
    pub cache_dir: PathBuf,
    /// CMS database id.
    pub database_id: Option<String>,
    /// CMS API key.
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ExportConfigRaw {
    enabled: bool,
    path: Option<String>,
    pretty: bool,
}

impl Default for ExportConfigRaw {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
            pretty: true,
        }
    }
}

/// Resolved debug export configuration.
#[derive(Debug, Default)]
pub struct ExportConfig {
    /// Whether the content tree is exported after each successful pull.
    pub enabled: bool,
    /// Export file path.
    pub path: PathBuf,
    /// Pretty-print the export.
    pub pretty: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Resolved output configuration.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Directory `collections.json` is written to.
    pub dir: PathBuf,
}

/// How layout tokens become template names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutModeConfig {
    /// Lowercase and hyphenate the token.
    #[default]
    Normalized,
    /// Use the token as entered.
    Verbatim,
}

/// Layout template configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LayoutsConfig {
    /// Template directory prefix.
    pub dir: String,
    /// Template file extension.
    pub extension: String,
    /// Default template name.
    pub default: String,
    /// Token handling.
    pub mode: LayoutModeConfig,
}

impl Default for LayoutsConfig {
    fn default() -> Self {
        Self {
            dir: "layouts".to_owned(),
            extension: "njk".to_owned(),
            default: "base".to_owned(),
            mode: LayoutModeConfig::Normalized,
        }
    }
}

/// Collection configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    /// Fixed collections: name to the route whose sub-pages it lists.
    pub fixed: BTreeMap<String, String>,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            fixed: BTreeMap::from([
                ("portfolio".to_owned(), "/portfolio".to_owned()),
                ("posts".to_owned(), "/posts".to_owned()),
            ]),
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
        /// Config field path (e.g., "`source.api_key`").
        field: String,
        /// Error message (e.g., "${`NOTION_API_KEY`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `nsite.toml` in the current directory and parents, falling back to
    /// defaults relative to the current directory.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// a referenced environment variable is unset, or validation fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(&std::env::current_dir().unwrap_or_default())
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(cache_dir) = &settings.cache_dir {
            self.source.cache_dir.clone_from(cache_dir);
        }
        if let Some(output_dir) = &settings.output_dir {
            self.output.dir.clone_from(output_dir);
        }
    }

    /// Default config with paths relative to `base`.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            source_raw: SourceConfigRaw::default(),
            export_raw: ExportConfigRaw::default(),
            output_raw: OutputConfigRaw::default(),
            layouts: LayoutsConfig::default(),
            collections: CollectionsConfig::default(),
            source: SourceConfig::default(),
            export: ExportConfig::default(),
            output: OutputConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

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
        self.validate_layouts()?;
        self.validate_collections()?;
        Ok(())
    }

    fn validate_layouts(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.layouts.dir, "layouts.dir")?;
        require_non_empty(&self.layouts.extension, "layouts.extension")?;
        require_non_empty(&self.layouts.default, "layouts.default")?;

        let normalized = self
            .layouts
            .default
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-');
        if !normalized {
            return Err(ConfigError::Validation(format!(
                "layouts.default must contain only [a-z0-9_-], got {:?}",
                self.layouts.default
            )));
        }

        Ok(())
    }

    fn validate_collections(&self) -> Result<(), ConfigError> {
        for (name, route) in &self.collections.fixed {
            require_non_empty(name, "collections.fixed name")?;
            if RESERVED_COLLECTIONS.contains(&name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "collections.fixed cannot redefine reserved collection {name:?}"
                )));
            }
            if !route.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "collections.fixed.{name} must start with /, got {route:?}"
                )));
            }
        }
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        expand::expand_opt(&mut self.source_raw.database_id, "source.database_id")?;
        expand::expand_opt(&mut self.source_raw.api_key, "source.api_key")?;
        Ok(())
    }

    /// Resolve relative paths against `config_dir`.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.source = SourceConfig {
            cache_dir: resolve(self.source_raw.cache_dir.as_deref(), "lc"),
            database_id: self.source_raw.database_id.clone(),
            api_key: self.source_raw.api_key.clone(),
        };
        self.export = ExportConfig {
            enabled: self.export_raw.enabled,
            path: resolve(self.export_raw.path.as_deref(), "lc/debug.json"),
            pretty: self.export_raw.pretty,
        };
        self.output = OutputConfig {
            dir: resolve(self.output_raw.dir.as_deref(), "_data"),
        };
    }
}

/// Search for `nsite.toml` in `start` and its parents.
fn discover_config(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
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

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(toml: &str, base: &str) -> Config {
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new(base));
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));

        assert_eq!(config.source.cache_dir, PathBuf::from("/site/lc"));
        assert!(config.export.enabled);
        assert!(config.export.pretty);
        assert_eq!(config.export.path, PathBuf::from("/site/lc/debug.json"));
        assert_eq!(config.output.dir, PathBuf::from("/site/_data"));
        assert_eq!(config.layouts.dir, "layouts");
        assert_eq!(config.layouts.extension, "njk");
        assert_eq!(config.layouts.default, "base");
        assert_eq!(config.layouts.mode, LayoutModeConfig::Normalized);
        assert_eq!(
            config.collections.fixed.keys().collect::<Vec<_>>(),
            vec!["portfolio", "posts"]
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(
            r#"
[source]
cache_dir = "cache"
database_id = "db-1"

[export]
enabled = false
path = "debug/tree.json"
pretty = false

[layouts]
dir = "_includes"
extension = "html"
default = "page"
mode = "verbatim"

[collections]
fixed = { work = "/work" }

[output]
dir = "data"
"#,
            "/project",
        );

        assert_eq!(config.source.cache_dir, PathBuf::from("/project/cache"));
        assert_eq!(config.source.database_id.as_deref(), Some("db-1"));
        assert_eq!(config.source.api_key, None);
        assert!(!config.export.enabled);
        assert!(!config.export.pretty);
        assert_eq!(config.export.path, PathBuf::from("/project/debug/tree.json"));
        assert_eq!(config.layouts.dir, "_includes");
        assert_eq!(config.layouts.mode, LayoutModeConfig::Verbatim);
        assert_eq!(
            config.collections.fixed,
            BTreeMap::from([("work".to_owned(), "/work".to_owned())])
        );
        assert_eq!(config.output.dir, PathBuf::from("/project/data"));
    }

    #[test]
    fn test_parse_unknown_mode_fails() {
        let result: Result<Config, _> = toml::from_str("[layouts]\nmode = \"fancy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_empty_layout_fields() {
        for field in ["dir", "extension", "default"] {
            let config = parse(&format!("[layouts]\n{field} = \"\"\n"), "/p");
            let err = config.validate().unwrap_err();
            assert!(
                err.to_string().contains(&format!("layouts.{field}")),
                "unexpected error {err}"
            );
        }
    }

    #[test]
    fn test_validate_default_must_be_normalized() {
        let config = parse("[layouts]\ndefault = \"Full Width\"\n", "/p");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("layouts.default"));
    }

    #[test]
    fn test_validate_reserved_fixed_name() {
        let config = parse("[collections]\nfixed = { nav = \"/nav\" }\n", "/p");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("nav"));
    }

    #[test]
    fn test_validate_fixed_route_needs_slash() {
        let config = parse("[collections]\nfixed = { posts = \"posts\" }\n", "/p");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("collections.fixed.posts"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/site"));
        let settings = CliSettings {
            cache_dir: Some(PathBuf::from("/tmp/cache")),
            ..Default::default()
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.source.cache_dir, PathBuf::from("/tmp/cache"));
        assert_eq!(config.output.dir, PathBuf::from("/site/_data"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/site"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.source.cache_dir, PathBuf::from("/site/lc"));
        assert_eq!(config.output.dir, PathBuf::from("/site/_data"));
    }

    #[test]
    fn test_load_expands_env_vars() {
        // SAFETY: variable names are unique to this test
        unsafe {
            std::env::set_var("NSITE_TEST_DB_ID", "db-from-env");
            std::env::set_var("NSITE_TEST_API_KEY", "key-from-env");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[source]\ndatabase_id = \"${NSITE_TEST_DB_ID}\"\napi_key = \"${NSITE_TEST_API_KEY}\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.source.database_id.as_deref(), Some("db-from-env"));
        assert_eq!(config.source.api_key.as_deref(), Some("key-from-env"));
        assert_eq!(config.source.cache_dir, dir.path().join("lc"));
        assert_eq!(config.config_path, Some(path));
        unsafe {
            std::env::remove_var("NSITE_TEST_DB_ID");
            std::env::remove_var("NSITE_TEST_API_KEY");
        }
    }

    #[test]
    fn test_load_missing_env_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("NSITE_TEST_MISSING_KEY");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[source]\napi_key = \"${NSITE_TEST_MISSING_KEY}\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "source.api_key"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_applies_cli_settings_after_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[output]\ndir = \"out\"\n").unwrap();
        let settings = CliSettings {
            output_dir: Some(PathBuf::from("/elsewhere")),
            ..Default::default()
        };

        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert_eq!(config.output.dir, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("site");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(discover_config(&nested), Some(nested.join(CONFIG_FILENAME)));
    }
}
