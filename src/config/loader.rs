//! Configuration loading and discovery for `tooltipgen.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::TooltipgenConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Config file name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "tooltipgen.toml";
/// Overrides `cache.enabled`
pub const ENV_CACHE_ENABLED: &str = "TOOLTIPGEN_CACHE_ENABLED";
/// Overrides `cache.max_size`
pub const ENV_CACHE_MAX_SIZE: &str = "TOOLTIPGEN_CACHE_MAX_SIZE";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tooltipgen.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override background alpha
    pub alpha: Option<u8>,
    /// Override outer padding
    pub padding: Option<u32>,
    /// Override pixel scale
    pub scale: Option<u32>,
    /// Override wrap width
    pub max_line_length: Option<usize>,
    /// Override resource directory
    pub resources: Option<PathBuf>,
    /// Force the cache on or off
    pub cache_enabled: Option<bool>,
}

/// Find tooltipgen.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for tooltipgen.toml
/// 2. Check XDG_CONFIG_HOME/tooltipgen/tooltipgen.toml (or ~/.config/tooltipgen/tooltipgen.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find tooltipgen.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("tooltipgen").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find tooltipgen.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a tooltipgen.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the default
/// configuration. Environment overrides are applied before validation.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed, or if the
/// merged configuration fails validation.
pub fn load_config(path: Option<&Path>) -> Result<TooltipgenConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    let mut config = match config_path {
        Some(p) => {
            debug!("Loading config from {}", p.display());
            let contents = fs::read_to_string(&p)?;
            let mut config: TooltipgenConfig = toml::from_str(&contents)?;
            // Resource paths in the file are relative to the file itself
            if let Some(root) = p.parent() {
                config.resources.path = resolve_path(root, &config.resources.path);
                config.resources.stats = config.resources.stats.map(|stats| resolve_path(root, &stats));
            }
            config
        }
        None => TooltipgenConfig::default(),
    };

    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

fn validate(config: &TooltipgenConfig) -> Result<(), ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Apply `TOOLTIPGEN_CACHE_*` environment variables.
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides(config: &mut TooltipgenConfig) {
    if let Ok(value) = env::var(ENV_CACHE_ENABLED) {
        match parse_bool(&value) {
            Some(enabled) => config.cache.enabled = enabled,
            None => warn!("Ignoring {}={:?}: expected a boolean", ENV_CACHE_ENABLED, value),
        }
    }

    if let Ok(value) = env::var(ENV_CACHE_MAX_SIZE) {
        match value.trim().parse::<usize>() {
            Ok(max_size) => config.cache.max_size = max_size,
            Err(_) => warn!("Ignoring {}={:?}: expected a positive integer", ENV_CACHE_MAX_SIZE, value),
        }
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The result is
/// validated again.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if an override is out of range.
pub fn merge_cli_overrides(config: &mut TooltipgenConfig, overrides: &CliOverrides) -> Result<(), ConfigError> {
    if let Some(alpha) = overrides.alpha {
        config.tooltip.alpha = alpha;
    }
    if let Some(padding) = overrides.padding {
        config.tooltip.padding = padding;
    }
    if let Some(scale) = overrides.scale {
        config.tooltip.scale = scale;
    }
    if let Some(max_line_length) = overrides.max_line_length {
        config.tooltip.max_line_length = max_line_length;
    }
    if let Some(ref resources) = overrides.resources {
        config.resources.path = resources.clone();
    }
    if let Some(enabled) = overrides.cache_enabled {
        config.cache.enabled = enabled;
    }

    validate(config)
}

/// Resolve a path relative to the directory holding the config file.
///
/// If the path is absolute, returns it unchanged.
pub fn resolve_path(project_root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(contents.as_bytes())
            .expect("should write config content");
        config_path
    }

    fn clear_env() {
        env::remove_var(ENV_CACHE_ENABLED);
        env::remove_var(ENV_CACHE_MAX_SIZE);
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[cache]\nenabled = true\n");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let subdir = temp.path().join("renders").join("items");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        assert_eq!(find_config_from(temp.path().to_path_buf()), None);
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() {
        clear_env();
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(
            temp.path(),
            r#"
[cache]
enabled = true
max_size = 32

[tooltip]
scale = 2
"#,
        );

        let config = load_config(Some(&config_path)).expect("should load valid config");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_size, 32);
        assert_eq!(config.tooltip.scale, 2);
        assert_eq!(config.resources.path, temp.path().join("assets"));
    }

    #[test]
    fn test_load_config_missing_file_errors() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "this is not valid toml {{{");

        let result = load_config(Some(&config_path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    #[serial]
    fn test_load_config_validation_error() {
        clear_env();
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[tooltip]\nscale = 0\nmax_line_length = 500\n");

        let err = load_config(Some(&config_path)).unwrap_err();
        match &err {
            ConfigError::Validation(problems) => assert_eq!(problems.len(), 2),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(err.to_string().contains("  - tooltipgen.toml: 'tooltip.scale'"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_cache_settings() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[cache]\nenabled = false\nmax_size = 10\n");

        env::set_var(ENV_CACHE_ENABLED, "true");
        env::set_var(ENV_CACHE_MAX_SIZE, "99");
        let config = load_config(Some(&config_path));
        clear_env();

        let config = config.expect("should load with overrides");
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_size, 99);
    }

    #[test]
    #[serial]
    fn test_bad_env_values_are_ignored() {
        let mut config = TooltipgenConfig::default();
        env::set_var(ENV_CACHE_ENABLED, "maybe");
        env::set_var(ENV_CACHE_MAX_SIZE, "lots");
        apply_env_overrides(&mut config);
        clear_env();

        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_size, 256);
    }

    #[test]
    #[serial]
    fn test_zero_max_size_from_env_fails_validation() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        env::set_var(ENV_CACHE_MAX_SIZE, "0");
        let result = load_config(Some(&config_path));
        clear_env();

        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_merge_cli_overrides() {
        let mut config = TooltipgenConfig::default();
        let overrides = CliOverrides {
            alpha: Some(128),
            scale: Some(3),
            resources: Some(PathBuf::from("res")),
            cache_enabled: Some(true),
            ..Default::default()
        };

        merge_cli_overrides(&mut config, &overrides).expect("overrides are in range");
        assert_eq!(config.tooltip.alpha, 128);
        assert_eq!(config.tooltip.scale, 3);
        assert_eq!(config.resources.path, PathBuf::from("res"));
        assert!(config.cache.enabled);
        assert_eq!(config.tooltip.padding, 0);
    }

    #[test]
    fn test_merge_cli_overrides_out_of_range() {
        let mut config = TooltipgenConfig::default();
        let overrides = CliOverrides { max_line_length: Some(0), ..Default::default() };
        assert!(matches!(merge_cli_overrides(&mut config, &overrides), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/project");
        assert_eq!(resolve_path(root, Path::new("/other/path")), PathBuf::from("/other/path"));
        assert_eq!(resolve_path(root, Path::new("assets")), PathBuf::from("/project/assets"));
    }
}
