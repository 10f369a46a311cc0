//! Configuration schema types for `tooltipgen.toml`
//!
//! Every section is optional; a missing file or section falls back to the
//! defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted wrap width
pub const MAX_LINE_LENGTH_LIMIT: usize = 128;
/// Largest accepted tooltip scale
pub const MAX_SCALE: u32 = 8;

/// Generation cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Store rendered artifacts between requests
    #[serde(default)]
    pub enabled: bool,
    /// Maximum number of cached artifacts
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Expire entries this many minutes after they are written; 0 never expires
    #[serde(default)]
    pub ttl_minutes: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: false, max_size: default_max_size(), ttl_minutes: 0 }
    }
}

impl CacheConfig {
    /// An enabled cache holding up to `max_size` artifacts.
    pub fn enabled(max_size: usize) -> Self {
        Self { enabled: true, max_size, ttl_minutes: 0 }
    }

    pub fn with_ttl_minutes(mut self, ttl_minutes: u64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }
}

fn default_max_size() -> usize {
    256
}

/// Defaults for tooltip rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipConfig {
    /// Background alpha
    #[serde(default = "default_alpha")]
    pub alpha: u8,
    /// Transparent padding around the whole tooltip
    #[serde(default)]
    pub padding: u32,
    /// Wrap width in visible characters
    #[serde(default = "default_max_line_length")]
    pub max_line_length: usize,
    /// Pixel multiplier
    #[serde(default = "default_scale")]
    pub scale: u32,
    #[serde(default = "default_true")]
    pub render_border: bool,
    /// Extra gap below the item name
    #[serde(default = "default_true")]
    pub padding_first_line: bool,
    #[serde(default)]
    pub centered: bool,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            padding: 0,
            max_line_length: default_max_line_length(),
            scale: default_scale(),
            render_border: true,
            padding_first_line: true,
            centered: false,
        }
    }
}

fn default_alpha() -> u8 {
    245
}

fn default_max_line_length() -> usize {
    36
}

fn default_scale() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

/// Where sprite sheets and data tables live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Root of the sprite resource tree
    #[serde(default = "default_resource_path")]
    pub path: PathBuf,
    /// Replacement stat table (JSON)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<PathBuf>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self { path: default_resource_path(), stats: None }
    }
}

fn default_resource_path() -> PathBuf {
    PathBuf::from("assets")
}

/// Root configuration structure for `tooltipgen.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipgenConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    #[serde(default)]
    pub resources: ResourcesConfig,
}

/// Validation error for configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "tooltip.scale")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tooltipgen.toml: '{}' {}", self.field, self.message)
    }
}

impl TooltipgenConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        if self.cache.max_size == 0 {
            errors.push(ConfigValidationError {
                field: "cache.max_size".to_string(),
                message: "must be a positive integer".to_string(),
            });
        }

        if self.tooltip.max_line_length == 0 || self.tooltip.max_line_length > MAX_LINE_LENGTH_LIMIT {
            errors.push(ConfigValidationError {
                field: "tooltip.max_line_length".to_string(),
                message: format!("must be between 1 and {}", MAX_LINE_LENGTH_LIMIT),
            });
        }

        if self.tooltip.scale == 0 || self.tooltip.scale > MAX_SCALE {
            errors.push(ConfigValidationError {
                field: "tooltip.scale".to_string(),
                message: format!("must be between 1 and {}", MAX_SCALE),
            });
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parses_to_defaults() {
        let config: TooltipgenConfig = toml::from_str("").unwrap();
        assert_eq!(config, TooltipgenConfig::default());
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_size, 256);
        assert_eq!(config.tooltip.alpha, 245);
        assert_eq!(config.tooltip.max_line_length, 36);
        assert_eq!(config.resources.path, PathBuf::from("assets"));
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[cache]
enabled = true
max_size = 64
ttl_minutes = 10

[tooltip]
alpha = 200
padding = 4
max_line_length = 40
scale = 2
render_border = false
padding_first_line = false
centered = true

[resources]
path = "res"
stats = "res/json/stats.json"
"#;
        let config: TooltipgenConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.cache, CacheConfig { enabled: true, max_size: 64, ttl_minutes: 10 });
        assert_eq!(config.tooltip.alpha, 200);
        assert_eq!(config.tooltip.scale, 2);
        assert!(!config.tooltip.render_border);
        assert!(config.tooltip.centered);
        assert_eq!(config.resources.stats, Some(PathBuf::from("res/json/stats.json")));
        assert!(config.is_valid());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: TooltipgenConfig = toml::from_str("[tooltip]\nscale = 3\n").unwrap();
        assert_eq!(config.tooltip.scale, 3);
        assert_eq!(config.tooltip.alpha, 245);
        assert!(config.tooltip.render_border);
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let mut config = TooltipgenConfig::default();
        config.cache.max_size = 0;
        config.tooltip.max_line_length = 129;
        config.tooltip.scale = 9;

        let errors = config.validate();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["cache.max_size", "tooltip.max_line_length", "tooltip.scale"]);
        assert!(errors[2].to_string().contains("between 1 and 8"));
    }

    #[test]
    fn test_alpha_out_of_range_is_a_parse_error() {
        assert!(toml::from_str::<TooltipgenConfig>("[tooltip]\nalpha = 300\n").is_err());
    }
}
