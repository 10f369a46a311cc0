//! Error taxonomy for tooltip generation
//!
//! Markup problems never surface here: broken placeholders resolve to
//! visible sentinel strings instead. This type covers the two fatal tiers,
//! configuration validation and generation failures, plus the I/O and image
//! errors that bubble up from resource loading.

use std::path::PathBuf;
use thiserror::Error;

/// Error type for every fallible generator operation
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    /// A generator was configured with an out-of-range or missing field
    #[error("validation failed: {0}")]
    Validation(String),
    /// A render stage could not produce a required image
    #[error("generation failed: {0}")]
    Generation(String),
    /// A sprite or JSON resource could not be read or decoded
    #[error("failed to load resource {}: {message}", .path.display())]
    Resource { path: PathBuf, message: String },
    /// Image decoding or encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// File I/O error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeneratorError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn generation(msg: impl Into<String>) -> Self {
        Self::Generation(msg.into())
    }

    pub fn resource(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Resource { path: path.into(), message: msg.into() }
    }
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = GeneratorError::validation("durability must be between 0 and 100");
        assert_eq!(err.to_string(), "validation failed: durability must be between 0 and 100");
    }

    #[test]
    fn test_resource_message_includes_path() {
        let err = GeneratorError::resource("assets/json/overlay_colors.json", "missing");
        assert!(err.to_string().contains("overlay_colors.json"));
        assert!(err.to_string().contains("missing"));
    }
}
