use std::path::PathBuf;
use thiserror::Error;

/// Why an image produced no placeholder.
///
/// The public [`encode`](crate::services::encoder::encode) entry point folds
/// every variant into `None`; the variants exist for logging and for callers
/// that use [`Encoder`](crate::services::Encoder) directly.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("File not found: {}", .0.display())]
    InputMissing(PathBuf),

    #[error("Image has transparent pixels")]
    NotOpaque,

    #[error("Image has no pixels")]
    EmptyImage,

    #[error("Decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Palette extraction produced no colors")]
    EmptyPalette,

    #[error("Value out of range: {0}")]
    Range(#[from] lqip_core::RangeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    /// Failures that are part of normal operation (missing file,
    /// disqualified image) rather than something going wrong.
    pub fn is_expected(&self) -> bool {
        matches!(self, EncodeError::InputMissing(_) | EncodeError::NotOpaque)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}
