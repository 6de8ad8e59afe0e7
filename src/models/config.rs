use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// Default pixel stride for dominant-color sampling.
pub const DEFAULT_SAMPLE_RATE: u32 = 10;

/// Default number of palette boxes requested from the extractor.
pub const DEFAULT_PALETTE_SIZE: u8 = 4;

/// Options for a single encode call.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EncodeOptions {
    /// Reject images with any non-opaque pixel
    #[serde(default)]
    pub enable_opaque_check: bool,

    /// Use every n-th pixel when extracting the dominant color
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Palette size passed to the dominant-color extractor
    #[serde(default = "default_palette_size")]
    pub palette_size: u8,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_palette_size() -> u8 {
    DEFAULT_PALETTE_SIZE
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            enable_opaque_check: false,
            sample_rate: DEFAULT_SAMPLE_RATE,
            palette_size: DEFAULT_PALETTE_SIZE,
        }
    }
}

impl EncodeOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn enable_opaque_check(mut self, enabled: bool) -> Self {
        self.enable_opaque_check = enabled;
        self
    }

    #[inline]
    pub fn sample_rate(mut self, rate: u32) -> Self {
        self.sample_rate = rate;
        self
    }

    #[inline]
    pub fn palette_size(mut self, size: u8) -> Self {
        self.palette_size = size;
        self
    }

    /// Replace unusable values the way the palette extractor expects:
    /// a zero stride falls back to the default, palette size is kept in 2..=20.
    pub fn normalized(&self) -> Self {
        Self {
            enable_opaque_check: self.enable_opaque_check,
            sample_rate: if self.sample_rate == 0 {
                DEFAULT_SAMPLE_RATE
            } else {
                self.sample_rate
            },
            palette_size: self.palette_size.clamp(2, 20),
        }
    }
}

/// Application configuration loaded from a YAML file.
///
/// ```yaml
/// options:
///   enableOpaqueCheck: true
///   sampleRate: 5
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub options: EncodeOptions,
}

impl AppConfig {
    /// Parse configuration from YAML text. Empty text yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content)?;
        tracing::info!(
            path = %path.display(),
            opaque_check = config.options.enable_opaque_check,
            sample_rate = config.options.sample_rate,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load from `path` if given, else from `$LQIP_CONFIG`, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match std::env::var_os("LQIP_CONFIG") {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
