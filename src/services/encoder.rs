//! The encode pipeline: decode, qualify, extract, pack.

use crate::error::EncodeError;
use crate::models::EncodeOptions;
use crate::services::decoder::{DecodedImage, ImageSource};
use crate::services::palette::{dominant_color, MedianCut, PaletteExtractor};
use lqip_core::Lqip;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tokio::task::JoinSet;

/// Encodes images into placeholder integers.
///
/// Holds the options and the palette extractor. One encoder can be shared
/// across threads; every call is independent.
pub struct Encoder<P = MedianCut> {
    options: EncodeOptions,
    extractor: P,
}

impl Encoder {
    pub fn new(options: EncodeOptions) -> Self {
        Self::with_extractor(options, MedianCut)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(EncodeOptions::default())
    }
}

impl<P: PaletteExtractor> Encoder<P> {
    /// Use a custom dominant-color strategy.
    pub fn with_extractor(options: EncodeOptions, extractor: P) -> Self {
        Self {
            options: options.normalized(),
            extractor,
        }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Encode the image file at `path`.
    pub fn encode_path(&self, path: &Path) -> Result<i32, EncodeError> {
        if !path.exists() {
            return Err(EncodeError::InputMissing(path.to_path_buf()));
        }
        let image = DecodedImage::open(path)?;
        self.encode_image(&image)
    }

    /// Encode an already decoded image.
    ///
    /// The dominant color and the preview are computed concurrently.
    pub fn encode_image<S: ImageSource + Sync>(&self, source: &S) -> Result<i32, EncodeError> {
        if self.options.enable_opaque_check && !source.is_opaque() {
            return Err(EncodeError::NotOpaque);
        }

        let (dominant, preview) = thread::scope(|scope| {
            let palette = scope.spawn(|| {
                let pixels = source.sampled_pixels(self.options.sample_rate);
                dominant_color(&self.extractor, &pixels, self.options.palette_size)
            });
            let preview = source.preview();
            match palette.join() {
                Ok(dominant) => (dominant, preview),
                Err(payload) => panic::resume_unwind(payload),
            }
        });

        let dominant = dominant.ok_or(EncodeError::EmptyPalette)?;
        let lqip = Lqip::from_colors(dominant, &preview);
        tracing::debug!(%dominant, %lqip, "Quantized image");

        Ok(lqip.pack()?)
    }

    /// Encode `path`, folding every failure (including a panic inside the
    /// decoder or extractor) into `None`.
    pub fn encode_or_none(&self, path: &Path) -> Option<i32> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.encode_path(path))) {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) if e.is_expected() => {
                tracing::debug!(path = %path.display(), reason = %e, "Skipping image");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to encode image");
                None
            }
            Err(payload) => {
                tracing::error!(
                    path = %path.display(),
                    panic = panic_message(payload.as_ref()),
                    "Encoder panicked"
                );
                None
            }
        }
    }
}

impl<P: PaletteExtractor + 'static> Encoder<P> {
    /// Encode many files on the blocking pool. Results keep input order.
    pub async fn encode_batch(self: Arc<Self>, paths: Vec<PathBuf>) -> Vec<(PathBuf, Option<i32>)> {
        let mut tasks = JoinSet::new();
        for (index, path) in paths.iter().cloned().enumerate() {
            let encoder = self.clone();
            tasks.spawn_blocking(move || (index, encoder.encode_or_none(&path)));
        }

        let mut results: Vec<(PathBuf, Option<i32>)> = paths.into_iter().map(|p| (p, None)).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, value)) => results[index].1 = value,
                Err(e) => tracing::error!(error = %e, "Encode task failed"),
            }
        }
        results
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

/// Encode one image file into a placeholder integer.
///
/// Returns `None` when the file is missing, cannot be decoded, fails the
/// opaque check, or cannot be encoded. Never panics.
pub fn encode(path: impl AsRef<Path>, options: &EncodeOptions) -> Option<i32> {
    Encoder::new(options.clone()).encode_or_none(path.as_ref())
}

/// Encode many image files concurrently. Results keep input order.
pub async fn encode_batch(paths: Vec<PathBuf>, options: &EncodeOptions) -> Vec<(PathBuf, Option<i32>)> {
    Arc::new(Encoder::new(options.clone())).encode_batch(paths).await
}
