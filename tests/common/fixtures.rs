//! Test fixtures: image files written into a temporary directory.

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Gray level that sits well away from any offset rounding boundary
pub const SAFE_GRAY: u8 = 100;

/// A temporary directory of generated images, removed on drop.
pub struct ImageDir {
    dir: TempDir,
}

impl ImageDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Solid RGB image, format taken from the file extension.
    pub fn solid(&self, name: &str, width: u32, height: u32, color: [u8; 3]) -> PathBuf {
        let image = RgbImage::from_pixel(width, height, Rgb(color));
        self.save_rgb(name, &image)
    }

    /// Top half `top`, bottom half `bottom`.
    pub fn split_horizontal(&self, name: &str, width: u32, height: u32, top: u8, bottom: u8) -> PathBuf {
        let image = RgbImage::from_fn(width, height, |_, y| {
            let v = if y < height / 2 { top } else { bottom };
            Rgb([v, v, v])
        });
        self.save_rgb(name, &image)
    }

    /// Smooth diagonal color gradient.
    pub fn gradient(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                160,
            ])
        });
        self.save_rgb(name, &image)
    }

    /// Solid RGBA PNG with a single pixel at `alpha` in the top-left corner.
    pub fn with_alpha(&self, name: &str, width: u32, height: u32, alpha: u8) -> PathBuf {
        let mut image = RgbaImage::from_pixel(width, height, Rgba([120, 160, 200, 255]));
        image.put_pixel(0, 0, Rgba([120, 160, 200, alpha]));
        let path = self.path(name);
        image
            .save_with_format(&path, ImageFormat::Png)
            .expect("Failed to write RGBA fixture");
        path
    }

    /// Arbitrary bytes under `name`.
    pub fn raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("Failed to write raw fixture");
        path
    }

    /// Copy of `source` cut to its first `len` bytes.
    pub fn truncated(&self, source: &Path, name: &str, len: usize) -> PathBuf {
        let bytes = std::fs::read(source).expect("Failed to read fixture");
        self.raw(name, &bytes[..len.min(bytes.len())])
    }

    fn save_rgb(&self, name: &str, image: &RgbImage) -> PathBuf {
        let path = self.path(name);
        image.save(&path).expect("Failed to write image fixture");
        path
    }
}

impl Default for ImageDir {
    fn default() -> Self {
        Self::new()
    }
}
