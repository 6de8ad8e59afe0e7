//! Image decoding and the pixel views the encoder needs.

use crate::error::EncodeError;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageReader, RgbImage};
use lqip_core::{Srgb, SAMPLE_COUNT};
use std::path::Path;

/// Preview grid width in pixels.
pub const PREVIEW_WIDTH: u32 = 3;
/// Preview grid height in pixels.
pub const PREVIEW_HEIGHT: u32 = 2;

/// Sharpening applied after downscaling to the preview grid.
const PREVIEW_SHARPEN_SIGMA: f32 = 1.0;

/// Pixel access the encoder needs from a decoded image.
pub trait ImageSource {
    /// The 3x2 preview, row-major, alpha dropped.
    fn preview(&self) -> [Srgb; SAMPLE_COUNT];

    /// True when every pixel is fully opaque.
    fn is_opaque(&self) -> bool;

    /// Every `stride`-th pixel in row-major order, alpha dropped.
    fn sampled_pixels(&self, stride: u32) -> Vec<Srgb>;
}

/// An image decoded with the `image` crate.
///
/// Pixels are converted to 8-bit RGB once; opacity is read from the
/// native buffer before the alpha channel is dropped.
pub struct DecodedImage {
    pixels: RgbImage,
    opaque: bool,
}

impl DecodedImage {
    /// Decode an image file, guessing the format from its content.
    pub fn open(path: &Path) -> Result<Self, EncodeError> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        tracing::trace!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded image"
        );
        Self::from_image(image)
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: DynamicImage) -> Result<Self, EncodeError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(EncodeError::EmptyImage);
        }
        let opaque = all_opaque(&image);
        Ok(Self {
            pixels: image.into_rgb8(),
            opaque,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

fn all_opaque(image: &DynamicImage) -> bool {
    match image {
        DynamicImage::ImageLumaA8(buf) => buf.pixels().all(|p| p.0[1] == u8::MAX),
        DynamicImage::ImageRgba8(buf) => buf.pixels().all(|p| p.0[3] == u8::MAX),
        DynamicImage::ImageLumaA16(buf) => buf.pixels().all(|p| p.0[1] == u16::MAX),
        DynamicImage::ImageRgba16(buf) => buf.pixels().all(|p| p.0[3] == u16::MAX),
        DynamicImage::ImageRgba32F(buf) => buf.pixels().all(|p| p.0[3] >= 1.0),
        other if other.color().has_alpha() => other.to_rgba8().pixels().all(|p| p.0[3] == u8::MAX),
        _ => true,
    }
}

impl ImageSource for DecodedImage {
    fn preview(&self) -> [Srgb; SAMPLE_COUNT] {
        let small = imageops::resize(&self.pixels, PREVIEW_WIDTH, PREVIEW_HEIGHT, FilterType::Lanczos3);
        let sharpened = imageops::unsharpen(&small, PREVIEW_SHARPEN_SIGMA, 0);

        let mut samples = [Srgb::default(); SAMPLE_COUNT];
        for (slot, pixel) in samples.iter_mut().zip(sharpened.pixels()) {
            *slot = Srgb::from_bytes(pixel.0);
        }
        samples
    }

    fn is_opaque(&self) -> bool {
        self.opaque
    }

    fn sampled_pixels(&self, stride: u32) -> Vec<Srgb> {
        self.pixels
            .pixels()
            .step_by(stride.max(1) as usize)
            .map(|p| Srgb::from_bytes(p.0))
            .collect()
    }
}
