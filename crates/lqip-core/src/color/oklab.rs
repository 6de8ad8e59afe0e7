//! Oklab perceptual color space
//!
//! # References
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::linear_rgb::LinearRgb;
use super::srgb::Srgb;

/// A color in Oklab perceptual color space.
///
/// # Components
///
/// - `l`: Lightness (0.0 = black, 1.0 = white)
/// - `a`: Green-red axis (negative = green, positive = red)
/// - `b`: Blue-yellow axis (negative = blue, positive = yellow)
///
/// Values are not clamped; `a` and `b` stay within roughly ±0.4 for
/// colors that come from 8-bit sRGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    /// Lightness: 0.0 (black) to 1.0 (white)
    pub l: f64,
    /// Green-red axis
    pub a: f64,
    /// Blue-yellow axis
    pub b: f64,
}

impl Oklab {
    /// Create a new Oklab color.
    ///
    /// # Example
    ///
    /// ```
    /// use lqip_core::Oklab;
    ///
    /// // Neutral mid-gray has no chroma
    /// let gray = Oklab::new(0.5, 0.0, 0.0);
    /// assert_eq!(gray.chroma(), 0.0);
    /// ```
    #[inline]
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Convert an 8-bit sRGB color straight to Oklab.
    #[inline]
    pub fn from_srgb(srgb: Srgb) -> Self {
        Self::from(LinearRgb::from(srgb))
    }

    /// Magnitude of the (a, b) vector.
    #[inline]
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }
}

impl From<Srgb> for Oklab {
    fn from(srgb: Srgb) -> Self {
        Self::from_srgb(srgb)
    }
}

impl From<LinearRgb> for Oklab {
    /// Convert from linear RGB to Oklab.
    ///
    /// Uses the updated 2021-01-25 matrices from Björn Ottosson.
    ///
    /// # Example
    ///
    /// ```
    /// use lqip_core::{LinearRgb, Oklab};
    ///
    /// let oklab = Oklab::from(LinearRgb::new(0.5, 0.5, 0.5));
    /// assert!(oklab.a.abs() < 0.001);
    /// assert!(oklab.b.abs() < 0.001);
    /// ```
    fn from(rgb: LinearRgb) -> Self {
        let (l_, m_, s_) = lms_cbrt(rgb);

        Oklab {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }
}

/// Lightness-only fast path used for the six preview samples.
///
/// Same transform as [`Oklab::from_srgb`], skipping the two chroma rows.
#[inline]
pub fn srgb_to_oklab_l(srgb: Srgb) -> f64 {
    let (l_, m_, s_) = lms_cbrt(LinearRgb::from(srgb));
    0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_
}

/// Linear sRGB to cone response (M1), followed by the cube-root nonlinearity.
#[inline]
fn lms_cbrt(rgb: LinearRgb) -> (f64, f64, f64) {
    let l = 0.4122214708 * rgb.r + 0.5363325363 * rgb.g + 0.0514459929 * rgb.b;
    let m = 0.2119034982 * rgb.r + 0.6806995451 * rgb.g + 0.1073969566 * rgb.b;
    let s = 0.0883024619 * rgb.r + 0.2817188376 * rgb.g + 0.6299787005 * rgb.b;
    (l.cbrt(), m.cbrt(), s.cbrt())
}
