//! Per-sample brightness offsets relative to the quantized base lightness.

use crate::color::{srgb_to_oklab_l, Srgb};
use crate::lattice::QuantizedColor;

/// Number of preview samples (3 columns x 2 rows).
pub const SAMPLE_COUNT: usize = 6;

/// Largest 2-bit offset level.
pub const OFFSET_MAX: u8 = 0b11;

/// Relative brightness of one sample, recentred so 0.5 means "same as base".
///
/// Outliers saturate at 0.0 and 1.0.
#[inline]
pub fn sample_offset(sample_l: f64, base_l: f64) -> f64 {
    (0.5 + sample_l - base_l).clamp(0.0, 1.0)
}

/// Offsets of all six preview samples against the lattice lightness of `base`.
pub fn sample_offsets(samples: &[Srgb; SAMPLE_COUNT], base: QuantizedColor) -> [f64; SAMPLE_COUNT] {
    let base_l = base.lightness();
    samples.map(|sample| sample_offset(srgb_to_oklab_l(sample), base_l))
}

/// Quantize an offset in 0.0..=1.0 to a 2-bit level.
///
/// # Example
///
/// ```
/// use lqip_core::quantize_offset;
///
/// assert_eq!(quantize_offset(0.0), 0);
/// assert_eq!(quantize_offset(0.5), 2);
/// assert_eq!(quantize_offset(1.0), 3);
/// ```
#[inline]
pub fn quantize_offset(offset: f64) -> u8 {
    ((offset * OFFSET_MAX as f64).round() as u8) & OFFSET_MAX
}

/// Lightness a decoder reconstructs for a given offset level.
#[inline]
pub fn offset_lightness(level: u8, base_l: f64) -> f64 {
    base_l + (level & OFFSET_MAX) as f64 / OFFSET_MAX as f64 - 0.5
}
