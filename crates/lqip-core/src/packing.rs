//! Packing the quantized base color and six offset levels into one integer.
//!
//! Bit layout of the 20-bit word, MSB first:
//!
//! ```text
//! [ca:2][cb:2][cc:2][cd:2][ce:2][cf:2][ll:2][aaa:3][bbb:3]
//! ```
//!
//! The word is re-biased by `-2^19` so the value is centered on zero.

use std::fmt;

use crate::color::{Oklab, Srgb};
use crate::error::RangeError;
use crate::lattice::{find_oklab_bits, QuantizedColor};
use crate::offsets::{offset_lightness, quantize_offset, sample_offsets, OFFSET_MAX, SAMPLE_COUNT};

/// Smallest integer a CSS custom property reliably accepts.
pub const LQIP_MIN: i64 = -999_999;
/// Largest integer a CSS custom property reliably accepts.
pub const LQIP_MAX: i64 = 999_999;
/// Re-bias applied to the packed word.
pub const BIAS: i64 = 1 << 19;

/// Width of the packed word.
const WORD_BITS: u32 = 20;
/// Bits taken by `[ll][aaa][bbb]`.
const BASE_BITS: u32 = 8;

/// A decoded placeholder: quantized base color plus six 2-bit offset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lqip {
    base: QuantizedColor,
    offsets: [u8; SAMPLE_COUNT],
}

impl Lqip {
    /// Create a placeholder from its fields, checking every offset level fits 2 bits.
    pub fn new(base: QuantizedColor, offsets: [u8; SAMPLE_COUNT]) -> Result<Self, RangeError> {
        if let Some((index, &value)) = offsets.iter().enumerate().find(|(_, &v)| v > OFFSET_MAX) {
            return Err(RangeError::Offset { index, value });
        }
        Ok(Self { base, offsets })
    }

    /// Run the color pipeline: dominant color to lattice, samples to offset levels.
    ///
    /// `samples` are the 3x2 preview pixels in row-major order.
    pub fn from_colors(dominant: Srgb, samples: &[Srgb; SAMPLE_COUNT]) -> Self {
        let base = find_oklab_bits(Oklab::from_srgb(dominant));
        let offsets = sample_offsets(samples, base).map(quantize_offset);
        Self { base, offsets }
    }

    #[inline]
    pub fn base(&self) -> QuantizedColor {
        self.base
    }

    /// The six 2-bit levels, `ca` first.
    #[inline]
    pub fn offsets(&self) -> [u8; SAMPLE_COUNT] {
        self.offsets
    }

    /// Lattice coordinate of the base color.
    pub fn base_oklab(&self) -> Oklab {
        self.base.to_oklab()
    }

    /// Absolute lightness represented by each offset level.
    pub fn sample_lightness(&self) -> [f64; SAMPLE_COUNT] {
        let base_l = self.base.lightness();
        self.offsets.map(|level| offset_lightness(level, base_l))
    }

    /// The unbiased 20-bit word.
    pub fn word(&self) -> u32 {
        let offsets = self
            .offsets
            .iter()
            .fold(0u32, |acc, &level| (acc << 2) | (level & OFFSET_MAX) as u32);
        (offsets << BASE_BITS) | self.base.bits() as u32
    }

    /// Pack into the signed placeholder integer.
    ///
    /// # Errors
    ///
    /// [`RangeError::OutOfRange`] if the result would leave `LQIP_MIN..=LQIP_MAX`.
    /// Unreachable with the current layout, kept as a guard on the layout.
    ///
    /// # Example
    ///
    /// ```
    /// use lqip_core::{Lqip, QuantizedColor};
    ///
    /// let base = QuantizedColor::new(1, 3, 5).unwrap();
    /// let lqip = Lqip::new(base, [0, 1, 2, 3, 0, 1]).unwrap();
    /// assert_eq!(lqip.pack(), Ok(-413_347));
    /// ```
    pub fn pack(&self) -> Result<i32, RangeError> {
        let value = self.word() as i64 - BIAS;
        check_range(value)?;
        Ok(value as i32)
    }

    /// Split a placeholder integer back into its fields.
    ///
    /// # Errors
    ///
    /// [`RangeError::NotEncodable`] for values the layout cannot produce.
    pub fn unpack(value: i32) -> Result<Self, RangeError> {
        let word = value as i64 + BIAS;
        if !(0..(1i64 << WORD_BITS)).contains(&word) {
            return Err(RangeError::NotEncodable(value as i64));
        }
        let word = word as u32;

        let base = QuantizedColor::from_bits((word & 0xff) as u8);
        let mut offsets = [0u8; SAMPLE_COUNT];
        for (i, level) in offsets.iter_mut().enumerate() {
            let shift = BASE_BITS + 2 * (SAMPLE_COUNT - 1 - i) as u32;
            *level = ((word >> shift) & OFFSET_MAX as u32) as u8;
        }

        Ok(Self { base, offsets })
    }
}

impl fmt::Display for Lqip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.offsets;
        write!(f, "{} offsets=[{a},{b},{c},{d},{e},{g}]", self.base)
    }
}

fn check_range(value: i64) -> Result<(), RangeError> {
    if !(LQIP_MIN..=LQIP_MAX).contains(&value) {
        return Err(RangeError::OutOfRange(value));
    }
    Ok(())
}

/// Encode a dominant color and six preview samples into a placeholder integer.
///
/// # Example
///
/// ```
/// use lqip_core::{encode_colors, Lqip, Srgb};
///
/// let gray = Srgb::new(128, 128, 128);
/// let value = encode_colors(gray, &[gray; 6]).unwrap();
/// let lqip = Lqip::unpack(value).unwrap();
/// assert_eq!(lqip.base().ll(), 2);
/// ```
pub fn encode_colors(dominant: Srgb, samples: &[Srgb; SAMPLE_COUNT]) -> Result<i32, RangeError> {
    Lqip::from_colors(dominant, samples).pack()
}
