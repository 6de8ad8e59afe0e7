//! Gamma lookup table access
//!
//! The table is generated at compile time by build.rs with one exact
//! IEC 61966-2-1 value per 8-bit code.

include!(concat!(env!("OUT_DIR"), "/gamma_lut.rs"));

/// Convert an 8-bit sRGB code to linear light.
#[inline]
pub fn srgb8_to_linear(code: u8) -> f64 {
    SRGB8_TO_LINEAR[code as usize]
}
