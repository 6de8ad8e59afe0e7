//! sRGB color type
//!
//! 8-bit gamma-encoded colors as they come out of an image decoder.

use std::fmt;
use std::str::FromStr;

use super::error::ParseColorError;

/// A color in 8-bit sRGB, no alpha.
///
/// This is what the decoder hands over for the dominant color and for each
/// of the six preview pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Srgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Srgb {
    /// Create a new Srgb color from 8-bit channel values.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an Srgb color from a byte array [R, G, B].
    ///
    /// # Example
    /// ```
    /// use lqip_core::Srgb;
    /// let white = Srgb::from_bytes([255, 255, 255]);
    /// assert_eq!(white.r, 255);
    /// ```
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Srgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Srgb {
    /// Formats as lowercase `#rrggbb`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse `#rrggbb` or the `#rgb` shorthand, as written for the `color`
    /// command. The `#` is optional, surrounding whitespace is ignored and
    /// digits may be either case.
    ///
    /// ```
    /// use lqip_core::Srgb;
    ///
    /// let gray: Srgb = "#808080".parse().unwrap();
    /// assert_eq!(gray, Srgb::new(128, 128, 128));
    ///
    /// let red: Srgb = "#F00".parse().unwrap();
    /// assert_eq!(red, Srgb::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s.strip_prefix('#').unwrap_or(s);

        let nibbles = digits
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ParseColorError::InvalidHex(c)))
            .collect::<Result<Vec<u8>, _>>()?;

        match nibbles[..] {
            // #rgb is shorthand for #rrggbb
            [r, g, b] => Ok(Self::new(r * 0x11, g * 0x11, b * 0x11)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::new((r1 << 4) | r0, (g1 << 4) | g0, (b1 << 4) | b0)),
            _ => Err(ParseColorError::InvalidLength(nibbles.len())),
        }
    }
}
