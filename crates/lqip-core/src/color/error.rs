//! Parse failures for the CSS-style hex colors the `color` command accepts.

use std::fmt;

/// Why a string is not a `#rgb` / `#rrggbb` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseColorError {
    /// Number of hex digits after the optional `#` was neither 3 nor 6
    InvalidLength(usize),
    /// A character that is not a hex digit
    InvalidHex(char),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(n) => write!(f, "expected 3 or 6 hex digits, got {n}"),
            Self::InvalidHex(c) => write!(f, "{c:?} is not a hex digit"),
        }
    }
}

impl std::error::Error for ParseColorError {}
