//! Error type for out-of-range quantized values.

use std::fmt;

/// Error type for values that do not fit the placeholder bit layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// A quantized base component exceeds its bit width
    Component {
        /// Component name (`ll`, `aaa` or `bbb`)
        name: &'static str,
        /// Offending value
        value: u8,
        /// Largest allowed value
        max: u8,
    },
    /// A sample offset level exceeds 2 bits
    Offset {
        /// Sample position 0..6
        index: usize,
        /// Offending level
        value: u8,
    },
    /// Packed value falls outside the CSS integer range
    OutOfRange(i64),
    /// Value cannot be produced by the bit layout, so it cannot be unpacked
    NotEncodable(i64),
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::Component { name, value, max } => {
                write!(f, "component {} = {} exceeds maximum {}", name, value, max)
            }
            RangeError::Offset { index, value } => {
                write!(f, "offset {} = {} exceeds maximum 3", index, value)
            }
            RangeError::OutOfRange(value) => {
                write!(f, "value {} outside of -999999..=999999", value)
            }
            RangeError::NotEncodable(value) => {
                write!(f, "value {} is not a valid placeholder encoding", value)
            }
        }
    }
}

impl std::error::Error for RangeError {}
