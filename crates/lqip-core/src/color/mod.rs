//! Color types and conversion utilities
//!
//! The placeholder pipeline only ever moves in one direction:
//!
//! ```text
//! Srgb (8-bit)  ->  LinearRgb  ->  Oklab
//! ```
//!
//! # Example
//!
//! ```
//! use lqip_core::{LinearRgb, Oklab, Srgb};
//!
//! let srgb = Srgb::new(128, 64, 32);
//! let linear = LinearRgb::from(srgb);
//! let lab = Oklab::from(linear);
//! assert!(lab.l > 0.0 && lab.l < 1.0);
//! ```

mod error;
mod linear_rgb;
mod lut;
mod oklab;
mod srgb;

pub use error::ParseColorError;
pub use linear_rgb::LinearRgb;
pub use oklab::{srgb_to_oklab_l, Oklab};
pub use srgb::Srgb;
