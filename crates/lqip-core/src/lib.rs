#![allow(clippy::excessive_precision, clippy::manual_range_contains)]

//! lqip-core: OkLab quantization and bit packing for single-integer image placeholders
//!
//! A placeholder is one signed integer that a stylesheet can carry as a
//! custom property. It holds the dominant color of an image snapped to a
//! small OkLab lattice, plus six 2-bit brightness offsets for a 3x2 preview.
//!
//! # Quick Start
//!
//! ```
//! use lqip_core::{encode_colors, Lqip, Srgb};
//!
//! let dominant = Srgb::new(70, 110, 160);
//! let samples = [
//!     Srgb::new(200, 220, 240), Srgb::new(180, 200, 230), Srgb::new(150, 170, 210),
//!     Srgb::new(40, 60, 90),    Srgb::new(50, 70, 100),   Srgb::new(30, 40, 60),
//! ];
//!
//! let value = encode_colors(dominant, &samples).unwrap();
//! assert!((-999_999..=999_999).contains(&value));
//!
//! let lqip = Lqip::unpack(value).unwrap();
//! assert!(lqip.offsets()[0] > lqip.offsets()[5]);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! dominant Srgb ──> Oklab ──> find_oklab_bits ──> QuantizedColor (ll, aaa, bbb)
//!                                                        │ lattice L
//! 6 x sample Srgb ──> Oklab L ──> 0.5 + L - base L ──> clamp ──> 2-bit level
//!                                                        │
//!                                   Lqip::pack ──> -2^19 + 20-bit word
//! ```
//!
//! # Distance Metric
//!
//! Plain Euclidean distance in OkLab pulls colors toward the neutral axis,
//! because the chroma lattice is coarse and the neutral points are always
//! "in the middle". Before differencing, the `a` and `b` components of both
//! points are divided by `1e-6 + sqrt(chroma)` of that point:
//!
//! ```text
//! a' = a / (1e-6 + sqrt(hypot(a, b)))
//! d  = hypot(L1 - L2, a1' - a2', b1' - b2')
//! ```
//!
//! This stretches low-chroma regions, so a faintly tinted color keeps its
//! hue instead of collapsing to gray. The epsilon keeps the neutral point at
//! the origin.
//!
//! # Wire Format
//!
//! ```text
//! [ca:2][cb:2][cc:2][cd:2][ce:2][cf:2][ll:2][aaa:3][bbb:3]   value = word - 2^19
//! ```
//!
//! The lattice mappings in [`lattice_l`], [`lattice_a`] and [`lattice_b`] and
//! this layout are shared with every decoder; changing either breaks
//! existing placeholders.

pub mod color;
pub mod error;
pub mod lattice;
pub mod offsets;
pub mod packing;

pub use color::{srgb_to_oklab_l, LinearRgb, Oklab, ParseColorError, Srgb};
pub use error::RangeError;
pub use lattice::{find_oklab_bits, lattice_a, lattice_b, lattice_l, scaled_distance, QuantizedColor};
pub use offsets::{quantize_offset, sample_offset, sample_offsets, SAMPLE_COUNT};
pub use packing::{encode_colors, Lqip, BIAS, LQIP_MAX, LQIP_MIN};
