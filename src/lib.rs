//! lqip - single-integer image placeholders
//!
//! Decodes an image, finds its dominant color and a 3x2 preview, and packs
//! both into one integer a stylesheet can carry. The color math and the
//! bit layout live in `lqip-core`; this crate adds decoding, palette
//! extraction, configuration and the command line.

pub mod error;
pub mod models;
pub mod services;

pub use error::{ConfigError, EncodeError};
pub use models::{AppConfig, EncodeOptions};
pub use services::{encode, encode_batch, Encoder};
