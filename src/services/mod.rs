pub mod decoder;
pub mod encoder;
pub mod palette;

pub use decoder::{DecodedImage, ImageSource};
pub use encoder::{encode, encode_batch, Encoder};
pub use palette::{dominant_color, MedianCut, PaletteExtractor};
