pub mod config;

pub use config::{AppConfig, EncodeOptions};
