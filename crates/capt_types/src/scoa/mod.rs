//! Smart Compression Architecture (SCoA) raster decoder.

mod constants;
mod decoder;

pub use decoder::{ByteFeed, Decoder};
