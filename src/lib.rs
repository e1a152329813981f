//! `capt-toolkit` is a reference implementation for inspecting Canon CAPT
//! print job containers and decoding their SCoA-compressed rasters.
//!
//! The actual container and codec logic lives in [`capt_types`]; this crate
//! re-exports it and hosts the `captctl` command-line tool.

pub use capt_types;
