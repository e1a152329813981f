//! This crate provides core data types and parsers for Canon CAPT print job
//! files, along with a decoder for the SCoA raster compression scheme used
//! inside them.
//!
//! # Formats
//!
//! - **CAPT container**: a stream of variable-length tagged packets, framing
//!   page setup data, raster payloads, and end-of-job markers. Two wire
//!   variants exist (CAPT 1 and CAPT 2), distinguished by an 8-byte magic
//!   number at the start of the file.
//! - **SCoA**: a 1-bit raster compression scheme, decoded line by line
//!   against a back-reference to the previous line.
//!
//! # Examples
//!
//! ```no_run
//! use capt_types::container::Stream;
//! use std::fs::File;
//!
//! let file = File::open("job.capt").unwrap();
//! let mut stream = Stream::new(file).unwrap();
//! let page = stream.get_page(1, capt_types::container::PageFormat::P4).unwrap();
//! ```

pub mod byte_source;
pub mod container;
pub mod error;
pub mod prelude;
pub mod scoa;
mod util;

pub use error::CaptError;
