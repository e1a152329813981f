//! Error types for CAPT container parsing and SCoA decoding.

use thiserror::Error;

/// Errors that can occur while parsing a CAPT job container or decoding an
/// SCoA raster stream.
#[derive(Debug, Error)]
pub enum CaptError {
	/// The 8-byte magic at the start of the file did not match a known
	/// CAPT version.
	#[error("unknown CAPT version magic: {0:02X?}")]
	UnknownVersion([u8; 8]),

	/// A requested page number was out of range.
	#[error("invalid page {requested}: job has {available} page(s)")]
	InvalidPage {
		/// 1-based page number that was requested.
		requested: u32,
		/// Total number of pages detected in the job.
		available: usize,
	},

	/// An output format string did not match a known format.
	#[error("unsupported output format: {0}")]
	UnsupportedFormat(String),

	/// A `p4` page fetch was requested for a version whose raster codec
	/// is not SCoA.
	#[error("no SCoA decoder available for codec {0}")]
	NoDecoder(String),

	/// The SCoA decoder encountered a byte matching no recognized opcode
	/// prefix.
	#[error("unrecognized SCoA opcode {byte:#04x} at input offset {offset}")]
	UnrecognizedOpcode {
		/// Byte offset, relative to the start of the SCoA stream, of the
		/// offending byte.
		offset: u64,
		/// The offending byte.
		byte: u8,
	},

	/// The input ended while an opcode or one of its sub-fields was still
	/// incomplete.
	#[error("input ended mid-opcode at offset {0}")]
	UnexpectedEnd(u64),

	/// A page-level seek was attempted on a byte source that does not
	/// support seeking.
	#[error("byte source does not support seeking")]
	SeekUnsupported,

	/// A decoder or packet was configured with an invalid parameter, such
	/// as a non-positive line size.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// A CAPT packet declared a total length shorter than the 4-byte
	/// header it must contain.
	#[error("invalid packet framing: declared length {0} is less than the 4-byte header")]
	InvalidFraming(u16),

	/// Underlying I/O failure from a file-backed byte source.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, CaptError>;
