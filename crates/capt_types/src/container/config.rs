//! CAPT wire-format version configuration.

/// A CAPT container opcode: two bytes, transmitted big-endian on the wire.
pub type Opcode = [u8; 2];

/// Which CAPT protocol generation a job file speaks.
///
/// Selected by matching the 8-byte magic at the start of the file against
/// [`CaptVersion::magic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptVersion {
	/// First-generation CAPT, raster compressed with SCoA.
	Capt1,
	/// Second-generation CAPT, raster compressed with HiSCoA.
	Capt2,
}

impl CaptVersion {
	const CAPT1_MAGIC: [u8; 8] = [0x01, 0x00, 0x18, 0x00, 0xCE, 0xDA, 0xDE, 0xFA];
	const CAPT2_MAGIC: [u8; 8] = [0x01, 0x00, 0x28, 0x00, 0xCE, 0xDA, 0xDE, 0xFA];

	/// Identify the version from the file's leading 8-byte magic, or
	/// `None` if it matches neither known sequence.
	pub fn from_magic(magic: &[u8; 8]) -> Option<Self> {
		match *magic {
			Self::CAPT1_MAGIC => Some(Self::Capt1),
			Self::CAPT2_MAGIC => Some(Self::Capt2),
			_ => None,
		}
	}

	/// The ordered cycle of paging opcodes whose occurrences mark page
	/// boundaries.
	pub fn paging_opcodes(self) -> &'static [Opcode] {
		match self {
			Self::Capt1 => &[[0xA0, 0xD0], [0xA0, 0xC0]],
			Self::Capt2 => &[[0xA0, 0xD0], [0xA4, 0xD0], [0x00, 0x80]],
		}
	}

	/// Byte distance from the first paging-opcode hit back to the start
	/// of the page header.
	pub fn page_header_size(self) -> u64 {
		match self {
			Self::Capt1 => 106,
			Self::Capt2 => 118,
		}
	}

	/// The opcode marking a raster-setup packet, common to both versions.
	pub fn raster_setup_opcode(self) -> Opcode {
		[0xA0, 0xD0]
	}

	/// The opcode carrying raster payload data.
	pub fn raster_data_opcode(self) -> Opcode {
		match self {
			Self::Capt1 => [0xA0, 0xC0],
			Self::Capt2 => [0x00, 0x80],
		}
	}

	/// The opcode terminating a page's raster stream.
	pub fn raster_end_opcode(self) -> Opcode {
		[0xA2, 0xD0]
	}

	/// Short codec name used in raw-format page headers.
	pub fn codec_name(self) -> &'static str {
		match self {
			Self::Capt1 => "SCOA",
			Self::Capt2 => "HISCOA",
		}
	}

	/// Whether this version's raster codec is SCoA, i.e. can be decoded
	/// to `p4` by this crate.
	pub fn has_scoa_decoder(self) -> bool {
		matches!(self, Self::Capt1)
	}
}

/// Size in bytes of the version magic at the start of a job file.
pub const MAGIC_SIZE: u64 = 8;
