//! Page indexing and per-page fetch, the top-level entry point for reading
//! a CAPT job file.

use std::io::{Read, Seek};

use crate::byte_source::{ByteSource, FileSource};
use crate::container::config::{CaptVersion, MAGIC_SIZE};
use crate::container::extractor::PacketExtractor;
use crate::container::scanner::PacketScanner;
use crate::error::{CaptError, Result};
use crate::scoa::Decoder as ScoaDecoder;
use crate::util::word;

/// Byte offset, within a raster-setup packet's *payload*, of the
/// little-endian 16-bit line byte width. Matches
/// `captstream.py`'s `RASTER_LINE_WIDTH_OFFSET`, which is applied to the
/// already header-stripped payload iterator returned by `extract_packets`,
/// i.e. payload-relative, not packet-relative.
const RASTER_LINE_WIDTH_OFFSET: u64 = 26;

/// Which byte layout to produce a decoded page in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageFormat {
	/// The raw, still SCoA/HiSCoA-compressed payload, with a short text
	/// header describing codec and dimensions.
	Raw,
	/// Fully decoded PBM P4 bitmap (SCoA pages only).
	P4,
}

impl std::str::FromStr for PageFormat {
	type Err = CaptError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"raw" => Ok(Self::Raw),
			"p4" => Ok(Self::P4),
			other => Err(CaptError::UnsupportedFormat(other.to_string())),
		}
	}
}

/// One page's offsets into the job file, as discovered by the scanner.
#[derive(Debug, Clone, Copy)]
pub struct PageInfo {
	/// Offset of the page header (the first paging-opcode hit, minus the
	/// version's `page_header_size`).
	pub page_header: u64,
	/// Offset of the raster-setup packet.
	pub raster_setup: u64,
	/// Offset at which the raster data stream begins.
	pub raster_data_start: u64,
}

/// A CAPT job file opened for page-level access.
///
/// Page offsets are discovered by a single scan over the whole file on
/// first access, then memoized; `line_size`-specific SCoA decoder state is
/// created fresh per page.
pub struct Stream<R: Read + Seek> {
	source: FileSource<R>,
	version: CaptVersion,
	pages: Option<Vec<PageInfo>>,
}

impl<R: Read + Seek> Stream<R> {
	/// Open a CAPT job file, detecting its version from the leading magic.
	pub fn new(reader: R) -> Result<Self> {
		let mut source = FileSource::new(reader);
		let mut magic = [0u8; 8];
		for slot in magic.iter_mut() {
			*slot = source.next_byte()?.ok_or(CaptError::UnknownVersion([0u8; 8]))?;
		}
		let version = CaptVersion::from_magic(&magic).ok_or(CaptError::UnknownVersion(magic))?;
		Ok(Self { source, version, pages: None })
	}

	/// The job's detected CAPT version.
	pub fn version(&self) -> CaptVersion {
		self.version
	}

	/// Number of pages detected in the job, running the index scan if it
	/// has not yet run.
	pub fn page_count(&mut self) -> Result<usize> {
		self.ensure_index()?;
		Ok(self.pages.as_ref().expect("ensured above").len())
	}

	fn ensure_index(&mut self) -> Result<()> {
		if self.pages.is_some() {
			return Ok(());
		}
		log::debug!("indexing pages for {:?} job, cycle {:?}", self.version, self.version.paging_opcodes());
		self.source.seek(MAGIC_SIZE)?;
		let opcodes = self.version.paging_opcodes();
		let header_size = self.version.page_header_size();
		let mut pages = Vec::new();
		{
			let mut scanner = PacketScanner::new(&mut self.source, opcodes, MAGIC_SIZE as i64);
			while let Some(tuple) = scanner.next_tuple()? {
				let raster_setup = tuple[0] as u64;
				let raster_data_start = *tuple.last().expect("non-empty cycle") as u64;
				let page_header = raster_setup.checked_sub(header_size).ok_or_else(|| {
					CaptError::InvalidConfiguration(format!(
						"page header offset would underflow at raster_setup={raster_setup}"
					))
				})?;
				if page_header < MAGIC_SIZE {
					return Err(CaptError::InvalidConfiguration(format!(
						"page header offset {page_header} precedes the version magic"
					)));
				}
				log::debug!("found page {} at header offset {page_header}", pages.len() + 1);
				pages.push(PageInfo { page_header, raster_setup, raster_data_start });
			}
		}
		log::debug!("page index complete: {} page(s)", pages.len());
		self.pages = Some(pages);
		Ok(())
	}

	fn page_info(&mut self, page: u32) -> Result<PageInfo> {
		self.ensure_index()?;
		let pages = self.pages.as_ref().expect("ensured above");
		if page < 1 || page as usize > pages.len() {
			return Err(CaptError::InvalidPage { requested: page, available: pages.len() });
		}
		Ok(pages[page as usize - 1])
	}

	/// Read the raster-setup packet at `raster_setup_offset` and return
	/// `(line_byte_width, pixel_height)`.
	fn raster_dims(&mut self, raster_setup_offset: u64) -> Result<(u16, u16)> {
		self.source.seek(raster_setup_offset)?;
		let opcode = self.version.raster_setup_opcode();
		let mut extractor = PacketExtractor::new(&mut self.source, opcode, None, Some(1), false);
		for _ in 0..RASTER_LINE_WIDTH_OFFSET {
			extractor.next_byte()?.ok_or(CaptError::UnexpectedEnd(raster_setup_offset))?;
		}
		let lo = extractor.next_byte()?.ok_or(CaptError::UnexpectedEnd(raster_setup_offset))?;
		let hi = extractor.next_byte()?.ok_or(CaptError::UnexpectedEnd(raster_setup_offset))?;
		let line_byte_width = word(lo, hi);
		let lo = extractor.next_byte()?.ok_or(CaptError::UnexpectedEnd(raster_setup_offset))?;
		let hi = extractor.next_byte()?.ok_or(CaptError::UnexpectedEnd(raster_setup_offset))?;
		let height = word(lo, hi);
		Ok((line_byte_width, height))
	}

	/// Fetch page `page` (1-based) in the requested `format`.
	pub fn get_page(&mut self, page: u32, format: PageFormat) -> Result<Vec<u8>> {
		let info = self.page_info(page)?;
		let (line_byte_width, height) = self.raster_dims(info.raster_setup)?;
		let pixel_width = line_byte_width as u32 * 8;

		match format {
			PageFormat::Raw => {
				self.source.seek(info.raster_data_start)?;
				let target = self.version.raster_data_opcode();
				let end = self.version.raster_end_opcode();
				let mut extractor =
					PacketExtractor::new(&mut self.source, target, Some(end), None, false);
				let mut payload = Vec::new();
				while let Some(b) = extractor.next_byte()? {
					payload.push(b);
				}
				let header = format!(
					"{}\n{} {}\n{}\n",
					self.version.codec_name(),
					pixel_width,
					height,
					payload.len()
				);
				let mut out = header.into_bytes();
				out.extend_from_slice(&payload);
				Ok(out)
			}
			PageFormat::P4 => {
				if !self.version.has_scoa_decoder() {
					return Err(CaptError::NoDecoder(self.version.codec_name().to_string()));
				}
				self.source.seek(info.raster_data_start)?;
				let target = self.version.raster_data_opcode();
				let end = self.version.raster_end_opcode();
				let mut extractor =
					PacketExtractor::new(&mut self.source, target, Some(end), None, false);
				let mut decoder = ScoaDecoder::new(line_byte_width as usize, 0xF0)?;
				let mut raster = Vec::new();
				while let Some(b) = decoder.decode_byte(&mut extractor)? {
					raster.push(b);
				}
				let header = format!("P4\n{pixel_width} {height}\n");
				let mut out = header.into_bytes();
				out.extend_from_slice(&raster);
				Ok(out)
			}
		}
	}
}
