//! Packet extractor: yields the concatenated payload bytes of matching
//! packets until a terminator, without materializing whole pages.

use std::collections::VecDeque;

use crate::byte_source::ByteSource;
use crate::container::config::Opcode;
use crate::error::Result;
use crate::util::{payload_skip, word};

/// Extracts the payload bytes of packets matching `target_opcode` from a
/// byte source, stopping at either `n` matched packets or a packet matching
/// `end_opcode`.
///
/// Payloads are produced lazily, byte by byte, so a caller can stream a
/// page's raster data through a decoder without buffering the whole page.
pub struct PacketExtractor<'a, B: ByteSource> {
	source: &'a mut B,
	target: Opcode,
	end: Option<Opcode>,
	yield_end: bool,
	remaining: Option<u64>,
	pending: VecDeque<u8>,
	last_byte: Option<u8>,
	done: bool,
}

impl<'a, B: ByteSource> PacketExtractor<'a, B> {
	/// Create an extractor over `source` yielding payloads of packets with
	/// opcode `target`, stopping at `end` (if given) or after `n` matched
	/// packets (if given).
	pub fn new(
		source: &'a mut B,
		target: Opcode,
		end: Option<Opcode>,
		n: Option<u64>,
		yield_end: bool,
	) -> Self {
		Self {
			source,
			target,
			end,
			yield_end,
			remaining: n,
			pending: VecDeque::new(),
			last_byte: None,
			done: false,
		}
	}

	/// Pull the next extracted payload byte, or `None` once extraction has
	/// finished.
	pub fn next_byte(&mut self) -> Result<Option<u8>> {
		loop {
			if let Some(b) = self.pending.pop_front() {
				return Ok(Some(b));
			}
			if self.done {
				return Ok(None);
			}
			self.fill()?;
		}
	}

	fn fill(&mut self) -> Result<()> {
		if self.last_byte.is_none() {
			self.last_byte = match self.source.next_byte()? {
				Some(b) => Some(b),
				None => {
					self.done = true;
					return Ok(());
				}
			};
		}
		loop {
			if let Some(0) = self.remaining {
				self.done = true;
				return Ok(());
			}
			let x = match self.source.next_byte()? {
				Some(x) => x,
				None => {
					self.done = true;
					return Ok(());
				}
			};
			let lb = self.last_byte.expect("seeded above");
			let window = [lb, x];
			let is_target = window == self.target;
			let is_end = self.end == Some(window);
			if is_target || is_end {
				let vl = match self.source.next_byte()? {
					Some(b) => b,
					None => {
						self.done = true;
						return Ok(());
					}
				};
				let vh = match self.source.next_byte()? {
					Some(b) => b,
					None => {
						self.done = true;
						return Ok(());
					}
				};
				let declared = word(vl, vh);
				let len = payload_skip(declared)?;
				if is_end {
					log::debug!("end opcode {:02X?} reached, yield_end={}", self.end, self.yield_end);
				}
				if is_end && !self.yield_end {
					for _ in 0..len {
						if self.source.next_byte()?.is_none() {
							break;
						}
					}
					self.done = true;
					return Ok(());
				}
				for _ in 0..len {
					match self.source.next_byte()? {
						Some(b) => self.pending.push_back(b),
						None => {
							self.done = true;
							return Ok(());
						}
					}
				}
				if is_end {
					self.done = true;
					return Ok(());
				}
				if let Some(remaining) = self.remaining.as_mut() {
					*remaining -= 1;
				}
				self.last_byte = Some(x);
				return Ok(());
			}
			self.last_byte = Some(x);
		}
	}
}
