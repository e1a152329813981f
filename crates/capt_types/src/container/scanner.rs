//! Packet scanner: locates the first offset of each opcode in a recurring
//! cycle, without retaining packet payloads.

use crate::byte_source::ByteSource;
use crate::container::config::Opcode;
use crate::error::Result;
use crate::util::{payload_skip, word};

/// Yields successive tuples of offsets, one offset per opcode in the
/// configured cycle, each the position of the first packet matching that
/// opcode since the previous cycle position.
///
/// A rolling two-byte window is slid over the source one byte at a time.
/// When the window matches the opcode currently being sought, the packet's
/// declared length is read and the source is advanced past its payload
/// before the next opcode in the cycle is sought. A partial tuple at end of
/// input is discarded rather than yielded.
pub struct PacketScanner<'a, B: ByteSource> {
	source: &'a mut B,
	opcodes: &'a [Opcode],
	bias: i64,
	next_index: usize,
	tuple: Vec<i64>,
	last_byte: Option<u8>,
	done: bool,
}

impl<'a, B: ByteSource> PacketScanner<'a, B> {
	/// Create a scanner over `source` seeking the ordered `opcodes` cycle,
	/// with offsets adjusted by `bias`.
	pub fn new(source: &'a mut B, opcodes: &'a [Opcode], bias: i64) -> Self {
		Self {
			source,
			opcodes,
			bias,
			next_index: 0,
			tuple: vec![0i64; opcodes.len()],
			last_byte: None,
			done: false,
		}
	}

	/// Pull the next completed offset tuple, or `None` at end of stream.
	pub fn next_tuple(&mut self) -> Result<Option<Vec<i64>>> {
		if self.done {
			return Ok(None);
		}
		if self.last_byte.is_none() {
			self.last_byte = match self.source.next_byte()? {
				Some(b) => Some(b),
				None => {
					self.done = true;
					return Ok(None);
				}
			};
		}
		let mut i: i64 = 1;
		loop {
			let x = match self.source.next_byte()? {
				Some(x) => x,
				None => {
					self.done = true;
					return Ok(None);
				}
			};
			let lb = self.last_byte.expect("seeded above");
			let window = [lb, x];
			if window == self.opcodes[self.next_index] {
				self.tuple[self.next_index] = (i - 1) + self.bias;
				let completed = self.next_index == self.opcodes.len() - 1;
				let vl = match self.source.next_byte()? {
					Some(b) => b,
					None => {
						self.done = true;
						return Ok(None);
					}
				};
				let vh = match self.source.next_byte()? {
					Some(b) => b,
					None => {
						self.done = true;
						return Ok(None);
					}
				};
				let declared = word(vl, vh);
				let skip = payload_skip(declared)?;
				for _ in 0..skip {
					if self.source.next_byte()?.is_none() {
						self.done = true;
						return Ok(None);
					}
				}
				i += skip as i64 + 2;
				self.next_index = (self.next_index + 1) % self.opcodes.len();
				if completed {
					let out = std::mem::replace(&mut self.tuple, vec![0i64; self.opcodes.len()]);
					self.last_byte = Some(x);
					return Ok(Some(out));
				}
			}
			self.last_byte = Some(x);
			i += 1;
		}
	}
}
