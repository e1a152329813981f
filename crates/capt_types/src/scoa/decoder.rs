//! SCoA decoder: reconstructs a 1-bit raster line by line from a stream of
//! SCoA opcodes.
//!
//! Every opcode ultimately produces up to three logical segments, written
//! to the current line in this fixed order: bytes copied from the
//! previous decoded line, a run of a single repeated byte, and literal
//! bytes consumed from the input. Any of the three counts may be zero.
//! When the current line fills, it is promoted to become the next line's
//! back-reference source and writing continues into a fresh line — an
//! opcode's output segments are never truncated at a line boundary.

use std::collections::VecDeque;

use super::constants::*;
use crate::error::{CaptError, Result};

/// A source of bytes that may be exhausted mid-sequence. Implemented by
/// [`crate::byte_source::ByteSource`] sources and by
/// [`crate::container::extractor::PacketExtractor`].
pub trait ByteFeed {
	/// Pull the next byte, or `None` at end of stream.
	fn feed_next(&mut self) -> Result<Option<u8>>;
}

impl<T: crate::byte_source::ByteSource> ByteFeed for T {
	fn feed_next(&mut self) -> Result<Option<u8>> {
		self.next_byte()
	}
}

impl<B: crate::byte_source::ByteSource> ByteFeed for crate::container::extractor::PacketExtractor<'_, B> {
	fn feed_next(&mut self) -> Result<Option<u8>> {
		self.next_byte()
	}
}

/// Streaming decompressor for one SCoA raster.
pub struct Decoder {
	line_size: usize,
	prev_line: Vec<u8>,
	cur_line: Vec<u8>,
	i_buf: usize,
	input_cursor: u64,
	pending: VecDeque<u8>,
	done: bool,
}

impl Decoder {
	/// Create a decoder for a raster whose scan lines are `line_size`
	/// bytes wide, with both line buffers initialized to `init_fill`.
	pub fn new(line_size: usize, init_fill: u8) -> Result<Self> {
		if line_size == 0 {
			return Err(CaptError::InvalidConfiguration("line_size must be positive".into()));
		}
		Ok(Self {
			line_size,
			prev_line: vec![init_fill; line_size],
			cur_line: vec![init_fill; line_size],
			i_buf: 0,
			input_cursor: 0,
			pending: VecDeque::new(),
			done: false,
		})
	}

	/// Pull the next decoded raster byte, or `None` once the page has
	/// fully decoded (EOP reached, or the input ended cleanly at an
	/// opcode boundary).
	pub fn decode_byte<F: ByteFeed>(&mut self, feed: &mut F) -> Result<Option<u8>> {
		loop {
			if let Some(b) = self.pending.pop_front() {
				return Ok(Some(b));
			}
			if self.done {
				return Ok(None);
			}
			self.step(feed)?;
		}
	}

	fn required(&mut self, feed: &mut impl ByteFeed) -> Result<u8> {
		match feed.feed_next()? {
			Some(b) => {
				self.input_cursor += 1;
				Ok(b)
			}
			None => Err(CaptError::UnexpectedEnd(self.input_cursor)),
		}
	}

	/// Write one decoded byte to the current line, emitting it and
	/// promoting the line (swapping it in as the new `prev_line`) as soon
	/// as it fills.
	fn emit(&mut self, byte: u8) {
		self.cur_line[self.i_buf] = byte;
		self.pending.push_back(byte);
		self.i_buf += 1;
		if self.i_buf >= self.line_size {
			std::mem::swap(&mut self.prev_line, &mut self.cur_line);
			self.i_buf = 0;
		}
	}

	/// Parse and execute exactly one opcode.
	fn step<F: ByteFeed>(&mut self, feed: &mut F) -> Result<()> {
		let offset = self.input_cursor;
		let b = match feed.feed_next()? {
			Some(b) => b,
			None => {
				self.done = true;
				return Ok(());
			}
		};
		self.input_cursor += 1;

		let mut n_prev: usize = 0;
		let mut n_rep: usize = 0;
		let mut rb: u8 = 0;
		let mut new_bytes: Vec<u8> = Vec::new();

		match b {
			NOP => {}
			EOL => {
				n_prev = self.line_size - self.i_buf;
				if n_prev > 0 {
					log::debug!("EOL at line offset {}, padding {n_prev} byte(s) from prev_line", self.i_buf);
				}
			}
			EOP => {
				log::debug!("EOP at input offset {offset}");
				self.done = true;
				return Ok(());
			}
			_ if b & PREFIX_2_MASK == OLD_NEW => {
				let (_, hhh, lll) = split(b);
				n_prev = lll as usize;
				for _ in 0..hhh {
					new_bytes.push(self.required(feed)?);
				}
			}
			_ if b & PREFIX_2_MASK == OLD_REPEAT => {
				let (_, hhh, lll) = split(b);
				n_prev = lll as usize;
				n_rep = hhh as usize;
				rb = self.required(feed)?;
			}
			_ if b & PREFIX_2_MASK == REPEAT_NEW => {
				let (_, hhh, lll) = split(b);
				n_rep = hhh as usize;
				let n_new = lll as usize;
				if n_rep > 0 && n_new > 0 {
					rb = self.required(feed)?;
					for _ in 0..n_new {
						new_bytes.push(self.required(feed)?);
					}
				}
				// both zero, or only one nonzero: emit n_new zero bytes
				// without consuming rb, tolerating an encoder quirk.
				else {
					new_bytes = vec![0u8; n_new];
				}
			}
			_ if b & PREFIX_3_MASK == LONG_OLD => {
				let mut npx: usize = 0;
				let mut cur = b;
				while cur == LONG_OLD_ADD_248 {
					npx += 1;
					cur = self.required(feed)?;
				}
				if cur & PREFIX_3_MASK != LONG_OLD {
					return Err(CaptError::UnrecognizedOpcode { offset: self.input_cursor - 1, byte: cur });
				}
				n_prev = ((cur & LOW_5_MASK) as usize) << 3;
				let d = self.required(feed)?;
				if d & PREFIX_2_MASK == LONG_OLD_NEW {
					let (_, hhh, lll) = split(d);
					n_prev |= lll as usize;
					for _ in 0..hhh {
						new_bytes.push(self.required(feed)?);
					}
				} else if d & PREFIX_2_MASK == LONG_OLD_REPEAT {
					let (_, hhh, lll) = split(d);
					n_prev |= lll as usize;
					n_rep = hhh as usize;
					rb = self.required(feed)?;
				} else if d & PREFIX_3_MASK == LONG_OLD_EXT {
					let (_, _, lll_d) = split(d);
					let preview_high = ((d & LOW_5_MASK) as usize) << 3;
					let e = self.required(feed)?;
					let (_, hhh_e, _) = split(e);
					if e & PREFIX_2_MASK == LONG_REPEAT_OLD {
						n_rep = preview_high | hhh_e as usize;
						n_prev |= lll_d as usize;
						rb = self.required(feed)?;
					} else if e & PREFIX_2_MASK == LONG_REPEAT_OLD_NEW {
						let n_new = preview_high | hhh_e as usize;
						n_prev |= lll_d as usize;
						for _ in 0..n_new {
							new_bytes.push(self.required(feed)?);
						}
					} else {
						return Err(CaptError::UnrecognizedOpcode { offset: self.input_cursor - 1, byte: e });
					}
				} else {
					return Err(CaptError::UnrecognizedOpcode { offset: self.input_cursor - 1, byte: d });
				}
				n_prev += 248 * npx;
			}
			_ if b & PREFIX_3_MASK == LONG_REPEAT => {
				n_rep = ((b & LOW_5_MASK) as usize) << 3;
				let d = self.required(feed)?;
				let (prefix2, hhh, lll) = split(d);
				match prefix2 {
					LONG_REPEAT_NEW => {
						let n_new = lll as usize;
						n_rep |= hhh as usize;
						rb = self.required(feed)?;
						for _ in 0..n_new {
							new_bytes.push(self.required(feed)?);
						}
					}
					LONG_REPEAT_NEW_ONLY => {
						let n_new = n_rep | hhh as usize;
						n_rep = 0;
						for _ in 0..n_new {
							new_bytes.push(self.required(feed)?);
						}
					}
					LONG_REPEAT_OLD => {
						n_rep |= hhh as usize;
						n_prev |= lll as usize;
						rb = self.required(feed)?;
					}
					_ => {
						let n_new = n_rep | hhh as usize;
						n_rep = 0;
						n_prev |= lll as usize;
						for _ in 0..n_new {
							new_bytes.push(self.required(feed)?);
						}
					}
				}
			}
			_ => {
				log::warn!("unrecognized SCoA opcode {b:#04x} at offset {offset}");
				return Err(CaptError::UnrecognizedOpcode { offset, byte: b });
			}
		}

		self.writeout(n_prev, n_rep, rb, &new_bytes);
		Ok(())
	}

	fn writeout(&mut self, n_prev: usize, n_rep: usize, rb: u8, new_bytes: &[u8]) {
		let old_src = self.prev_line.clone();
		let start = self.i_buf;
		for k in 0..n_prev {
			let byte = old_src[(start + k) % self.line_size];
			self.emit(byte);
		}
		for _ in 0..n_rep {
			self.emit(rb);
		}
		for &b in new_bytes {
			self.emit(b);
		}
	}
}
