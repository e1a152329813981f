//! End-to-end page extraction over synthetic CAPT 1 job files, built
//! byte-for-byte per the external scenario fixtures: one page, one
//! raster-setup packet (line width 1, height 1), and a single raster-data
//! packet followed by the raster-end terminator.

use std::io::Cursor;

use capt_types::container::{CaptVersion, PageFormat, Stream};
use capt_types::error::CaptError;

const CAPT1_MAGIC: [u8; 8] = [0x01, 0x00, 0x18, 0x00, 0xCE, 0xDA, 0xDE, 0xFA];
const CAPT2_MAGIC: [u8; 8] = [0x01, 0x00, 0x28, 0x00, 0xCE, 0xDA, 0xDE, 0xFA];

/// Build a minimal CAPT 1 job file with one page whose raster-setup packet
/// declares `line_byte_width`/`height` and whose single raster-data packet
/// carries `raster_payload`.
fn capt1_job(line_byte_width: u16, height: u16, raster_payload: &[u8]) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(&CAPT1_MAGIC);

	// Opaque page header filler; page_header_size for CAPT 1 is 106 bytes
	// and this job places the header immediately after the magic.
	out.extend(std::iter::repeat(0u8).take(106));

	// Raster-setup packet (A0 D0): 26 bytes of filler payload, then the
	// line byte width and height as little-endian u16s at payload offsets
	// 26 and 28, matching the original's `RASTER_LINE_WIDTH_OFFSET`.
	let mut setup_payload = vec![0u8; 26];
	setup_payload.extend_from_slice(&line_byte_width.to_le_bytes());
	setup_payload.extend_from_slice(&height.to_le_bytes());
	let setup_len = (4 + setup_payload.len()) as u16;
	out.extend_from_slice(&[0xA0, 0xD0]);
	out.extend_from_slice(&setup_len.to_le_bytes());
	out.extend_from_slice(&setup_payload);

	// Raster-data packet (A0 C0).
	let data_len = (4 + raster_payload.len()) as u16;
	out.extend_from_slice(&[0xA0, 0xC0]);
	out.extend_from_slice(&data_len.to_le_bytes());
	out.extend_from_slice(raster_payload);

	// Raster-end terminator (A2 D0), empty payload.
	out.extend_from_slice(&[0xA2, 0xD0, 0x04, 0x00]);

	out
}

#[test]
fn raw_fetch_produces_codec_header_and_untouched_payload() {
	let job = capt1_job(1, 1, &[0x42]);
	let mut stream = Stream::new(Cursor::new(job)).unwrap();
	assert_eq!(stream.version(), CaptVersion::Capt1);
	assert_eq!(stream.page_count().unwrap(), 1);

	let out = stream.get_page(1, PageFormat::Raw).unwrap();
	assert_eq!(out, b"SCOA\n8 1\n1\n\x42".to_vec());
}

#[test]
fn p4_fetch_decodes_eol_padding_from_init_fill() {
	// SCoA payload is the single opcode byte 0x41 (EOL): with line_size=1
	// this pads the whole one-byte line from prev_line, i.e. the decoder's
	// 0xF0 initial fill.
	let job = capt1_job(1, 1, &[0x41]);
	let mut stream = Stream::new(Cursor::new(job)).unwrap();

	let out = stream.get_page(1, PageFormat::P4).unwrap();
	assert_eq!(out, b"P4\n8 1\n\xF0".to_vec());
}

#[test]
fn invalid_page_number_is_rejected() {
	let job = capt1_job(1, 1, &[0x42]);
	let mut stream = Stream::new(Cursor::new(job)).unwrap();

	let err = stream.get_page(2, PageFormat::Raw).unwrap_err();
	assert!(matches!(err, CaptError::InvalidPage { requested: 2, available: 1 }));

	let err = stream.get_page(0, PageFormat::Raw).unwrap_err();
	assert!(matches!(err, CaptError::InvalidPage { requested: 0, available: 1 }));
}

#[test]
fn unknown_version_magic_is_rejected() {
	let mut job = vec![0u8; 16];
	job[0..8].copy_from_slice(b"NOTCAPT\0");
	let err = Stream::new(Cursor::new(job)).unwrap_err();
	assert!(matches!(err, CaptError::UnknownVersion(_)));
}

#[test]
fn unsupported_output_format_is_rejected() {
	let err = "bmp".parse::<PageFormat>().unwrap_err();
	assert!(matches!(err, CaptError::UnsupportedFormat(ref s) if s == "bmp"));
}

/// A CAPT 2 job speaks HiSCoA, which this core cannot decode to `p4`.
fn capt2_job(line_byte_width: u16, height: u16, raster_payload: &[u8]) -> Vec<u8> {
	let mut out = Vec::new();
	out.extend_from_slice(&CAPT2_MAGIC);
	out.extend(std::iter::repeat(0u8).take(118));

	let mut setup_payload = vec![0u8; 26];
	setup_payload.extend_from_slice(&line_byte_width.to_le_bytes());
	setup_payload.extend_from_slice(&height.to_le_bytes());
	let setup_len = (4 + setup_payload.len()) as u16;
	out.extend_from_slice(&[0xA0, 0xD0]);
	out.extend_from_slice(&setup_len.to_le_bytes());
	out.extend_from_slice(&setup_payload);

	// HiSCoA params packet (A4 D0), empty payload.
	out.extend_from_slice(&[0xA4, 0xD0, 0x04, 0x00]);

	let data_len = (4 + raster_payload.len()) as u16;
	out.extend_from_slice(&[0x00, 0x80]);
	out.extend_from_slice(&data_len.to_le_bytes());
	out.extend_from_slice(raster_payload);

	out.extend_from_slice(&[0xA2, 0xD0, 0x04, 0x00]);
	out
}

#[test]
fn capt2_job_is_detected_but_has_no_scoa_decoder() {
	let job = capt2_job(1, 1, &[0xAB]);
	let mut stream = Stream::new(Cursor::new(job)).unwrap();
	assert_eq!(stream.version(), CaptVersion::Capt2);
	assert_eq!(stream.page_count().unwrap(), 1);

	let err = stream.get_page(1, PageFormat::P4).unwrap_err();
	assert!(matches!(err, CaptError::NoDecoder(ref s) if s == "HISCOA"));

	// Raw fetch still works: HiSCoA payload is passed through untouched.
	let out = stream.get_page(1, PageFormat::Raw).unwrap();
	assert_eq!(out, b"HISCOA\n8 1\n1\n\xAB".to_vec());
}
