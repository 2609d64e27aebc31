//! Text payload detection.
//!
//! SCTE-35 payloads travel as raw bytes in transport streams, as base64 in
//! HLS tags and as hexadecimal in logs and DASH manifests. A base64 section
//! always starts with `/D` (the encoding of table id 0xFC) and a hex one with
//! `0x`, `fc` or `FC`.

use crate::error::{DecodeError, DecodeResult};
use crate::parser::{DecodeOptions, decode_with};
use crate::types::Packet;
use data_encoding::{BASE64, HEXLOWER_PERMISSIVE};
use std::borrow::Cow;
use tracing::trace;

/// Decodes a payload given as base64, hexadecimal or raw bytes.
///
/// The encoding is picked from the first bytes:
///
/// * `/D`: standard base64
/// * `0x`, `f` or `F`: hexadecimal, either case
/// * anything else: raw binary
///
/// A trailing newline is ignored for the text encodings.
///
/// # Errors
///
/// [`DecodeError::Base64`] or [`DecodeError::Hex`] when the text does not
/// decode; nothing has been read from the section at that point. Otherwise
/// the same errors as [`decode`](crate::decode).
///
/// # Example
///
/// ```rust
/// let packet = scte35_decoder::parse(b"/DAWAAAAAAAAAP/wBQb+Qjo1vQAAuwxz9A==\n").unwrap();
/// assert_eq!(packet.header.splice_command_type, 0x06);
///
/// let packet = scte35_decoder::parse(b"0xfc301100000000000000fff0000000007a4fbfff").unwrap();
/// assert_eq!(packet.header.splice_command_name, "splice_null");
/// ```
pub fn parse(data: &[u8]) -> DecodeResult<Packet> {
    parse_with(data, &DecodeOptions::default())
}

/// Like [`parse`], with decoder options.
pub fn parse_with(data: &[u8], options: &DecodeOptions) -> DecodeResult<Packet> {
    let bytes = to_bytes(data)?;
    decode_with(&bytes, options)
}

/// Converts a text payload to raw bytes, borrowing raw input as is.
pub fn to_bytes(data: &[u8]) -> DecodeResult<Cow<'_, [u8]>> {
    if data.starts_with(b"/D") {
        trace!("payload detected as base64");
        let bytes = BASE64
            .decode(trim_newline(data))
            .map_err(DecodeError::Base64)?;
        Ok(Cow::Owned(bytes))
    } else if data.starts_with(b"0x") || data.starts_with(b"f") || data.starts_with(b"F") {
        trace!("payload detected as hexadecimal");
        let text = trim_newline(data);
        let text = text.strip_prefix(b"0x").unwrap_or(text);
        let bytes = HEXLOWER_PERMISSIVE
            .decode(text)
            .map_err(DecodeError::Hex)?;
        Ok(Cow::Owned(bytes))
    } else {
        Ok(Cow::Borrowed(data))
    }
}

fn trim_newline(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1);
    &data[..end]
}
