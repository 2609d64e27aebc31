//! Main decoding functions for SCTE-35 messages.
//!
//! This module walks a splice_info_section from its header through the splice
//! command and the descriptor loop to the trailing checksums.

use crate::bit_reader::BitReader;
use crate::commands::parse_splice_command;
use crate::descriptors::{
    SpliceDescriptor, SpliceDescriptorTag, parse_audio_descriptor, parse_avail_descriptor,
    parse_dtmf_descriptor, parse_generic_descriptor, parse_segmentation_descriptor,
    parse_time_descriptor,
};
use crate::error::{DecodeError, DecodeResult};
use crate::types::{Header, Packet, Trailer};
use tracing::{trace, warn};

/// Runtime knobs for the packet decoder.
///
/// ```rust
/// use scte35_decoder::DecodeOptions;
///
/// let options = DecodeOptions::default();
/// assert!(!options.typed_descriptors);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode avail, DTMF, time and audio descriptors into their typed form
    /// instead of keeping them as raw bytes.
    ///
    /// Segmentation descriptors are always decoded.
    pub typed_descriptors: bool,
}

impl DecodeOptions {
    /// Enables or disables typed decoding of non-segmentation descriptors.
    pub fn typed_descriptors(mut self, enabled: bool) -> Self {
        self.typed_descriptors = enabled;
        self
    }
}

/// Decodes a splice_info_section from raw bytes.
///
/// This is the main entry point when the payload is already binary. For text
/// payloads (base64 or hexadecimal) use [`parse`](crate::parse).
///
/// # Errors
///
/// Returns [`DecodeError::Truncated`] when the data ends before the section
/// does. The error still carries every field decoded up to that point.
///
/// # Example
///
/// ```rust
/// use data_encoding::BASE64;
/// use scte35_decoder::{SpliceCommand, decode};
///
/// let buffer = BASE64.decode(b"/DAWAAAAAAAAAP/wBQb+Qjo1vQAAuwxz9A==").unwrap();
/// let packet = decode(&buffer).unwrap();
///
/// assert_eq!(packet.header.table_id, 0xfc);
/// assert_eq!(packet.header.splice_command_name, "time_signal");
/// match packet.splice_command {
///     Some(SpliceCommand::TimeSignal(signal)) => {
///         assert_eq!(signal.splice_time.pts_time, Some(1_111_111_101));
///     }
///     other => panic!("unexpected command: {other:?}"),
/// }
/// ```
pub fn decode(buffer: &[u8]) -> DecodeResult<Packet> {
    decode_with(buffer, &DecodeOptions::default())
}

/// Decodes a splice_info_section from raw bytes with the given options.
pub fn decode_with(buffer: &[u8], options: &DecodeOptions) -> DecodeResult<Packet> {
    let mut reader = BitReader::new(buffer);
    let packet = parse_packet(&mut reader, options);
    match reader.error() {
        None => Ok(packet),
        Some(source) => Err(DecodeError::Truncated {
            packet: Box::new(packet),
            source,
        }),
    }
}

/// Decodes a packet from the reader, leaving any end-of-data condition on it.
///
/// Fields past the end of the data are left at zero; check
/// [`BitReader::error`] afterwards to tell a complete packet from a partial one.
pub fn parse_packet(reader: &mut BitReader<'_>, options: &DecodeOptions) -> Packet {
    trace!(offset = reader.offset(), "decoding splice_info_section");
    let mut header = parse_header(reader);

    let splice_command = parse_splice_command(reader, header.splice_command_type);
    header.splice_command_name = splice_command.as_ref().map_or("", |c| c.name());

    let trailer = parse_trailer(reader, header.encrypted_packet, options);

    Packet {
        header,
        splice_command,
        trailer,
    }
}

/// Decodes the fixed header fields, up to and including `splice_command_type`.
pub fn parse_header(reader: &mut BitReader<'_>) -> Header {
    Header {
        table_id: reader.read_u8(8),
        section_syntax_indicator: reader.read_bool(1),
        private_indicator: reader.read_bool(1),
        sap_type: reader.read_u8(2),
        section_length: reader.read_u16(12),
        protocol_version: reader.read_u8(8),
        encrypted_packet: reader.read_bool(1),
        encryption_algorithm: reader.read_u8(6),
        pts_adjustment: reader.read(33),
        cw_index: reader.read_u8(8),
        tier: reader.read_u16(12),
        splice_command_length: reader.read_u16(12),
        splice_command_type: reader.read_u8(8),
        splice_command_name: "",
    }
}

fn parse_trailer(reader: &mut BitReader<'_>, encrypted: bool, options: &DecodeOptions) -> Trailer {
    let descriptor_loop_length = reader.read_u16(16);
    let end = reader.offset() + descriptor_loop_length as usize * 8;

    let mut splice_descriptors = Vec::new();
    while reader.offset() < end {
        let start = reader.offset();
        let descriptor = parse_splice_descriptor(reader, options);
        if reader.offset() == start {
            warn!(
                offset = start,
                end, "descriptor loop made no progress, stopping before its declared end"
            );
            break;
        }
        splice_descriptors.push(descriptor);
    }

    let e_crc_32 = encrypted.then(|| reader.read_u32(32));
    let crc_32 = reader.read_u32(32);

    Trailer {
        descriptor_loop_length,
        splice_descriptors,
        e_crc_32,
        crc_32,
    }
}

/// Decodes one splice descriptor, choosing the decoder from a peeked tag.
pub fn parse_splice_descriptor(
    reader: &mut BitReader<'_>,
    options: &DecodeOptions,
) -> SpliceDescriptor {
    let tag = SpliceDescriptorTag::from(reader.peek(8) as u8);
    trace!(offset = reader.offset(), ?tag, "decoding splice descriptor");
    match tag {
        SpliceDescriptorTag::Segmentation => {
            let mut descriptor = parse_segmentation_descriptor(reader);
            descriptor.tag_name = "segmentation_descriptor";
            SpliceDescriptor::Segmentation(descriptor)
        }
        SpliceDescriptorTag::Avail if options.typed_descriptors => {
            SpliceDescriptor::Avail(parse_avail_descriptor(reader))
        }
        SpliceDescriptorTag::DTMF if options.typed_descriptors => {
            SpliceDescriptor::Dtmf(parse_dtmf_descriptor(reader))
        }
        SpliceDescriptorTag::Time if options.typed_descriptors => {
            SpliceDescriptor::Time(parse_time_descriptor(reader))
        }
        SpliceDescriptorTag::Audio if options.typed_descriptors => {
            SpliceDescriptor::Audio(parse_audio_descriptor(reader))
        }
        _ => SpliceDescriptor::Unknown(parse_generic_descriptor(reader)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER_TIME_SIGNAL: [u8; 14] = [
        0xfc, 0x30, 0x16, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xf0, 0x05, 0x06,
    ];

    #[test]
    fn test_header_fields() {
        let mut reader = BitReader::new(&HEADER_TIME_SIGNAL);

        let header = parse_header(&mut reader);

        assert_eq!(header.table_id, 0xfc);
        assert!(!header.section_syntax_indicator);
        assert!(!header.private_indicator);
        assert_eq!(header.sap_type, 3);
        assert_eq!(header.section_length, 22);
        assert_eq!(header.protocol_version, 0);
        assert!(!header.encrypted_packet);
        assert_eq!(header.encryption_algorithm, 0);
        assert_eq!(header.pts_adjustment, 0);
        assert_eq!(header.cw_index, 0);
        assert_eq!(header.tier, 0xfff);
        assert_eq!(header.splice_command_length, 5);
        assert_eq!(header.splice_command_type, 6);
        assert_eq!(reader.offset(), 14 * 8);
    }

    #[test]
    fn test_encrypted_packet_reads_both_checksums() {
        let mut data = vec![
            0xfc, 0x30, 0x11, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xf0, 0x00, 0x00,
        ];
        data.extend_from_slice(&[0x00, 0x00]); // descriptor_loop_length
        data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        data.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);

        let packet = decode(&data).unwrap();

        assert!(packet.header.encrypted_packet);
        assert_eq!(packet.header.splice_command_name, "splice_null");
        assert_eq!(packet.trailer.e_crc_32, Some(0xdeadbeef));
        assert_eq!(packet.trailer.crc_32, 0x01020304);
    }

    #[test]
    fn test_clear_packet_has_no_encrypted_checksum() {
        let mut data = HEADER_TIME_SIGNAL.to_vec();
        data.extend_from_slice(&[0x7f, 0x00, 0x00, 0xaa, 0xbb, 0xcc, 0xdd]);

        let packet = decode(&data).unwrap();

        assert_eq!(packet.trailer.e_crc_32, None);
        assert_eq!(packet.trailer.crc_32, 0xaabbccdd);
    }

    #[test]
    fn test_unsupported_command_reads_descriptor_length_next() {
        let mut data = vec![
            0xfc, 0x30, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0xf0, 0x00, 0xff,
        ];
        data.extend_from_slice(&[0x00, 0x00, 0x11, 0x22, 0x33, 0x44]);

        let packet = decode(&data).unwrap();

        assert_eq!(packet.splice_command, None);
        assert_eq!(packet.header.splice_command_name, "");
        assert_eq!(packet.trailer.descriptor_loop_length, 0);
        assert_eq!(packet.trailer.crc_32, 0x11223344);
    }

    #[test]
    fn test_typed_descriptors_option() {
        let mut data = HEADER_TIME_SIGNAL.to_vec();
        data.push(0x7f);
        data.extend_from_slice(&[0x00, 0x0a]);
        data.extend_from_slice(&[0x00, 0x08, 0x43, 0x55, 0x45, 0x49, 0x00, 0x00, 0x01, 0x35]);
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        let raw = decode(&data).unwrap();
        match &raw.trailer.splice_descriptors[..] {
            [SpliceDescriptor::Unknown(descriptor)] => {
                assert_eq!(descriptor.data, vec![0x00, 0x00, 0x01, 0x35]);
            }
            other => panic!("unexpected descriptors: {other:?}"),
        }

        let typed = decode_with(&data, &DecodeOptions::default().typed_descriptors(true)).unwrap();
        match &typed.trailer.splice_descriptors[..] {
            [SpliceDescriptor::Avail(descriptor)] => {
                assert_eq!(descriptor.provider_avail_id, 0x135);
            }
            other => panic!("unexpected descriptors: {other:?}"),
        }
    }

    #[test]
    fn test_descriptor_loop_stops_without_progress() {
        // declared loop length runs far past the end of the data
        let mut data = HEADER_TIME_SIGNAL.to_vec();
        data.push(0x7f);
        data.extend_from_slice(&[0xff, 0xff]);
        data.extend_from_slice(&[0x00, 0x04, 0x43, 0x55, 0x45, 0x49]);

        let err = decode(&data).unwrap_err();

        let packet = err.partial().expect("partial packet");
        assert_eq!(packet.trailer.descriptor_loop_length, 0xffff);
        assert_eq!(packet.trailer.splice_descriptors.len(), 1);
        assert_eq!(packet.trailer.crc_32, 0);
    }

    #[test]
    fn test_empty_input_is_truncated() {
        let err = decode(&[]).unwrap_err();

        assert!(matches!(err, DecodeError::Truncated { .. }));
        assert_eq!(err.partial().map(|p| p.header.table_id), Some(0));
    }
}
