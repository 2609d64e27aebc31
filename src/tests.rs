use super::*;
use data_encoding::BASE64;

fn decode_base64(payload: &str) -> DecodeResult<Packet> {
    let buffer = BASE64
        .decode(payload.as_bytes())
        .expect("Failed to decode base64 string");
    decode(&buffer)
}

fn segmentation_descriptors(packet: &Packet) -> Vec<&SegmentationDescriptor> {
    packet
        .trailer
        .splice_descriptors
        .iter()
        .filter_map(|d| match d {
            SpliceDescriptor::Segmentation(s) => Some(s),
            _ => None,
        })
        .collect()
}

fn assert_loop_length_matches(packet: &Packet) {
    let total: usize = packet
        .trailer
        .splice_descriptors
        .iter()
        .map(SpliceDescriptor::encoded_len)
        .sum();
    assert_eq!(
        total, packet.trailer.descriptor_loop_length as usize,
        "descriptor lengths should add up to descriptor_loop_length"
    );
}

#[test]
fn test_time_signal_without_pts() {
    let packet = decode_base64("/DAWAAAAAAAAAP/wBQb+AAAAAAAAAAAAAA==")
        .expect("Failed to decode time_signal");

    let header = &packet.header;
    assert_eq!(header.table_id, 0xFC, "Table ID should be 0xFC");
    assert!(!header.section_syntax_indicator);
    assert!(!header.private_indicator);
    assert_eq!(header.sap_type, 3);
    assert_eq!(header.section_length, 22);
    assert_eq!(header.protocol_version, 0);
    assert!(!header.encrypted_packet);
    assert_eq!(header.pts_adjustment, 0);
    assert_eq!(header.cw_index, 0);
    assert_eq!(header.tier, 0xFFF);
    assert_eq!(header.splice_command_length, 5);
    assert_eq!(
        header.splice_command_type, 0x06,
        "Command type should be 0x06 (time_signal)"
    );
    assert_eq!(header.splice_command_name, "time_signal");

    match &packet.splice_command {
        Some(SpliceCommand::TimeSignal(signal)) => {
            assert!(signal.splice_time.time_specified_flag);
            assert_eq!(signal.splice_time.reserved, 0x3F);
            assert_eq!(signal.splice_time.pts_time, Some(0));
        }
        other => panic!("Expected TimeSignal command, got {other:?}"),
    }

    assert_eq!(packet.trailer.descriptor_loop_length, 0);
    assert!(packet.trailer.splice_descriptors.is_empty());
    assert_eq!(packet.trailer.e_crc_32, None);
    assert_eq!(packet.trailer.crc_32, 0);
}

#[test]
fn test_time_signal_command() {
    let packet = decode_base64("/DAWAAAAAAAAAP/wBQb+Qjo1vQAAuwxz9A==")
        .expect("Failed to decode time_signal");

    match &packet.splice_command {
        Some(SpliceCommand::TimeSignal(signal)) => {
            assert_eq!(signal.splice_time.pts_time, Some(1_111_111_101));
            let duration = signal
                .splice_time
                .to_duration()
                .expect("PTS time should be present");
            // about 12345 seconds
            assert_eq!(duration.as_secs(), 12_345);
        }
        other => panic!("Expected TimeSignal command, got {other:?}"),
    }
    assert_eq!(packet.trailer.crc_32, 0xBB0C73F4);
}

#[test]
fn test_splice_null_command() {
    let packet = decode_base64("/DARAAAAAAAAAP/wAAAAAHpPv/8=").expect("Failed to decode splice_null");

    assert_eq!(packet.header.splice_command_type, 0x00);
    assert_eq!(packet.header.splice_command_length, 0);
    assert_eq!(packet.header.splice_command_name, "splice_null");
    assert_eq!(
        packet.splice_command,
        Some(SpliceCommand::SpliceNull(SpliceNull {}))
    );
    assert_eq!(packet.trailer.crc_32, 0x7A4FBFFF);
}

#[test]
fn test_splice_insert_with_avail_descriptor() {
    let packet = decode_base64("/DAvAAAAAAAA///wFAVIAACPf+/+c2nALv4AUsz1AAAAAAAKAAhDVUVJAAABNWLbowo=")
        .expect("Failed to decode splice_insert");

    assert_eq!(packet.header.section_length, 47);
    assert_eq!(packet.header.cw_index, 0xFF);
    assert_eq!(packet.header.splice_command_length, 20);
    assert_eq!(packet.header.splice_command_name, "splice_insert");

    let Some(SpliceCommand::SpliceInsert(insert)) = &packet.splice_command else {
        panic!("Expected SpliceInsert command");
    };
    assert_eq!(insert.splice_event_id, 0x4800008F);
    assert!(insert.out_of_network_indicator);
    assert!(insert.program_splice_flag);
    assert!(insert.duration_flag);
    assert!(!insert.splice_immediate_flag);
    assert_eq!(
        insert.splice_time.as_ref().and_then(|t| t.pts_time),
        Some(1_936_310_318)
    );
    let break_duration = insert.break_duration.as_ref().expect("break duration");
    assert!(break_duration.auto_return);
    assert_eq!(break_duration.duration, 5_426_421);
    assert_eq!(break_duration.to_duration().as_secs(), 60);

    // the avail descriptor stays raw unless typed decoding is requested
    assert_eq!(packet.trailer.descriptor_loop_length, 10);
    match &packet.trailer.splice_descriptors[..] {
        [SpliceDescriptor::Unknown(descriptor)] => {
            assert_eq!(descriptor.header.splice_descriptor_tag, 0x00);
            assert_eq!(descriptor.header.descriptor_length, 8);
            assert_eq!(descriptor.header.identifier, 0x43554549);
            assert_eq!(descriptor.data, vec![0x00, 0x00, 0x01, 0x35]);
        }
        other => panic!("Expected one generic descriptor, got {other:?}"),
    }
    assert_eq!(packet.trailer.crc_32, 1_658_561_290);
    assert_loop_length_matches(&packet);
}

#[test]
fn test_typed_avail_descriptor() {
    let buffer = BASE64
        .decode(b"/DAvAAAAAAAA///wFAVIAACPf+/+c2nALv4AUsz1AAAAAAAKAAhDVUVJAAABNWLbowo=")
        .expect("Failed to decode base64 string");
    let options = DecodeOptions::default().typed_descriptors(true);

    let packet = decode_with(&buffer, &options).expect("Failed to decode splice_insert");

    match &packet.trailer.splice_descriptors[..] {
        [SpliceDescriptor::Avail(avail)] => {
            assert_eq!(avail.provider_avail_id, 0x135);
        }
        other => panic!("Expected one avail descriptor, got {other:?}"),
    }
    assert_eq!(packet.trailer.splice_descriptors[0].name(), "avail_descriptor");
    assert_eq!(packet.trailer.crc_32, 1_658_561_290);
}

#[test]
fn test_splice_insert_without_descriptors() {
    let packet = decode_base64("/DAlAAAAAAAAAP/wFAUAAAAEf+/+kybGyP4BSvaQAAEBAQAArky/3g==")
        .expect("Failed to decode splice_insert");

    let Some(SpliceCommand::SpliceInsert(insert)) = &packet.splice_command else {
        panic!("Expected SpliceInsert command");
    };
    assert_eq!(insert.splice_event_id, 4);
    assert_eq!(
        insert.splice_time.as_ref().and_then(|t| t.pts_time),
        Some(2_468_792_008)
    );
    assert_eq!(insert.break_duration.as_ref().map(|b| b.duration), Some(21_690_000));
    assert_eq!(insert.unique_program_id, 1);
    assert_eq!(insert.avail_num, 1);
    assert_eq!(insert.avails_expected, 1);
    assert!(packet.trailer.splice_descriptors.is_empty());
    assert_eq!(packet.trailer.crc_32, 2_924_265_438);
}

#[test]
fn test_time_signal_with_generic_descriptor() {
    let packet = decode_base64("/DAgAAAAAAAAAP/wBQb+Qjo1vQAKAAhDVUVJAAAE0iVuWvA=")
        .expect("Failed to decode time_signal with descriptors");

    assert_eq!(packet.header.section_length, 32);
    assert_eq!(packet.trailer.descriptor_loop_length, 10);
    match &packet.trailer.splice_descriptors[..] {
        [SpliceDescriptor::Unknown(descriptor)] => {
            assert_eq!(descriptor.data, vec![0x00, 0x00, 0x04, 0xD2]);
            assert_eq!(SpliceDescriptor::Unknown(descriptor.clone()).name(), "");
        }
        other => panic!("Expected one generic descriptor, got {other:?}"),
    }
    assert_eq!(packet.trailer.crc_32, 627_989_232);
    assert_loop_length_matches(&packet);
}

#[test]
fn test_segmentation_descriptor() {
    let packet = decode_base64("/DAvAAAAAAAA///wBQb+dGKQoAAZAhdDVUVJSAAAjn+fCAgAAAAALKChijUCAKnMZ1g=")
        .expect("Failed to decode time_signal with segmentation descriptor");

    match &packet.splice_command {
        Some(SpliceCommand::TimeSignal(signal)) => {
            assert_eq!(signal.splice_time.pts_time, Some(1_952_616_608));
        }
        other => panic!("Expected TimeSignal command, got {other:?}"),
    }

    let descriptors = segmentation_descriptors(&packet);
    assert_eq!(descriptors.len(), 1);
    let descriptor = descriptors[0];
    assert_eq!(descriptor.tag_name, "segmentation_descriptor");
    assert_eq!(descriptor.header.descriptor_length, 23);
    assert_eq!(descriptor.segmentation_event_id, 1_207_959_694);
    assert!(!descriptor.segmentation_event_cancel_indicator);
    assert!(descriptor.program_segmentation_flag);
    assert!(!descriptor.segmentation_duration_flag);
    assert_eq!(descriptor.device_restrictions, Some(3));
    assert_eq!(descriptor.segmentation_upid_type, 0x08);
    assert_eq!(
        descriptor.segmentation_upid,
        vec![0x00, 0x00, 0x00, 0x00, 0x2C, 0xA0, 0xA1, 0x8A]
    );
    assert_eq!(descriptor.segmentation_type_id, 0x35);
    assert_eq!(
        descriptor.segmentation_type_name,
        "ProviderPlacementOpportunityEnd"
    );
    assert_eq!(descriptor.segment_num, 2);
    assert_eq!(descriptor.segments_expected, 0);
    assert_eq!(descriptor.warning, None);

    assert_eq!(packet.trailer.crc_32, 2_848_745_304);
    assert_loop_length_matches(&packet);
}

#[test]
fn test_multiple_segmentation_descriptors() {
    let packet = decode_base64(
        "/DBhAAAAAAAA///wBQb+qM1E7QBLAhdDVUVJSAAArX+fCAgAAAAALLLXnTUCAAIXQ1VFSUgAACZ/nwgIAAAAACyy150RAAACF0NVRUlIAAAnf58ICAAAAAAsstezEAAAihiGnw==",
    )
    .expect("Failed to decode time_signal with three descriptors");

    let types: Vec<_> = segmentation_descriptors(&packet)
        .iter()
        .map(|d| (d.segmentation_event_id, d.segmentation_type_name))
        .collect();
    assert_eq!(
        types,
        vec![
            (1_207_959_725, "ProviderPlacementOpportunityEnd"),
            (1_207_959_590, "ProgramEnd"),
            (1_207_959_591, "ProgramStart"),
        ]
    );
    assert_eq!(packet.trailer.crc_32, 2_316_863_135);
    assert_loop_length_matches(&packet);
}

#[test]
fn test_missing_sub_segments_are_a_warning() {
    for payload in [
        // provider placement opportunity start
        "/DA0AAAAAAAA///wBQb+cr0AUAAeAhxDVUVJSAAAjn/PAAGlmbAICAAAAAAsoKGKNAIAmsnRfg==",
        "/DAnAAAAAAAAAP/wBQb+AA27oAARAg9DVUVJAAAAAX+HCQA0AAE0xUZn",
        // break start
        "/DAsAAAAAAAAAP/wBQb+7YaD1QAWAhRDVUVJAADc8X+/DAVPVkxZSSIAAJ6Gk2Q=",
    ] {
        let packet = decode_base64(payload).expect("missing sub-segments should not be an error");
        let descriptors = segmentation_descriptors(&packet);
        assert_eq!(descriptors.len(), 1, "payload {payload}");
        assert_eq!(
            descriptors[0].warning.as_deref(),
            Some("warning: sub_segment_num and sub_segments_expected are required but missing"),
            "payload {payload}"
        );
        assert_eq!(descriptors[0].sub_segment_num, None);
    }
}

#[test]
fn test_break_start_descriptor_fields() {
    let packet = decode_base64("/DAsAAAAAAAAAP/wBQb+7YaD1QAWAhRDVUVJAADc8X+/DAVPVkxZSSIAAJ6Gk2Q=")
        .expect("Failed to decode break start");

    let descriptor = segmentation_descriptors(&packet)[0];
    assert_eq!(descriptor.segmentation_event_id, 56_561);
    assert!(descriptor.delivery_not_restricted_flag);
    assert_eq!(descriptor.segmentation_upid_type, 0x0C);
    assert_eq!(descriptor.segmentation_upid, b"OVLYI".to_vec());
    assert_eq!(descriptor.segmentation_type(), Some(SegmentationType::BreakStart));
    assert_eq!(packet.trailer.crc_32, 2_659_619_684);
}

#[test]
fn test_truncated_packet_keeps_decoded_fields() {
    // the descriptor claims more bytes than the section holds
    let err = decode_base64(
        "/DBDAAAAAAAA///wBQb+AA2QOQAtAitDVUVJAAAAA3+/BCAwNjBhMmIzNC4wMTAxMDEwNS4wMTAxMGQyMC4xEAEBRKI3vg==",
    )
    .expect_err("section should be truncated");

    assert!(err.to_string().starts_with("packet truncated"));
    let DecodeError::Truncated { packet, source } = err else {
        panic!("Expected a truncated packet");
    };
    assert_eq!(source.requested, 32);
    assert_eq!(packet.header.section_length, 67);
    let descriptor = segmentation_descriptors(&packet)[0];
    assert_eq!(descriptor.segmentation_event_id, 3);
    assert_eq!(descriptor.segmentation_upid_length, 32);
    assert_eq!(descriptor.segmentation_type_id, 0xA2);
    assert_eq!(descriptor.segmentation_type_name, "");
    assert_eq!(packet.trailer.crc_32, 0);
}

#[test]
fn test_truncated_header() {
    let err = decode(&[0xFC, 0x30]).expect_err("two bytes cannot hold a header");

    let packet = err.into_partial().expect("partial packet");
    assert_eq!(packet.header.table_id, 0xFC);
    assert_eq!(packet.header.sap_type, 3);
    assert_eq!(packet.header.section_length, 0);
}

#[cfg(feature = "base64")]
#[test]
fn test_parse_text_and_raw_payloads_agree() {
    let payload = "/DAvAAAAAAAA///wBQb+dGKQoAAZAhdDVUVJSAAAjn+fCAgAAAAALKChijUCAKnMZ1g=";
    let raw = BASE64.decode(payload.as_bytes()).expect("valid base64");
    let hex = data_encoding::HEXUPPER.encode(&raw);

    let from_base64 = parse(payload.as_bytes()).expect("base64 payload");
    let from_hex = parse(format!("0x{hex}\n").as_bytes()).expect("hex payload");
    let from_raw = parse(&raw).expect("raw payload");

    assert_eq!(from_base64, from_raw);
    assert_eq!(from_hex, from_raw);
}
