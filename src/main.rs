use clap::{Parser, ValueEnum};
use scte35_decoder::fmt::{format_identifier, ticks_to_secs};
use scte35_decoder::{
    DecodeOptions, Packet, SpliceCommand, SpliceDescriptor, SpliceInsert, SpliceTime, parse_with,
};
use std::io::{self, Read};
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Decode SCTE-35 splice_info_sections from base64, hexadecimal or binary payloads.
#[derive(Debug, Parser)]
#[command(author, version, long_about = None)]
struct Cli {
    /// SCTE-35 payload (base64 starting with "/D", or hex); read from stdin when omitted
    payload: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// Decode avail, DTMF, time and audio descriptors instead of keeping their raw bytes
    #[arg(long)]
    typed_descriptors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line of JSON
    Json,
    /// Indented human-readable summary
    Text,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let input = match cli.payload {
        Some(payload) => payload.into_bytes(),
        None => {
            let mut buffer = Vec::new();
            if let Err(e) = io::stdin().read_to_end(&mut buffer) {
                eprintln!("Error reading stdin: {e}");
                process::exit(1);
            }
            buffer
        }
    };
    debug!(len = input.len(), "read payload");

    let options = DecodeOptions::default().typed_descriptors(cli.typed_descriptors);
    let packet = match parse_with(&input, &options) {
        Ok(packet) => packet,
        Err(e) => {
            eprintln!("Error decoding splice_info_section: {e}");
            process::exit(1);
        }
    };

    match cli.output {
        OutputFormat::Json => match serde_json::to_string(&packet) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing to JSON: {e}");
                process::exit(1);
            }
        },
        OutputFormat::Text => print_text(&packet),
    }
}

fn print_text(packet: &Packet) {
    let header = &packet.header;
    println!("splice_info_section:");
    println!("  Table ID: 0x{:02X}", header.table_id);
    println!("  Section Length: {}", header.section_length);
    println!("  Protocol Version: {}", header.protocol_version);
    println!("  Encrypted Packet: {}", header.encrypted_packet);
    println!(
        "  PTS Adjustment: {} ({:.6}s)",
        header.pts_adjustment,
        ticks_to_secs(header.pts_adjustment)
    );
    println!("  Tier: 0x{:03X}", header.tier);
    println!("  Splice Command Length: {}", header.splice_command_length);
    println!("  Splice Command Type: 0x{:02X}", header.splice_command_type);

    match &packet.splice_command {
        None => println!("  Splice Command: unsupported"),
        Some(command) => {
            println!("  Splice Command: {}", command.name());
            match command {
                SpliceCommand::SpliceInsert(insert) => print_insert(insert, "    "),
                SpliceCommand::SpliceSchedule(schedule) => {
                    println!("    Splice Count: {}", schedule.splice_count);
                    for (i, insert) in schedule.splices.iter().enumerate() {
                        println!("    Splice {i}:");
                        print_insert(insert, "      ");
                    }
                }
                SpliceCommand::TimeSignal(signal) => print_time(&signal.splice_time, "    "),
                SpliceCommand::SpliceNull(_) | SpliceCommand::BandwidthReservation(_) => {}
            }
        }
    }

    let trailer = &packet.trailer;
    println!("  Descriptor Loop Length: {}", trailer.descriptor_loop_length);
    for descriptor in &trailer.splice_descriptors {
        print_descriptor(descriptor);
    }
    if let Some(e_crc) = trailer.e_crc_32 {
        println!("  E-CRC-32: 0x{e_crc:08X}");
    }
    println!("  CRC-32: 0x{:08X}", trailer.crc_32);
}

fn print_insert(insert: &SpliceInsert, indent: &str) {
    println!("{indent}Splice Event ID: 0x{:08x}", insert.splice_event_id);
    println!(
        "{indent}Splice Event Cancel: {}",
        insert.splice_event_cancel_indicator
    );
    if insert.splice_event_cancel_indicator {
        return;
    }
    println!("{indent}Out of Network: {}", insert.out_of_network_indicator);
    println!("{indent}Program Splice: {}", insert.program_splice_flag);
    println!("{indent}Splice Immediate: {}", insert.splice_immediate_flag);
    if let Some(time) = &insert.splice_time {
        print_time(time, indent);
    }
    for component in &insert.components {
        println!("{indent}Component 0x{:02x}", component.component_tag);
        if let Some(time) = &component.splice_time {
            print_time(time, &format!("{indent}  "));
        }
    }
    if let Some(break_duration) = &insert.break_duration {
        println!(
            "{indent}Break Duration: {} ({:.6}s), auto return: {}",
            break_duration.duration,
            ticks_to_secs(break_duration.duration),
            break_duration.auto_return
        );
    }
    println!("{indent}Unique Program ID: {}", insert.unique_program_id);
    println!(
        "{indent}Avail: {}/{}",
        insert.avail_num, insert.avails_expected
    );
}

fn print_time(time: &SpliceTime, indent: &str) {
    match time.pts_time {
        Some(pts) => println!("{indent}PTS: {pts} ({:.6}s)", ticks_to_secs(pts)),
        None => println!("{indent}PTS: not specified"),
    }
}

fn print_descriptor(descriptor: &SpliceDescriptor) {
    let header = descriptor.header();
    let name = match descriptor.name() {
        "" => "descriptor",
        name => name,
    };
    println!(
        "  {name}: tag 0x{:02X}, length {}, identifier {}",
        header.splice_descriptor_tag,
        header.descriptor_length,
        format_identifier(header.identifier)
    );
    match descriptor {
        SpliceDescriptor::Segmentation(segmentation) => {
            println!(
                "    Segmentation Event ID: 0x{:08x}",
                segmentation.segmentation_event_id
            );
            if segmentation.segmentation_event_cancel_indicator {
                println!("    Cancelled");
                return;
            }
            println!(
                "    Segmentation Type: 0x{:02X} {}",
                segmentation.segmentation_type_id, segmentation.segmentation_type_name
            );
            if let Some(duration) = segmentation.segmentation_duration {
                println!("    Duration: {duration} ({:.6}s)", ticks_to_secs(duration));
            }
            println!(
                "    UPID: type 0x{:02X}, {} bytes",
                segmentation.segmentation_upid_type, segmentation.segmentation_upid_length
            );
            println!(
                "    Segment: {}/{}",
                segmentation.segment_num, segmentation.segments_expected
            );
            if let (Some(num), Some(expected)) = (
                segmentation.sub_segment_num,
                segmentation.sub_segments_expected,
            ) {
                println!("    Sub-segment: {num}/{expected}");
            }
            if let Some(warning) = &segmentation.warning {
                println!("    {warning}");
            }
        }
        SpliceDescriptor::Avail(avail) => {
            println!("    Provider Avail ID: {}", avail.provider_avail_id);
        }
        SpliceDescriptor::Dtmf(dtmf) => {
            println!(
                "    Preroll: {}, chars: {}",
                dtmf.preroll,
                String::from_utf8_lossy(&dtmf.dtmf_chars)
            );
        }
        SpliceDescriptor::Time(time) => {
            println!(
                "    TAI: {}s {}ns, UTC offset {}",
                time.tai_seconds, time.tai_ns, time.utc_offset
            );
        }
        SpliceDescriptor::Audio(audio) => {
            println!("    Audio Components: {}", audio.audio_count);
        }
        SpliceDescriptor::Unknown(generic) => {
            println!("    Data: {} bytes", generic.data.len());
        }
    }
}
