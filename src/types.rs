//! Core SCTE-35 data structures and types.
//!
//! This module contains the structures a decoded splice information section
//! is made of: the fixed header, the splice command and the trailer holding
//! descriptors and checksums.

use crate::descriptors::SpliceDescriptor;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::Serialize;

/// A complete, decoded SCTE-35 splice information section.
///
/// A packet is built once per decode call and owns everything it holds.
/// When decoding stops early the packet still carries every field read up to
/// that point, with the rest left at their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Packet {
    /// Fixed-width header fields.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub header: Header,
    /// The splice command, absent for command types without a decoder.
    pub splice_command: Option<SpliceCommand>,
    /// Descriptors and checksums.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub trailer: Trailer,
}

/// Header fields of a splice information section, in wire order.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Header {
    /// Table identifier, 0xFC for SCTE-35
    pub table_id: u8,
    /// Section syntax indicator
    pub section_syntax_indicator: bool,
    /// Private indicator
    pub private_indicator: bool,
    /// SAP (Stream Access Point) type
    pub sap_type: u8,
    /// Length of the section in bytes
    pub section_length: u16,
    /// SCTE-35 protocol version
    pub protocol_version: u8,
    /// Set when part of the section is encrypted
    pub encrypted_packet: bool,
    /// Encryption algorithm used
    pub encryption_algorithm: u8,
    /// PTS adjustment value in 90kHz ticks
    pub pts_adjustment: u64,
    /// Control word index for encryption
    pub cw_index: u8,
    /// Tier value for authorization
    pub tier: u16,
    /// Length of the splice command in bytes, as declared on the wire
    pub splice_command_length: u16,
    /// Type of splice command (0x00-0xFF)
    pub splice_command_type: u8,
    /// Name of the decoded command, empty when no command was decoded
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "str::is_empty"))]
    pub splice_command_name: &'static str,
}

/// Everything after the splice command.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Trailer {
    /// Length of descriptor loop in bytes
    pub descriptor_loop_length: u16,
    /// Decoded splice descriptors, in wire order
    pub splice_descriptors: Vec<SpliceDescriptor>,
    /// Encrypted CRC-32, present when `encrypted_packet` is set
    pub e_crc_32: Option<u32>,
    /// CRC-32 checksum of the section, decoded but not verified
    pub crc_32: u32,
}

/// The splice commands with a decoder, keyed by `splice_command_type`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type"))]
pub enum SpliceCommand {
    /// Null command (0x00)
    SpliceNull(SpliceNull),
    /// Splice schedule command (0x04)
    SpliceSchedule(SpliceSchedule),
    /// Splice insert command (0x05)
    SpliceInsert(SpliceInsert),
    /// Time signal command (0x06)
    TimeSignal(TimeSignal),
    /// Bandwidth reservation command (0x07)
    BandwidthReservation(BandwidthReservation),
}

impl SpliceCommand {
    /// The `splice_command_type` tag for this command.
    pub fn command_type(&self) -> u8 {
        match self {
            SpliceCommand::SpliceNull(_) => 0x00,
            SpliceCommand::SpliceSchedule(_) => 0x04,
            SpliceCommand::SpliceInsert(_) => 0x05,
            SpliceCommand::TimeSignal(_) => 0x06,
            SpliceCommand::BandwidthReservation(_) => 0x07,
        }
    }

    /// The command name as written in the SCTE-35 syntax tables.
    pub fn name(&self) -> &'static str {
        match self {
            SpliceCommand::SpliceNull(_) => "splice_null",
            SpliceCommand::SpliceSchedule(_) => "splice_schedule",
            SpliceCommand::SpliceInsert(_) => "splice_insert",
            SpliceCommand::TimeSignal(_) => "time_signal",
            SpliceCommand::BandwidthReservation(_) => "bandwidth_reservation",
        }
    }
}

/// Represents a splice null command.
///
/// Carries no fields. It is used to transmit descriptors without a command.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceNull {}

/// Represents a bandwidth reservation command.
///
/// Carries no fields and may be dropped by network equipment.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BandwidthReservation {}

/// Represents a splice schedule command (0x04).
///
/// A list of splice inserts signalled in advance.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceSchedule {
    /// Number of scheduled splices
    pub splice_count: u8,
    /// The scheduled splices, each laid out like a splice insert
    pub splices: Vec<SpliceInsert>,
}

/// Represents a splice insert command (0x05).
///
/// This is the most commonly used splice command for ad insertion.
/// It signals the start and end of commercial breaks or other content substitutions.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceInsert {
    /// Unique identifier for this splice event
    pub splice_event_id: u32,
    /// Set when a previously sent splice event is being cancelled
    pub splice_event_cancel_indicator: bool,
    /// Reserved bits following the cancel indicator (7 bits)
    pub reserved: u8,
    /// Set when going out of the network, clear when returning to it
    pub out_of_network_indicator: bool,
    /// Set for a program-level splice, clear for component-level splices
    pub program_splice_flag: bool,
    /// Set when a break duration follows
    pub duration_flag: bool,
    /// Set when the splice should happen at the nearest opportunity
    pub splice_immediate_flag: bool,
    /// Event id compliance flag
    pub event_id_compliance_flag: bool,
    /// Reserved bits following the flags (3 bits)
    pub reserved2: u8,
    /// Splice time, present for timed program splices
    pub splice_time: Option<SpliceTime>,
    /// Number of components (component-level splices only)
    pub component_count: u8,
    /// Component-level splice times (component-level splices only)
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub components: Vec<SpliceInsertComponent>,
    /// Duration of the break, present when `duration_flag` is set
    pub break_duration: Option<BreakDuration>,
    /// Unique identifier for the program
    pub unique_program_id: u16,
    /// Avail number for this splice event
    pub avail_num: u8,
    /// Expected number of avails in this break
    pub avails_expected: u8,
}

/// Component-specific timing for component-level splice inserts.
///
/// Component splicing is deprecated but still has to be decoded to keep the
/// bitstream in sync.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceInsertComponent {
    /// Identifier for the specific component (audio/video track)
    pub component_tag: u8,
    /// Splice time for this component, absent for immediate splices
    pub splice_time: Option<SpliceTime>,
}

/// Represents a time signal command (0x06).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TimeSignal {
    /// The presentation timestamp for this time signal
    pub splice_time: SpliceTime,
}

/// A `splice_time()` structure.
///
/// Combined with the packet's `pts_adjustment` it gives the intended time of
/// the splice point. The reserved field is 6 bits wide when a PTS follows and
/// 7 bits wide otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SpliceTime {
    /// Set when a PTS follows
    pub time_specified_flag: bool,
    /// Reserved bits (6 or 7 bits)
    pub reserved: u8,
    /// Presentation timestamp in 90kHz ticks (33 bits)
    pub pts_time: Option<u64>,
}

impl SpliceTime {
    /// The PTS as a wall-clock duration since the stream's time origin.
    pub fn to_duration(&self) -> Option<Duration> {
        self.pts_time
            .map(|ticks| Duration::from_secs_f64(ticks as f64 / 90_000.0))
    }
}

/// A `break_duration()` structure.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct BreakDuration {
    /// Set when the splice should return to the network automatically
    pub auto_return: bool,
    /// Reserved bits (6 bits)
    pub reserved: u8,
    /// Duration in 90kHz ticks (33 bits)
    pub duration: u64,
}

impl BreakDuration {
    /// The break duration as a wall-clock duration.
    pub fn to_duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration as f64 / 90_000.0)
    }
}
