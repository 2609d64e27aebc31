//! Decoders for the splice command variants.
//!
//! Each decoder reads exactly the bits its syntax table describes and never
//! looks at `splice_command_length`; the embedded flags and counts say how much
//! of the stream belongs to the command.

use crate::bit_reader::BitReader;
use crate::types::{
    BandwidthReservation, BreakDuration, SpliceCommand, SpliceInsert, SpliceInsertComponent,
    SpliceNull, SpliceSchedule, SpliceTime, TimeSignal,
};
use tracing::{debug, trace};

/// Decodes the command selected by `splice_command_type`.
///
/// Returns `None` without consuming any bits for command types that have no
/// decoder (reserved values and private commands).
pub fn parse_splice_command(
    reader: &mut BitReader<'_>,
    splice_command_type: u8,
) -> Option<SpliceCommand> {
    trace!(
        offset = reader.offset(),
        splice_command_type, "decoding splice command"
    );
    let command = match splice_command_type {
        0x00 => SpliceCommand::SpliceNull(SpliceNull {}),
        0x04 => SpliceCommand::SpliceSchedule(parse_splice_schedule(reader)),
        0x05 => SpliceCommand::SpliceInsert(parse_splice_insert(reader)),
        0x06 => SpliceCommand::TimeSignal(parse_time_signal(reader)),
        0x07 => SpliceCommand::BandwidthReservation(BandwidthReservation {}),
        other => {
            debug!(
                splice_command_type = other,
                "no decoder for splice command type, command body left unread"
            );
            return None;
        }
    };
    Some(command)
}

/// Decodes a `splice_schedule()`: a count followed by that many splice inserts.
pub fn parse_splice_schedule(reader: &mut BitReader<'_>) -> SpliceSchedule {
    let splice_count = reader.read_u8(8);
    let splices = (0..splice_count)
        .map(|_| parse_splice_insert(reader))
        .collect();
    SpliceSchedule {
        splice_count,
        splices,
    }
}

/// Decodes a `splice_insert()`.
pub fn parse_splice_insert(reader: &mut BitReader<'_>) -> SpliceInsert {
    let mut insert = SpliceInsert {
        splice_event_id: reader.read_u32(32),
        splice_event_cancel_indicator: reader.read_bool(1),
        reserved: reader.read_u8(7),
        out_of_network_indicator: reader.read_bool(1),
        program_splice_flag: reader.read_bool(1),
        duration_flag: reader.read_bool(1),
        splice_immediate_flag: reader.read_bool(1),
        event_id_compliance_flag: reader.read_bool(1),
        reserved2: reader.read_u8(3),
        ..Default::default()
    };

    if insert.program_splice_flag {
        if !insert.splice_immediate_flag {
            insert.splice_time = Some(parse_splice_time(reader));
        }
    } else {
        // component splice mode, deprecated but still on the wire
        let immediate = insert.splice_immediate_flag;
        insert.component_count = reader.read_u8(8);
        insert.components = (0..insert.component_count)
            .map(|_| {
                let component_tag = reader.read_u8(8);
                let splice_time = (!immediate).then(|| parse_splice_time(reader));
                SpliceInsertComponent {
                    component_tag,
                    splice_time,
                }
            })
            .collect();
    }

    if insert.duration_flag {
        insert.break_duration = Some(parse_break_duration(reader));
    }

    insert.unique_program_id = reader.read_u16(16);
    insert.avail_num = reader.read_u8(8);
    insert.avails_expected = reader.read_u8(8);
    insert
}

/// Decodes a `time_signal()`, which is a single `splice_time()`.
pub fn parse_time_signal(reader: &mut BitReader<'_>) -> TimeSignal {
    TimeSignal {
        splice_time: parse_splice_time(reader),
    }
}

/// Decodes a `splice_time()`.
pub fn parse_splice_time(reader: &mut BitReader<'_>) -> SpliceTime {
    let time_specified_flag = reader.read_bool(1);
    if time_specified_flag {
        SpliceTime {
            time_specified_flag,
            reserved: reader.read_u8(6),
            pts_time: Some(reader.read(33)),
        }
    } else {
        SpliceTime {
            time_specified_flag,
            reserved: reader.read_u8(7),
            pts_time: None,
        }
    }
}

/// Decodes a `break_duration()`.
pub fn parse_break_duration(reader: &mut BitReader<'_>) -> BreakDuration {
    BreakDuration {
        auto_return: reader.read_bool(1),
        reserved: reader.read_u8(6),
        duration: reader.read(33),
    }
}
