//! # scte35-decoder
//!
//! A decoder for SCTE-35 splice_info_sections, the cue messages used to
//! signal ad insertion points in MPEG transport streams and HLS/DASH
//! playlists.
//!
//! Every field is exposed as it appears on the wire, reserved bits included.
//! Truncated input still yields the fields decoded before the data ran out,
//! carried by [`DecodeError::Truncated`]. CRCs are decoded but not verified.
//!
//! ## Quick start
//!
//! ```rust
//! use scte35_decoder::{SpliceCommand, SpliceDescriptor, parse};
//!
//! let packet = parse(b"/DAvAAAAAAAA///wBQb+dGKQoAAZAhdDVUVJSAAAjn+fCAgAAAAALKChijUCAKnMZ1g=")?;
//!
//! assert!(matches!(packet.splice_command, Some(SpliceCommand::TimeSignal(_))));
//! if let SpliceDescriptor::Segmentation(descriptor) = &packet.trailer.splice_descriptors[0] {
//!     assert_eq!(descriptor.segmentation_type_name, "ProviderPlacementOpportunityEnd");
//! }
//! # Ok::<(), scte35_decoder::DecodeError>(())
//! ```
//!
//! ## Features
//!
//! - `base64` (default): text payload detection through [`parse`].
//! - `serde` (default): `Serialize` for every decoded type.
//! - `cli`: the `scte35-decoder` command line tool.

pub mod bit_reader;
pub mod commands;
pub mod descriptors;
pub mod error;
pub mod fmt;
#[cfg(feature = "base64")]
pub mod input;
pub mod parser;
pub mod types;

#[cfg(feature = "serde")]
mod serde;

#[cfg(test)]
mod tests;

pub use bit_reader::BitReader;
pub use descriptors::{
    AudioComponent, AudioDescriptor, AvailDescriptor, DescriptorHeader, DtmfDescriptor,
    GenericDescriptor, SegmentationDescriptor, SegmentationType, SpliceDescriptor,
    SpliceDescriptorTag, TimeDescriptor,
};
pub use error::{DecodeError, DecodeResult, EndOfData};
#[cfg(feature = "base64")]
pub use input::{parse, parse_with};
pub use parser::{DecodeOptions, decode, decode_with};
pub use types::{
    BandwidthReservation, BreakDuration, Header, Packet, SpliceCommand, SpliceInsert,
    SpliceInsertComponent, SpliceNull, SpliceSchedule, SpliceTime, TimeSignal, Trailer,
};
