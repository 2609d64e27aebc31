//! The segmentation_descriptor and its segmentation type table.

use super::{DescriptorHeader, parse_descriptor_header};
use crate::bit_reader::BitReader;
use tracing::{trace, warn};

#[cfg(feature = "serde")]
use serde::Serialize;

/// Segmentation types that carry `sub_segment_num` and `sub_segments_expected`.
const SUB_SEGMENT_TYPES: [u8; 9] = [0x22, 0x30, 0x32, 0x34, 0x36, 0x38, 0x3A, 0x44, 0x46];

/// Recorded on the descriptor when the sub-segment counters are missing.
pub const MISSING_SUB_SEGMENT_WARNING: &str =
    "warning: sub_segment_num and sub_segments_expected are required but missing";

/// A segmentation_descriptor (tag 0x02).
///
/// Fields that only exist under certain flags are `None` when the flags leave
/// them out. A cancelled event stops after the event id and its flags, so
/// everything else keeps its default value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SegmentationDescriptor {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub header: DescriptorHeader,
    /// Descriptor name, filled in by the packet decoder
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "str::is_empty"))]
    pub tag_name: &'static str,
    /// Non-fatal decoding anomaly
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub warning: Option<String>,

    pub segmentation_event_id: u32,
    pub segmentation_event_cancel_indicator: bool,
    pub segmentation_event_id_compliance_indicator: bool,
    /// Reserved bits after the cancel and compliance flags (6 bits)
    pub reserved: u8,

    pub program_segmentation_flag: bool,
    pub segmentation_duration_flag: bool,
    pub delivery_not_restricted_flag: bool,
    pub web_delivery_allowed_flag: Option<bool>,
    pub no_regional_blackout_flag: Option<bool>,
    pub archive_allowed_flag: Option<bool>,
    pub device_restrictions: Option<u8>,
    /// Reserved bits used in place of the restriction flags (5 bits)
    pub reserved2: Option<u8>,

    /// Duration in 90kHz ticks (40 bits)
    pub segmentation_duration: Option<u64>,
    pub segmentation_upid_type: u8,
    pub segmentation_upid_length: u8,
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "crate::serde::as_base64")
    )]
    pub segmentation_upid: Vec<u8>,
    pub segmentation_type_id: u8,
    /// Name of `segmentation_type_id`, empty for unknown values
    pub segmentation_type_name: &'static str,
    pub segment_num: u8,
    pub segments_expected: u8,
    pub sub_segment_num: Option<u8>,
    pub sub_segments_expected: Option<u8>,
}

impl SegmentationDescriptor {
    /// The typed segmentation type, if the id is a known one.
    pub fn segmentation_type(&self) -> Option<SegmentationType> {
        SegmentationType::from_id(self.segmentation_type_id)
    }
}

/// Decodes a segmentation_descriptor, header included.
///
/// Sub-segment counters are read only when the descriptor's end reference
/// leaves room for them. That reference is the bit offset after the header
/// plus the byte length minus 4, mixing bits and bytes; existing captures are
/// flagged with it, so it is kept as is. When the counters don't fit a warning
/// is recorded instead of failing.
pub fn parse_segmentation_descriptor(reader: &mut BitReader<'_>) -> SegmentationDescriptor {
    trace!(offset = reader.offset(), "decoding segmentation_descriptor");
    let header = parse_descriptor_header(reader);
    let end_reference = (reader.offset() + header.descriptor_length as usize).saturating_sub(4);

    let mut descriptor = SegmentationDescriptor {
        header,
        segmentation_event_id: reader.read_u32(32),
        segmentation_event_cancel_indicator: reader.read_bool(1),
        segmentation_event_id_compliance_indicator: reader.read_bool(1),
        reserved: reader.read_u8(6),
        ..Default::default()
    };

    if descriptor.segmentation_event_cancel_indicator {
        return descriptor;
    }

    descriptor.program_segmentation_flag = reader.read_bool(1);
    descriptor.segmentation_duration_flag = reader.read_bool(1);
    descriptor.delivery_not_restricted_flag = reader.read_bool(1);
    if !descriptor.delivery_not_restricted_flag {
        descriptor.web_delivery_allowed_flag = Some(reader.read_bool(1));
        descriptor.no_regional_blackout_flag = Some(reader.read_bool(1));
        descriptor.archive_allowed_flag = Some(reader.read_bool(1));
        descriptor.device_restrictions = Some(reader.read_u8(2));
    } else {
        descriptor.reserved2 = Some(reader.read_u8(5));
    }

    if descriptor.segmentation_duration_flag {
        descriptor.segmentation_duration = Some(reader.read(40));
    }

    descriptor.segmentation_upid_type = reader.read_u8(8);
    descriptor.segmentation_upid_length = reader.read_u8(8);
    descriptor.segmentation_upid =
        reader.read_bytes(descriptor.segmentation_upid_length as usize);

    descriptor.segmentation_type_id = reader.read_u8(8);
    descriptor.segment_num = reader.read_u8(8);
    descriptor.segments_expected = reader.read_u8(8);

    if SUB_SEGMENT_TYPES.contains(&descriptor.segmentation_type_id) {
        if reader.offset() + 16 <= end_reference {
            descriptor.sub_segment_num = Some(reader.read_u8(8));
            descriptor.sub_segments_expected = Some(reader.read_u8(8));
        } else {
            warn!(
                segmentation_event_id = descriptor.segmentation_event_id,
                segmentation_type_id = descriptor.segmentation_type_id,
                "segmentation descriptor is missing its sub-segment counters"
            );
            descriptor.warning = Some(MISSING_SUB_SEGMENT_WARNING.to_string());
        }
    }

    descriptor.segmentation_type_name = segmentation_type_name(descriptor.segmentation_type_id);
    descriptor
}

/// Looks up the name of a `segmentation_type_id`; unknown ids give `""`.
pub fn segmentation_type_name(id: u8) -> &'static str {
    SegmentationType::from_id(id).map_or("", |t| t.name())
}

/// The segmentation types defined in SCTE-35.
///
/// These values indicate the type of content segment boundary being signaled.
///
/// ```rust
/// use scte35_decoder::SegmentationType;
///
/// let seg_type = SegmentationType::ProviderAdvertisementStart;
/// assert_eq!(seg_type.id(), 0x30);
/// assert_eq!(seg_type.name(), "ProviderAdvertisementStart");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SegmentationType {
    NotIndicated,
    ContentIdentification,
    Private,
    ProgramStart,
    ProgramEnd,
    ProgramEarlyTermination,
    ProgramBreakaway,
    ProgramResumption,
    ProgramRunoverPlanned,
    ProgramRunoverUnplanned,
    ProgramOverlapStart,
    ProgramBlackoutOverride,
    ProgramJoin,
    ChapterStart,
    ChapterEnd,
    BreakStart,
    BreakEnd,
    OpeningCreditStartDeprecated,
    OpeningCreditEndDeprecated,
    ClosingCreditStartDeprecated,
    ClosingCreditEndDeprecated,
    ProviderAdvertisementStart,
    ProviderAdvertisementEnd,
    DistributorAdvertisementStart,
    DistributorAdvertisementEnd,
    ProviderPlacementOpportunityStart,
    ProviderPlacementOpportunityEnd,
    DistributorPlacementOpportunityStart,
    DistributorPlacementOpportunityEnd,
    ProviderOverlayPlacementOpportunityStart,
    ProviderOverlayPlacementOpportunityEnd,
    DistributorOverlayPlacementOpportunityStart,
    DistributorOverlayPlacementOpportunityEnd,
    ProviderPromoStart,
    ProviderPromoEnd,
    DistributorPromoStart,
    DistributorPromoEnd,
    UnscheduledEventStart,
    UnscheduledEventEnd,
    AlternateContentOpportunityStart,
    AlternateContentOpportunityEnd,
    ProviderAdBlockStart,
    ProviderAdBlockEnd,
    DistributorAdBlockStart,
    DistributorAdBlockEnd,
    NetworkStart,
    NetworkEnd,
}

impl SegmentationType {
    /// Returns the numeric `segmentation_type_id` for this segmentation type.
    pub fn id(&self) -> u8 {
        use SegmentationType::*;
        match self {
            NotIndicated => 0x00,
            ContentIdentification => 0x01,
            Private => 0x02,
            ProgramStart => 0x10,
            ProgramEnd => 0x11,
            ProgramEarlyTermination => 0x12,
            ProgramBreakaway => 0x13,
            ProgramResumption => 0x14,
            ProgramRunoverPlanned => 0x15,
            ProgramRunoverUnplanned => 0x16,
            ProgramOverlapStart => 0x17,
            ProgramBlackoutOverride => 0x18,
            ProgramJoin => 0x19,
            ChapterStart => 0x20,
            ChapterEnd => 0x21,
            BreakStart => 0x22,
            BreakEnd => 0x23,
            OpeningCreditStartDeprecated => 0x24,
            OpeningCreditEndDeprecated => 0x25,
            ClosingCreditStartDeprecated => 0x26,
            ClosingCreditEndDeprecated => 0x27,
            ProviderAdvertisementStart => 0x30,
            ProviderAdvertisementEnd => 0x31,
            DistributorAdvertisementStart => 0x32,
            DistributorAdvertisementEnd => 0x33,
            ProviderPlacementOpportunityStart => 0x34,
            ProviderPlacementOpportunityEnd => 0x35,
            DistributorPlacementOpportunityStart => 0x36,
            DistributorPlacementOpportunityEnd => 0x37,
            ProviderOverlayPlacementOpportunityStart => 0x38,
            ProviderOverlayPlacementOpportunityEnd => 0x39,
            DistributorOverlayPlacementOpportunityStart => 0x3A,
            DistributorOverlayPlacementOpportunityEnd => 0x3B,
            ProviderPromoStart => 0x3C,
            ProviderPromoEnd => 0x3D,
            DistributorPromoStart => 0x3E,
            DistributorPromoEnd => 0x3F,
            UnscheduledEventStart => 0x40,
            UnscheduledEventEnd => 0x41,
            AlternateContentOpportunityStart => 0x42,
            AlternateContentOpportunityEnd => 0x43,
            ProviderAdBlockStart => 0x44,
            ProviderAdBlockEnd => 0x45,
            DistributorAdBlockStart => 0x46,
            DistributorAdBlockEnd => 0x47,
            NetworkStart => 0x50,
            NetworkEnd => 0x51,
        }
    }

    /// Converts a numeric segmentation type id to the corresponding variant.
    ///
    /// Returns `None` for ids SCTE-35 does not define.
    ///
    /// ```rust
    /// use scte35_decoder::SegmentationType;
    ///
    /// assert_eq!(SegmentationType::from_id(0x10), Some(SegmentationType::ProgramStart));
    /// assert_eq!(SegmentationType::from_id(0xFF), None);
    /// ```
    pub fn from_id(id: u8) -> Option<Self> {
        use SegmentationType::*;
        let segmentation_type = match id {
            0x00 => NotIndicated,
            0x01 => ContentIdentification,
            0x02 => Private,
            0x10 => ProgramStart,
            0x11 => ProgramEnd,
            0x12 => ProgramEarlyTermination,
            0x13 => ProgramBreakaway,
            0x14 => ProgramResumption,
            0x15 => ProgramRunoverPlanned,
            0x16 => ProgramRunoverUnplanned,
            0x17 => ProgramOverlapStart,
            0x18 => ProgramBlackoutOverride,
            0x19 => ProgramJoin,
            0x20 => ChapterStart,
            0x21 => ChapterEnd,
            0x22 => BreakStart,
            0x23 => BreakEnd,
            0x24 => OpeningCreditStartDeprecated,
            0x25 => OpeningCreditEndDeprecated,
            0x26 => ClosingCreditStartDeprecated,
            0x27 => ClosingCreditEndDeprecated,
            0x30 => ProviderAdvertisementStart,
            0x31 => ProviderAdvertisementEnd,
            0x32 => DistributorAdvertisementStart,
            0x33 => DistributorAdvertisementEnd,
            0x34 => ProviderPlacementOpportunityStart,
            0x35 => ProviderPlacementOpportunityEnd,
            0x36 => DistributorPlacementOpportunityStart,
            0x37 => DistributorPlacementOpportunityEnd,
            0x38 => ProviderOverlayPlacementOpportunityStart,
            0x39 => ProviderOverlayPlacementOpportunityEnd,
            0x3A => DistributorOverlayPlacementOpportunityStart,
            0x3B => DistributorOverlayPlacementOpportunityEnd,
            0x3C => ProviderPromoStart,
            0x3D => ProviderPromoEnd,
            0x3E => DistributorPromoStart,
            0x3F => DistributorPromoEnd,
            0x40 => UnscheduledEventStart,
            0x41 => UnscheduledEventEnd,
            0x42 => AlternateContentOpportunityStart,
            0x43 => AlternateContentOpportunityEnd,
            0x44 => ProviderAdBlockStart,
            0x45 => ProviderAdBlockEnd,
            0x46 => DistributorAdBlockStart,
            0x47 => DistributorAdBlockEnd,
            0x50 => NetworkStart,
            0x51 => NetworkEnd,
            _ => return None,
        };
        Some(segmentation_type)
    }

    /// Returns the segmentation type name, as printed in decoded output.
    pub fn name(&self) -> &'static str {
        use SegmentationType::*;
        match self {
            NotIndicated => "NotIndicated",
            ContentIdentification => "ContentIdentification",
            Private => "Private",
            ProgramStart => "ProgramStart",
            ProgramEnd => "ProgramEnd",
            ProgramEarlyTermination => "ProgramEarlyTermination",
            ProgramBreakaway => "ProgramBreakaway",
            ProgramResumption => "ProgramResumption",
            ProgramRunoverPlanned => "ProgramRunoverPlanned",
            ProgramRunoverUnplanned => "ProgramRunoverUnplanned",
            ProgramOverlapStart => "ProgramOverlapStart",
            ProgramBlackoutOverride => "ProgramBlackoutOverride",
            ProgramJoin => "ProgramJoin",
            ChapterStart => "ChapterStart",
            ChapterEnd => "ChapterEnd",
            BreakStart => "BreakStart",
            BreakEnd => "BreakEnd",
            OpeningCreditStartDeprecated => "OpeningCreditStart_deprecated",
            OpeningCreditEndDeprecated => "OpeningCreditEnd_deprecated",
            ClosingCreditStartDeprecated => "ClosingCreditStart_deprecated",
            ClosingCreditEndDeprecated => "ClosingCreditEnd_deprecated",
            ProviderAdvertisementStart => "ProviderAdvertisementStart",
            ProviderAdvertisementEnd => "ProviderAdvertisementEnd",
            DistributorAdvertisementStart => "DistributorAdvertisementStart",
            DistributorAdvertisementEnd => "DistributorAdvertisementEnd",
            ProviderPlacementOpportunityStart => "ProviderPlacementOpportunityStart",
            ProviderPlacementOpportunityEnd => "ProviderPlacementOpportunityEnd",
            DistributorPlacementOpportunityStart => "DistributorPlacementOpportunityStart",
            DistributorPlacementOpportunityEnd => "DistributorPlacementOpportunityEnd",
            ProviderOverlayPlacementOpportunityStart => {
                "ProviderOverlayPlacementOpportunityStart"
            }
            ProviderOverlayPlacementOpportunityEnd => "ProviderOverlayPlacementOpportunityEnd",
            DistributorOverlayPlacementOpportunityStart => {
                "DistributorOverlayPlacementOpportunityStart"
            }
            DistributorOverlayPlacementOpportunityEnd => {
                "DistributorOverlayPlacementOpportunityEnd"
            }
            ProviderPromoStart => "ProviderPromoStart",
            ProviderPromoEnd => "ProviderPromoEnd",
            DistributorPromoStart => "DistributorPromoStart",
            DistributorPromoEnd => "DistributorPromoEnd",
            UnscheduledEventStart => "UnscheduledEventStart",
            UnscheduledEventEnd => "UnscheduledEventEnd",
            AlternateContentOpportunityStart => "AlternateContentOpportunityStart",
            AlternateContentOpportunityEnd => "AlternateContentOpportunityEnd",
            ProviderAdBlockStart => "ProviderAdBlockStart",
            ProviderAdBlockEnd => "ProviderAdBlockEnd",
            DistributorAdBlockStart => "DistributorAdBlockStart",
            DistributorAdBlockEnd => "DistributorAdBlockEnd",
            NetworkStart => "NetworkStart",
            NetworkEnd => "NetworkEnd",
        }
    }
}
