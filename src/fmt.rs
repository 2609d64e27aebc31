//! Formatting helpers for displaying decoded SCTE-35 values.

/// Converts a 32-bit descriptor identifier to a human-readable string.
///
/// Returns the ASCII text when all four bytes are letters or digits,
/// otherwise the hex representation.
///
/// # Examples
/// ```rust
/// use scte35_decoder::fmt::format_identifier;
///
/// assert_eq!(format_identifier(0x43554549), "CUEI");
/// assert_eq!(format_identifier(0x12345678), "0x12345678");
/// ```
pub fn format_identifier(identifier: u32) -> String {
    let bytes = identifier.to_be_bytes();
    if bytes.iter().all(u8::is_ascii_alphanumeric) {
        bytes.iter().map(|&b| b as char).collect()
    } else {
        format!("0x{identifier:08X}")
    }
}

/// Converts 90 kHz clock ticks to seconds, rounded up to 6 decimal places.
///
/// ```rust
/// use scte35_decoder::fmt::ticks_to_secs;
///
/// assert_eq!(ticks_to_secs(90_000), 1.0);
/// assert_eq!(ticks_to_secs(2_700_000), 30.0);
/// ```
pub fn ticks_to_secs(ticks: u64) -> f64 {
    (ticks as f64 / 90_000.0 * 1_000_000.0).ceil() / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_identifier() {
        assert_eq!(format_identifier(0x43554549), "CUEI");
        assert_eq!(format_identifier(0x54455354), "TEST");

        assert_eq!(format_identifier(0x41422D44), "0x41422D44"); // "AB-D"
        assert_eq!(format_identifier(0x00000000), "0x00000000");
    }

    #[test]
    fn test_ticks_to_secs() {
        assert_eq!(ticks_to_secs(0), 0.0);
        assert_eq!(ticks_to_secs(0x072bd0050), 21388.766756);
        assert_eq!(ticks_to_secs(5_426_421), 60.293567);
        // a single tick rounds up instead of vanishing
        assert_eq!(ticks_to_secs(1), 0.000012);
    }
}
