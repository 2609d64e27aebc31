//! Error types for decoding operations.

use crate::types::Packet;
use thiserror::Error;

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// The sticky end-of-data condition of a [`BitReader`](crate::BitReader).
///
/// Records the first request that ran past the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unexpected end of data: {requested} bits requested at bit offset {offset}")]
pub struct EndOfData {
    /// Bit offset of the reader when the request was made.
    pub offset: usize,
    /// Number of bits requested.
    pub requested: usize,
}

/// Errors that can occur while decoding a splice information section.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Input starting with `/D` was not valid base64.
    #[cfg(feature = "base64")]
    #[error("invalid base64 input: {0}")]
    Base64(#[source] data_encoding::DecodeError),

    /// Input starting with `0x`, `f` or `F` was not valid hexadecimal.
    #[cfg(feature = "base64")]
    #[error("invalid hexadecimal input: {0}")]
    Hex(#[source] data_encoding::DecodeError),

    /// The bitstream ran out before the packet was complete.
    ///
    /// Every field read before the end of data is kept in `packet`.
    #[error("packet truncated: {source}")]
    Truncated {
        /// The partially decoded packet.
        packet: Box<Packet>,
        /// Where the reader ran out of bits.
        source: EndOfData,
    },
}

impl DecodeError {
    /// The partially decoded packet, when the error happened mid-stream.
    pub fn partial(&self) -> Option<&Packet> {
        match self {
            DecodeError::Truncated { packet, .. } => Some(packet),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Consumes the error, returning the partially decoded packet if any.
    pub fn into_partial(self) -> Option<Packet> {
        match self {
            DecodeError::Truncated { packet, .. } => Some(*packet),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }
}
