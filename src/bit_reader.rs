//! Bit-level reading utilities for decoding SCTE-35 binary data.
//!
//! This module provides the `BitReader` struct which extracts arbitrary,
//! unaligned big-endian bit fields from a byte buffer, as required by the
//! `splice_info_section` grammar.
//!
//! The reader never fails a call. A request that runs past the end of the
//! buffer records a sticky [`EndOfData`] condition, returns zero and leaves
//! the offset where it was; callers keep decoding and inspect
//! [`BitReader::error`] once they are done.

use crate::error::EndOfData;
use tracing::debug;

/// Bits past the last byte that may be read. They always read as zero.
const SLACK_BITS: usize = 7;

/// A reader that can extract values at the bit level from a byte buffer.
///
/// SCTE-35 messages contain fields that are not byte-aligned and fields wider
/// than 32 bits (the 33-bit PTS, the 40-bit segmentation duration, the 48-bit
/// TAI seconds). The reader keeps a bit offset into an immutable buffer and
/// hands out up to 64 bits per call.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    buffer: &'a [u8],
    offset: usize,
    len: usize,
    error: Option<EndOfData>,
}

impl<'a> BitReader<'a> {
    /// Creates a new `BitReader` for the given buffer.
    ///
    /// The reader starts at bit offset 0 with no error recorded.
    pub fn new(buffer: &'a [u8]) -> Self {
        BitReader {
            buffer,
            offset: 0,
            len: buffer.len() * 8 + SLACK_BITS,
            error: None,
        }
    }

    /// Reads the next `num_bits` bits as an unsigned big-endian value.
    ///
    /// The bits are returned right-aligned and the offset advances by
    /// `num_bits`. Widths above 64 consume the whole field and keep its low
    /// 64 bits.
    ///
    /// If the read would pass the end of the buffer (plus the 7 bit slack),
    /// the end-of-data condition is set, zero is returned and the offset is
    /// left untouched.
    pub fn read(&mut self, num_bits: usize) -> u64 {
        if self.offset.saturating_add(num_bits) > self.len {
            self.fail(num_bits);
            return 0;
        }
        if num_bits == 0 {
            return 0;
        }
        if num_bits > 64 {
            self.offset += num_bits - 64;
            return self.read(64);
        }

        let byte_index = self.offset / 8;
        let bit_offset = self.offset % 8;

        if num_bits + bit_offset > 64 {
            // the field spans nine bytes, so it can't come out of one word
            let head_bits = 64 - bit_offset;
            let tail_bits = num_bits - head_bits;
            let head = self.read(head_bits);
            let tail = self.read(tail_bits);
            return (head << tail_bits) | tail;
        }

        let word = read_be(self.buffer.get(byte_index..).unwrap_or_default()) << bit_offset;
        self.offset += num_bits;
        word >> (64 - num_bits)
    }

    /// Reads `num_bits` bits without advancing the reader.
    ///
    /// Both the offset and the error state are restored afterwards, so a
    /// failed peek does not poison the reader.
    pub fn peek(&mut self, num_bits: usize) -> u64 {
        let (offset, error) = (self.offset, self.error);
        let value = self.read(num_bits);
        self.offset = offset;
        self.error = error;
        value
    }

    /// Reads up to 8 bits, keeping the low-order byte.
    pub fn read_u8(&mut self, num_bits: usize) -> u8 {
        self.read(num_bits) as u8
    }

    /// Reads up to 16 bits, keeping the low-order 16 bits.
    pub fn read_u16(&mut self, num_bits: usize) -> u16 {
        self.read(num_bits) as u16
    }

    /// Reads up to 32 bits, keeping the low-order 32 bits.
    pub fn read_u32(&mut self, num_bits: usize) -> u32 {
        self.read(num_bits) as u32
    }

    /// Reads a flag field. Any non-zero value is `true`.
    pub fn read_bool(&mut self, num_bits: usize) -> bool {
        self.read(num_bits) != 0
    }

    /// Reads `count` consecutive bytes, 8 bits at a time.
    ///
    /// Bytes that fall past the end of the buffer come back as zero and set
    /// the end-of-data condition.
    pub fn read_bytes(&mut self, count: usize) -> Vec<u8> {
        (0..count).map(|_| self.read_u8(8)).collect()
    }

    /// Gets the current bit offset in the buffer (the number of bits consumed).
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The end-of-data condition, if any read has run out of bits.
    pub fn error(&self) -> Option<EndOfData> {
        self.error
    }

    /// Returns `true` once the end-of-data condition has been set.
    pub fn is_exhausted(&self) -> bool {
        self.error.is_some()
    }

    fn fail(&mut self, requested: usize) {
        if self.error.is_none() {
            debug!(offset = self.offset, requested, "bitstream exhausted");
            self.error = Some(EndOfData {
                offset: self.offset,
                requested,
            });
        }
    }
}

/// Packs up to the first 8 bytes of `bytes` into a big-endian word.
///
/// Missing trailing bytes are zero.
fn read_be(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .take(8)
        .enumerate()
        .fold(0, |word, (i, &byte)| word | ((byte as u64) << (8 * (7 - i))))
}
