//! Placement fragments: the byte-confined pieces a chunk is carved into.

use crate::{
    field::{Destination, DestinationDisplay},
    kind::FieldKind,
};

/// One contiguous run of bits inside a single buffer byte, belonging to one chunk.
///
/// Bits are numbered MSB-first: `bit_offset` 0 is the most significant bit of
/// `buf[byte_index]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub field_name: String,
    /// Declared kind of the owning field.
    pub field_kind: FieldKind,
    pub chunk_index: usize,
    pub destination: Destination,
    pub byte_index: usize,
    /// Bit position inside the byte where the fragment starts.
    pub bit_offset: usize,
    /// Bits taken from the cursor.
    pub len_bits: usize,
    /// Low-order bit positions of the byte lying below the fragment: `8 - bit_offset - len_bits`.
    pub mask_shift: usize,
    /// Left shift that lands the extracted bits in the destination value.
    pub dest_shift: usize,
    /// First fragment carved for its chunk; carries the chunk's most significant bits.
    pub first: bool,
}

impl Fragment {
    pub(crate) fn new(
        field_name: &str,
        field_kind: FieldKind,
        chunk_index: usize,
        cursor: usize,
        len_bits: usize,
        dest_shift: usize,
        first: bool,
    ) -> Self {
        let bit_offset = cursor % 8;
        debug_assert!(
            len_bits > 0 && bit_offset + len_bits <= 8,
            "fragment of {len_bits} bits at offset {bit_offset} crosses a byte boundary"
        );

        Fragment {
            field_name: field_name.to_string(),
            field_kind,
            chunk_index,
            destination: Destination::for_chunk(field_kind, chunk_index),
            byte_index: cursor / 8,
            bit_offset,
            len_bits,
            mask_shift: 8 - bit_offset - len_bits,
            dest_shift,
            first,
        }
    }

    /// Byte-local mask selecting exactly this fragment's bits.
    pub fn mask(&self) -> u8 {
        (((1u16 << self.len_bits) - 1) << self.mask_shift) as u8
    }

    /// Absolute cursor position of the first bit.
    pub fn start_bit(&self) -> usize {
        self.byte_index * 8 + self.bit_offset
    }

    /// Absolute cursor position one past the last bit.
    pub fn end_bit(&self) -> usize {
        self.start_bit() + self.len_bits
    }

    /// Destination expression, `name` or `name[i]`.
    pub fn target(&self) -> DestinationDisplay<'_> {
        self.destination.display(&self.field_name)
    }
}
