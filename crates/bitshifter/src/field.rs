//! Definition of logical fields used to build a [crate::plan::Layout].

use std::fmt;

use crate::kind::FieldKind;

/// Width of one array element in bits.
pub const ELEMENT_BITS: usize = 8;

/// A single named field in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used as the destination in generated expressions.
    pub name: String,
    /// Number of bits the field occupies in the packed buffer.
    pub bit_width: usize,
    /// Primitive kind; bounds `bit_width` through [FieldKind::capacity].
    pub kind: FieldKind,
}

impl Field {
    pub fn new(name: impl Into<String>, bit_width: usize, kind: FieldKind) -> Self {
        Field {
            name: name.into(),
            bit_width,
            kind,
        }
    }

    /// Splits the field into destination-sized [Chunk]s.
    ///
    /// Scalars yield one chunk of `bit_width` bits. Byte arrays yield
    /// `ceil(bit_width / 8)` chunks of at most 8 bits, the last one possibly narrower.
    pub fn chunks(&self) -> Chunks {
        let step = if self.kind.is_array() {
            ELEMENT_BITS
        } else {
            self.bit_width.max(1)
        };

        Chunks {
            remaining: self.bit_width,
            step,
            index: 0,
        }
    }

    /// Number of chunks [Field::chunks] yields.
    pub fn chunk_count(&self) -> usize {
        if self.kind.is_array() {
            self.bit_width.div_ceil(ELEMENT_BITS)
        } else if self.bit_width == 0 {
            0
        } else {
            1
        }
    }
}

#[cfg(feature = "serde")]
impl From<crate::serde::FieldDef> for Field {
    fn from(value: crate::serde::FieldDef) -> Self {
        Field {
            name: value.name,
            bit_width: value.bits,
            kind: value.kind.into(),
        }
    }
}

/// The unit a field is decomposed into before byte-level fragmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Element index for arrays; always 0 for scalars.
    pub index: usize,
    pub len_bits: usize,
}

/// Iterator returned by [Field::chunks].
#[derive(Debug, Clone)]
pub struct Chunks {
    remaining: usize,
    step: usize,
    index: usize,
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.remaining == 0 {
            return None;
        }

        let len_bits = self.remaining.min(self.step);
        let chunk = Chunk {
            index: self.index,
            len_bits,
        };

        self.remaining -= len_bits;
        self.index += 1;

        Some(chunk)
    }
}

/// Where the bits of a chunk end up: the field itself or one element of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Scalar,
    Element(usize),
}

impl Destination {
    pub fn for_chunk(kind: FieldKind, chunk_index: usize) -> Self {
        if kind.is_array() {
            Destination::Element(chunk_index)
        } else {
            Destination::Scalar
        }
    }

    /// Renders the destination for a field called `name` (`name` or `name[i]`).
    pub fn display<'a>(&self, name: &'a str) -> DestinationDisplay<'a> {
        DestinationDisplay {
            name,
            destination: *self,
        }
    }
}

pub struct DestinationDisplay<'a> {
    name: &'a str,
    destination: Destination,
}

impl fmt::Display for DestinationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.destination {
            Destination::Scalar => f.write_str(self.name),
            Destination::Element(i) => write!(f, "{}[{}]", self.name, i),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(field: &Field) -> Vec<usize> {
        field.chunks().map(|c| c.len_bits).collect()
    }

    #[test]
    fn test_scalar_is_one_chunk() {
        let field = Field::new("id", 12, FieldKind::Short);
        assert_eq!(
            field.chunks().collect::<Vec<_>>(),
            vec![Chunk {
                index: 0,
                len_bits: 12
            }]
        );
        assert_eq!(field.chunk_count(), 1);
    }

    #[test]
    fn test_array_chunks_round_up() {
        let field = Field::new("data", 20, FieldKind::ByteArray);
        assert_eq!(widths(&field), vec![8, 8, 4]);
        assert_eq!(field.chunk_count(), 3);
    }

    #[test]
    fn test_array_chunks_exact_multiple() {
        let field = Field::new("signature", 24, FieldKind::ByteArray);
        assert_eq!(widths(&field), vec![8, 8, 8]);
        assert_eq!(
            field.chunks().map(|c| c.index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_short_array_is_single_narrow_chunk() {
        let field = Field::new("tail", 3, FieldKind::ByteArray);
        assert_eq!(widths(&field), vec![3]);
    }

    #[test]
    fn test_zero_width_has_no_chunks() {
        assert_eq!(Field::new("empty", 0, FieldKind::Byte).chunks().count(), 0);
        assert_eq!(Field::new("empty", 0, FieldKind::ByteArray).chunk_count(), 0);
    }

    #[test]
    fn test_destination_display() {
        let scalar = Destination::for_chunk(FieldKind::Int, 0);
        let element = Destination::for_chunk(FieldKind::ByteArray, 2);

        assert_eq!(scalar.display("crc").to_string(), "crc");
        assert_eq!(element.display("signature").to_string(), "signature[2]");
    }
}
