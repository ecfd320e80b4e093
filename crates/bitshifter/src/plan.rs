//! Layout planning: places every field of a schema into a packed, MSB-first bit buffer.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::{
    errors::SchemaError,
    expr::{AnnotatedFragment, Dialect},
    field::{Chunk, Field},
    fragment::Fragment,
};

/// The planned placement of a schema: fragments in emission order and the final cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    total_bits: usize,
    fragments: Vec<Fragment>,
}

impl Layout {
    /// Total packed length in bits (the final cursor).
    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    /// Bytes needed to hold the packed schema.
    pub fn buffer_len(&self) -> usize {
        self.total_bits.div_ceil(8)
    }

    /// Placement fragments in cursor order.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Fragments belonging to the field called `name`, in cursor order.
    pub fn fragments_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Fragment> + 'a {
        self.fragments.iter().filter(move |f| f.field_name == name)
    }

    /// Attaches pack/unpack expressions in `dialect` to every fragment.
    pub fn annotate(&self, dialect: Dialect) -> Vec<AnnotatedFragment> {
        self.fragments
            .iter()
            .map(|fragment| AnnotatedFragment::new(fragment.clone(), dialect))
            .collect()
    }
}

/// Plans `fields` in order. Fails on the first field that is invalid.
pub fn plan(fields: &[Field]) -> Result<Layout, SchemaError> {
    Planner::default().run(fields)
}

/// Cursor state for a single planning pass.
#[derive(Debug, Default)]
struct Planner {
    cursor: usize,
    fragments: Vec<Fragment>,
}

impl Planner {
    fn run(mut self, fields: &[Field]) -> Result<Layout, SchemaError> {
        let mut seen: HashSet<&str> = HashSet::with_capacity(fields.len());

        for field in fields {
            if let Err(err) = validate(field, &mut seen) {
                warn!(field = %field.name, error = %err, "schema rejected");
                return Err(err);
            }

            debug!(
                field = %field.name,
                kind = %field.kind,
                bits = field.bit_width,
                cursor = self.cursor,
                chunks = field.chunk_count(),
                "placing field"
            );

            for chunk in field.chunks() {
                self.place_chunk(field, chunk);
            }
        }

        let layout = Layout {
            total_bits: self.cursor,
            fragments: self.fragments,
        };

        debug!(
            total_bits = layout.total_bits(),
            bytes = layout.buffer_len(),
            fragments = layout.fragments.len(),
            "layout planned"
        );

        Ok(layout)
    }

    /// Carves `chunk` into byte-confined fragments, high-order bits first.
    fn place_chunk(&mut self, field: &Field, chunk: Chunk) {
        let mut remaining = chunk.len_bits;
        let mut first = true;

        while remaining > 0 {
            let available = 8 - self.cursor % 8;
            let take = remaining.min(available);

            let fragment = Fragment::new(
                &field.name,
                field.kind,
                chunk.index,
                self.cursor,
                take,
                remaining - take,
                first,
            );

            trace!(
                field = %fragment.field_name,
                chunk = chunk.index,
                byte = fragment.byte_index,
                offset = fragment.bit_offset,
                bits = take,
                mask = fragment.mask(),
                "fragment"
            );

            self.fragments.push(fragment);
            self.cursor += take;
            remaining -= take;
            first = false;
        }
    }
}

fn validate<'a>(field: &'a Field, seen: &mut HashSet<&'a str>) -> Result<(), SchemaError> {
    if field.name.trim().is_empty() || !seen.insert(field.name.as_str()) {
        return Err(SchemaError::InvalidFieldName {
            field: field.name.clone(),
        });
    }

    if field.bit_width == 0 {
        return Err(SchemaError::InvalidFieldSize {
            field: field.name.clone(),
        });
    }

    let capacity = field.kind.capacity();
    if field.bit_width > capacity {
        return Err(SchemaError::CapacityExceeded {
            field: field.name.clone(),
            kind: field.kind,
            bit_width: field.bit_width,
            capacity,
        });
    }

    Ok(())
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::SchemaDef> for Layout {
    type Error = SchemaError;

    fn try_from(value: crate::serde::SchemaDef) -> Result<Self, Self::Error> {
        let fields: Vec<Field> = value.fields.into_iter().map(Into::into).collect();
        plan(&fields)
    }
}

#[cfg(test)]
mod tests {
    use crate::kind::FieldKind;

    use super::*;

    fn packet() -> Vec<Field> {
        vec![
            Field::new("deviceId", 12, FieldKind::Short),
            Field::new("flags", 4, FieldKind::Byte),
            Field::new("signature", 24, FieldKind::ByteArray),
            Field::new("checksum", 8, FieldKind::Byte),
            Field::new("valid", 1, FieldKind::Boolean),
        ]
    }

    #[test]
    fn test_empty_schema() {
        let layout = plan(&[]).unwrap();
        assert!(layout.fragments().is_empty());
        assert_eq!(layout.total_bits(), 0);
        assert_eq!(layout.buffer_len(), 0);
    }

    #[test]
    fn test_packet_size() {
        let layout = plan(&packet()).unwrap();
        assert_eq!(layout.total_bits(), 49);
        assert_eq!(layout.buffer_len(), 7);
    }

    #[test]
    fn test_fragments_account_for_every_bit() {
        let layout = plan(&packet()).unwrap();
        let placed: usize = layout.fragments().iter().map(|f| f.len_bits).sum();

        assert_eq!(layout.fragments().len(), 8);
        assert_eq!(placed, layout.total_bits());
        assert_eq!(layout.fragments().last().unwrap().end_bit(), 49);
    }

    #[test]
    fn test_short_crossing_byte_boundary() {
        let layout = plan(&[Field::new("deviceId", 12, FieldKind::Short)]).unwrap();
        let fragments = layout.fragments();

        assert_eq!(fragments.len(), 2);

        assert_eq!(fragments[0].byte_index, 0);
        assert_eq!(fragments[0].bit_offset, 0);
        assert_eq!(fragments[0].len_bits, 8);
        assert_eq!(fragments[0].dest_shift, 4);
        assert_eq!(fragments[0].mask(), 0xff);
        assert!(fragments[0].first);

        assert_eq!(fragments[1].byte_index, 1);
        assert_eq!(fragments[1].bit_offset, 0);
        assert_eq!(fragments[1].len_bits, 4);
        assert_eq!(fragments[1].dest_shift, 0);
        assert_eq!(fragments[1].mask(), 0xf0);
        assert!(!fragments[1].first);
    }

    #[test]
    fn test_nibble_in_second_half_of_byte() {
        let layout = plan(&packet()).unwrap();
        let flags: Vec<_> = layout.fragments_of("flags").collect();

        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].byte_index, 1);
        assert_eq!(flags[0].bit_offset, 4);
        assert_eq!(flags[0].len_bits, 4);
        assert_eq!(flags[0].mask_shift, 0);
        assert_eq!(flags[0].mask(), 0x0f);
    }

    #[test]
    fn test_byte_array_chunks() {
        let layout = plan(&packet()).unwrap();
        let signature: Vec<_> = layout.fragments_of("signature").collect();

        assert_eq!(signature.len(), 3);
        for (i, fragment) in signature.iter().enumerate() {
            assert_eq!(fragment.chunk_index, i);
            assert_eq!(fragment.byte_index, 2 + i);
            assert_eq!(fragment.len_bits, 8);
            assert!(fragment.first);
        }
    }

    #[test]
    fn test_unaligned_byte_array_chunks_cross_bytes() {
        let fields = vec![
            Field::new("lead", 3, FieldKind::Byte),
            Field::new("data", 20, FieldKind::ByteArray),
        ];
        let layout = plan(&fields).unwrap();
        let data: Vec<_> = layout.fragments_of("data").collect();

        // chunks of 8, 8, 4 starting at bit 3
        let shape: Vec<_> = data
            .iter()
            .map(|f| (f.chunk_index, f.byte_index, f.len_bits, f.dest_shift, f.first))
            .collect();
        assert_eq!(
            shape,
            vec![
                (0, 0, 5, 3, true),
                (0, 1, 3, 0, false),
                (1, 1, 5, 3, true),
                (1, 2, 3, 0, false),
                (2, 2, 4, 0, true),
            ]
        );
        assert_eq!(layout.total_bits(), 23);
    }

    #[test]
    fn test_int_spanning_five_bytes() {
        let fields = vec![
            Field::new("pad", 4, FieldKind::Byte),
            Field::new("counter", 32, FieldKind::Int),
        ];
        let layout = plan(&fields).unwrap();
        let counter: Vec<_> = layout.fragments_of("counter").collect();

        assert_eq!(
            counter.iter().map(|f| f.len_bits).collect::<Vec<_>>(),
            vec![4, 8, 8, 8, 4]
        );
        assert_eq!(
            counter.iter().map(|f| f.dest_shift).collect::<Vec<_>>(),
            vec![28, 20, 12, 4, 0]
        );
    }

    #[test]
    fn test_boolean_is_single_fragment() {
        let fields = vec![
            Field::new("pad", 7, FieldKind::Byte),
            Field::new("flag", 1, FieldKind::Boolean),
        ];
        let layout = plan(&fields).unwrap();
        let flag: Vec<_> = layout.fragments_of("flag").collect();

        assert_eq!(flag.len(), 1);
        assert_eq!(flag[0].bit_offset, 7);
        assert_eq!(flag[0].mask(), 0x01);
    }

    #[test]
    fn test_capacity_exceeded_stops_planning() {
        let fields = vec![
            Field::new("ok", 8, FieldKind::Byte),
            Field::new("wide", 9, FieldKind::Byte),
            Field::new("", 0, FieldKind::Int),
        ];

        assert_eq!(
            plan(&fields),
            Err(SchemaError::CapacityExceeded {
                field: "wide".to_string(),
                kind: FieldKind::Byte,
                bit_width: 9,
                capacity: 8,
            })
        );
    }

    #[test]
    fn test_boolean_wider_than_one_bit() {
        let result = plan(&[Field::new("flag", 2, FieldKind::Boolean)]);
        assert!(matches!(
            result,
            Err(SchemaError::CapacityExceeded { capacity: 1, .. })
        ));
    }

    #[test]
    fn test_zero_width_rejected() {
        assert_eq!(
            plan(&[Field::new("empty", 0, FieldKind::Short)]),
            Err(SchemaError::InvalidFieldSize {
                field: "empty".to_string()
            })
        );
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let fields = vec![
            Field::new("a", 4, FieldKind::Byte),
            Field::new("a", 4, FieldKind::Byte),
        ];
        assert_eq!(
            plan(&fields),
            Err(SchemaError::InvalidFieldName {
                field: "a".to_string()
            })
        );
    }

    #[test]
    fn test_large_byte_array_is_accepted() {
        let layout = plan(&[Field::new("blob", 1000, FieldKind::ByteArray)]).unwrap();
        assert_eq!(layout.total_bits(), 1000);
        assert_eq!(layout.buffer_len(), 125);
        assert_eq!(layout.fragments().len(), 125);
    }
}
