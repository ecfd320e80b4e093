//! Tabular rendering of a planned layout.

use std::fmt;

use crate::{
    errors::SchemaError,
    expr::{AnnotatedFragment, Dialect},
    plan::Layout,
};

const RULE_WIDTH: usize = 155;
const UNPACK_WIDTH: usize = 50;

/// Renders annotated fragments as a fixed-width table, one row per fragment.
///
/// Consecutive chunks of the same array field are separated by a dashed row,
/// and a footer reports the packed size.
pub struct Report {
    rows: Vec<AnnotatedFragment>,
    total_bits: usize,
    buffer_len: usize,
}

impl Report {
    pub fn new(layout: &Layout, dialect: Dialect) -> Self {
        Report {
            rows: layout.annotate(dialect),
            total_bits: layout.total_bits(),
            buffer_len: layout.buffer_len(),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:<7} | {:<3} | {:<7} | {:<10} | {:<50} | {}",
            "FIELD",
            "TYPE",
            "IDX",
            "BUF_IDX",
            "MASK (Hex)",
            "UNPACK (Read Logic)",
            "PACK (Write Logic)"
        )?;
        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;

        for row in &self.rows {
            let fragment = &row.fragment;

            if fragment.field_kind.is_array() && fragment.first && fragment.chunk_index > 0 {
                writeln!(
                    f,
                    "{:<10} {:<7} | {:<3} | {:<7} | {:<10} | {} | {}",
                    "",
                    "",
                    "-",
                    "-",
                    "-",
                    "-".repeat(UNPACK_WIDTH),
                    "-".repeat(20)
                )?;
            }

            writeln!(
                f,
                "{:<10} {:<7} | {:<3} | {:<7} | {:<10} | {:<50} | {}",
                fragment.field_name,
                fragment.field_kind.name(),
                fragment.chunk_index,
                fragment.byte_index,
                format!("0x{:02x}", fragment.mask()),
                row.expressions.unpack,
                row.expressions.pack
            )?;
        }

        writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;
        write!(
            f,
            "TOTAL: {} bits, {} bytes",
            self.total_bits, self.buffer_len
        )
    }
}

/// Renders a planning failure as the single line the report shows instead of a table.
pub fn render_error(err: &SchemaError) -> String {
    format!("ERROR: {err}")
}
