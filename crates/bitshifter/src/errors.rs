//! Error types for layout planning.

use crate::kind::FieldKind;

/// Errors produced when planning a schema with [crate::plan::plan].
///
/// Planning stops at the first offending field; fields after it are never checked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Declared width is larger than the kind can hold.
    #[error("{field} too big for {kind}: {bit_width} bits declared, capacity is {capacity}")]
    CapacityExceeded {
        field: String,
        kind: FieldKind,
        bit_width: usize,
        capacity: usize,
    },
    /// Field declares zero bits.
    #[error("{field} has zero bit width")]
    InvalidFieldSize { field: String },
    /// Field name is empty or already used by an earlier field.
    #[error("invalid field name `{field}`: names must be non-empty and unique")]
    InvalidFieldName { field: String },
}
