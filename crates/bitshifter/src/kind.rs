//! Primitive field kinds and their bit capacities.

use std::{fmt, str::FromStr};

/// Capacity reported for [FieldKind::ByteArray]. No width check ever fails against it.
pub const UNBOUNDED_CAPACITY: usize = usize::MAX;

/// The closed set of primitive kinds a field can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// 8-bit scalar.
    Byte,
    /// 16-bit scalar.
    Short,
    /// 32-bit scalar.
    Int,
    /// Single flag bit.
    Boolean,
    /// Variable-length array of 8-bit elements.
    ByteArray,
}

impl FieldKind {
    /// All kinds, in catalog order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Byte,
        FieldKind::Short,
        FieldKind::Int,
        FieldKind::Boolean,
        FieldKind::ByteArray,
    ];

    /// Maximum number of bits a field of this kind may declare.
    pub const fn capacity(self) -> usize {
        match self {
            FieldKind::Byte => 8,
            FieldKind::Short => 16,
            FieldKind::Int => 32,
            FieldKind::Boolean => 1,
            FieldKind::ByteArray => UNBOUNDED_CAPACITY,
        }
    }

    /// True for kinds whose values are split into 8-bit elements before placement.
    pub const fn is_array(self) -> bool {
        matches!(self, FieldKind::ByteArray)
    }

    /// Kind of a single destination value: the element kind for arrays, the kind itself otherwise.
    pub const fn element_kind(self) -> FieldKind {
        match self {
            FieldKind::ByteArray => FieldKind::Byte,
            other => other,
        }
    }

    /// Short name used in reports and schema files.
    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::Byte => "byte",
            FieldKind::Short => "short",
            FieldKind::Int => "int",
            FieldKind::Boolean => "boolean",
            FieldKind::ByteArray => "[]",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A kind name that is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for FieldKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "byte" => Ok(FieldKind::Byte),
            "short" => Ok(FieldKind::Short),
            "int" => Ok(FieldKind::Int),
            "boolean" | "bool" => Ok(FieldKind::Boolean),
            "bytearray" | "[]" => Ok(FieldKind::ByteArray),
            _ => Err(UnknownKind(s.to_string())),
        }
    }
}
