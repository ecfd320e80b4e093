//! JSON-deserializable schema description.
//!
//! These types describe the fields to be laid out. They are intended to be
//! read from a schema file and then converted into core `bitshifter` types:
//!
//! ```json
//! {
//!   "dialect": "java",
//!   "fields": [
//!     { "name": "deviceId", "bits": 12, "kind": "short" },
//!     { "name": "signature", "bits": 24, "kind": "bytearray" }
//!   ]
//! }
//! ```
//!
//! Kind names outside the catalog are rejected while deserializing.

use serde::{Deserialize, Serialize};

use crate::{
    expr::{AnnotatedFragment, Dialect},
    kind::FieldKind,
};

/// Top-level schema definition.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchemaDef {
    /// Fields in packing order.
    pub fields: Vec<FieldDef>,
    /// Preferred expression dialect; callers may override it.
    #[serde(default)]
    pub dialect: Option<DialectDef>,
}

/// Description of a single field.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FieldDef {
    pub name: String,
    /// Declared width in bits.
    pub bits: usize,
    pub kind: KindDef,
}

/// Field kind as written in schema files.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KindDef {
    Byte,
    Short,
    Int,
    #[serde(alias = "bool")]
    Boolean,
    #[serde(alias = "[]")]
    ByteArray,
}

impl From<KindDef> for FieldKind {
    fn from(value: KindDef) -> Self {
        match value {
            KindDef::Byte => FieldKind::Byte,
            KindDef::Short => FieldKind::Short,
            KindDef::Int => FieldKind::Int,
            KindDef::Boolean => FieldKind::Boolean,
            KindDef::ByteArray => FieldKind::ByteArray,
        }
    }
}

/// Expression dialect as written in schema files.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DialectDef {
    #[default]
    Java,
    Rust,
    C,
}

impl From<DialectDef> for Dialect {
    fn from(value: DialectDef) -> Self {
        match value {
            DialectDef::Java => Dialect::Java,
            DialectDef::Rust => Dialect::Rust,
            DialectDef::C => Dialect::C,
        }
    }
}

/// Serializable view of an annotated fragment, one table row.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FragmentDef {
    pub field: String,
    pub kind: String,
    pub chunk_index: usize,
    pub byte_index: usize,
    pub bit_offset: usize,
    pub len_bits: usize,
    pub mask: u8,
    pub mask_shift: usize,
    pub dest_shift: usize,
    pub first: bool,
    pub unpack: String,
    pub pack: String,
}

impl From<&AnnotatedFragment> for FragmentDef {
    fn from(value: &AnnotatedFragment) -> Self {
        let fragment = &value.fragment;

        FragmentDef {
            field: fragment.field_name.clone(),
            kind: fragment.field_kind.name().to_string(),
            chunk_index: fragment.chunk_index,
            byte_index: fragment.byte_index,
            bit_offset: fragment.bit_offset,
            len_bits: fragment.len_bits,
            mask: fragment.mask(),
            mask_shift: fragment.mask_shift,
            dest_shift: fragment.dest_shift,
            first: fragment.first,
            unpack: value.expressions.unpack.clone(),
            pack: value.expressions.pack.clone(),
        }
    }
}
