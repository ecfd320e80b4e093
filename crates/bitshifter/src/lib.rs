//! # bitshifter
//!
//! A bit-layout compiler. Given an ordered schema of named fields with bit
//! widths and primitive kinds, it computes where every field lands in a packed
//! buffer and emits the mask/shift statements that read and write each piece.
//!
//! Fields are packed contiguously with no padding, most significant bit first
//! within each byte. A field that crosses a byte boundary is split into
//! fragments confined to one byte each; byte arrays are first split into
//! 8-bit elements.
//!
//! ## Example
//!
//! ```
//! use bitshifter::field::Field;
//! use bitshifter::kind::FieldKind;
//! use bitshifter::plan::plan;
//! use bitshifter::expr::{synthesize, Dialect};
//!
//! let fields = vec![
//!     Field::new("deviceId", 12, FieldKind::Short),
//!     Field::new("flags", 4, FieldKind::Byte),
//! ];
//! let layout = plan(&fields).unwrap();
//! assert_eq!(layout.buffer_len(), 2);
//!
//! let first = synthesize(&layout.fragments()[0], FieldKind::Short);
//! assert_eq!(first.unpack, "deviceId = (short) ((buf[0] & 0xff) << 4);");
//!
//! let rows = layout.annotate(Dialect::Rust);
//! assert_eq!(rows[2].expressions.pack, "buf[1] |= flags & 0x0f;");
//! ```

pub mod errors;
pub mod expr;
pub mod field;
pub mod fragment;
pub mod kind;
pub mod plan;
pub mod report;
#[cfg(feature = "serde")]
pub mod serde;
