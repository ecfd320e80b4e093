//! Expression synthesis: the read and write statements for a single [Fragment].
//!
//! Every dialect uses logical (zero-filling) right shifts only. An arithmetic
//! shift of a buffer byte would smear its top bit into the neighbouring bit
//! groups whenever a fragment's most significant bit is set.
//!
//! Unpacking a chunk assigns its first fragment with `=` and ORs the later,
//! lower-order fragments in with `|=`. Packing always ORs into the buffer
//! byte since several fields may share it.

use std::str::FromStr;

use crate::{fragment::Fragment, kind::FieldKind};

/// Target language of the generated statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// `>>>` shifts and `(byte)` casts on a `byte[] buf`.
    #[default]
    Java,
    /// `u8`/`u16`/`u32` destinations over `buf: &mut [u8]`.
    Rust,
    /// `uint8_t`-family destinations over `uint8_t *buf`.
    C,
}

impl Dialect {
    pub const ALL: [Dialect; 3] = [Dialect::Java, Dialect::Rust, Dialect::C];

    pub const fn name(self) -> &'static str {
        match self {
            Dialect::Java => "java",
            Dialect::Rust => "rust",
            Dialect::C => "c",
        }
    }

    /// Destination type for a value of `kind`.
    pub const fn type_name(self, kind: FieldKind) -> &'static str {
        let kind = kind.element_kind();
        match self {
            Dialect::Java => match kind {
                FieldKind::Boolean => "boolean",
                FieldKind::Short => "short",
                FieldKind::Int => "int",
                FieldKind::Byte | FieldKind::ByteArray => "byte",
            },
            Dialect::Rust => match kind {
                FieldKind::Boolean => "bool",
                FieldKind::Short => "u16",
                FieldKind::Int => "u32",
                FieldKind::Byte | FieldKind::ByteArray => "u8",
            },
            Dialect::C => match kind {
                FieldKind::Boolean => "bool",
                FieldKind::Short => "uint16_t",
                FieldKind::Int => "uint32_t",
                FieldKind::Byte | FieldKind::ByteArray => "uint8_t",
            },
        }
    }

    /// Logical right shift operator.
    const fn shr(self) -> &'static str {
        match self {
            Dialect::Java => ">>>",
            Dialect::Rust | Dialect::C => ">>",
        }
    }
}

/// A dialect name other than `java`, `rust` or `c`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dialect `{0}` (expected java, rust or c)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java" => Ok(Dialect::Java),
            "rust" => Ok(Dialect::Rust),
            "c" => Ok(Dialect::C),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Read and write statements for one fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expressions {
    /// Moves the fragment's bits from the buffer into the destination.
    pub unpack: String,
    /// ORs the destination's bits into the buffer byte.
    pub pack: String,
}

/// Synthesizes Java statements for `fragment`, treating it as belonging to a field of `kind`.
pub fn synthesize(fragment: &Fragment, kind: FieldKind) -> Expressions {
    synthesize_with(fragment, kind, Dialect::default())
}

/// Synthesizes statements for `fragment` in `dialect`.
pub fn synthesize_with(fragment: &Fragment, kind: FieldKind, dialect: Dialect) -> Expressions {
    let dest = fragment.target().to_string();
    let buf = format!("buf[{}]", fragment.byte_index);
    let mask = format!("0x{:02x}", fragment.mask());

    if kind == FieldKind::Boolean {
        return boolean(dialect, &dest, &buf, &mask);
    }

    let ty = dialect.type_name(kind);
    let op = if fragment.first { "=" } else { "|=" };

    Expressions {
        unpack: unpack(dialect, fragment, ty, op, &dest, &buf, &mask),
        pack: pack(dialect, fragment, ty, &dest, &buf, &mask),
    }
}

fn boolean(dialect: Dialect, dest: &str, buf: &str, mask: &str) -> Expressions {
    match dialect {
        Dialect::Java => Expressions {
            unpack: format!("{dest} = (({buf} & {mask}) != 0);"),
            pack: format!("{buf} |= ({dest} ? (byte) {mask} : 0);"),
        },
        Dialect::Rust => Expressions {
            unpack: format!("{dest} = ({buf} & {mask}) != 0;"),
            pack: format!("if {dest} {{ {buf} |= {mask}; }}"),
        },
        Dialect::C => Expressions {
            unpack: format!("{dest} = ({buf} & {mask}) != 0;"),
            pack: format!("{buf} |= {dest} ? {mask} : 0;"),
        },
    }
}

fn unpack(
    dialect: Dialect,
    fragment: &Fragment,
    ty: &str,
    op: &str,
    dest: &str,
    buf: &str,
    mask: &str,
) -> String {
    let mut expr = format!("({buf} & {mask})");
    if fragment.mask_shift > 0 {
        expr = format!("({expr} {} {})", dialect.shr(), fragment.mask_shift);
    }

    // widen before shifting left so high bits are not lost in the byte type
    match dialect {
        Dialect::Java => {}
        Dialect::Rust => {
            if ty != "u8" {
                expr = format!("({expr} as {ty})");
            }
        }
        Dialect::C => {
            expr = if fragment.dest_shift > 0 {
                format!("({ty}) {expr}")
            } else {
                format!("(({ty}) {expr})")
            };
        }
    }

    if fragment.dest_shift > 0 {
        expr = format!("({expr} << {})", fragment.dest_shift);
    }

    match dialect {
        Dialect::Java => format!("{dest} {op} ({ty}) {expr};"),
        Dialect::Rust | Dialect::C => format!("{dest} {op} {expr};"),
    }
}

fn pack(
    dialect: Dialect,
    fragment: &Fragment,
    ty: &str,
    dest: &str,
    buf: &str,
    mask: &str,
) -> String {
    let mut value = dest.to_string();
    if fragment.dest_shift > 0 {
        value = format!("({value} {} {})", dialect.shr(), fragment.dest_shift);
    }
    if fragment.mask_shift > 0 {
        value = format!("({value} << {})", fragment.mask_shift);
    }

    match dialect {
        Dialect::Java => format!("{buf} |= (byte) ({value} & {mask});"),
        Dialect::Rust if ty == "u8" => format!("{buf} |= {value} & {mask};"),
        Dialect::Rust => format!("{buf} |= ({value} & {mask}) as u8;"),
        Dialect::C => format!("{buf} |= (uint8_t) ({value} & {mask});"),
    }
}

/// A placement fragment together with its synthesized statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedFragment {
    pub fragment: Fragment,
    pub dialect: Dialect,
    pub expressions: Expressions,
}

impl AnnotatedFragment {
    pub fn new(fragment: Fragment, dialect: Dialect) -> Self {
        let expressions = synthesize_with(&fragment, fragment.field_kind, dialect);
        AnnotatedFragment {
            fragment,
            dialect,
            expressions,
        }
    }
}
