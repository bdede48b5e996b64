//! Type tags and the codes that identify them inside flattened type text.

use std::fmt;

/// Closed set of element tags a bitfile can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    Bool,
    /// Scalar fixed-point.
    Fxp,
    /// Complex fixed-point.
    Cfxp,
}

/// Tag → code, as it appears in flattened type text.
pub const CATALOG: [(TypeTag, &str); 11] = [
    (TypeTag::I8, "4001"),
    (TypeTag::I16, "4002"),
    (TypeTag::I32, "4003"),
    (TypeTag::I64, "4004"),
    (TypeTag::U8, "4005"),
    (TypeTag::U16, "4006"),
    (TypeTag::U32, "4007"),
    (TypeTag::U64, "4008"),
    (TypeTag::Bool, "4021"),
    (TypeTag::Fxp, "405F"),
    (TypeTag::Cfxp, "405E"),
];

/// Length of every code in [`CATALOG`].
pub const CODE_LEN: usize = 4;

impl TypeTag {
    /// Resolves a tag name as written in bitfile metadata (case-insensitive).
    pub fn from_name(name: &str) -> Option<TypeTag> {
        let tag = match name.to_ascii_uppercase().as_str() {
            "I8" => TypeTag::I8,
            "I16" => TypeTag::I16,
            "I32" => TypeTag::I32,
            "I64" => TypeTag::I64,
            "U8" => TypeTag::U8,
            "U16" => TypeTag::U16,
            "U32" => TypeTag::U32,
            "U64" => TypeTag::U64,
            "BOOL" | "BOOLEAN" => TypeTag::Bool,
            "FXP" => TypeTag::Fxp,
            "CFXP" => TypeTag::Cfxp,
            _ => return None,
        };
        Some(tag)
    }

    pub fn from_code(code: &str) -> Option<TypeTag> {
        CATALOG.iter().find(|(_, c)| *c == code).map(|(t, _)| *t)
    }

    pub fn code(self) -> &'static str {
        match self {
            TypeTag::I8 => "4001",
            TypeTag::I16 => "4002",
            TypeTag::I32 => "4003",
            TypeTag::I64 => "4004",
            TypeTag::U8 => "4005",
            TypeTag::U16 => "4006",
            TypeTag::U32 => "4007",
            TypeTag::U64 => "4008",
            TypeTag::Bool => "4021",
            TypeTag::Fxp => "405F",
            TypeTag::Cfxp => "405E",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::I8 => "I8",
            TypeTag::I16 => "I16",
            TypeTag::I32 => "I32",
            TypeTag::I64 => "I64",
            TypeTag::U8 => "U8",
            TypeTag::U16 => "U16",
            TypeTag::U32 => "U32",
            TypeTag::U64 => "U64",
            TypeTag::Bool => "Bool",
            TypeTag::Fxp => "FXP",
            TypeTag::Cfxp => "CFXP",
        }
    }

    /// Fixed width of integer and boolean tags; `None` for fixed-point tags, whose width
    /// comes from the flattened record.
    pub fn fixed_width(self) -> Option<i32> {
        match self {
            TypeTag::I8 | TypeTag::U8 => Some(8),
            TypeTag::I16 | TypeTag::U16 => Some(16),
            TypeTag::I32 | TypeTag::U32 => Some(32),
            TypeTag::I64 | TypeTag::U64 => Some(64),
            TypeTag::Bool => Some(1),
            TypeTag::Fxp | TypeTag::Cfxp => None,
        }
    }

    /// Signedness of integer tags by naming convention (`I…` signed, `U…` unsigned).
    pub fn is_signed_integer(self) -> bool {
        self.name().starts_with('I')
    }

    pub fn is_fixed_point(self) -> bool {
        matches!(self, TypeTag::Fxp | TypeTag::Cfxp)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
