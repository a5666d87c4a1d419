//! Declared field types
//!
//! Every IR attribute carries a [`TypeRef`]: the static type the emitted Go
//! code must construct. It is computed once, during reflection or when a
//! persisted IR is read back, and rendered in Go type syntax:
//!
//! | TypeRef                          | Go syntax            |
//! |----------------------------------|----------------------|
//! | `Pointer(Primitive(Int32))`      | `*int32`             |
//! | `Slice(Named(v1.Container))`     | `[]v1.Container`     |
//! | `Map(Primitive(String))`         | `map[string]string`  |
//! | `Bytes`                          | `[]byte`             |
//! | `Expr`                           | `expr`               |

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Scalar kinds understood by the emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
}

impl Primitive {
    /// All primitives, in helper emission order
    pub const ALL: [Primitive; 14] = [
        Self::Bool,
        Self::String,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Float32,
        Self::Float64,
    ];

    /// Go spelling of the type
    pub fn go_name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    pub fn from_go_name(name: &str) -> Option<Self> {
        let prim = match name {
            "bool" => Self::Bool,
            "string" => Self::String,
            "int" => Self::Int,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int32" | "rune" => Self::Int32,
            "int64" => Self::Int64,
            "uint" => Self::Uint,
            "uint8" | "byte" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint32" => Self::Uint32,
            "uint64" => Self::Uint64,
            "float32" => Self::Float32,
            "float64" => Self::Float64,
            _ => return None,
        };
        Some(prim)
    }

    /// Name fragment of the pointer wrapping helper: `int32` -> `Int32`
    pub fn helper_suffix(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::String => "String",
            Self::Int => "Int",
            Self::Int8 => "Int8",
            Self::Int16 => "Int16",
            Self::Int32 => "Int32",
            Self::Int64 => "Int64",
            Self::Uint => "Uint",
            Self::Uint8 => "Uint8",
            Self::Uint16 => "Uint16",
            Self::Uint32 => "Uint32",
            Self::Uint64 => "Uint64",
            Self::Float32 => "Float32",
            Self::Float64 => "Float64",
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Bool | Self::String)
    }
}

/// A named (struct, enum or named scalar) type, optionally package-qualified
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedType {
    /// `v1` in `v1.ObjectMeta`, `intstr` in `intstr.Type`
    pub qualifier: Option<String>,
    pub name: String,
}

impl NamedType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for NamedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(q) => write!(f, "{}.{}", q, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Declared type of an IR attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    /// Byte blob, carried base64-encoded
    Bytes,
    Named(NamedType),
    Pointer(Box<TypeRef>),
    Slice(Box<TypeRef>),
    /// String-keyed map with the given value type
    Map(Box<TypeRef>),
    /// Pre-formatted Go expression, emitted verbatim
    Expr,
    /// Dynamically typed value (`interface{}`)
    Any,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(NamedType::new(name))
    }

    pub fn pointer(self) -> Self {
        Self::Pointer(Box::new(self))
    }

    pub fn slice_of(self) -> Self {
        Self::Slice(Box::new(self))
    }

    pub fn map_of(self) -> Self {
        Self::Map(Box::new(self))
    }

    #[inline]
    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Number of pointer markers in front of the base type
    pub fn pointer_depth(&self) -> usize {
        let mut depth = 0;
        let mut cur = self;
        while let Self::Pointer(inner) = cur {
            depth += 1;
            cur = inner;
        }
        depth
    }

    /// The type with every pointer marker stripped
    pub fn base(&self) -> &TypeRef {
        let mut cur = self;
        while let Self::Pointer(inner) = cur {
            cur = inner;
        }
        cur
    }

    /// Named type behind any pointer markers
    pub fn as_named(&self) -> Option<&NamedType> {
        match self.base() {
            Self::Named(named) => Some(named),
            _ => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p.go_name()),
            Self::Bytes => write!(f, "[]byte"),
            Self::Named(named) => write!(f, "{}", named),
            Self::Pointer(inner) => write!(f, "*{}", inner),
            Self::Slice(inner) => write!(f, "[]{}", inner),
            Self::Map(inner) => write!(f, "map[string]{}", inner),
            Self::Expr => write!(f, "expr"),
            Self::Any => write!(f, "interface{{}}"),
        }
    }
}

/// A declared type string that could not be parsed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot parse type '{input}': {reason}")]
pub struct TypeParseError {
    pub input: String,
    pub reason: &'static str,
}

impl FromStr for TypeRef {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type(s.trim(), s)
    }
}

fn parse_type(s: &str, input: &str) -> Result<TypeRef, TypeParseError> {
    let fail = |reason| TypeParseError {
        input: input.to_string(),
        reason,
    };

    if s.is_empty() {
        return Err(fail("empty type"));
    }
    // `&` shows up in hand-written IR for address-of composites
    if let Some(rest) = s.strip_prefix('*').or_else(|| s.strip_prefix('&')) {
        return Ok(parse_type(rest, input)?.pointer());
    }
    if s == "[]byte" || s == "[]uint8" {
        return Ok(TypeRef::Bytes);
    }
    if let Some(rest) = s.strip_prefix("[]") {
        return Ok(parse_type(rest, input)?.slice_of());
    }
    if let Some(rest) = s.strip_prefix("map[") {
        let close = rest.find(']').ok_or_else(|| fail("unterminated map key"))?;
        if &rest[..close] != "string" {
            return Err(fail("only string-keyed maps are supported"));
        }
        return Ok(parse_type(&rest[close + 1..], input)?.map_of());
    }
    match s {
        "interface{}" | "any" => return Ok(TypeRef::Any),
        "expr" => return Ok(TypeRef::Expr),
        _ => {}
    }
    if let Some(prim) = Primitive::from_go_name(s) {
        return Ok(TypeRef::Primitive(prim));
    }

    let valid_ident = |part: &str| {
        !part.is_empty()
            && !part.starts_with(|c: char| c.is_ascii_digit())
            && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    };
    match s.split_once('.') {
        Some((qualifier, name)) if valid_ident(qualifier) && valid_ident(name) => {
            Ok(TypeRef::Named(NamedType::qualified(qualifier, name)))
        }
        None if valid_ident(s) => Ok(TypeRef::named(s)),
        _ => Err(fail("not a type name")),
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
