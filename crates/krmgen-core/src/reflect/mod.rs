//! Reflector: typed values -> IR
//!
//! Any `T: Serialize` can be reflected. The reflector is a `serde::Serializer`
//! that walks the value through the serde data model and records, for every
//! struct attribute, the declared type the emitter must construct:
//!
//! - `Option::None`, unit values, zero numbers and empty strings are omitted;
//!   booleans are always kept
//! - structs, sequences and maps that end up empty are omitted
//! - byte sequences become a single base64 string
//! - configured newtypes (`Quantity`, `Time`, `ByteString`) take an opaque path
//!   instead of structural traversal
//!
//! Shapes the emitter cannot express (tuples, data-carrying enum variants)
//! fail the current resource with [`ReflectError::Unsupported`].

mod naming;
mod rules;

pub use naming::FieldNaming;
pub use rules::{FieldAction, FieldRule, FieldScope, TOOL_INJECTED_LABELS};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Datelike, Timelike, Utc};
use indexmap::IndexMap;
use serde::ser::{Impossible, SerializeMap, SerializeSeq, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::cell::RefCell;

use crate::error::{ConversionWarning, ReflectError, WarningCategory, WarningSeverity};
use crate::ir::{IrField, IrNode, IrValue};
use crate::types::{Primitive, TypeRef};
use rules::PendingField;

/// Newtypes whose inner representation is not walked structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpaqueKind {
    /// Resource quantity; omitted when its canonical form is `0`
    Quantity,
    /// Timestamp; omitted at `0001-01-01T00:00:00Z`
    Timestamp,
    /// Bytes already carried base64-encoded
    ByteBlob,
}

/// Reflection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReflectOptions {
    pub naming: FieldNaming,
    /// `Some(x)` gets a pointer declared type
    pub option_as_pointer: bool,
    /// Newtype name -> opaque handling
    pub opaque: IndexMap<String, OpaqueKind>,
    pub rules: Vec<FieldRule>,
}

impl Default for ReflectOptions {
    fn default() -> Self {
        let mut opaque = IndexMap::new();
        opaque.insert("Quantity".to_string(), OpaqueKind::Quantity);
        opaque.insert("Time".to_string(), OpaqueKind::Timestamp);
        opaque.insert("MicroTime".to_string(), OpaqueKind::Timestamp);
        opaque.insert("ByteString".to_string(), OpaqueKind::ByteBlob);
        Self {
            naming: FieldNaming::GoExported,
            option_as_pointer: true,
            opaque,
            rules: vec![FieldRule::strip_tool_labels()],
        }
    }
}

/// A reflected value with the type it must be emitted as
#[derive(Debug, Clone, PartialEq)]
pub struct Reflected {
    pub ty: TypeRef,
    pub val: IrValue,
}

/// Walks typed values into IR trees
#[derive(Debug)]
pub struct Reflector<'a> {
    options: &'a ReflectOptions,
    warnings: RefCell<Vec<ConversionWarning>>,
}

impl<'a> Reflector<'a> {
    pub fn new(options: &'a ReflectOptions) -> Self {
        Self {
            options,
            warnings: RefCell::new(Vec::new()),
        }
    }

    /// Reflect any value; `None` means the whole value is a default
    pub fn reflect<T: Serialize + ?Sized>(&self, value: &T) -> Result<Option<Reflected>, ReflectError> {
        let out = value.serialize(ValueSerializer {
            reflector: self,
            path: String::new(),
            depth: 0,
        })?;
        Ok(out.settle())
    }

    /// Reflect a top-level resource, which must be struct-like
    pub fn reflect_resource<T: Serialize + ?Sized>(&self, value: &T) -> Result<IrNode, ReflectError> {
        match self.reflect(value)? {
            Some(Reflected {
                val: IrValue::Struct(node),
                ..
            }) => Ok(node),
            Some(other) => Err(ReflectError::NotAStruct {
                found: other.val.kind_name(),
            }),
            None => Err(ReflectError::Empty),
        }
    }

    /// Drain the field-local warnings collected so far
    pub fn take_warnings(&self) -> Vec<ConversionWarning> {
        std::mem::take(&mut *self.warnings.borrow_mut())
    }

    fn note(&self, warning: ConversionWarning) {
        match warning.severity {
            WarningSeverity::Info => tracing::info!(path = %warning.path, "{}", warning.message),
            _ => tracing::warn!(path = %warning.path, "{}", warning.message),
        }
        self.warnings.borrow_mut().push(warning);
    }

    fn apply_rules(&self, mut field: PendingField, parent_type: &str, at_root: bool) -> Option<PendingField> {
        for rule in &self.options.rules {
            if rule.matches(&field.name, Some(parent_type), at_root) {
                tracing::debug!(field = %field.name, action = ?rule.action, "applying field rule");
                field = rules::apply(&rule.action, field)?;
            }
        }
        Some(field)
    }
}

/// Escape `\` and `"` for later embedding in a quoted literal
pub fn escape_str(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", parent, segment)
    }
}

const GO_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// `time.Date(...)` expression reconstructing a UTC timestamp
pub fn go_time_expr(ts: &DateTime<Utc>) -> String {
    format!(
        "time.Date({}, time.{}, {}, {}, {}, {}, {}, time.UTC)",
        ts.year(),
        GO_MONTHS[ts.month0() as usize],
        ts.day(),
        ts.hour(),
        ts.minute(),
        ts.second(),
        ts.nanosecond()
    )
}

fn is_zero_time(ts: &DateTime<Utc>) -> bool {
    ts.year() == 1
        && ts.month() == 1
        && ts.day() == 1
        && ts.num_seconds_from_midnight() == 0
        && ts.nanosecond() == 0
}

// =============================================================================
// SERIALIZER
// =============================================================================

/// Output of one serializer call
enum Reflection {
    Omitted,
    Value(Reflected),
    /// A `u8`, kept raw until we know whether it belongs to a byte sequence
    Byte(u8),
}

impl Reflection {
    fn settle(self) -> Option<Reflected> {
        match self {
            Self::Omitted => None,
            Self::Value(r) => Some(r),
            Self::Byte(b) => number(Primitive::Uint8, b.to_string()),
        }
    }

    fn from_option(r: Option<Reflected>) -> Self {
        r.map_or(Self::Omitted, Self::Value)
    }
}

fn number(prim: Primitive, text: String) -> Option<Reflected> {
    if text == "0" {
        return None;
    }
    Some(Reflected {
        ty: TypeRef::Primitive(prim),
        val: IrValue::Number(text),
    })
}

/// Widen two element types to a common declared type
fn unify(current: Option<TypeRef>, next: TypeRef) -> TypeRef {
    match current {
        None => next,
        Some(cur) if cur == next => cur,
        Some(_) => TypeRef::Any,
    }
}

struct ValueSerializer<'r> {
    reflector: &'r Reflector<'r>,
    path: String,
    depth: usize,
}

impl<'r> ValueSerializer<'r> {
    fn child(&self, path: String) -> Self {
        Self {
            reflector: self.reflector,
            path,
            depth: self.depth + 1,
        }
    }

    fn unsupported(&self, shape: &'static str) -> ReflectError {
        ReflectError::Unsupported {
            path: if self.path.is_empty() { "<root>".to_string() } else { self.path.clone() },
            shape,
        }
    }

    fn opaque<T: Serialize + ?Sized>(self, kind: OpaqueKind, name: &str, value: &T) -> Result<Reflection, ReflectError> {
        let path = self.path.clone();
        let inner = value.serialize(self.child(path.clone()))?.settle();
        match kind {
            OpaqueKind::Quantity => {
                let Some(text) = inner.as_ref().and_then(|r| r.val.as_text()) else {
                    return Ok(Reflection::Omitted);
                };
                if text == "0" {
                    return Ok(Reflection::Omitted);
                }
                Ok(Reflection::Value(Reflected {
                    ty: TypeRef::Expr,
                    val: IrValue::Expr(format!("resource.MustParse(\"{}\")", text)),
                }))
            }
            OpaqueKind::Timestamp => {
                let Some(text) = inner.as_ref().and_then(|r| r.val.as_text()) else {
                    return Ok(Reflection::Omitted);
                };
                let ts = DateTime::parse_from_rfc3339(text)
                    .map_err(|_| ReflectError::InvalidTimestamp {
                        path: path.clone(),
                        value: text.to_string(),
                    })?
                    .with_timezone(&Utc);
                if is_zero_time(&ts) {
                    return Ok(Reflection::Omitted);
                }
                let mut node = IrNode::new();
                node.insert("Time", TypeRef::Expr, IrValue::Expr(go_time_expr(&ts)));
                Ok(Reflection::Value(Reflected {
                    ty: TypeRef::named(name),
                    val: IrValue::Struct(node),
                }))
            }
            OpaqueKind::ByteBlob => Ok(Reflection::from_option(inner.map(|r| match (r.ty, r.val) {
                (TypeRef::Primitive(Primitive::String) | TypeRef::Bytes, IrValue::Str(encoded)) => Reflected {
                    ty: TypeRef::Bytes,
                    val: IrValue::Str(encoded),
                },
                (ty, val) => Reflected { ty, val },
            }))),
        }
    }
}

impl<'r> Serializer for ValueSerializer<'r> {
    type Ok = Reflection;
    type Error = ReflectError;
    type SerializeSeq = SeqReflector<'r>;
    type SerializeTuple = Impossible<Reflection, ReflectError>;
    type SerializeTupleStruct = Impossible<Reflection, ReflectError>;
    type SerializeTupleVariant = Impossible<Reflection, ReflectError>;
    type SerializeMap = MapReflector<'r>;
    type SerializeStruct = StructReflector<'r>;
    type SerializeStructVariant = Impossible<Reflection, ReflectError>;

    fn serialize_bool(self, v: bool) -> Result<Reflection, ReflectError> {
        Ok(Reflection::Value(Reflected {
            ty: TypeRef::Primitive(Primitive::Bool),
            val: IrValue::Bool(v),
        }))
    }

    fn serialize_i8(self, v: i8) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Int8, v.to_string())))
    }

    fn serialize_i16(self, v: i16) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Int16, v.to_string())))
    }

    fn serialize_i32(self, v: i32) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Int32, v.to_string())))
    }

    fn serialize_i64(self, v: i64) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Int64, v.to_string())))
    }

    fn serialize_u8(self, v: u8) -> Result<Reflection, ReflectError> {
        Ok(Reflection::Byte(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Uint16, v.to_string())))
    }

    fn serialize_u32(self, v: u32) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Uint32, v.to_string())))
    }

    fn serialize_u64(self, v: u64) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Uint64, v.to_string())))
    }

    fn serialize_f32(self, v: f32) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Float32, v.to_string())))
    }

    fn serialize_f64(self, v: f64) -> Result<Reflection, ReflectError> {
        Ok(Reflection::from_option(number(Primitive::Float64, v.to_string())))
    }

    fn serialize_char(self, v: char) -> Result<Reflection, ReflectError> {
        self.serialize_str(v.encode_utf8(&mut [0; 4]))
    }

    fn serialize_str(self, v: &str) -> Result<Reflection, ReflectError> {
        if v.is_empty() {
            return Ok(Reflection::Omitted);
        }
        Ok(Reflection::Value(Reflected {
            ty: TypeRef::Primitive(Primitive::String),
            val: IrValue::Str(escape_str(v)),
        }))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Reflection, ReflectError> {
        if v.is_empty() {
            return Ok(Reflection::Omitted);
        }
        Ok(Reflection::Value(Reflected {
            ty: TypeRef::Bytes,
            val: IrValue::Str(STANDARD.encode(v)),
        }))
    }

    fn serialize_none(self) -> Result<Reflection, ReflectError> {
        Ok(Reflection::Omitted)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Reflection, ReflectError> {
        let as_pointer = self.reflector.options.option_as_pointer;
        let inner = value.serialize(self)?.settle();
        Ok(Reflection::from_option(inner.map(|r| {
            if as_pointer && r.ty != TypeRef::Expr {
                Reflected {
                    ty: r.ty.pointer(),
                    val: r.val,
                }
            } else {
                r
            }
        })))
    }

    fn serialize_unit(self) -> Result<Reflection, ReflectError> {
        Ok(Reflection::Omitted)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Reflection, ReflectError> {
        Ok(Reflection::Omitted)
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Reflection, ReflectError> {
        Ok(Reflection::Value(Reflected {
            ty: TypeRef::named(name),
            val: IrValue::Str(escape_str(variant)),
        }))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Reflection, ReflectError> {
        if let Some(kind) = self.reflector.options.opaque.get(name).copied() {
            return self.opaque(kind, name, value);
        }
        let inner = value.serialize(self)?.settle();
        Ok(Reflection::from_option(inner.map(|r| match r.val {
            IrValue::Str(_) | IrValue::Number(_) | IrValue::Bool(_) => Reflected {
                ty: TypeRef::named(name),
                val: r.val,
            },
            _ => r,
        })))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Reflection, ReflectError> {
        Err(self.unsupported("newtype enum variant"))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqReflector<'r>, ReflectError> {
        Ok(SeqReflector {
            items: Vec::with_capacity(len.unwrap_or(0)),
            ser: self,
        })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, ReflectError> {
        Err(self.unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, ReflectError> {
        Err(self.unsupported("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, ReflectError> {
        Err(self.unsupported("tuple enum variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<MapReflector<'r>, ReflectError> {
        Ok(MapReflector {
            ser: self,
            pending_key: None,
            bad_key: None,
            entries: IndexMap::new(),
            value_ty: None,
        })
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<StructReflector<'r>, ReflectError> {
        Ok(StructReflector {
            ser: self,
            name,
            node: IrNode::new(),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, ReflectError> {
        Err(self.unsupported("struct enum variant"))
    }
}

struct SeqReflector<'r> {
    ser: ValueSerializer<'r>,
    items: Vec<Reflection>,
}

impl<'r> SerializeSeq for SeqReflector<'r> {
    type Ok = Reflection;
    type Error = ReflectError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ReflectError> {
        let path = format!("{}[{}]", self.ser.path, self.items.len());
        let item = value.serialize(self.ser.child(path))?;
        self.items.push(item);
        Ok(())
    }

    fn end(self) -> Result<Reflection, ReflectError> {
        if self.items.is_empty() {
            return Ok(Reflection::Omitted);
        }
        if self.items.iter().all(|item| matches!(item, Reflection::Byte(_))) {
            let bytes: Vec<u8> = self
                .items
                .iter()
                .filter_map(|item| match item {
                    Reflection::Byte(b) => Some(*b),
                    _ => None,
                })
                .collect();
            return Ok(Reflection::Value(Reflected {
                ty: TypeRef::Bytes,
                val: IrValue::Str(STANDARD.encode(bytes)),
            }));
        }

        let mut elem_ty = None;
        let mut values = Vec::with_capacity(self.items.len());
        for (i, item) in self.items.into_iter().enumerate() {
            match item.settle() {
                Some(r) => {
                    elem_ty = Some(unify(elem_ty, r.ty));
                    values.push(r.val);
                }
                None => {
                    self.ser.reflector.note(ConversionWarning::info(
                        WarningCategory::EmptyElement,
                        format!("{}[{}]", self.ser.path, i),
                        "default-valued element kept as an explicit empty entry",
                    ));
                    values.push(IrValue::Str(String::new()));
                }
            }
        }
        let elem_ty = elem_ty.unwrap_or(TypeRef::Primitive(Primitive::String));
        Ok(Reflection::Value(Reflected {
            ty: elem_ty.slice_of(),
            val: IrValue::Seq(values),
        }))
    }
}

struct MapReflector<'r> {
    ser: ValueSerializer<'r>,
    pending_key: Option<String>,
    /// Kind of the first key that is not a string
    bad_key: Option<&'static str>,
    entries: IndexMap<String, IrValue>,
    value_ty: Option<TypeRef>,
}

impl<'r> SerializeMap for MapReflector<'r> {
    type Ok = Reflection;
    type Error = ReflectError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), ReflectError> {
        let key = key.serialize(self.ser.child(self.ser.path.clone()))?;
        self.pending_key = match key {
            Reflection::Omitted => Some(String::new()),
            Reflection::Value(Reflected {
                ty: TypeRef::Primitive(Primitive::String) | TypeRef::Named(_),
                val: IrValue::Str(s),
            }) => Some(s),
            Reflection::Value(other) => {
                self.bad_key.get_or_insert(other.val.kind_name());
                None
            }
            Reflection::Byte(_) => {
                self.bad_key.get_or_insert("number");
                None
            }
        };
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ReflectError> {
        let Some(key) = self.pending_key.take() else {
            return Ok(());
        };
        let path = join_path(&self.ser.path, &key);
        if let Some(r) = value.serialize(self.ser.child(path))?.settle() {
            self.value_ty = Some(unify(self.value_ty.take(), r.ty));
            self.entries.insert(key, r.val);
        }
        Ok(())
    }

    fn end(self) -> Result<Reflection, ReflectError> {
        if let Some(kind) = self.bad_key {
            self.ser.reflector.note(ConversionWarning::warning(
                WarningCategory::UnsupportedMapKey,
                self.ser.path.clone(),
                format!("map keys of kind {} are not supported, field dropped", kind),
            ));
            return Ok(Reflection::Omitted);
        }
        if self.entries.is_empty() {
            return Ok(Reflection::Omitted);
        }
        let value_ty = self.value_ty.unwrap_or(TypeRef::Any);
        Ok(Reflection::Value(Reflected {
            ty: value_ty.map_of(),
            val: IrValue::Map(self.entries),
        }))
    }
}

struct StructReflector<'r> {
    ser: ValueSerializer<'r>,
    name: &'static str,
    node: IrNode,
}

impl StructReflector<'_> {
    /// Place a field inside the embedded member `member`, created on first use
    fn embed(&mut self, member: String, field: PendingField) {
        if self.node.get(&member).is_none() {
            self.node
                .insert(member.as_str(), TypeRef::named(member.as_str()), IrValue::Struct(IrNode::new()));
        }
        match self.node.get_mut(&member) {
            Some(IrField {
                val: IrValue::Struct(inner),
                ..
            }) => inner.insert(field.name, field.ty, field.val),
            _ => {
                tracing::warn!(path = %self.ser.path, member = %member, "embedded member is not a struct, field kept in place");
                self.node.insert(field.name, field.ty, field.val);
            }
        }
    }
}

impl<'r> SerializeStruct for StructReflector<'r> {
    type Ok = Reflection;
    type Error = ReflectError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Result<(), ReflectError> {
        let reflector = self.ser.reflector;
        let name = reflector.options.naming.apply(key);
        let path = join_path(&self.ser.path, &name);
        let Some(r) = value.serialize(self.ser.child(path))?.settle() else {
            return Ok(());
        };
        let pending = PendingField::new(name, r.ty, r.val);
        if let Some(field) = reflector.apply_rules(pending, self.name, self.ser.depth == 0) {
            match field.embed_in.clone() {
                Some(member) => self.embed(member, field),
                None => self.node.insert(field.name, field.ty, field.val),
            }
        }
        Ok(())
    }

    fn skip_field(&mut self, key: &'static str) -> Result<(), ReflectError> {
        tracing::trace!(path = %self.ser.path, field = key, "field skipped by serializer");
        Ok(())
    }

    fn end(self) -> Result<Reflection, ReflectError> {
        if self.node.is_empty() {
            return Ok(Reflection::Omitted);
        }
        Ok(Reflection::Value(Reflected {
            ty: TypeRef::named(self.name),
            val: IrValue::Struct(self.node),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize, Default)]
    #[serde(rename = "ObjectMeta", rename_all = "camelCase")]
    struct ObjectMeta {
        name: String,
        namespace: Option<String>,
        generation: i64,
        labels: BTreeMap<String, String>,
    }

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct ContainerPort {
        container_port: i32,
        host_ip: String,
    }

    #[derive(Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    struct Container {
        name: String,
        ports: Vec<ContainerPort>,
        stdin: bool,
    }

    #[derive(Serialize)]
    struct Quantity(String);

    #[derive(Serialize)]
    struct Time(String);

    #[derive(Serialize)]
    #[allow(dead_code)]
    enum Protocol {
        #[serde(rename = "TCP")]
        Tcp,
        #[serde(rename = "UDP")]
        Udp,
    }

    fn reflect<T: Serialize>(value: &T) -> Option<Reflected> {
        let options = ReflectOptions::default();
        Reflector::new(&options).reflect(value).unwrap()
    }

    #[test]
    fn test_base_cases() {
        assert_eq!(reflect(&"abc").unwrap().val, IrValue::Str("abc".into()));
        assert_eq!(reflect(&""), None);
        assert_eq!(reflect(&5i32).unwrap().val, IrValue::Number("5".into()));
        assert_eq!(reflect(&3.14f64).unwrap().val, IrValue::Number("3.14".into()));
        assert_eq!(reflect(&0i64), None);
        assert_eq!(reflect(&0.0f32), None);
        assert_eq!(reflect(&true).unwrap().val, IrValue::Bool(true));
        assert_eq!(reflect(&false).unwrap().val, IrValue::Bool(false));
    }

    #[test]
    fn test_string_escaping() {
        let r = reflect(&r#"say "hi" \o/"#).unwrap();
        assert_eq!(r.val, IrValue::Str(r#"say \"hi\" \\o/"#.into()));
    }

    #[test]
    fn test_slice_keeps_empty_entries() {
        let r = reflect(&vec!["abc", "def", ""]).unwrap();
        assert_eq!(r.ty.to_string(), "[]string");
        assert_eq!(
            r.val,
            IrValue::Seq(vec![
                IrValue::Str("abc".into()),
                IrValue::Str("def".into()),
                IrValue::Str(String::new()),
            ])
        );
    }

    #[test]
    fn test_byte_blob() {
        let r = reflect(&b"my-secret".to_vec()).unwrap();
        assert_eq!(r.ty, TypeRef::Bytes);
        assert_eq!(r.val, IrValue::Str("bXktc2VjcmV0".into()));
    }

    #[test]
    fn test_byte_blob_with_zero_bytes() {
        let r = reflect(&vec![0u8, 1, 0]).unwrap();
        assert_eq!(r.ty, TypeRef::Bytes);
        assert_eq!(r.val, IrValue::Str(STANDARD.encode([0u8, 1, 0])));
    }

    #[test]
    fn test_empty_collections_are_omitted() {
        assert_eq!(reflect(&Vec::<String>::new()), None);
        assert_eq!(reflect(&BTreeMap::<String, String>::new()), None);
        assert_eq!(reflect(&ObjectMeta::default()), None);
    }

    #[test]
    fn test_struct_omits_defaults() {
        let meta = ObjectMeta {
            name: "tests".into(),
            generation: 2,
            ..Default::default()
        };
        let r = reflect(&meta).unwrap();
        assert_eq!(r.ty, TypeRef::named("ObjectMeta"));
        let IrValue::Struct(node) = r.val else { panic!("expected struct") };
        let names: Vec<&str> = node.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Name", "Generation"]);
        assert_eq!(node.get("Generation").unwrap().ty.to_string(), "int64");
        assert_eq!(node.get("Generation").unwrap().val, IrValue::Number("2".into()));
    }

    #[test]
    fn test_bool_fields_always_present() {
        let c = Container {
            name: "web".into(),
            ..Default::default()
        };
        let IrValue::Struct(node) = reflect(&c).unwrap().val else { panic!("expected struct") };
        assert_eq!(node.get("Stdin").unwrap().val, IrValue::Bool(false));
        assert!(node.get("Ports").is_none());
    }

    #[test]
    fn test_option_becomes_pointer() {
        let meta = ObjectMeta {
            namespace: Some("prod".into()),
            ..Default::default()
        };
        let IrValue::Struct(node) = reflect(&meta).unwrap().val else { panic!("expected struct") };
        assert_eq!(node.get("Namespace").unwrap().ty.to_string(), "*string");
    }

    #[test]
    fn test_option_without_pointer_mode() {
        let options = ReflectOptions {
            option_as_pointer: false,
            ..Default::default()
        };
        let r = Reflector::new(&options).reflect(&Some(3i32)).unwrap().unwrap();
        assert_eq!(r.ty.to_string(), "int32");
    }

    #[test]
    fn test_nested_struct_slice() {
        let c = Container {
            name: "web".into(),
            ports: vec![
                ContainerPort {
                    container_port: 80,
                    host_ip: String::new(),
                },
                ContainerPort::default(),
            ],
            stdin: true,
        };
        let IrValue::Struct(node) = reflect(&c).unwrap().val else { panic!("expected struct") };
        let ports = node.get("Ports").unwrap();
        assert_eq!(ports.ty.to_string(), "[]ContainerPort");
        let IrValue::Seq(items) = &ports.val else { panic!("expected seq") };
        assert_eq!(items.len(), 2);
        assert_eq!(items[1], IrValue::Str(String::new()));
    }

    #[test]
    fn test_labels_rule_strips_tool_keys() {
        let mut labels = BTreeMap::new();
        labels.insert("app".to_string(), "web".to_string());
        labels.insert("helm.sh/chart".to_string(), "web-0.1.0".to_string());
        let meta = ObjectMeta {
            name: "web".into(),
            labels,
            ..Default::default()
        };
        let IrValue::Struct(node) = reflect(&meta).unwrap().val else { panic!("expected struct") };
        let IrValue::Map(labels) = &node.get("Labels").unwrap().val else { panic!("expected map") };
        assert_eq!(labels.len(), 1);
        assert!(labels.contains_key("app"));
    }

    #[test]
    fn test_map_values_are_reflected() {
        let mut map = BTreeMap::new();
        map.insert("key1", serde_json::json!("abc"));
        map.insert("key2", serde_json::json!(6));
        map.insert("key3", serde_json::json!(""));
        let r = reflect(&map).unwrap();
        let IrValue::Map(entries) = r.val else { panic!("expected map") };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["key1"], IrValue::Str("abc".into()));
        assert_eq!(entries["key2"], IrValue::Number("6".into()));
        assert_eq!(r.ty.to_string(), "map[string]interface{}");
    }

    #[test]
    fn test_non_string_map_keys_are_dropped() {
        let mut map = BTreeMap::new();
        map.insert(1i32, "one");
        let options = ReflectOptions::default();
        let reflector = Reflector::new(&options);
        assert_eq!(reflector.reflect(&map).unwrap(), None);
        let warnings = reflector.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, WarningCategory::UnsupportedMapKey);
    }

    #[test]
    fn test_quantity() {
        assert_eq!(reflect(&Quantity("0".into())), None);
        let r = reflect(&Quantity("64Mi".into())).unwrap();
        assert_eq!(r.ty, TypeRef::Expr);
        assert_eq!(r.val, IrValue::Expr("resource.MustParse(\"64Mi\")".into()));
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(reflect(&Time("0001-01-01T00:00:00Z".into())), None);
        let r = reflect(&Time("2023-03-04T10:20:30Z".into())).unwrap();
        assert_eq!(r.ty, TypeRef::named("Time"));
        let IrValue::Struct(node) = r.val else { panic!("expected struct") };
        assert_eq!(
            node.get("Time").unwrap().val,
            IrValue::Expr("time.Date(2023, time.March, 4, 10, 20, 30, 0, time.UTC)".into())
        );
    }

    #[test]
    fn test_invalid_timestamp_fails_resource() {
        let options = ReflectOptions::default();
        let err = Reflector::new(&options).reflect(&Time("yesterday".into())).unwrap_err();
        assert!(matches!(err, ReflectError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_unit_variant_is_named() {
        let r = reflect(&Protocol::Tcp).unwrap();
        assert_eq!(r.ty, TypeRef::named("Protocol"));
        assert_eq!(r.val, IrValue::Str("TCP".into()));
    }

    #[test]
    fn test_tuple_is_unsupported() {
        let options = ReflectOptions::default();
        let err = Reflector::new(&options).reflect(&(1, 2)).unwrap_err();
        assert!(matches!(err, ReflectError::Unsupported { shape: "tuple", .. }));
    }

    #[test]
    fn test_reflect_resource_requires_struct() {
        let options = ReflectOptions::default();
        let reflector = Reflector::new(&options);
        assert!(matches!(reflector.reflect_resource(&"x"), Err(ReflectError::NotAStruct { .. })));
        assert!(matches!(
            reflector.reflect_resource(&ObjectMeta::default()),
            Err(ReflectError::Empty)
        ));
    }

    #[test]
    fn test_embedded_member_collects_fields() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct HttpGet {
            path: String,
        }

        #[derive(Serialize)]
        #[serde(rename = "Probe", rename_all = "camelCase")]
        struct Probe {
            http_get: Option<HttpGet>,
            period_seconds: i32,
        }

        let options = ReflectOptions {
            option_as_pointer: false,
            rules: vec![
                FieldRule::new("HTTPGet", FieldAction::Pointer).in_scope(FieldScope::Within("Probe".into())),
                FieldRule::new("HTTPGet", FieldAction::Embed("ProbeHandler".into()))
                    .in_scope(FieldScope::Within("Probe".into())),
            ],
            ..Default::default()
        };
        let liveness = Probe {
            http_get: Some(HttpGet {
                path: "/healthz".into(),
            }),
            period_seconds: 10,
        };
        let IrValue::Struct(node) = Reflector::new(&options).reflect(&liveness).unwrap().unwrap().val else {
            panic!("expected struct")
        };
        let names: Vec<&str> = node.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["ProbeHandler", "PeriodSeconds"]);

        let handler = node.get("ProbeHandler").unwrap();
        assert_eq!(handler.ty, TypeRef::named("ProbeHandler"));
        let IrValue::Struct(handler) = &handler.val else { panic!("expected struct") };
        assert_eq!(handler.get("HTTPGet").unwrap().ty.to_string(), "*HttpGet");
    }

    #[test]
    fn test_root_scoped_rules() {
        #[derive(Serialize)]
        #[serde(rename = "ConfigMap", rename_all = "camelCase")]
        struct ConfigMap {
            api_version: String,
            kind: String,
            metadata: ObjectMeta,
        }

        let options = ReflectOptions {
            rules: vec![
                FieldRule::new("APIVersion", FieldAction::Drop).in_scope(FieldScope::Root),
                FieldRule::new("Kind", FieldAction::Drop).in_scope(FieldScope::Root),
                FieldRule::new("Metadata", FieldAction::Rename("ObjectMeta".into())),
            ],
            ..Default::default()
        };
        let cm = ConfigMap {
            api_version: "v1".into(),
            kind: "ConfigMap".into(),
            metadata: ObjectMeta {
                name: "cfg".into(),
                ..Default::default()
            },
        };
        let node = Reflector::new(&options).reflect_resource(&cm).unwrap();
        let names: Vec<&str> = node.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["ObjectMeta"]);
    }
}
