//! Intermediate representation
//!
//! The IR is the canonical, default-free form of a reflected resource. It is
//! persisted as JSON of the shape
//!
//! ```json
//! {
//!     "Spec": {
//!         "type": "v1.DeploymentSpec",
//!         "val": {
//!             "Replicas": { "type": "*int32", "val": "5" }
//!         }
//!     }
//! }
//! ```
//!
//! Reading it back is guided by the declared type strings: a JSON object
//! under `v1.DeploymentSpec` is a struct node, under `map[string]string` a map.
//!
//! Values under `interface{}`, and non-struct values under a named type, carry
//! no shape in their declared type. There numbers are JSON numbers, and
//! expressions and struct nodes are wrapped in a single-key object:
//!
//! ```json
//! { "$expr": "resource.MustParse(\"1Gi\")" }
//! { "$struct": { "Name": { "type": "string", "val": "x" } } }
//! ```
//!
//! A map whose only key is one of these tags is itself wrapped in `$map`.

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::IrError;
use crate::types::{Primitive, TypeRef};

const EXPR_TAG: &str = "$expr";
const STRUCT_TAG: &str = "$struct";
const MAP_TAG: &str = "$map";
const NUMBER_TAG: &str = "$number";
const TAGS: &[&str] = &[EXPR_TAG, STRUCT_TAG, MAP_TAG, NUMBER_TAG];

/// A struct-like node: ordered attribute name -> typed value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IrNode {
    fields: IndexMap<String, IrField>,
}

/// One attribute of a struct node
#[derive(Debug, Clone, PartialEq)]
pub struct IrField {
    pub ty: TypeRef,
    pub val: IrValue,
}

/// Value of an attribute, decided once during reflection
#[derive(Debug, Clone, PartialEq)]
pub enum IrValue {
    Struct(IrNode),
    Seq(Vec<IrValue>),
    Map(IndexMap<String, IrValue>),
    /// Escaped string contents, without surrounding quotes
    Str(String),
    Bool(bool),
    /// Canonical decimal text of an integer or float
    Number(String),
    /// Go expression emitted verbatim
    Expr(String),
}

impl IrValue {
    /// Short name of the variant, for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Seq(_) => "sequence",
            Self::Map(_) => "map",
            Self::Str(_) => "string",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Expr(_) => "expression",
        }
    }

    /// Text of a scalar value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Number(s) | Self::Expr(s) => Some(s),
            _ => None,
        }
    }
}

impl IrNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute, replacing any previous value under the same name
    pub fn insert(&mut self, name: impl Into<String>, ty: TypeRef, val: IrValue) {
        self.fields.insert(name.into(), IrField { ty, val });
    }

    pub fn get(&self, name: &str) -> Option<&IrField> {
        self.fields.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut IrField> {
        self.fields.get_mut(name)
    }

    /// Remove an attribute, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<IrField> {
        self.fields.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IrField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Pretty JSON, the persisted form
    pub fn to_json_pretty(&self) -> Result<String, IrError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, IrError> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }

    /// Build a node from parsed JSON, using declared types to pick variants
    pub fn from_json(value: &Value) -> Result<Self, IrError> {
        node_from_json(value, "")
    }
}

impl Serialize for IrNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

impl Serialize for IrField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", &self.ty)?;
        map.serialize_entry(
            "val",
            &Typed {
                ty: &self.ty,
                val: &self.val,
            },
        )?;
        map.end()
    }
}

/// Without a declared type, a value serializes in its self-describing form
impl Serialize for IrValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Str(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => match n.parse::<serde_json::Number>() {
                Ok(number) => number.serialize(serializer),
                Err(_) => Tagged(NUMBER_TAG, n).serialize(serializer),
            },
            Self::Expr(e) => Tagged(EXPR_TAG, e).serialize(serializer),
            Self::Struct(node) => Tagged(STRUCT_TAG, node).serialize(serializer),
            Self::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let entries = Entries(entries);
                if entries.looks_tagged() {
                    Tagged(MAP_TAG, &entries).serialize(serializer)
                } else {
                    entries.serialize(serializer)
                }
            }
        }
    }
}

/// A value serialized against its declared type
struct Typed<'a> {
    ty: &'a TypeRef,
    val: &'a IrValue,
}

impl Serialize for Typed<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (self.ty, self.val) {
            (TypeRef::Pointer(inner), val) => Typed { ty: inner, val }.serialize(serializer),
            (TypeRef::Named(_), IrValue::Struct(node)) => node.serialize(serializer),
            (TypeRef::Named(_), IrValue::Map(entries)) => Tagged(MAP_TAG, &Entries(entries)).serialize(serializer),
            (TypeRef::Named(_) | TypeRef::Any, val) => val.serialize(serializer),
            (TypeRef::Slice(elem), IrValue::Seq(items)) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Typed { ty: elem, val: item })?;
                }
                seq.end()
            }
            (TypeRef::Map(value_ty), IrValue::Map(entries)) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, &Typed { ty: value_ty, val: v })?;
                }
                map.end()
            }
            (_, IrValue::Str(s) | IrValue::Number(s) | IrValue::Expr(s)) => serializer.serialize_str(s),
            (_, IrValue::Bool(b)) => serializer.serialize_bool(*b),
            (_, val) => val.serialize(serializer),
        }
    }
}

/// Map entries in their self-describing form
struct Entries<'a>(&'a IndexMap<String, IrValue>);

impl Entries<'_> {
    fn looks_tagged(&self) -> bool {
        self.0.len() == 1 && self.0.keys().all(|k| TAGS.contains(&k.as_str()))
    }
}

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// `{ "<tag>": value }`
struct Tagged<'a, T: ?Sized>(&'static str, &'a T);

impl<T: Serialize + ?Sized> Serialize for Tagged<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for IrNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn json_kind(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn node_from_json(value: &Value, path: &str) -> Result<IrNode, IrError> {
    let Value::Object(object) = value else {
        return Err(IrError::Shape {
            path: path.to_string(),
            expected: "object of attributes",
            found: json_kind(value),
        });
    };

    let mut node = IrNode::new();
    for (name, entry) in object {
        let field_path = join_path(path, name);
        let (Some(ty), Some(val)) = (entry.get("type"), entry.get("val")) else {
            return Err(IrError::Shape {
                path: field_path,
                expected: "{\"type\", \"val\"} pair",
                found: json_kind(entry),
            });
        };
        let ty_str = ty.as_str().ok_or_else(|| IrError::Shape {
            path: field_path.clone(),
            expected: "type string",
            found: json_kind(ty),
        })?;
        let ty: TypeRef = ty_str.parse().map_err(|source| IrError::Type {
            path: field_path.clone(),
            source,
        })?;
        let val = value_from_json(&ty, val, &field_path)?;
        node.insert(name.clone(), ty, val);
    }
    Ok(node)
}

fn value_from_json(ty: &TypeRef, value: &Value, path: &str) -> Result<IrValue, IrError> {
    let shape_err = |expected| IrError::Shape {
        path: path.to_string(),
        expected,
        found: json_kind(value),
    };

    match (ty, value) {
        (TypeRef::Pointer(inner), _) => value_from_json(inner, value, path),
        (TypeRef::Expr, Value::String(s)) => Ok(IrValue::Expr(s.clone())),
        (TypeRef::Bytes, Value::String(s)) => Ok(IrValue::Str(s.clone())),
        (TypeRef::Primitive(Primitive::Bool), Value::Bool(b)) => Ok(IrValue::Bool(*b)),
        (TypeRef::Primitive(Primitive::Bool), Value::String(s)) => match s.as_str() {
            "true" => Ok(IrValue::Bool(true)),
            "false" => Ok(IrValue::Bool(false)),
            _ => Err(shape_err("boolean")),
        },
        (TypeRef::Primitive(Primitive::String), Value::String(s)) => Ok(IrValue::Str(s.clone())),
        (TypeRef::Primitive(_), Value::String(s)) => Ok(IrValue::Number(s.clone())),
        (TypeRef::Primitive(_), Value::Number(n)) => Ok(IrValue::Number(n.to_string())),
        (TypeRef::Slice(elem), Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| element_from_json(elem, item, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(IrValue::Seq),
        (TypeRef::Map(val_ty), Value::Object(entries)) => {
            let mut map = IndexMap::with_capacity(entries.len());
            for (k, v) in entries {
                map.insert(k.clone(), element_from_json(val_ty, v, &join_path(path, k))?);
            }
            Ok(IrValue::Map(map))
        }
        (TypeRef::Named(_), Value::Object(object)) if tag_of(object).is_none() => {
            node_from_json(value, path).map(IrValue::Struct)
        }
        (TypeRef::Named(_) | TypeRef::Any, _) => dynamic_from_json(value, path),
        (TypeRef::Slice(_), _) => Err(shape_err("array")),
        (TypeRef::Map(_), _) => Err(shape_err("object")),
        _ => Err(shape_err("scalar")),
    }
}

/// Slice elements and map values; an empty string stands in for an element
/// that was omitted during reflection, whatever the element type
fn element_from_json(ty: &TypeRef, value: &Value, path: &str) -> Result<IrValue, IrError> {
    match value {
        Value::String(s) if s.is_empty() => Ok(IrValue::Str(String::new())),
        _ => value_from_json(ty, value, path),
    }
}

/// The single tag of a wrapped dynamic value
fn tag_of(object: &serde_json::Map<String, Value>) -> Option<(&str, &Value)> {
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some((key, inner)), None) if TAGS.contains(&key.as_str()) => Some((key.as_str(), inner)),
        _ => None,
    }
}

fn dynamic_from_json(value: &Value, path: &str) -> Result<IrValue, IrError> {
    match value {
        Value::Bool(b) => Ok(IrValue::Bool(*b)),
        Value::Number(n) => Ok(IrValue::Number(n.to_string())),
        Value::String(s) => Ok(IrValue::Str(s.clone())),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| dynamic_from_json(item, &format!("{}[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()
            .map(IrValue::Seq),
        Value::Object(entries) => match tag_of(entries) {
            Some((STRUCT_TAG, inner)) => node_from_json(inner, path).map(IrValue::Struct),
            Some((EXPR_TAG, Value::String(e))) => Ok(IrValue::Expr(e.clone())),
            Some((NUMBER_TAG, Value::String(n))) => Ok(IrValue::Number(n.clone())),
            Some((MAP_TAG, Value::Object(inner))) => entries_from_json(inner, path),
            Some((tag, inner)) => Err(IrError::Shape {
                path: join_path(path, tag),
                expected: "tagged value",
                found: json_kind(inner),
            }),
            None => entries_from_json(entries, path),
        },
        Value::Null => Err(IrError::Shape {
            path: path.to_string(),
            expected: "value",
            found: "null".to_string(),
        }),
    }
}

fn entries_from_json(entries: &serde_json::Map<String, Value>, path: &str) -> Result<IrValue, IrError> {
    let mut map = IndexMap::with_capacity(entries.len());
    for (k, v) in entries {
        map.insert(k.clone(), dynamic_from_json(v, &join_path(path, k))?);
    }
    Ok(IrValue::Map(map))
}
