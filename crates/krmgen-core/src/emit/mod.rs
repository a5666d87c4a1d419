//! Code emitter: IR -> Go construction text
//!
//! Dispatch is on the declared type of each attribute, never on the shape of
//! the value. Rules, first match wins:
//!
//! 1. index scalars (`intstr.Type`): `intstr.Type(1)`
//! 2. byte blobs: `decodeBase64("...")`
//! 3. pointer primitives: `wrapInt32(34)`, `wrapString("x")`
//! 4. plain primitives: the value text
//! 5. named types: `alias.Enum(v)` or `alias.Struct{...}`; behind a pointer,
//!    `&alias.Struct{...}` or `wrapValue(alias.Enum(v))`
//! 6. maps: `map[string]V{ "key" : v, }`
//! 7. slices: `[]E{ v, }`
//! 8. expressions verbatim, `interface{}` from the dynamic value
//!
//! Depth only drives indentation. Compare emitted text with
//! [`normalize_whitespace`].

mod unstructured;

pub use unstructured::emit_unstructured;

use serde::{Deserialize, Serialize};
use std::cell::RefCell;

use crate::error::{ConversionWarning, EmitError, WarningCategory};
use crate::ir::{IrNode, IrValue};
use crate::resolver::TypeTables;
use crate::types::{NamedType, Primitive, TypeRef};

/// Emission settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CodegenConfig {
    /// Integer-backed scalars emitted as `Type(n)`
    pub index_types: Vec<TypeRef>,
    /// Struct types keyed by free-form resource names; their keys are quoted
    /// and plain string values are parsed as quantities
    pub quoted_key_types: Vec<String>,
    /// Go type spelled for `expr` in collection headers
    pub expr_type: String,
    /// Prefix of the pointer wrapping helpers (`wrap` -> `wrapInt32`)
    pub pointer_helper_prefix: String,
    pub decode_helper: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            index_types: vec![TypeRef::Named(NamedType::qualified("intstr", "Type"))],
            quoted_key_types: vec!["ResourceList".to_string()],
            expr_type: "resource.Quantity".to_string(),
            pointer_helper_prefix: "wrap".to_string(),
            decode_helper: "decodeBase64".to_string(),
        }
    }
}

impl CodegenConfig {
    /// Name of the helper wrapping a primitive into a pointer
    pub fn pointer_helper(&self, prim: Primitive) -> String {
        format!("{}{}", self.pointer_helper_prefix, prim.helper_suffix())
    }

    /// Name of the generic helper taking the address of any value
    pub fn value_helper(&self) -> String {
        format!("{}Value", self.pointer_helper_prefix)
    }
}

/// Collapse whitespace runs into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn indent(depth: usize) -> String {
    "\t".repeat(depth)
}

/// Quote already-escaped string contents, splitting on newlines
fn quote(escaped: &str) -> String {
    if escaped.contains('\n') {
        format!("\"{}\"", escaped.replace('\n', "\\n\" + \n \""))
    } else {
        format!("\"{}\"", escaped)
    }
}

/// Quote an already-escaped map key on a single line
fn quote_key(escaped: &str) -> String {
    format!("\"{}\"", escaped.replace('\r', "\\r").replace('\n', "\\n"))
}

/// Writes Go literals for IR trees
#[derive(Debug)]
pub struct Emitter<'a> {
    tables: &'a TypeTables,
    config: &'a CodegenConfig,
    warnings: RefCell<Vec<ConversionWarning>>,
}

impl<'a> Emitter<'a> {
    pub fn new(tables: &'a TypeTables, config: &'a CodegenConfig) -> Self {
        Self {
            tables,
            config,
            warnings: RefCell::new(Vec::new()),
        }
    }

    /// Drain warnings collected so far
    pub fn take_warnings(&self) -> Vec<ConversionWarning> {
        std::mem::take(&mut *self.warnings.borrow_mut())
    }

    /// `&alias.Kind{ ... }` for a top-level resource
    pub fn emit_resource(&self, kind: &str, node: &IrNode) -> Result<String, EmitError> {
        let alias = self
            .tables
            .module_of_kind(kind)
            .ok_or_else(|| EmitError::UnknownKind { kind: kind.to_string() })?;
        let fields = self.emit_fields(node, Some(&TypeRef::named(kind)), 2);
        Ok(format!("&{}.{}{{\n{}\t}}", alias, kind, fields))
    }

    /// One `Name : value,` line per attribute
    ///
    /// `parent` is the declared type of the struct holding the attributes.
    pub fn emit_fields(&self, node: &IrNode, parent: Option<&TypeRef>, depth: usize) -> String {
        let keyed_by_resource = parent
            .and_then(|ty| ty.base().as_named())
            .is_some_and(|named| self.config.quoted_key_types.contains(&named.name));

        let mut out = String::new();
        for (name, field) in node.iter() {
            tracing::trace!(field = name, ty = %field.ty, depth, "emitting field");
            if keyed_by_resource {
                let value = match (&field.ty, &field.val) {
                    (TypeRef::Primitive(Primitive::String), IrValue::Str(q)) => {
                        format!("resource.MustParse(\"{}\")", q)
                    }
                    (ty, val) => self.emit_value(ty, val, depth),
                };
                out.push_str(&format!("{}{} : {},\n", indent(depth), quote_key(name), value));
            } else {
                let value = self.emit_value(&field.ty, &field.val, depth);
                out.push_str(&format!("{}{} : {},\n", indent(depth), name, value));
            }
        }
        out
    }

    /// Literal for one value of the given declared type
    pub fn emit_value(&self, ty: &TypeRef, val: &IrValue, depth: usize) -> String {
        if self.is_placeholder(ty, val) {
            return self.zero_value(ty);
        }
        if self.config.index_types.contains(ty) {
            let text = val.as_text().unwrap_or_default().trim_matches('"');
            return format!("{}({})", self.go_type(ty), text);
        }

        match ty {
            TypeRef::Bytes => format!("{}(\"{}\")", self.config.decode_helper, val.as_text().unwrap_or_default()),
            TypeRef::Pointer(inner) => match inner.as_ref() {
                TypeRef::Primitive(prim) => {
                    format!("{}({})", self.config.pointer_helper(*prim), self.scalar(val))
                }
                TypeRef::Named(named) => self.emit_named(named, true, val, depth),
                TypeRef::Expr => format!("{}({})", self.config.value_helper(), val.as_text().unwrap_or_default()),
                other => {
                    tracing::debug!(ty = %ty, "pointer to {} emitted as its target", other);
                    self.emit_value(other, val, depth)
                }
            },
            TypeRef::Primitive(_) => self.scalar(val),
            TypeRef::Named(named) => self.emit_named(named, false, val, depth),
            TypeRef::Map(value_ty) => match val {
                IrValue::Map(entries) => {
                    let mut out = format!("{}{{\n", self.go_type(ty));
                    for (key, v) in entries {
                        out.push_str(&format!(
                            "{}{} : {},\n",
                            indent(depth + 1),
                            quote_key(key),
                            self.emit_value(value_ty, v, depth + 1)
                        ));
                    }
                    out.push_str(&format!("{}}}", indent(depth)));
                    out
                }
                other => self.emit_dynamic(other, depth),
            },
            TypeRef::Slice(elem) => match val {
                IrValue::Seq(items) => {
                    let mut out = format!("{}{{\n", self.go_type(ty));
                    for item in items {
                        out.push_str(&format!(
                            "{}{},\n",
                            indent(depth + 1),
                            self.emit_value(elem, item, depth + 1)
                        ));
                    }
                    out.push_str(&format!("{}}}", indent(depth)));
                    out
                }
                other => self.emit_dynamic(other, depth),
            },
            TypeRef::Expr => val.as_text().unwrap_or_default().to_string(),
            TypeRef::Any => self.emit_dynamic(val, depth),
        }
    }

    fn emit_named(&self, named: &NamedType, pointer: bool, val: &IrValue, depth: usize) -> String {
        let resolved = self.resolve(named);
        let literal = match val {
            _ if self.tables.is_enum(&named.name) => format!("{}({})", resolved, self.scalar(val)),
            IrValue::Struct(node) => {
                let ty = TypeRef::Named(named.clone());
                return format!(
                    "{}{}{{\n{}{}}}",
                    if pointer { "&" } else { "" },
                    resolved,
                    self.emit_fields(node, Some(&ty), depth + 1),
                    indent(depth)
                );
            }
            IrValue::Map(entries) if self.config.quoted_key_types.contains(&named.name) => {
                let mut out = format!("{}{{\n", resolved);
                for (key, v) in entries {
                    let value = match v {
                        IrValue::Str(q) => format!("resource.MustParse(\"{}\")", q),
                        other => self.emit_dynamic(other, depth + 1),
                    };
                    out.push_str(&format!("{}{} : {},\n", indent(depth + 1), quote_key(key), value));
                }
                out.push_str(&format!("{}}}", indent(depth)));
                out
            }
            IrValue::Seq(_) | IrValue::Map(_) => {
                let body = self.emit_dynamic(val, depth);
                // dynamic literals open with their own type; keep only the braces
                let braces = body
                    .strip_prefix("map[string]interface{}")
                    .or_else(|| body.strip_prefix("[]interface{}"))
                    .unwrap_or(&body);
                format!("{}{}", resolved, braces)
            }
            IrValue::Expr(expr) => expr.clone(),
            scalar => format!("{}({})", resolved, self.scalar(scalar)),
        };
        if pointer {
            format!("{}({})", self.config.value_helper(), literal)
        } else {
            literal
        }
    }

    /// Text of a scalar in plain or helper-call position
    fn scalar(&self, val: &IrValue) -> String {
        match val {
            IrValue::Str(s) => quote(s),
            IrValue::Number(n) => n.clone(),
            IrValue::Bool(b) => b.to_string(),
            IrValue::Expr(e) => e.clone(),
            IrValue::Struct(_) | IrValue::Seq(_) | IrValue::Map(_) => {
                tracing::warn!(kind = val.kind_name(), "composite value where a scalar was declared");
                "nil".to_string()
            }
        }
    }

    fn emit_dynamic(&self, val: &IrValue, depth: usize) -> String {
        match val {
            IrValue::Seq(items) => {
                let mut out = "[]interface{}{\n".to_string();
                for item in items {
                    out.push_str(&format!("{}{},\n", indent(depth + 1), self.emit_dynamic(item, depth + 1)));
                }
                out.push_str(&format!("{}}}", indent(depth)));
                out
            }
            IrValue::Map(entries) => {
                let mut out = "map[string]interface{}{\n".to_string();
                for (key, v) in entries {
                    out.push_str(&format!(
                        "{}{} : {},\n",
                        indent(depth + 1),
                        quote_key(key),
                        self.emit_dynamic(v, depth + 1)
                    ));
                }
                out.push_str(&format!("{}}}", indent(depth)));
                out
            }
            IrValue::Struct(node) => {
                let mut out = "map[string]interface{}{\n".to_string();
                for (name, field) in node.iter() {
                    out.push_str(&format!(
                        "{}{} : {},\n",
                        indent(depth + 1),
                        quote_key(name),
                        self.emit_value(&field.ty, &field.val, depth + 1)
                    ));
                }
                out.push_str(&format!("{}}}", indent(depth)));
                out
            }
            scalar => self.scalar(scalar),
        }
    }

    /// An empty string standing in for an omitted element of a non-string type
    fn is_placeholder(&self, ty: &TypeRef, val: &IrValue) -> bool {
        matches!(val, IrValue::Str(s) if s.is_empty())
            && !matches!(ty, TypeRef::Primitive(Primitive::String) | TypeRef::Any)
    }

    fn zero_value(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Primitive(Primitive::Bool) => "false".to_string(),
            TypeRef::Primitive(Primitive::String) => "\"\"".to_string(),
            TypeRef::Primitive(_) => "0".to_string(),
            TypeRef::Named(named) if self.tables.is_enum(&named.name) => {
                format!("{}(\"\")", self.resolve(named))
            }
            TypeRef::Named(named) => format!("{}{{}}", self.resolve(named)),
            TypeRef::Slice(_) | TypeRef::Map(_) => format!("{}{{}}", self.go_type(ty)),
            TypeRef::Pointer(_) | TypeRef::Bytes | TypeRef::Expr => "nil".to_string(),
            TypeRef::Any => "\"\"".to_string(),
        }
    }

    /// Go spelling of a type with module aliases resolved
    pub fn go_type(&self, ty: &TypeRef) -> String {
        match ty {
            TypeRef::Primitive(p) => p.go_name().to_string(),
            TypeRef::Bytes => "[]byte".to_string(),
            TypeRef::Named(named) => self.resolve(named),
            TypeRef::Pointer(inner) => format!("*{}", self.go_type(inner)),
            TypeRef::Slice(inner) => format!("[]{}", self.go_type(inner)),
            TypeRef::Map(inner) => format!("map[string]{}", self.go_type(inner)),
            TypeRef::Expr => self.config.expr_type.clone(),
            TypeRef::Any => "interface{}".to_string(),
        }
    }

    fn resolve(&self, named: &NamedType) -> String {
        let resolved = self.tables.resolve_module(named);
        if !resolved.known {
            let mut warnings = self.warnings.borrow_mut();
            if !warnings.iter().any(|w| w.path == named.name) {
                tracing::warn!(type_name = %named, "no module mapping, emitting unqualified");
                warnings.push(ConversionWarning::warning(
                    WarningCategory::UnknownModule,
                    named.name.clone(),
                    format!("no module mapping for {}", named),
                ));
            }
        }
        resolved.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCTS: &str = r#"{
        "metaAlias": ["ObjectMeta", "IncludeObjectPolicy", "LabelSelector"],
        "corev1": ["ConfigMap", "Container", "ContainerPort", "ResourceRequirements", "ResourceList", "Protocol"]
    }"#;
    const ENUMS: &str = r#"{"metaAlias": ["IncludeObjectPolicy"], "corev1": ["Protocol"]}"#;

    fn tables() -> TypeTables {
        TypeTables::from_json_docs(STRUCTS, ENUMS).unwrap()
    }

    fn emit(ty: &str, val: IrValue) -> String {
        let tables = tables();
        let config = CodegenConfig::default();
        let emitter = Emitter::new(&tables, &config);
        normalize_whitespace(&emitter.emit_value(&ty.parse().unwrap(), &val, 0))
    }

    #[test]
    fn test_object_meta() {
        let node = IrNode::from_json_str(
            r#"{"Name":{"type":"string","val":"tests"},"Generation":{"type":"int64","val":"2"}}"#,
        )
        .unwrap();
        insta::assert_snapshot!(
            emit("v1.ObjectMeta", IrValue::Struct(node)),
            @r#"metaAlias.ObjectMeta{ Name : "tests", Generation : 2, }"#
        );
    }

    #[test]
    fn test_enum_uses_call_syntax() {
        assert_eq!(
            emit("v1.IncludeObjectPolicy", IrValue::Str("True".into())),
            r#"metaAlias.IncludeObjectPolicy("True")"#
        );
    }

    #[test]
    fn test_pointer_primitives() {
        assert_eq!(emit("*int32", IrValue::Number("34".into())), "wrapInt32(34)");
        assert_eq!(emit("*bool", IrValue::Bool(true)), "wrapBool(true)");
        assert_eq!(emit("*string", IrValue::Str("x".into())), r#"wrapString("x")"#);
        assert_eq!(emit("*float64", IrValue::Number("0.5".into())), "wrapFloat64(0.5)");
    }

    #[test]
    fn test_byte_blob() {
        assert_eq!(
            emit("[]byte", IrValue::Str("bXktc2VjcmV0".into())),
            r#"decodeBase64("bXktc2VjcmV0")"#
        );
        assert_eq!(
            emit("[]uint8", IrValue::Str("bXktc2VjcmV0".into())),
            r#"decodeBase64("bXktc2VjcmV0")"#
        );
    }

    #[test]
    fn test_index_type_strips_quotes() {
        assert_eq!(emit("intstr.Type", IrValue::Str("\"1\"".into())), "intstr.Type(1)");
        assert_eq!(emit("intstr.Type", IrValue::Number("1".into())), "intstr.Type(1)");
    }

    #[test]
    fn test_plain_primitives() {
        assert_eq!(emit("int32", IrValue::Number("5".into())), "5");
        assert_eq!(emit("bool", IrValue::Bool(false)), "false");
        assert_eq!(emit("string", IrValue::Str("5".into())), r#""5""#);
    }

    #[test]
    fn test_multi_line_string() {
        let tables = tables();
        let config = CodegenConfig::default();
        let emitter = Emitter::new(&tables, &config);
        let out = emitter.emit_value(&"string".parse().unwrap(), &IrValue::Str("a\nb".into()), 0);
        assert_eq!(out, "\"a\\n\" + \n \"b\"");
    }

    #[test]
    fn test_map_keeps_order_and_quotes_keys() {
        let mut entries = indexmap::IndexMap::new();
        entries.insert("z".to_string(), IrValue::Str("last".into()));
        entries.insert("a".to_string(), IrValue::Str("first".into()));
        insta::assert_snapshot!(
            emit("map[string]string", IrValue::Map(entries)),
            @r#"map[string]string{ "z" : "last", "a" : "first", }"#
        );
    }

    #[test]
    fn test_slice_of_structs_and_enums() {
        let port = IrNode::from_json_str(r#"{"ContainerPort":{"type":"int32","val":"80"}}"#).unwrap();
        assert_eq!(
            emit(
                "[]v1.ContainerPort",
                IrValue::Seq(vec![IrValue::Struct(port), IrValue::Str(String::new())])
            ),
            "[]corev1.ContainerPort{ corev1.ContainerPort{ ContainerPort : 80, }, corev1.ContainerPort{}, }"
        );
        assert_eq!(
            emit("[]v1.Protocol", IrValue::Seq(vec![IrValue::Str("TCP".into())])),
            r#"[]corev1.Protocol{ corev1.Protocol("TCP"), }"#
        );
    }

    #[test]
    fn test_slice_keeps_empty_strings() {
        assert_eq!(
            emit(
                "[]string",
                IrValue::Seq(vec![IrValue::Str("abc".into()), IrValue::Str(String::new())])
            ),
            r#"[]string{ "abc", "", }"#
        );
    }

    #[test]
    fn test_pointer_struct_gets_address() {
        let node = IrNode::from_json_str(r#"{"Name":{"type":"string","val":"x"}}"#).unwrap();
        assert_eq!(
            emit("*v1.ObjectMeta", IrValue::Struct(node)),
            r#"&metaAlias.ObjectMeta{ Name : "x", }"#
        );
    }

    #[test]
    fn test_pointer_enum_takes_address() {
        assert_eq!(
            emit("*v1.Protocol", IrValue::Str("TCP".into())),
            r#"wrapValue(corev1.Protocol("TCP"))"#
        );
        assert_eq!(
            emit("*expr", IrValue::Expr("resource.MustParse(\"1Gi\")".into())),
            r#"wrapValue(resource.MustParse("1Gi"))"#
        );
    }

    #[test]
    fn test_map_keys_stay_on_one_line() {
        let mut entries = indexmap::IndexMap::new();
        entries.insert("multi\nline".to_string(), IrValue::Str("v".into()));
        let tables = tables();
        let config = CodegenConfig::default();
        let emitter = Emitter::new(&tables, &config);
        let out = emitter.emit_value(&"map[string]string".parse().unwrap(), &IrValue::Map(entries.clone()), 0);
        assert!(out.contains(r#""multi\nline" : "v","#));
        assert!(crate::validate::check_braces(&out).is_ok());

        let dynamic = emitter.emit_value(&TypeRef::Any, &IrValue::Map(entries), 0);
        assert!(dynamic.contains(r#""multi\nline" : "v","#));
    }

    #[test]
    fn test_resource_list_keys_are_quoted() {
        let node = IrNode::from_json_str(
            r#"{
                "cpu": {"type": "expr", "val": "resource.MustParse(\"500m\")"},
                "memory": {"type": "string", "val": "64Mi"}
            }"#,
        )
        .unwrap();
        insta::assert_snapshot!(
            emit("v1.ResourceList", IrValue::Struct(node)),
            @r#"corev1.ResourceList{ "cpu" : resource.MustParse("500m"), "memory" : resource.MustParse("64Mi"), }"#
        );
    }

    #[test]
    fn test_resource_list_from_map() {
        let mut entries = indexmap::IndexMap::new();
        entries.insert("cpu".to_string(), IrValue::Str("250m".into()));
        entries.insert("memory".to_string(), IrValue::Expr("resource.MustParse(\"1Gi\")".into()));
        assert_eq!(
            emit("ResourceList", IrValue::Map(entries)),
            r#"corev1.ResourceList{ "cpu" : resource.MustParse("250m"), "memory" : resource.MustParse("1Gi"), }"#
        );
    }

    #[test]
    fn test_unknown_type_is_unqualified_with_warning() {
        let tables = tables();
        let config = CodegenConfig::default();
        let emitter = Emitter::new(&tables, &config);
        let node = IrNode::from_json_str(r#"{"Size":{"type":"int32","val":"3"}}"#).unwrap();
        let out = emitter.emit_value(&"v1.Widget".parse().unwrap(), &IrValue::Struct(node.clone()), 0);
        emitter.emit_value(&"v1.Widget".parse().unwrap(), &IrValue::Struct(node), 0);
        assert_eq!(normalize_whitespace(&out), "Widget{ Size : 3, }");
        let warnings = emitter.take_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].category, WarningCategory::UnknownModule);
    }

    #[test]
    fn test_any_values() {
        let mut entries = indexmap::IndexMap::new();
        entries.insert("n".to_string(), IrValue::Number("1".into()));
        entries.insert("list".to_string(), IrValue::Seq(vec![IrValue::Str("a".into())]));
        assert_eq!(
            emit("map[string]interface{}", IrValue::Map(entries)),
            r#"map[string]interface{}{ "n" : 1, "list" : []interface{}{ "a", }, }"#
        );
    }

    #[test]
    fn test_emit_resource() {
        let tables = tables();
        let config = CodegenConfig::default();
        let emitter = Emitter::new(&tables, &config);
        let node = IrNode::from_json_str(
            r#"{
                "ObjectMeta": {"type": "v1.ObjectMeta", "val": {"Name": {"type": "string", "val": "cfg"}}},
                "Data": {"type": "map[string]string", "val": {"key": "value"}}
            }"#,
        )
        .unwrap();
        let out = emitter.emit_resource("ConfigMap", &node).unwrap();
        insta::assert_snapshot!(
            normalize_whitespace(&out),
            @r#"&corev1.ConfigMap{ ObjectMeta : metaAlias.ObjectMeta{ Name : "cfg", }, Data : map[string]string{ "key" : "value", }, }"#
        );
        assert!(matches!(
            emitter.emit_resource("Gadget", &node),
            Err(EmitError::UnknownKind { .. })
        ));
    }

    #[test]
    fn test_emitted_literals_are_balanced() {
        let trees = [
            r#"{"Name": {"type": "string", "val": "a{b}[c](d)"}}"#,
            r#"{"Note": {"type": "string", "val": "say \\\"}\\\" then\nleave"}}"#,
            r#"{"Ports": {"type": "[]v1.ContainerPort", "val": [{"ContainerPort": {"type": "int32", "val": "80"}}, ""]}}"#,
            r#"{"Data": {"type": "map[string]string", "val": {"k}": "v{", "x": ""}}}"#,
            r#"{"Extra": {"type": "map[string]interface{}", "val": {"n": 1, "l": [[1, 2], {"$expr": "x()"}]}}}"#,
            r#"{"Limits": {"type": "v1.ResourceList", "val": {"cpu": {"type": "string", "val": "1"}}}}"#,
            r#"{"Meta": {"type": "*v1.ObjectMeta", "val": {"Labels": {"type": "map[string]string", "val": {"a": "b"}}}}}"#,
            r#"{"Policy": {"type": "*v1.Protocol", "val": "TCP"}, "Blob": {"type": "[]byte", "val": "e30="}}"#,
        ];
        let tables = tables();
        let config = CodegenConfig::default();
        let emitter = Emitter::new(&tables, &config);
        for tree in trees {
            let node = IrNode::from_json_str(tree).unwrap();
            let out = emitter.emit_resource("ConfigMap", &node).unwrap();
            assert!(crate::validate::check_braces(&out).is_ok(), "unbalanced: {}", out);
        }
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a{\n\t\tb ,\n}  "), "a{ b , }");
    }
}
