//! Field transform rules
//!
//! Rules run on every struct attribute after reflection, keyed by the emitted
//! field name. They replace traversal special cases such as stripping
//! tool-injected labels.

use serde::{Deserialize, Serialize};

use crate::ir::{IrNode, IrValue};
use crate::types::{NamedType, Primitive, TypeRef};

/// Labels the chart tooling injects and the owning controller re-adds itself
pub const TOOL_INJECTED_LABELS: &[&str] = &["helm.sh/chart", "app.kubernetes.io/managed-by"];

/// Where a rule applies
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldScope {
    #[default]
    Anywhere,
    /// Only on attributes of the top-level resource
    Root,
    /// Only on attributes of structs with this type name
    Within(String),
}

/// What a rule does to the matched attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldAction {
    /// Remove these keys from a map value
    StripKeys(Vec<String>),
    Rename(String),
    Drop,
    /// Replace the declared type; a map retyped to a named type becomes a struct node
    Retype(TypeRef),
    /// Mark the declared type as a pointer
    Pointer,
    /// Rebuild an untagged int-or-string scalar as an `intstr.IntOrString` node
    IntOrString,
    /// Move the attribute into an embedded struct member of this type
    Embed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub field: String,
    #[serde(default)]
    pub scope: FieldScope,
    pub action: FieldAction,
}

impl FieldRule {
    pub fn new(field: impl Into<String>, action: FieldAction) -> Self {
        Self {
            field: field.into(),
            scope: FieldScope::Anywhere,
            action,
        }
    }

    pub fn in_scope(mut self, scope: FieldScope) -> Self {
        self.scope = scope;
        self
    }

    /// The default `Labels` rule
    pub fn strip_tool_labels() -> Self {
        Self::new(
            "Labels",
            FieldAction::StripKeys(TOOL_INJECTED_LABELS.iter().map(|s| s.to_string()).collect()),
        )
    }

    pub fn matches(&self, field: &str, parent_type: Option<&str>, at_root: bool) -> bool {
        if self.field != field {
            return false;
        }
        match &self.scope {
            FieldScope::Anywhere => true,
            FieldScope::Root => at_root,
            FieldScope::Within(ty) => parent_type == Some(ty.as_str()),
        }
    }
}

/// An attribute on its way into a struct node
#[derive(Debug)]
pub(crate) struct PendingField {
    pub name: String,
    pub ty: TypeRef,
    pub val: IrValue,
    /// Embedded member the attribute lands in
    pub embed_in: Option<String>,
}

impl PendingField {
    pub fn new(name: impl Into<String>, ty: TypeRef, val: IrValue) -> Self {
        Self {
            name: name.into(),
            ty,
            val,
            embed_in: None,
        }
    }
}

/// Apply an action; `None` means the attribute is dropped
pub(crate) fn apply(action: &FieldAction, mut field: PendingField) -> Option<PendingField> {
    match action {
        FieldAction::StripKeys(keys) => {
            if let IrValue::Map(entries) = &mut field.val {
                entries.retain(|k, _| !keys.contains(k));
                if entries.is_empty() {
                    return None;
                }
            }
            Some(field)
        }
        FieldAction::Rename(name) => {
            field.name = name.clone();
            Some(field)
        }
        FieldAction::Drop => None,
        FieldAction::Retype(ty) => {
            let as_struct = match (ty.as_named(), field.ty.base(), &field.val) {
                (Some(_), TypeRef::Map(value_ty), IrValue::Map(entries)) => {
                    let mut node = IrNode::new();
                    for (k, v) in entries {
                        node.insert(k.clone(), (**value_ty).clone(), v.clone());
                    }
                    Some(node)
                }
                _ => None,
            };
            if let Some(node) = as_struct {
                field.val = IrValue::Struct(node);
            }
            field.ty = ty.clone();
            Some(field)
        }
        FieldAction::Pointer => {
            if matches!(field.val, IrValue::Seq(_) | IrValue::Map(_)) {
                tracing::debug!(field = %field.name, "pointer rule ignored on collection value");
            } else if !field.ty.is_pointer() {
                field.ty = field.ty.pointer();
            }
            Some(field)
        }
        FieldAction::IntOrString => {
            let pointer = field.ty.is_pointer();
            let mut node = IrNode::new();
            match (field.ty.base(), &field.val) {
                (TypeRef::Primitive(p), IrValue::Number(n)) if p.is_numeric() => {
                    node.insert("IntVal", TypeRef::Primitive(Primitive::Int32), IrValue::Number(n.clone()));
                }
                (TypeRef::Primitive(Primitive::String), IrValue::Str(s)) => {
                    node.insert(
                        "Type",
                        TypeRef::Named(NamedType::qualified("intstr", "Type")),
                        IrValue::Number("1".into()),
                    );
                    node.insert("StrVal", TypeRef::Primitive(Primitive::String), IrValue::Str(s.clone()));
                }
                _ => return Some(field),
            }
            let ty = TypeRef::Named(NamedType::qualified("intstr", "IntOrString"));
            field.ty = if pointer { ty.pointer() } else { ty };
            field.val = IrValue::Struct(node);
            Some(field)
        }
        FieldAction::Embed(member) => {
            field.embed_in = Some(member.clone());
            Some(field)
        }
    }
}
