//! Go file assembly
//!
//! Emitted resource literals are grouped by kind into accessor functions:
//!
//! ```go
//! func GetService() []*corev1.Service {
//!     service1 := &corev1.Service{...}
//!     service2 := &corev1.Service{...}
//!
//!     return []*corev1.Service{service1, service2, }
//! }
//! ```
//!
//! The file also carries the helpers emitted literals call into and two
//! commented-out `CreateAll`/`DeleteAll` reconciler methods.

pub mod batch;

pub use batch::{BatchFailure, BatchReport, Namespaced, run_batch};

use indexmap::IndexMap;

use crate::emit::CodegenConfig;
use crate::types::Primitive;

/// Imports of the generated file: (alias, path)
const IMPORTS: &[(&str, &str)] = &[
    ("", "context"),
    ("", "encoding/base64"),
    ("", "fmt"),
    ("", "time"),
    ("appsv1", "k8s.io/api/apps/v1"),
    ("corev1", "k8s.io/api/core/v1"),
    ("rbacv1", "k8s.io/api/rbac/v1"),
    ("schedulingv1", "k8s.io/api/scheduling/v1"),
    ("", "k8s.io/apimachinery/pkg/api/resource"),
    ("metav1", "k8s.io/apimachinery/pkg/apis/meta/v1"),
    ("", "k8s.io/apimachinery/pkg/apis/meta/v1/unstructured"),
    ("", "k8s.io/apimachinery/pkg/util/intstr"),
];

/// One use per import, so unused imports still compile
const IMPORT_KEEPERS: &[&str] = &[
    "_ = context.TODO()",
    "_ = fmt.Sprint()",
    "_ = time.Now()",
    "_ = appsv1.Deployment{}",
    "_ = corev1.Service{}",
    "_ = rbacv1.Role{}",
    "_ = schedulingv1.PriorityClass{}",
    "_, _ = resource.ParseQuantity(\"\")",
    "_ = metav1.ObjectMeta{}",
    "_ = &unstructured.Unstructured{}",
    "_ = intstr.FromInt32(4)",
];

#[derive(Debug, Clone)]
struct KindGroup {
    /// `*corev1.Service`
    return_type: String,
    literals: Vec<String>,
}

/// A generated Go source file under construction
#[derive(Debug, Clone)]
pub struct GoFile {
    package: String,
    namespace: String,
    pointer_helper_prefix: String,
    value_helper: String,
    decode_helper: String,
    kinds: IndexMap<String, KindGroup>,
}

/// Go type of a literal: the text before its opening brace, `&` read as `*`
fn literal_type(literal: &str) -> String {
    let head: String = literal
        .chars()
        .take_while(|c| *c != '{')
        .filter(|c| !c.is_whitespace())
        .collect();
    match head.strip_prefix('&') {
        Some(rest) => format!("*{}", rest),
        None => head,
    }
}

/// `ClusterRole` -> `clusterRole`
fn local_prefix(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => "resource".to_string(),
    }
}

impl GoFile {
    pub fn new(package: impl Into<String>, namespace: impl Into<String>, codegen: &CodegenConfig) -> Self {
        Self {
            package: package.into(),
            namespace: namespace.into(),
            pointer_helper_prefix: codegen.pointer_helper_prefix.clone(),
            value_helper: codegen.value_helper(),
            decode_helper: codegen.decode_helper.clone(),
            kinds: IndexMap::new(),
        }
    }

    /// Add an emitted literal under its kind; returns the local it is bound to
    pub fn add(&mut self, kind: &str, literal: impl Into<String>) -> String {
        let literal = literal.into();
        let return_type = literal_type(&literal);
        let group = self.kinds.entry(kind.to_string()).or_insert_with(|| KindGroup {
            return_type: return_type.clone(),
            literals: Vec::new(),
        });
        if group.return_type != return_type {
            tracing::warn!(
                kind,
                expected = %group.return_type,
                found = %return_type,
                "literal type differs from earlier resources of the same kind"
            );
        }
        group.literals.push(literal);
        format!("{}{}", local_prefix(kind), group.literals.len())
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Resource count per kind, in insertion order
    pub fn summary(&self) -> Vec<(&str, usize)> {
        self.kinds
            .iter()
            .map(|(kind, group)| (kind.as_str(), group.literals.len()))
            .collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("package {}\n\n", self.package));

        out.push_str("import (\n");
        for (alias, path) in IMPORTS {
            if alias.is_empty() {
                out.push_str(&format!("\t\"{}\"\n", path));
            } else {
                out.push_str(&format!("\t{} \"{}\"\n", alias, path));
            }
        }
        out.push_str(")\n\n");

        out.push_str("// deleteMeAfterDeletingUnusedImportedModules keeps every import in use.\n");
        out.push_str("// Remove the imports you do not need, then this function.\n");
        out.push_str("func deleteMeAfterDeletingUnusedImportedModules() {\n");
        for keeper in IMPORT_KEEPERS {
            out.push_str(&format!("\t{}\n", keeper));
        }
        out.push_str("}\n\n");

        for prim in Primitive::ALL {
            out.push_str(&format!(
                "func {}{}(val {}) *{} {{\n\treturn &val\n}}\n\n",
                self.pointer_helper_prefix,
                prim.helper_suffix(),
                prim.go_name(),
                prim.go_name()
            ));
        }

        out.push_str(&format!(
            "func {}[T any](val T) *T {{\n\treturn &val\n}}\n\n",
            self.value_helper
        ));

        out.push_str(&format!(
            "func {}(encoded string) []byte {{\n\
             \tdecoded, err := base64.StdEncoding.DecodeString(encoded)\n\
             \tif err != nil {{\n\
             \t\tfmt.Println(\"Unable to decode base64 value, using it as is:\", err)\n\
             \t\treturn []byte(encoded)\n\
             \t}}\n\
             \treturn decoded\n\
             }}\n\n",
            self.decode_helper
        ));

        out.push_str(&self.batch_function("Create"));
        out.push_str(&self.batch_function("Delete"));

        for (kind, group) in &self.kinds {
            out.push_str(&self.accessor(kind, group));
        }
        out
    }

    /// `func Get<Kind>() []<Type>` binding one local per literal
    fn accessor(&self, kind: &str, group: &KindGroup) -> String {
        let prefix = local_prefix(kind);
        let mut body = String::new();
        let mut locals = String::new();
        for (i, literal) in group.literals.iter().enumerate() {
            let local = format!("{}{}", prefix, i + 1);
            body.push_str(&format!("\t{} := {}\n\n", local, literal));
            locals.push_str(&format!("{}, ", local));
        }
        format!(
            "func Get{kind}() []{ty} {{\n{body}\treturn []{ty}{{{locals}}}\n}}\n\n",
            kind = kind,
            ty = group.return_type,
            body = body,
            locals = locals
        )
    }

    /// Commented-out reconciler method applying `verb` to every resource
    fn batch_function(&self, verb: &str) -> String {
        let gerund = format!("{}ing", verb.to_lowercase().trim_end_matches('e'));
        let mut loops = String::new();
        for kind in self.kinds.keys() {
            loops.push_str(&format!("\tfor _, resource := range Get{}() {{\n", kind));
            if !self.namespace.is_empty() {
                loops.push_str(
                    "\t\tif resource.GetNamespace() == \"\" {\n\
                     \t\t\tresource.SetNamespace(namespaceProvided)\n\
                     \t\t}\n",
                );
            }
            loops.push_str(&format!(
                "\t\tif err := r.{verb}(context.TODO(), resource); err != nil {{\n\
                 \t\t\tfmt.Println(\"Error during {gerund} resource of Get{kind}()| Error --> |\", err)\n\
                 \t\t\terrs = append(errs, err)\n\
                 \t\t}}\n\
                 \t}}\n",
                verb = verb,
                gerund = gerund,
                kind = kind
            ));
        }
        format!(
            "/*\nfunc (r *YourKindReconciler) {verb}All() []error {{\n\
             \tvar errs []error\n\
             \tnamespaceProvided := \"{ns}\"\n\
             \t_ = namespaceProvided\n\
             {loops}\
             \treturn errs\n\
             }}\n*/\n\n",
            verb = verb,
            ns = self.namespace,
            loops = loops
        )
    }
}
