//! Emission for generically decoded objects
//!
//! Objects with no typed model are kept as `serde_json::Value` and rebuilt as
//! `unstructured.Unstructured` literals over `map[string]interface{}`.

use serde_json::Value;

use super::indent;

/// `&unstructured.Unstructured{Object: ...}` for a decoded document
pub fn emit_unstructured(object: &Value) -> String {
    format!("&unstructured.Unstructured{{\n\tObject: {},\n\t}}", emit_dynamic(object, 2))
}

fn emit_dynamic(value: &Value, depth: usize) -> String {
    match value {
        Value::Object(entries) => {
            let mut out = "map[string]interface{}{\n".to_string();
            for (key, v) in entries {
                out.push_str(&format!(
                    "{}\"{}\": {},\n",
                    indent(depth),
                    escape(key),
                    emit_dynamic(v, depth + 1)
                ));
            }
            out.push_str(&format!("{}}}", indent(depth)));
            out
        }
        Value::Array(items) => {
            let mut out = "[]interface{}{\n".to_string();
            for item in items {
                out.push_str(&format!("{}{},\n", indent(depth), emit_dynamic(item, depth + 1)));
            }
            out.push_str(&format!("{}}}", indent(depth)));
            out
        }
        Value::String(s) if s.contains('\n') => raw_string(s),
        Value::String(s) => format!("\"{}\"", escape(s)),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => "nil".to_string(),
    }
}

/// Escape for a single-line interpreted string
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

/// Multi-line text as a raw string; backquotes cannot appear inside one
fn raw_string(s: &str) -> String {
    format!("fmt.Sprint(`{}`)", s.replace('`', "` + \"`\" + `"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::normalize_whitespace;
    use serde_json::json;

    #[test]
    fn test_unstructured_object() {
        let object = json!({
            "apiVersion": "example.com/v1",
            "kind": "Widget",
            "spec": {"size": 3, "enabled": true, "tags": ["a", "b"]}
        });
        insta::assert_snapshot!(
            normalize_whitespace(&emit_unstructured(&object)),
            @r#"&unstructured.Unstructured{ Object: map[string]interface{}{ "apiVersion": "example.com/v1", "kind": "Widget", "spec": map[string]interface{}{ "size": 3, "enabled": true, "tags": []interface{}{ "a", "b", }, }, }, }"#
        );
    }

    #[test]
    fn test_strings_are_escaped() {
        let out = emit_dynamic(&json!(r#"say "hi" \o/"#), 0);
        assert_eq!(out, r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn test_keys_with_newlines_are_escaped() {
        let out = emit_dynamic(&json!({"a\nb": 1}), 0);
        assert!(out.contains(r#""a\nb": 1,"#));
        assert!(crate::validate::check_braces(&out).is_ok());
    }

    #[test]
    fn test_multi_line_strings_use_raw_literals() {
        assert_eq!(emit_dynamic(&json!("a\nb"), 0), "fmt.Sprint(`a\nb`)");
        assert_eq!(emit_dynamic(&json!("a`b\n"), 0), "fmt.Sprint(`a` + \"`\" + `b\n`)");
    }

    #[test]
    fn test_null_and_floats() {
        assert_eq!(emit_dynamic(&json!(null), 0), "nil");
        assert_eq!(emit_dynamic(&json!(1.5), 0), "1.5");
    }
}
