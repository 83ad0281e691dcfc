// src/protocol/naming.rs

//! camelCase normalization of argument keys.
//!
//! Payload functions are written in JavaScript and expect camelCase
//! property names, while Rust callers serialize snake_case fields. Rather
//! than requiring `#[serde(rename_all = "camelCase")]` on every argument
//! type, keys are rewritten after serialization.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::Result;

/// Serialize `args` to compact JSON with camelCase object keys.
pub fn to_camel_case_json<A: Serialize + ?Sized>(args: &A) -> Result<String> {
    let value = serde_json::to_value(args)?;
    Ok(serde_json::to_string(&camel_case_keys(value))?)
}

/// Recursively rewrite every object key of `value` to camelCase.
pub fn camel_case_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (to_camel_case(&k), camel_case_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(camel_case_keys).collect()),
        other => other,
    }
}

/// `file_path` → `filePath`, `FilePath` → `filePath`, `URLPath` → `urlPath`.
///
/// Keys starting with an underscore are left alone.
pub fn to_camel_case(key: &str) -> String {
    if key.is_empty() || key.starts_with('_') {
        return key.to_string();
    }

    let mut joined = String::with_capacity(key.len());
    for (i, part) in key.split('_').filter(|p| !p.is_empty()).enumerate() {
        if i == 0 {
            joined.push_str(part);
        } else {
            let mut chars = part.chars();
            if let Some(first) = chars.next() {
                joined.extend(first.to_uppercase());
                joined.push_str(chars.as_str());
            }
        }
    }
    lower_leading_capitals(&joined)
}

/// Lowercase the leading run of capitals, keeping the last one of the run
/// when it starts a new word (`URLPath` → `urlPath`).
fn lower_leading_capitals(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len());
    let mut lowering = true;

    for (i, &c) in chars.iter().enumerate() {
        if lowering && c.is_uppercase() {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if i > 0 && next_is_lower {
                lowering = false;
                out.push(c);
            } else {
                out.extend(c.to_lowercase());
            }
        } else {
            lowering = false;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_common_key_styles() {
        assert_eq!(to_camel_case("file_path"), "filePath");
        assert_eq!(to_camel_case("FilePath"), "filePath");
        assert_eq!(to_camel_case("URLPath"), "urlPath");
        assert_eq!(to_camel_case("ID"), "id");
        assert_eq!(to_camel_case("alreadyCamel"), "alreadyCamel");
        assert_eq!(to_camel_case("x"), "x");
        assert_eq!(to_camel_case("_private"), "_private");
    }

    #[test]
    fn rewrites_nested_keys_but_not_values() {
        let value = json!({
            "page_count": 2,
            "Pages": [{ "page_name": "Cover_Page" }],
        });
        assert_eq!(
            camel_case_keys(value),
            json!({
                "pageCount": 2,
                "pages": [{ "pageName": "Cover_Page" }],
            })
        );
    }

    #[derive(Serialize)]
    struct ExportArgs {
        document_path: String,
        pdf_preset: Option<String>,
    }

    #[test]
    fn serializes_structs_with_camel_case_fields() {
        let args = ExportArgs {
            document_path: "/tmp/a.indd".to_string(),
            pdf_preset: None,
        };
        assert_eq!(
            to_camel_case_json(&args).unwrap(),
            r#"{"documentPath":"/tmp/a.indd","pdfPreset":null}"#
        );
    }
}
