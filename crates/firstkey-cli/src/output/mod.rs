pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// A result object split into scalar fields keyed by dotted path and the
/// arrays of objects (schedules, line items) found beneath it.
#[derive(Default)]
pub struct Flattened<'a> {
    pub fields: Vec<(String, &'a Value)>,
    pub tables: Vec<(String, &'a [Value])>,
}

pub fn flatten(value: &Value) -> Flattened<'_> {
    let mut out = Flattened::default();
    flatten_into("", value, &mut out);
    out
}

fn flatten_into<'a>(prefix: &str, value: &'a Value, out: &mut Flattened<'a>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(&path, val, out);
            }
        }
        Value::Array(items) if items.first().is_some_and(Value::is_object) => {
            out.tables.push((prefix.to_string(), items.as_slice()));
        }
        _ => out.fields.push((prefix.to_string(), value)),
    }
}

/// The `result` of a computation envelope, or the value itself.
pub fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

pub fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(format_scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_dotted_paths_and_tables() {
        let v = json!({
            "breakdown": { "principal_and_interest": "1668.66", "pmi_monthly": "0" },
            "loan_amount": "264000",
            "schedule": [ { "month": 1 }, { "month": 2 } ],
            "tags": ["a", "b"]
        });
        let flat = flatten(&v);
        let keys: Vec<&str> = flat.fields.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"breakdown.principal_and_interest"));
        assert!(keys.contains(&"loan_amount"));
        assert!(keys.contains(&"tags"));
        assert_eq!(flat.tables.len(), 1);
        assert_eq!(flat.tables[0].0, "schedule");
        assert_eq!(flat.tables[0].1.len(), 2);
    }

    #[test]
    fn test_result_of_unwraps_envelope() {
        let v = json!({ "result": { "x": 1 }, "warnings": [] });
        assert_eq!(result_of(&v), &json!({ "x": 1 }));
        let bare = json!({ "x": 1 });
        assert_eq!(result_of(&bare), &bare);
    }

    #[test]
    fn test_format_scalar() {
        assert_eq!(format_scalar(&json!("2214.88")), "2214.88");
        assert_eq!(format_scalar(&json!(null)), "");
        assert_eq!(format_scalar(&json!([1, 2])), "1, 2");
    }
}
