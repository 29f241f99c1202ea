use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{flatten, format_scalar, result_of};

/// Format output as tables: one Field/Value table for the scalars, then one
/// titled table per schedule or line-item list.
pub fn print_table(value: &Value) {
    print!("{}", render_table(value));
}

pub fn render_table(value: &Value) -> String {
    let mut out = String::new();
    let flat = flatten(result_of(value));

    if !flat.fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &flat.fields {
            builder.push_record([key.as_str(), &format_scalar(val)]);
        }
        out.push_str(&Table::from(builder).to_string());
        out.push('\n');
    }

    for (name, rows) in &flat.tables {
        out.push_str(&format!("\n{}:\n", name));
        out.push_str(&array_table(rows));
        out.push('\n');
    }

    if let Some(envelope) = value.as_object() {
        if let Some(Value::Array(warnings)) = envelope.get("warnings") {
            if !warnings.is_empty() {
                out.push_str("\nWarnings:\n");
                for w in warnings.iter().filter_map(Value::as_str) {
                    out.push_str(&format!("  - {}\n", w));
                }
            }
        }
        if let Some(Value::String(meth)) = envelope.get("methodology") {
            out.push_str(&format!("\nMethodology: {}\n", meth));
        }
    }

    out
}

fn array_table(rows: &[Value]) -> String {
    let headers: Vec<String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => return "(empty)".to_string(),
    };
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for row in rows.iter().filter_map(Value::as_object) {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(format_scalar).unwrap_or_default())
            .collect();
        builder.push_record(cells);
    }
    Table::from(builder).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_table_sections() {
        let v = json!({
            "result": {
                "total_closing_costs": "16524.00",
                "line_items": [
                    { "key": "appraisal_fee", "amount": "400.00" },
                    { "key": "credit_report_fee", "amount": "50.00" }
                ]
            },
            "methodology": "Closing Disclosure fee ratios of home price",
            "warnings": ["Fees are estimated"]
        });
        let text = render_table(&v);
        assert!(text.contains("total_closing_costs"));
        assert!(text.contains("line_items:"));
        assert!(text.contains("appraisal_fee"));
        assert!(text.contains("  - Fees are estimated"));
        assert!(text.contains("Methodology: Closing Disclosure"));
    }
}
