use serde_json::Value;

use super::{flatten, format_scalar, result_of};

/// Headline figure for each command, matched on the last path segment.
const PRIORITY_KEYS: [&str; 7] = [
    "total_monthly_payment",
    "max_home_price",
    "monthly_savings",
    "total_cash_to_close",
    "principal_and_interest",
    "back_end_dti",
    "interest_saved",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", render_minimal(value));
}

/// First priority key present (and not null), else the first field.
pub fn render_minimal(value: &Value) -> String {
    let result = result_of(value);
    let flat = flatten(result);

    for key in PRIORITY_KEYS {
        let hit = flat.fields.iter().find(|(path, val)| {
            !val.is_null() && path.rsplit('.').next() == Some(key)
        });
        if let Some((_, val)) = hit {
            return format_scalar(val);
        }
    }

    match flat.fields.first() {
        Some((key, val)) if !key.is_empty() => format!("{}: {}", key, format_scalar(val)),
        _ => format_scalar(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_priority_key() {
        let v = json!({ "result": {
            "loan_amount": "264000",
            "breakdown": { "principal_and_interest": "1668.66", "total_monthly_payment": "2214.88" }
        }});
        assert_eq!(render_minimal(&v), "2214.88");
    }

    #[test]
    fn test_priority_order() {
        let v = json!({ "result": { "back_end_dti": "45.0", "max_home_price": "281938" } });
        assert_eq!(render_minimal(&v), "281938");
    }

    #[test]
    fn test_fallback_to_first_field() {
        let v = json!({ "result": { "alpha": 1, "beta": 2 } });
        assert_eq!(render_minimal(&v), "alpha: 1");
    }
}
