use firstkey_core::defaults::MortgageDefaults;
use firstkey_core::{FirstKeyError, FirstKeyResult};
use std::fs;
use tracing::debug;

/// Built-in defaults, overridden field by field from `path` when given.
/// YAML is a superset of JSON, so either format loads.
pub fn load_defaults(path: Option<&str>) -> FirstKeyResult<MortgageDefaults> {
    let Some(path) = path else {
        return Ok(MortgageDefaults::default());
    };
    let contents = fs::read_to_string(path)
        .map_err(|e| FirstKeyError::ConfigError(format!("Failed to read '{}': {}", path, e)))?;
    let defaults = parse_defaults(&contents)
        .map_err(|e| FirstKeyError::ConfigError(format!("Failed to parse '{}': {}", path, e)))?;
    debug!(path, "loaded calculator defaults");
    Ok(defaults)
}

pub fn parse_defaults(contents: &str) -> Result<MortgageDefaults, serde_yaml::Error> {
    if contents.trim().is_empty() {
        return Ok(MortgageDefaults::default());
    }
    serde_yaml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use firstkey_core::loan::LoanTerm;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_yaml_partial_override() {
        let yaml = "\
calculator:
  interest_rate_pct: 7.25
  loan_term: 15
refinance:
  closing_costs: 6500
";
        let d = parse_defaults(yaml).unwrap();
        assert_eq!(d.calculator.interest_rate_pct, dec!(7.25));
        assert_eq!(d.calculator.loan_term, LoanTerm::Fifteen);
        assert_eq!(d.calculator.home_price, dec!(330000));
        assert_eq!(d.refinance.closing_costs, dec!(6500));
        assert_eq!(d.refinance.years_elapsed, 5);
    }

    #[test]
    fn test_json_accepted() {
        let d = parse_defaults(r#"{"cash_to_close": {"home_price": "600000"}}"#).unwrap();
        assert_eq!(d.cash_to_close.home_price, dec!(600000));
        assert_eq!(d.cash_to_close.down_payment, dec!(108000));
    }

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(parse_defaults("  \n").unwrap(), MortgageDefaults::default());
    }

    #[test]
    fn test_unsupported_term_rejected() {
        assert!(parse_defaults("calculator:\n  loan_term: 40\n").is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        match load_defaults(Some("/nonexistent/firstkey.yaml")) {
            Err(FirstKeyError::ConfigError(msg)) => assert!(msg.contains("Failed to read")),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_no_path_is_defaults() {
        assert_eq!(load_defaults(None).unwrap(), MortgageDefaults::default());
    }
}
