pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::{Decimal, RoundingStrategy};
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

/// Fields holding rates rather than money; printed at full precision.
const RATE_FIELDS: [&str; 6] = [
    "tax_rate",
    "effective_tax_rate",
    "annual_interest_rate_pct",
    "annual_pmi_pct",
    "rate_30_year",
    "rate_15_year",
];

/// Render the value of field `key`: rates as given, everything else
/// through [`format_value`].
pub fn format_field(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) if RATE_FIELDS.contains(&key) => s.clone(),
        _ => format_value(value),
    }
}

/// Render a JSON leaf for humans and spreadsheets. Decimals arrive as
/// strings and are shown to the cent.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format_decimal_str(s).unwrap_or_else(|| s.clone()),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn format_decimal_str(s: &str) -> Option<String> {
    // ISO dates and labels are left alone
    let d: Decimal = s.parse().ok()?;
    Some(format!(
        "{:.2}",
        d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_value_rounds_money_to_cents() {
        assert_eq!(format_value(&json!("2528.27210013")), "2528.27");
        assert_eq!(format_value(&json!("400000")), "400000.00");
        assert_eq!(format_value(&json!("0")), "0.00");
    }

    #[test]
    fn test_format_value_rounds_sub_dollar_money() {
        assert_eq!(format_value(&json!("0.2708333333333333333333333333")), "0.27");
        assert_eq!(format_value(&json!("0.005")), "0.01");
        assert_eq!(format_value(&json!("-0.125")), "-0.13");
    }

    #[test]
    fn test_format_field_leaves_rates_and_dates() {
        assert_eq!(format_field("tax_rate", &json!("0.0181")), "0.0181");
        assert_eq!(format_field("interest", &json!("0.0181")), "0.02");
        assert_eq!(format_field("date", &json!("2055-01-31")), "2055-01-31");
        assert_eq!(format_value(&json!(360)), "360");
        assert_eq!(format_value(&json!(null)), "");
    }
}
