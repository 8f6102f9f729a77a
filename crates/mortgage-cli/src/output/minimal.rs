use serde_json::Value;

use super::format_value;

/// Print just the headline number from the output.
///
/// Looks for the key answer of each command in priority order, then falls
/// back to the first field of the result.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_paths: [&[&str]; 3] = [
        &["summary", "monthly_payment"],
        &["total_cost_difference"],
        &["annual_property_tax"],
    ];

    for path in priority_paths {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", format_value(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result_obj));
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}
