use serde_json::{Map, Value};
use std::io;

use super::{format_field, format_value};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
///
/// A schedule is written one row per payment; any other result is written
/// as `field,value` pairs with nested sections flattened to `section.field`.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.as_object().and_then(|m| m.get("result"));
    match result {
        Some(Value::Object(result)) => match result.get("schedule") {
            Some(Value::Array(rows)) if !rows.is_empty() => write_rows(&mut wtr, rows),
            _ => write_fields(&mut wtr, result),
        },
        _ => match value {
            Value::Object(map) => write_fields(&mut wtr, map),
            Value::Array(rows) => write_rows(&mut wtr, rows),
            other => {
                let _ = wtr.write_record([format_value(other)]);
            }
        },
    }

    let _ = wtr.flush();
}

fn write_fields(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        match val {
            Value::Object(section) => {
                for (inner, v) in section {
                    let _ = wtr.write_record([format!("{key}.{inner}"), format_field(inner, v)]);
                }
            }
            Value::Array(arr) if arr.iter().any(Value::is_object) => {}
            _ => {
                let _ = wtr.write_record([key.as_str(), &format_field(key, val)]);
            }
        }
    }
}

fn write_rows(wtr: &mut StdoutWriter<'_>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for map in rows.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(|v| format_field(h, v)).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
