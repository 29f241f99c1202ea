use serde_json::Value;
use std::io::{self, Write};

use super::{flatten, format_scalar, result_of};

/// Write output as CSV to stdout. The longest list in the result (usually the
/// schedule) becomes the rows; results without one print as field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let _ = write_csv(stdout.lock(), value);
}

pub fn write_csv<W: Write>(writer: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let flat = flatten(result_of(value));

    match flat.tables.iter().max_by_key(|(_, rows)| rows.len()) {
        Some((_, rows)) => write_rows(&mut wtr, rows)?,
        None => {
            wtr.write_record(["field", "value"])?;
            for (key, val) in &flat.fields {
                wtr.write_record([key.as_str(), &format_scalar(val)])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> csv::Result<()> {
    let headers: Vec<&str> = match rows.first() {
        Some(Value::Object(first)) => first.keys().map(|k| k.as_str()).collect(),
        _ => return Ok(()),
    };
    wtr.write_record(&headers)?;
    for row in rows.iter().filter_map(Value::as_object) {
        let cells: Vec<String> = headers
            .iter()
            .map(|h| row.get(*h).map(format_scalar).unwrap_or_default())
            .collect();
        wtr.write_record(&cells)?;
    }
    Ok(())
}
