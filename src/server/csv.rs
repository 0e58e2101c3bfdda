//! Hand-rolled CSV serialization for range downloads.
//!
//! The header row comes from the key set of the first record; all rows are
//! assumed to share its shape (rows are fixed-shape `Record` structs in
//! practice, and a missing key serializes as an empty cell). An empty result
//! set produces an entirely empty body with no header row - existing
//! download tooling depends on that asymmetry.

use serde_json::Value;

use crate::models::Record;

/// Serialize records to CSV. Empty input yields an empty string.
pub fn records_to_csv(rows: &[Record]) -> String {
    let values: Vec<Value> = rows
        .iter()
        .filter_map(|r| serde_json::to_value(r).ok())
        .collect();
    values_to_csv(&values)
}

/// CSV for a list of JSON objects; header keys come from the first row.
pub fn values_to_csv(rows: &[Value]) -> String {
    let Some(first) = rows.first().and_then(|v| v.as_object()) else {
        return String::new();
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        let obj = row.as_object();
        let line = headers
            .iter()
            .map(|h| match obj.and_then(|o| o.get(*h)) {
                Some(cell) => escape_csv_value(cell),
                None => String::new(),
            })
            .collect::<Vec<_>>()
            .join(",");
        lines.push(line);
    }
    lines.join("\n")
}

/// Quote a value if it contains a comma, quote, or newline; null is the
/// empty string.
fn escape_csv_value(value: &Value) -> String {
    let s = match value {
        Value::Null => return String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal CSV reader implementing the same quoting rules, for
    /// round-trip checks.
    fn parse_csv(input: &str) -> Vec<Vec<String>> {
        let mut rows = Vec::new();
        let mut row = Vec::new();
        let mut cell = String::new();
        let mut in_quotes = false;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        cell.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    cell.push(c);
                }
            } else {
                match c {
                    '"' => in_quotes = true,
                    ',' => row.push(std::mem::take(&mut cell)),
                    '\n' => {
                        row.push(std::mem::take(&mut cell));
                        rows.push(std::mem::take(&mut row));
                    }
                    _ => cell.push(c),
                }
            }
        }
        if !cell.is_empty() || !row.is_empty() {
            row.push(cell);
            rows.push(row);
        }
        rows
    }

    #[test]
    fn test_empty_set_yields_empty_body() {
        assert_eq!(values_to_csv(&[]), "");
        assert_eq!(records_to_csv(&[]), "");
    }

    #[test]
    fn test_null_serializes_as_empty_cell() {
        let rows = vec![json!({ "a": "x", "b": null })];
        assert_eq!(values_to_csv(&rows), "a,b\nx,");
    }

    #[test]
    fn test_quoting_rules() {
        let rows = vec![json!({
            "titulo": "uno, dos",
            "editor": "cita \"textual\"",
            "nota": "línea\npartida",
        })];
        let csv = values_to_csv(&rows);
        assert_eq!(
            csv,
            "titulo,editor,nota\n\"uno, dos\",\"cita \"\"textual\"\"\",\"línea\npartida\""
        );
    }

    #[test]
    fn test_round_trip_preserves_values() {
        let rows = vec![
            json!({ "id": 1, "titulo": "plano", "nota": "a,b" }),
            json!({ "id": 2, "titulo": "\"q\"", "nota": "x\ny" }),
        ];
        let parsed = parse_csv(&values_to_csv(&rows));
        assert_eq!(parsed[0], vec!["id", "titulo", "nota"]);
        assert_eq!(parsed[1], vec!["1", "plano", "a,b"]);
        assert_eq!(parsed[2], vec!["2", "\"q\"", "x\ny"]);
    }

    #[test]
    fn test_headers_follow_first_row_key_order() {
        let record = crate::models::Record {
            id: 7,
            fecha: Some("2024-01-01".to_string()),
            hora: None,
            titulo: Some("t".to_string()),
            editor: None,
            categoria: None,
            formato: None,
            version: None,
            yt: None,
            ig: None,
            tt: None,
            th: None,
            x: None,
            link: None,
        };
        let csv = records_to_csv(&[record]);
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "id,fecha,hora,titulo,editor,categoria,formato,version,yt,ig,tt,th,x,link"
        );
    }
}
