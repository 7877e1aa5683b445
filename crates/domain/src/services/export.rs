//! CSV rendering for report exports.

use serde_json::Value;

/// Renders report rows as CSV.
///
/// `columns` determines both the header row and the cell order; rows are
/// the visibility-filtered JSON objects produced by the report service, so
/// hidden fields simply render as empty cells if a caller passes them.
pub fn render_csv(columns: &[String], rows: &[Value]) -> String {
    let mut out = String::new();

    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(column));
    }
    out.push('\n');

    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&escape_field(&cell_text(row.get(column.as_str()))));
        }
        out.push('\n');
    }

    out
}

/// Flattens a JSON value into CSV cell text.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Quotes a field when it contains a comma, quote, or newline.
fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_render_csv_basic() {
        let rows = vec![
            json!({"username": "jdoe", "status": "completed"}),
            json!({"username": "asmith", "status": "in_progress"}),
        ];
        let csv = render_csv(&columns(&["username", "status"]), &rows);
        assert_eq!(
            csv,
            "username,status\njdoe,completed\nasmith,in_progress\n"
        );
    }

    #[test]
    fn test_render_csv_escapes_commas_and_quotes() {
        let rows = vec![json!({"course": r#"Intro, "Advanced""#})];
        let csv = render_csv(&columns(&["course"]), &rows);
        assert_eq!(csv, "course\n\"Intro, \"\"Advanced\"\"\"\n");
    }

    #[test]
    fn test_render_csv_escapes_newlines() {
        let rows = vec![json!({"note": "line one\nline two"})];
        let csv = render_csv(&columns(&["note"]), &rows);
        assert!(csv.contains("\"line one\nline two\""));
    }

    #[test]
    fn test_render_csv_missing_and_null_cells() {
        let rows = vec![json!({"a": 1, "b": null})];
        let csv = render_csv(&columns(&["a", "b", "c"]), &rows);
        assert_eq!(csv, "a,b,c\n1,,\n");
    }

    #[test]
    fn test_render_csv_numbers_and_bools() {
        let rows = vec![json!({"grade": 87.5, "deleted": false})];
        let csv = render_csv(&columns(&["grade", "deleted"]), &rows);
        assert_eq!(csv, "grade,deleted\n87.5,false\n");
    }

    #[test]
    fn test_render_csv_empty_rows() {
        let csv = render_csv(&columns(&["a"]), &[]);
        assert_eq!(csv, "a\n");
    }
}
