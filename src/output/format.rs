//! Rendering of result sets as table, CSV or JSON text

use clap::ValueEnum;
use serde_json::Value;

use crate::api::query::{Record, ResultSet};

/// Text printed in place of any rendering when no rows came back
pub const NO_RESULTS: &str = "No results found.";

/// Widest a table column may get
pub const MAX_COLUMN_WIDTH: usize = 40;

/// Rows sampled when sizing table columns
pub const WIDTH_SAMPLE_ROWS: usize = 50;

/// Columns shown when a dataset has no defaults
pub const FALLBACK_COLUMN_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
    /// Comma-separated values with a header row
    Csv,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Render `result` in `format`. `default_columns` only affects tables.
pub fn render(result: &ResultSet, format: OutputFormat, default_columns: &[&str]) -> String {
    if result.is_empty() {
        return NO_RESULTS.to_string();
    }

    match format {
        OutputFormat::Table => format_table(result.records(), default_columns),
        OutputFormat::Csv => format_csv(result.records()),
        OutputFormat::Json => format_json(result),
    }
}

pub fn format_json(result: &ResultSet) -> String {
    // Maps with string keys always serialize
    serde_json::to_string_pretty(result).unwrap_or_else(|_| "[]".to_string())
}

/// Table columns: the defaults present on the first record, otherwise the
/// first few keys of the first record
pub fn table_columns<'a>(first: &'a Record, default_columns: &[&'a str]) -> Vec<&'a str> {
    let present: Vec<&str> = default_columns
        .iter()
        .copied()
        .filter(|column| first.contains_key(*column))
        .collect();

    if !present.is_empty() {
        return present;
    }

    first
        .keys()
        .take(FALLBACK_COLUMN_COUNT)
        .map(String::as_str)
        .collect()
}

/// Width of each column: the longest of the header and the sampled cells
/// (each capped first), never above [`MAX_COLUMN_WIDTH`]
pub fn column_widths(records: &[Record], columns: &[&str]) -> Vec<usize> {
    columns
        .iter()
        .map(|column| {
            let widest_cell = records
                .iter()
                .take(WIDTH_SAMPLE_ROWS)
                .map(|record| char_len(&cell_text(record, column)).min(MAX_COLUMN_WIDTH))
                .max()
                .unwrap_or(0);
            char_len(column).max(widest_cell).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}

pub fn format_table(records: &[Record], default_columns: &[&str]) -> String {
    let Some(first) = records.first() else {
        return NO_RESULTS.to_string();
    };

    let columns = table_columns(first, default_columns);
    let widths = column_widths(records, &columns);

    let mut lines = Vec::with_capacity(records.len() + 2);

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| fit(column, *width))
        .collect();
    lines.push(header.join(" | "));

    let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    lines.push(separator.join("-+-"));

    for record in records {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(column, width)| fit(&cell_text(record, column), *width))
            .collect();
        lines.push(cells.join(" | "));
    }

    lines.join("\n")
}

pub fn format_csv(records: &[Record]) -> String {
    let Some(first) = records.first() else {
        return String::new();
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| csv_escape(header))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        let row: Vec<String> = headers
            .iter()
            .map(|header| csv_escape(&cell_text(record, header)))
            .collect();
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Quote a CSV field iff it contains a comma, quote or newline
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Text for one cell; missing fields and nulls are blank
pub fn cell_text(record: &Record, column: &str) -> String {
    record.get(column).map(value_to_string).unwrap_or_default()
}

/// Convert a JSON value to its display form
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Truncate to `width` characters, then left-align within `width`
fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    format!("{:<width$}", truncated, width = width)
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: Value) -> Vec<Record> {
        ResultSet::from_json(value).unwrap().into_records()
    }

    #[test]
    fn test_empty_result_in_every_format() {
        let empty = ResultSet::default();
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
            assert_eq!(render(&empty, format, &[]), NO_RESULTS);
        }
    }

    #[test]
    fn test_table_layout() {
        let rows = records(json!([
            {"vendor": "ACME", "amount": "10.00"},
            {"vendor": "GLOBEX CORPORATION", "amount": "7"}
        ]));

        let table = format_table(&rows, &["vendor", "amount"]);
        let expected = [
            "vendor             | amount",
            "-------------------+-------",
            "ACME               | 10.00 ",
            "GLOBEX CORPORATION | 7     ",
        ]
        .join("\n");
        assert_eq!(table, expected);
    }

    #[test]
    fn test_table_default_columns_filtered_and_ordered() {
        let rows = records(json!([{"a": "1", "b": "2", "c": "3"}]));
        let table = format_table(&rows, &["c", "missing", "a"]);
        assert_eq!(table.lines().next().unwrap(), "c | a");
    }

    #[test]
    fn test_table_falls_back_to_first_eight_keys() {
        let row: serde_json::Map<String, Value> = (0..10)
            .map(|i| (format!("k{}", i), json!("v")))
            .collect();
        let columns = table_columns(&row, &[]);
        assert_eq!(columns, vec!["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7"]);

        // No default column present behaves like no defaults
        let columns = table_columns(&row, &["vendor"]);
        assert_eq!(columns.len(), FALLBACK_COLUMN_COUNT);
    }

    #[test]
    fn test_table_truncates_long_values() {
        let long = "x".repeat(100);
        let rows = records(json!([{"description": long}]));

        let table = format_table(&rows, &[]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "x".repeat(MAX_COLUMN_WIDTH));
        assert_eq!(lines[1], "-".repeat(MAX_COLUMN_WIDTH));
    }

    #[test]
    fn test_width_ignores_rows_past_sample() {
        let mut rows: Vec<Value> = (0..WIDTH_SAMPLE_ROWS).map(|_| json!({"v": "ab"})).collect();
        rows.push(json!({"v": "abcdefgh"}));
        let rows = records(Value::Array(rows));

        assert_eq!(column_widths(&rows, &["v"]), vec![2]);

        let table = format_table(&rows, &[]);
        // Late row is still rendered, cut to the sampled width
        assert_eq!(table.lines().last().unwrap(), "ab");
        assert_eq!(table.lines().count(), WIDTH_SAMPLE_ROWS + 3);
    }

    #[test]
    fn test_long_header_is_capped() {
        let header = "h".repeat(45);
        let mut row = Record::new();
        row.insert(header, json!("1"));
        let rows = vec![row];
        let table = format_table(&rows, &[]);
        assert_eq!(table.lines().next().unwrap(), "h".repeat(MAX_COLUMN_WIDTH));
    }

    #[test]
    fn test_missing_and_null_cells_are_blank() {
        let rows = records(json!([
            {"a": "1", "b": null},
            {"a": "2"}
        ]));
        let table = format_table(&rows, &[]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[2], "1 |  ");
        assert_eq!(lines[3], "2 |  ");
    }

    #[test]
    fn test_csv_uses_all_fields() {
        let rows = records(json!([
            {"vendor": "ACME, INC", "amount": 10, "note": "say \"hi\""},
            {"vendor": "GLOBEX", "amount": 2.5}
        ]));

        let csv = format_csv(&rows);
        let expected = [
            "vendor,amount,note",
            "\"ACME, INC\",10,\"say \"\"hi\"\"\"",
            "GLOBEX,2.5,",
        ]
        .join("\n");
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(csv_escape("5\" pipe"), "\"5\"\" pipe\"");
    }

    #[test]
    fn test_json_is_pretty_array() {
        let result = ResultSet::from_json(json!([{"a": "1"}])).unwrap();
        assert_eq!(
            render(&result, OutputFormat::Json, &[]),
            "[\n  {\n    \"a\": \"1\"\n  }\n]"
        );
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!(null)), "");
        assert_eq!(value_to_string(&json!(true)), "true");
        assert_eq!(value_to_string(&json!(12.5)), "12.5");
        assert_eq!(value_to_string(&json!("text")), "text");
        assert_eq!(value_to_string(&json!({"k": 1})), "{\"k\":1}");
    }
}
