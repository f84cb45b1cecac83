//! Rendering of command results for the terminal.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use warden_core::error::AppError;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
}

impl OutputFormat {
    /// Renders `rows`, or `empty` when a table would have no rows.
    pub fn render<T: Serialize + Tabled>(self, rows: &[T], empty: &str) -> Result<String, AppError> {
        match self {
            Self::Json => Ok(serde_json::to_string_pretty(rows)?),
            Self::Table if rows.is_empty() => Ok(empty.to_string()),
            Self::Table => Ok(Table::new(rows).with(Style::sharp()).to_string()),
        }
    }
}

/// Writes `rows` to stdout in `format`.
pub fn rows<T: Serialize + Tabled>(
    rows: &[T],
    format: OutputFormat,
    empty: &str,
) -> Result<(), AppError> {
    println!("{}", format.render(rows, empty)?);
    Ok(())
}

/// Outcome of a command that changed something.
pub fn done(msg: &str) {
    println!("done: {msg}");
}

/// Something the operator should know that is not a failure.
pub fn note(msg: &str) {
    eprintln!("note: {msg}");
}

/// A failed command.
pub fn failed(msg: &str) {
    eprintln!("error: {msg}");
}

/// Indented `label value` line under an outcome.
pub fn detail(label: &str, value: impl fmt::Display) {
    println!("    {label:<12} {value}");
}

/// Table cell for an optional timestamp; `-` when unset.
pub fn timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Serialize, Tabled)]
    struct Row {
        name: &'static str,
        id: i64,
    }

    #[test]
    fn test_empty_table_renders_message() {
        let rows: [Row; 0] = [];
        assert_eq!(OutputFormat::Table.render(&rows, "No roles.").unwrap(), "No roles.");
        assert_eq!(OutputFormat::Json.render(&rows, "No roles.").unwrap(), "[]");
    }

    #[test]
    fn test_table_has_header_and_cells() {
        let rows = [Row { name: "editor", id: 7 }];
        let table = OutputFormat::Table.render(&rows, "").unwrap();
        assert!(table.contains("name"));
        assert!(table.contains("editor"));

        let json: serde_json::Value =
            serde_json::from_str(&OutputFormat::Json.render(&rows, "").unwrap()).unwrap();
        assert_eq!(json[0]["id"], 7);
    }

    #[test]
    fn test_timestamp_cell() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap();
        assert_eq!(timestamp(Some(at)), "2024-03-01 08:30");
        assert_eq!(timestamp(None), "-");
    }
}
