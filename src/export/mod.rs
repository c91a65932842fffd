//! Invoice data export
//!
//! JSON is a pretty-printed array of stored records. CSV takes its header
//! from the first record's fields in serialization order; nested values
//! (the line items) are written as JSON text inside a single quoted cell.

pub mod document;
pub mod handlers;

use crate::core::error::{ExportError, RequestError};
use crate::core::invoice::InvoiceRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            // pdf is rendered client-side from the document view
            _ => Err(RequestError::UnsupportedExportFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// `invoices_export_2025-03-01.csv`
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "invoices_export_{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn export(records: &[InvoiceRecord], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => export_json(records),
        ExportFormat::Csv => export_csv(records),
    }
}

pub fn export_json(records: &[InvoiceRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoInvoices);
    }
    Ok(serde_json::to_string_pretty(records)?)
}

pub fn export_csv(records: &[InvoiceRecord]) -> Result<String, ExportError> {
    let rows = records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<Value>, _>>()?;

    let Some(Value::Object(first)) = rows.first() else {
        return Err(ExportError::NoInvoices);
    };
    let header: Vec<String> = first.keys().cloned().collect();

    let mut out = String::new();
    push_row(&mut out, header.iter().map(|h| Cow::Borrowed(h.as_str())));
    for row in &rows {
        push_row(
            &mut out,
            header
                .iter()
                .map(|key| cell_text(row.get(key).unwrap_or(&Value::Null))),
        );
    }
    Ok(out)
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = Cow<'a, str>>) {
    let line = cells.map(|c| quote_cell(&c)).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

fn cell_text(value: &Value) -> Cow<'static, str> {
    match value {
        Value::Null => "".into(),
        Value::String(s) => s.clone().into(),
        Value::Bool(b) => b.to_string().into(),
        Value::Number(n) => n.to_string().into(),
        nested => nested.to_string().into(),
    }
}

fn quote_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
