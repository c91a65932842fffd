//! Printable invoice document
//!
//! Totals are recomputed from the line items; the stored money fields are
//! never read. Turning the text into PDF bytes is left to an external
//! renderer.

use crate::core::invoice::{InvoiceRecord, LineItem, Party};
use crate::core::money::{self, InvoiceTotals, format_currency};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

const RULE_WIDTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLine {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub amount: f64,
}

impl From<&LineItem> for DocumentLine {
    fn from(item: &LineItem) -> Self {
        Self {
            description: item.description.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            amount: money::line_total(item),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDocument {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub from: Party,
    pub bill_to: Party,
    pub lines: Vec<DocumentLine>,
    pub tax_rate: f64,
    pub discount_rate: Option<f64>,
    pub totals: InvoiceTotals,
    pub notes: Option<String>,
    pub terms: Option<String>,
}

impl InvoiceDocument {
    pub fn from_record(record: &InvoiceRecord) -> Self {
        Self {
            invoice_number: record.invoice_number.clone(),
            invoice_date: record.invoice_date,
            due_date: record.due_date,
            from: record.company(),
            bill_to: record.client(),
            lines: record.items.iter().map(DocumentLine::from).collect(),
            tax_rate: record.tax_rate,
            discount_rate: record.discount_rate,
            totals: InvoiceTotals::compute(&record.items, record.tax_rate, record.discount_rate),
            notes: record.notes.clone(),
            terms: record.terms.clone(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // writing to a String cannot fail
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);

        writeln!(out, "INVOICE {}", self.invoice_number)?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out)?;

        write_party(out, "From", &self.from)?;
        writeln!(out)?;
        write_party(out, "Bill To", &self.bill_to)?;
        writeln!(out)?;

        writeln!(out, "Invoice Date: {}", self.invoice_date.format("%Y-%m-%d"))?;
        writeln!(out, "Due Date:     {}", self.due_date.format("%Y-%m-%d"))?;
        writeln!(out)?;

        writeln!(
            out,
            "{:<30} {:>8} {:>11} {:>11}",
            "Description", "Qty", "Rate", "Amount"
        )?;
        writeln!(out, "{}", rule)?;
        for line in &self.lines {
            writeln!(
                out,
                "{:<30} {:>8} {:>11} {:>11}",
                line.description,
                line.quantity,
                format_currency(line.unit_price),
                format_currency(line.amount)
            )?;
        }
        writeln!(out, "{}", rule)?;

        writeln!(out, "{:>50} {:>13}", "Subtotal:", format_currency(self.totals.subtotal))?;
        writeln!(
            out,
            "{:>50} {:>13}",
            format!("Tax ({}%):", self.tax_rate),
            format_currency(self.totals.tax_amount)
        )?;
        if let (Some(rate), Some(amount)) = (self.discount_rate, self.totals.discount_amount) {
            writeln!(
                out,
                "{:>50} {:>13}",
                format!("Discount ({}%):", rate),
                format!("-{}", format_currency(amount))
            )?;
        }
        writeln!(out, "{:>50} {:>13}", "Total:", format_currency(self.totals.total_amount))?;

        if let Some(notes) = &self.notes {
            writeln!(out)?;
            writeln!(out, "Notes:")?;
            writeln!(out, "{}", notes)?;
        }
        if let Some(terms) = &self.terms {
            writeln!(out)?;
            writeln!(out, "Terms:")?;
            writeln!(out, "{}", terms)?;
        }
        Ok(())
    }
}

fn write_party(out: &mut String, heading: &str, party: &Party) -> std::fmt::Result {
    writeln!(out, "{}:", heading)?;
    writeln!(out, "  {}", party.name)?;
    for field in [&party.address, &party.email, &party.phone] {
        if !field.is_empty() {
            writeln!(out, "  {}", field)?;
        }
    }
    Ok(())
}
