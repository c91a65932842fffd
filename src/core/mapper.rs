//! Conversion between the invoice form state and the persisted record

use crate::core::invoice::{InvoiceRecord, LineItem, Party};
use crate::core::money::InvoiceTotals;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Invoice form state as the client edits it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    #[validate(length(min = 1, message = "Invoice number is required"))]
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    #[validate(nested)]
    pub company: Party,
    #[validate(nested)]
    pub client: Party,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_rate: Option<f64>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub terms: String,
}

impl InvoiceDraft {
    /// Totals as they would be stored for this draft
    pub fn totals(&self) -> InvoiceTotals {
        InvoiceTotals::compute(&self.line_items, self.tax_rate, self.discount_rate)
    }

    /// Build the persisted record, computing every money field
    pub fn into_record(self, owner: Uuid, id: Uuid, created_at: DateTime<Utc>) -> InvoiceRecord {
        let totals = self.totals();

        InvoiceRecord {
            id,
            user_id: owner,
            invoice_number: self.invoice_number,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            company_name: self.company.name,
            company_address: non_empty(self.company.address),
            company_email: non_empty(self.company.email),
            company_phone: non_empty(self.company.phone),
            client_name: self.client.name,
            client_address: non_empty(self.client.address),
            client_email: non_empty(self.client.email),
            client_phone: non_empty(self.client.phone),
            items: self.line_items,
            subtotal: totals.subtotal,
            tax_rate: self.tax_rate,
            tax_amount: totals.tax_amount,
            discount_rate: self.discount_rate,
            discount_amount: totals.discount_amount,
            total_amount: totals.total_amount,
            notes: non_empty(self.notes),
            terms: non_empty(self.terms),
            created_at,
        }
    }
}

impl InvoiceRecord {
    /// Rebuild the form state; line item ids and order are kept as stored
    pub fn to_draft(&self) -> InvoiceDraft {
        InvoiceDraft {
            invoice_number: self.invoice_number.clone(),
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            company: self.company(),
            client: self.client(),
            line_items: self.items.clone(),
            tax_rate: self.tax_rate,
            discount_rate: self.discount_rate,
            notes: self.notes.clone().unwrap_or_default(),
            terms: self.terms.clone().unwrap_or_default(),
        }
    }
}

/// Decode an items column value, native or stringified
pub fn decode_items(value: serde_json::Value) -> Result<Vec<LineItem>, serde_json::Error> {
    match value {
        serde_json::Value::Null => Ok(Vec::new()),
        serde_json::Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
        serde_json::Value::String(text) => serde_json::from_str(&text),
        other => serde_json::from_value(other),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
