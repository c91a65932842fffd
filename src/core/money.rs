//! Invoice arithmetic
//!
//! Plain `f64` currency math, rounded only when formatted for display.
//! Negative quantities, prices and rates are passed through untouched.

use crate::core::invoice::LineItem;
use serde::{Deserialize, Serialize};

/// `quantity × unit_price`
pub fn line_total(item: &LineItem) -> f64 {
    item.quantity * item.unit_price
}

/// Sum of all line totals
pub fn subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(line_total).sum()
}

/// `subtotal × rate / 100`
pub fn tax(subtotal: f64, tax_rate_percent: f64) -> f64 {
    subtotal * tax_rate_percent / 100.0
}

/// `subtotal × rate / 100`
pub fn discount(subtotal: f64, discount_rate_percent: f64) -> f64 {
    subtotal * discount_rate_percent / 100.0
}

/// `subtotal + tax − discount`
pub fn total(subtotal: f64, tax: f64, discount: f64) -> f64 {
    subtotal + tax - discount
}

/// The computed money fields of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: f64,
    pub tax_amount: f64,
    /// Only present when a discount rate was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<f64>,
    pub total_amount: f64,
}

impl InvoiceTotals {
    pub fn compute(items: &[LineItem], tax_rate: f64, discount_rate: Option<f64>) -> Self {
        let subtotal = subtotal(items);
        let tax_amount = tax(subtotal, tax_rate);
        let discount_amount = discount_rate.map(|rate| discount(subtotal, rate));
        let total_amount = total(subtotal, tax_amount, discount_amount.unwrap_or(0.0));

        Self {
            subtotal,
            tax_amount,
            discount_amount,
            total_amount,
        }
    }
}

/// Render an amount as dollars with exactly two decimals (`$1234.50`)
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}
