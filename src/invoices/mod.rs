//! Invoice endpoints

pub mod handlers;

pub use handlers::{
    InvoiceView, create_invoice, delete_invoice, get_invoice, invoice_document, list_invoices,
    new_invoice_number, update_invoice,
};
