//! Client directory built from invoice history

use crate::core::invoice::InvoiceRecord;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientSummary {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub invoice_count: usize,
}

/// One entry per distinct client name, in the order the names first appear
///
/// Contact details come from the first invoice seen for that name.
pub fn client_directory(records: &[InvoiceRecord]) -> Vec<ClientSummary> {
    let mut clients: IndexMap<&str, ClientSummary> = IndexMap::new();

    for record in records {
        clients
            .entry(record.client_name.as_str())
            .and_modify(|c| c.invoice_count += 1)
            .or_insert_with(|| ClientSummary {
                name: record.client_name.clone(),
                email: record.client_email.clone(),
                address: record.client_address.clone(),
                phone: record.client_phone.clone(),
                invoice_count: 1,
            });
    }

    clients.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice::Party;
    use crate::core::mapper::InvoiceDraft;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn for_client(name: &str, email: &str) -> InvoiceRecord {
        InvoiceDraft {
            invoice_number: "INV-0001".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            company: Party {
                name: "Acme".to_string(),
                ..Party::default()
            },
            client: Party {
                name: name.to_string(),
                email: email.to_string(),
                ..Party::default()
            },
            line_items: Vec::new(),
            tax_rate: 0.0,
            discount_rate: None,
            notes: String::new(),
            terms: String::new(),
        }
        .into_record(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn test_groups_by_name_in_first_seen_order() {
        let records = vec![
            for_client("Globex", "first@globex.test"),
            for_client("Initech", ""),
            for_client("Globex", "second@globex.test"),
        ];

        let clients = client_directory(&records);
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].name, "Globex");
        assert_eq!(clients[0].invoice_count, 2);
        assert_eq!(clients[0].email.as_deref(), Some("first@globex.test"));
        assert_eq!(clients[1].name, "Initech");
        assert_eq!(clients[1].email, None);
    }

    #[test]
    fn test_empty_history() {
        assert!(client_directory(&[]).is_empty());
    }
}
