//! Dashboard figures
//!
//! An invoice counts as paid once its due date has passed. Everything still
//! due today or later is outstanding.

use crate::core::invoice::InvoiceRecord;
use crate::core::plan::Plan;
use crate::core::quota::{QuotaSnapshot, QuotaStatus};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_invoices: i64,
    pub paid_invoices: i64,
    pub outstanding_amount: f64,
    pub remaining_invoices: i64,
    pub current_plan: Plan,
    pub invoice_limit: i64,
    pub quota_status: QuotaStatus,
}

impl DashboardStats {
    pub fn compute(records: &[InvoiceRecord], snapshot: &QuotaSnapshot, today: NaiveDate) -> Self {
        let paid = records.iter().filter(|r| r.due_date < today).count() as i64;
        let outstanding = records
            .iter()
            .filter(|r| r.due_date >= today)
            .map(|r| r.total_amount)
            .sum();

        Self {
            total_invoices: records.len() as i64,
            paid_invoices: paid,
            outstanding_amount: outstanding,
            remaining_invoices: snapshot.remaining,
            current_plan: snapshot.plan,
            invoice_limit: snapshot.limit,
            quota_status: snapshot.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invoice::{LineItem, Party};
    use crate::core::mapper::InvoiceDraft;
    use crate::core::plan::PlanRegistry;
    use chrono::Utc;
    use uuid::Uuid;

    fn due(date: NaiveDate, amount: f64) -> InvoiceRecord {
        InvoiceDraft {
            invoice_number: "INV-0001".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            due_date: date,
            company: Party {
                name: "Acme".to_string(),
                ..Party::default()
            },
            client: Party {
                name: "Globex".to_string(),
                ..Party::default()
            },
            line_items: vec![LineItem::new("Work", 1.0, amount)],
            tax_rate: 0.0,
            discount_rate: None,
            notes: String::new(),
            terms: String::new(),
        }
        .into_record(Uuid::new_v4(), Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn test_paid_and_outstanding_split_on_due_date() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let records = vec![
            due(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), 100.0),
            due(today, 250.0),
            due(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(), 50.0),
        ];
        let snapshot = QuotaSnapshot::new(Plan::Free, &PlanRegistry::default(), 3);

        let stats = DashboardStats::compute(&records, &snapshot, today);
        assert_eq!(stats.total_invoices, 3);
        assert_eq!(stats.paid_invoices, 1);
        assert_eq!(stats.outstanding_amount, 300.0);
        assert_eq!(stats.remaining_invoices, 2);
        assert_eq!(stats.quota_status, QuotaStatus::Warning);
    }

    #[test]
    fn test_new_user_sees_full_limit() {
        let snapshot = QuotaSnapshot::new(Plan::Pro, &PlanRegistry::default(), 0);
        let stats = DashboardStats::compute(&[], &snapshot, Utc::now().date_naive());
        assert_eq!(stats.total_invoices, 0);
        assert_eq!(stats.outstanding_amount, 0.0);
        assert_eq!(stats.remaining_invoices, 20);
        assert_eq!(stats.current_plan, Plan::Pro);
    }
}
