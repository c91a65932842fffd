//! Invoice quota accounting
//!
//! A user may hold at most `limit(plan)` invoices, except that the very first
//! invoice is always allowed even when the configured limit is zero.

use crate::core::plan::{Plan, PlanRegistry};
use serde::{Deserialize, Serialize};

/// At or below this many remaining invoices the user is warned
pub const LOW_QUOTA_THRESHOLD: i64 = 2;

/// `true` when one more invoice may be created
pub fn can_create_more(current_count: i64, limit: i64) -> bool {
    current_count == 0 || current_count < limit
}

/// How close a user is to their invoice quota
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaStatus {
    Blocked,
    Welcome,
    Warning,
    Normal,
}

impl QuotaStatus {
    /// First matching rule wins
    pub fn classify(invoice_count: i64, remaining: i64) -> Self {
        if remaining <= 0 && invoice_count > 0 {
            Self::Blocked
        } else if invoice_count == 0 {
            Self::Welcome
        } else if remaining <= LOW_QUOTA_THRESHOLD {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub fn blocks_creation(&self) -> bool {
        matches!(self, Self::Blocked)
    }

    /// The top tier is not exempt
    pub fn shows_upgrade_cta(&self) -> bool {
        matches!(self, Self::Blocked | Self::Warning)
    }
}

/// User-facing text for a quota status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaNotice {
    pub title: String,
    pub message: String,
    pub upgrade_cta: bool,
}

impl QuotaNotice {
    /// `None` when there is nothing worth telling the user
    pub fn new(plan: Plan, limit: i64, invoice_count: i64, remaining: i64) -> Option<Self> {
        let status = QuotaStatus::classify(invoice_count, remaining);
        let (title, message) = match status {
            QuotaStatus::Blocked => (
                "Invoice Limit Reached".to_string(),
                format!(
                    "You've reached your limit of {} invoices for your {} plan.",
                    limit, plan
                ),
            ),
            QuotaStatus::Welcome => (
                "Welcome to BillFlow!".to_string(),
                format!(
                    "You have {} invoices available on your {} plan. Get started by creating your first invoice.",
                    limit, plan
                ),
            ),
            QuotaStatus::Warning => (
                "Almost at Limit".to_string(),
                format!(
                    "You have {} invoice{} remaining on your {} plan.",
                    remaining,
                    if remaining == 1 { "" } else { "s" },
                    plan
                ),
            ),
            QuotaStatus::Normal => return None,
        };

        Some(Self {
            title,
            message,
            upgrade_cta: status.shows_upgrade_cta(),
        })
    }
}

/// Everything the UI needs to show quota state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaSnapshot {
    pub plan: Plan,
    pub limit: i64,
    pub monthly_price: u32,
    pub invoice_count: i64,
    pub remaining: i64,
    pub status: QuotaStatus,
}

impl QuotaSnapshot {
    pub fn new(plan: Plan, registry: &PlanRegistry, invoice_count: i64) -> Self {
        let terms = registry.terms(plan);
        let remaining = terms.invoice_limit - invoice_count;

        Self {
            plan,
            limit: terms.invoice_limit,
            monthly_price: terms.monthly_price,
            invoice_count,
            remaining,
            status: QuotaStatus::classify(invoice_count, remaining),
        }
    }

    pub fn can_create_more(&self) -> bool {
        can_create_more(self.invoice_count, self.limit)
    }

    pub fn notice(&self) -> Option<QuotaNotice> {
        QuotaNotice::new(self.plan, self.limit, self.invoice_count, self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::plan::PlanTerms;
    use std::collections::HashMap;

    #[test]
    fn test_classify_cases() {
        assert_eq!(QuotaStatus::classify(5, 0), QuotaStatus::Blocked);
        assert_eq!(QuotaStatus::classify(0, 5), QuotaStatus::Welcome);
        assert_eq!(QuotaStatus::classify(3, 2), QuotaStatus::Warning);
        assert_eq!(QuotaStatus::classify(1, 4), QuotaStatus::Normal);
        assert_eq!(QuotaStatus::classify(0, 0), QuotaStatus::Welcome);
        assert_eq!(QuotaStatus::classify(4, 1), QuotaStatus::Warning);
        assert_eq!(QuotaStatus::classify(3, 17), QuotaStatus::Normal);
    }

    #[test]
    fn test_published_plan_cases() {
        let registry = PlanRegistry::default();
        let cases = [
            (Plan::Free, 0, 5, QuotaStatus::Welcome),
            (Plan::Free, 5, 0, QuotaStatus::Blocked),
            (Plan::Free, 4, 1, QuotaStatus::Warning),
            (Plan::Pro, 3, 17, QuotaStatus::Normal),
            (Plan::Elite, 50, 0, QuotaStatus::Blocked),
        ];

        for (plan, count, remaining, status) in cases {
            let snapshot = QuotaSnapshot::new(plan, &registry, count);
            assert_eq!(snapshot.remaining, remaining, "{} with {}", plan, count);
            assert_eq!(snapshot.status, status, "{} with {}", plan, count);
        }
        assert!(QuotaSnapshot::new(Plan::Elite, &registry, 50)
            .status
            .shows_upgrade_cta());
    }

    #[test]
    fn test_over_limit_is_blocked() {
        assert_eq!(QuotaStatus::classify(7, -2), QuotaStatus::Blocked);
        assert!(QuotaStatus::Blocked.blocks_creation());
        assert!(!QuotaStatus::Warning.blocks_creation());
    }

    #[test]
    fn test_first_invoice_exception() {
        assert!(can_create_more(0, 0));
        assert!(!can_create_more(1, 0));
        assert!(can_create_more(4, 5));
        assert!(!can_create_more(5, 5));
    }

    #[test]
    fn test_zero_limit_registry_still_allows_first_invoice() {
        let mut table = HashMap::new();
        table.insert(Plan::Free, PlanTerms::new(0, 0));
        let registry = PlanRegistry::new(table);

        let snapshot = QuotaSnapshot::new(Plan::Free, &registry, 0);
        assert!(snapshot.can_create_more());
        assert_eq!(snapshot.status, QuotaStatus::Welcome);

        let snapshot = QuotaSnapshot::new(Plan::Free, &registry, 1);
        assert!(!snapshot.can_create_more());
        assert_eq!(snapshot.status, QuotaStatus::Blocked);
    }

    #[test]
    fn test_notice_messages() {
        let blocked = QuotaNotice::new(Plan::Free, 5, 5, 0).unwrap();
        assert_eq!(blocked.title, "Invoice Limit Reached");
        assert_eq!(
            blocked.message,
            "You've reached your limit of 5 invoices for your free plan."
        );
        assert!(blocked.upgrade_cta);

        let warning = QuotaNotice::new(Plan::Pro, 20, 19, 1).unwrap();
        assert_eq!(warning.message, "You have 1 invoice remaining on your pro plan.");

        let welcome = QuotaNotice::new(Plan::Elite, 50, 0, 50).unwrap();
        assert!(welcome.message.starts_with("You have 50 invoices available"));
        assert!(!welcome.upgrade_cta);

        assert!(QuotaNotice::new(Plan::Pro, 20, 3, 17).is_none());
    }

    #[test]
    fn test_elite_at_limit_still_offered_upgrade() {
        let snapshot = QuotaSnapshot::new(Plan::Elite, &PlanRegistry::default(), 50);
        assert_eq!(snapshot.status, QuotaStatus::Blocked);
        assert!(snapshot.notice().unwrap().upgrade_cta);
    }
}
