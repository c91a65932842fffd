//! Subscription plans, their quotas and the capabilities they unlock
//!
//! The plan table is a value, not a global: build a [`PlanRegistry`] once
//! (from defaults or from configuration) and hand it to whoever needs it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Subscription tiers
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
    Elite,
}

impl Plan {
    /// All plans, cheapest first
    pub const ALL: [Plan; 3] = [Plan::Free, Plan::Pro, Plan::Elite];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Elite => "elite",
        }
    }

    /// Parse a stored plan value, treating anything unknown as `free`
    pub fn from_str_or_free(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// Whether this plan grants `capability`
    pub fn allows(&self, capability: Capability) -> bool {
        plan_allows(*self, capability)
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Plan {
    type Err = PlanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "pro" => Ok(Self::Pro),
            "elite" => Ok(Self::Elite),
            _ => Err(PlanParseError(s.to_string())),
        }
    }
}

/// Error parsing a plan string
#[derive(Debug, Clone, Error)]
#[error("invalid plan: {0}")]
pub struct PlanParseError(pub String);

/// Things a plan may or may not let a user do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    CreateInvoices,
    EditInvoices,
    DeleteInvoices,
    ExportData,
}

impl Capability {
    pub const ALL: [Capability; 4] = [
        Capability::CreateInvoices,
        Capability::EditInvoices,
        Capability::DeleteInvoices,
        Capability::ExportData,
    ];

    /// Cheapest plan that grants this capability
    pub const fn min_plan(&self) -> Plan {
        match self {
            Self::CreateInvoices | Self::DeleteInvoices | Self::ExportData => Plan::Free,
            Self::EditInvoices => Plan::Pro,
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::CreateInvoices => "invoice creation",
            Self::EditInvoices => "invoice editing",
            Self::DeleteInvoices => "invoice deletion",
            Self::ExportData => "data export",
        };
        f.write_str(label)
    }
}

/// Single entitlement check used by every handler
pub fn plan_allows(plan: Plan, capability: Capability) -> bool {
    plan >= capability.min_plan()
}

/// Quota and price attached to a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanTerms {
    /// Maximum number of invoices a user may hold
    pub invoice_limit: i64,
    /// Monthly price in whole dollars
    pub monthly_price: u32,
}

impl PlanTerms {
    pub const fn new(invoice_limit: i64, monthly_price: u32) -> Self {
        Self {
            invoice_limit,
            monthly_price,
        }
    }

    /// Built-in terms for a plan
    pub const fn builtin(plan: Plan) -> Self {
        match plan {
            Plan::Free => Self::new(5, 0),
            Plan::Pro => Self::new(20, 19),
            Plan::Elite => Self::new(50, 50),
        }
    }
}

/// Lookup table from plan to terms
///
/// Cheap to clone. Lookups never fail: a plan missing from a custom table
/// gets the table's `free` terms, and failing that the built-in `free` terms.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRegistry {
    terms: Arc<HashMap<Plan, PlanTerms>>,
}

impl PlanRegistry {
    /// Build a registry from an explicit table
    pub fn new(terms: HashMap<Plan, PlanTerms>) -> Self {
        Self {
            terms: Arc::new(terms),
        }
    }

    pub fn terms(&self, plan: Plan) -> PlanTerms {
        self.terms
            .get(&plan)
            .or_else(|| self.terms.get(&Plan::Free))
            .copied()
            .unwrap_or_else(|| PlanTerms::builtin(Plan::Free))
    }

    pub fn limit(&self, plan: Plan) -> i64 {
        self.terms(plan).invoice_limit
    }

    pub fn price(&self, plan: Plan) -> u32 {
        self.terms(plan).monthly_price
    }

    /// Every plan with its effective terms, cheapest first
    pub fn entries(&self) -> Vec<(Plan, PlanTerms)> {
        Plan::ALL.iter().map(|p| (*p, self.terms(*p))).collect()
    }
}

impl Default for PlanRegistry {
    fn default() -> Self {
        Self::new(
            Plan::ALL
                .iter()
                .map(|p| (*p, PlanTerms::builtin(*p)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_matches_published_pricing() {
        let registry = PlanRegistry::default();
        assert_eq!(registry.limit(Plan::Free), 5);
        assert_eq!(registry.limit(Plan::Pro), 20);
        assert_eq!(registry.limit(Plan::Elite), 50);
        assert_eq!(registry.price(Plan::Free), 0);
        assert_eq!(registry.price(Plan::Pro), 19);
        assert_eq!(registry.price(Plan::Elite), 50);
    }

    #[test]
    fn test_unknown_plan_strings_fall_back_to_free() {
        assert_eq!(Plan::from_str_or_free(Some("platinum")), Plan::Free);
        assert_eq!(Plan::from_str_or_free(Some("")), Plan::Free);
        assert_eq!(Plan::from_str_or_free(None), Plan::Free);
        assert_eq!(Plan::from_str_or_free(Some(" Pro ")), Plan::Pro);
        assert!("gold".parse::<Plan>().is_err());
    }

    #[test]
    fn test_missing_plan_in_custom_table_uses_free_terms() {
        let mut table = HashMap::new();
        table.insert(Plan::Free, PlanTerms::new(1, 0));
        let registry = PlanRegistry::new(table);

        assert_eq!(registry.limit(Plan::Elite), 1);
        assert_eq!(PlanRegistry::new(HashMap::new()).limit(Plan::Pro), 5);
    }

    #[test]
    fn test_edit_requires_paid_plan() {
        assert!(!plan_allows(Plan::Free, Capability::EditInvoices));
        assert!(plan_allows(Plan::Pro, Capability::EditInvoices));
        assert!(plan_allows(Plan::Elite, Capability::EditInvoices));
    }

    #[test]
    fn test_basic_capabilities_open_to_every_plan() {
        for plan in Plan::ALL {
            assert!(plan.allows(Capability::CreateInvoices));
            assert!(plan.allows(Capability::DeleteInvoices));
            assert!(plan.allows(Capability::ExportData));
        }
    }

    #[test]
    fn test_plan_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Plan::Elite).unwrap(), "\"elite\"");
        let plan: Plan = serde_json::from_str("\"pro\"").unwrap();
        assert_eq!(plan, Plan::Pro);
    }
}
