//! Per-user subscription row

use crate::core::plan::Plan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One row per user, created on the first plan change and never deleted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub user_id: Uuid,
    /// Unknown or missing plan text reads as `free`
    #[serde(default, deserialize_with = "plan_or_free")]
    pub plan: Plan,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(user_id: Uuid, plan: Plan) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            plan,
            created_at: now,
            updated_at: now,
        }
    }
}

fn plan_or_free<'de, D>(deserializer: D) -> Result<Plan, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<String>::deserialize(deserializer)?;
    Ok(Plan::from_str_or_free(stored.as_deref()))
}
