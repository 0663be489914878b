use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::plans::plans_model::RenewalFrequency;

/// Immutable snapshot of a plan taken when it is deleted or a member leaves
/// voluntarily. `original_plan_id` may dangle — the plan it points to is
/// usually gone by the time this row is read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanceledPlan {
    pub id: String,
    pub name: String,
    pub cost: Decimal,
    pub renewal_frequency: RenewalFrequency,
    pub user_id: String,
    /// Accepted-member count at the time of cancellation, excluding the
    /// owner (and, for a voluntary leave, excluding the leaver).
    pub member_count: i32,
    pub was_owner: bool,
    pub original_plan_id: String,
    pub canceled_at: NaiveDateTime,
}

/// Input model for archiving a snapshot. Written only from within the
/// storage layer's lifecycle transactions, which recount `member_count`
/// before inserting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCanceledPlan {
    pub name: String,
    pub cost: Decimal,
    pub renewal_frequency: RenewalFrequency,
    pub user_id: String,
    pub member_count: i32,
    pub was_owner: bool,
    pub original_plan_id: String,
}
