use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate totals shown on the dashboard. Sections degrade to zero
/// independently; `error` carries the reason when one of them did.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub current_month_spending: Decimal,
    pub plan_count: usize,
    pub total_savings: Decimal,
    pub canceled_plan_count: usize,
    pub canceled_plan_savings: Decimal,
    pub shared_plan_savings: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Where a savings-log entry comes from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SavingsLogKind {
    Shared,
    Canceled,
}

/// One line in the savings log: a shared plan the user splits today, or a
/// plan they canceled within the trailing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsLogEntry {
    pub id: String,
    pub name: String,
    pub cost: Decimal,
    pub user_share: Decimal,
    pub saved_amount: Decimal,
    /// Next renewal date for shared entries, cancellation date for
    /// canceled ones.
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: SavingsLogKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_owner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_owner: Option<bool>,
    pub member_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsLogSummary {
    pub total_savings: Decimal,
    pub shared_plan_savings: Decimal,
    pub canceled_plan_savings: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsLog {
    pub logs: Vec<SavingsLogEntry>,
    pub summary: SavingsLogSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
