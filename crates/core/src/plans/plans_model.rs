use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::memberships::memberships_model::{MemberStatus, PlanMemberWithUser};
use crate::sharing::sharing_calculator::{savings_of, share_of};
use crate::users::UserSummary;
use crate::{Error, Result};

use super::renewal::days_until_renewal;

/// How often a plan renews. Unrecognized values parse as monthly, matching
/// the renewal-date fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenewalFrequency {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl RenewalFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenewalFrequency::Monthly => "monthly",
            RenewalFrequency::Quarterly => "quarterly",
            RenewalFrequency::Yearly => "yearly",
        }
    }
}

impl From<&str> for RenewalFrequency {
    fn from(value: &str) -> Self {
        match value {
            "quarterly" => RenewalFrequency::Quarterly,
            "yearly" => RenewalFrequency::Yearly,
            _ => RenewalFrequency::Monthly,
        }
    }
}

impl std::fmt::Display for RenewalFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain model representing a tracked subscription plan.
///
/// `cost` is the cost of the whole subscription, not a per-member share.
/// `current_members` counts the owner plus accepted members and is
/// maintained transactionally by the storage layer; derived values are
/// always computed from the actual accepted-member rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub cost: Decimal,
    pub renewal_frequency: RenewalFrequency,
    pub max_members: i32,
    pub current_members: i32,
    pub start_date: NaiveDate,
    pub next_renewal_date: NaiveDate,
    pub owner_id: String,
    pub logo_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub cost: Decimal,
    pub renewal_frequency: RenewalFrequency,
    pub max_members: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl NewPlan {
    /// Validates the new plan data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Plan name cannot be empty".to_string(),
            )));
        }
        if self.cost.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Plan cost cannot be negative".to_string(),
            )));
        }
        if self.max_members < 1 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "A plan must have room for at least its owner".to_string(),
            )));
        }
        Ok(())
    }
}

/// Input model for updating an existing plan.
///
/// A missing `logo_url` keeps the stored logo; the renewal date is always
/// recomputed from the submitted start date and frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanUpdate {
    pub id: Option<String>,
    pub name: String,
    pub cost: Decimal,
    pub renewal_frequency: RenewalFrequency,
    pub max_members: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl PlanUpdate {
    /// Validates the plan update data.
    pub fn validate(&self) -> Result<()> {
        if self.id.is_none() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Plan ID is required for updates".to_string(),
            )));
        }
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Plan name cannot be empty".to_string(),
            )));
        }
        if self.cost.is_sign_negative() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Plan cost cannot be negative".to_string(),
            )));
        }
        if self.max_members < 1 {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "A plan must have room for at least its owner".to_string(),
            )));
        }
        Ok(())
    }
}

/// A plan with its owner and member rows, as loaded by the repository.
#[derive(Debug, Clone)]
pub struct PlanDetails {
    pub plan: Plan,
    pub owner: UserSummary,
    pub members: Vec<PlanMemberWithUser>,
}

impl PlanDetails {
    /// Number of ACCEPTED member rows (the owner is not among them).
    pub fn accepted_member_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.member.status == MemberStatus::Accepted)
            .count()
    }
}

/// Plan payload annotated with the caller-relative and derived values the
/// clients render: days until renewal, ownership flag, cost share and
/// savings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanOverview {
    #[serde(flatten)]
    pub plan: Plan,
    pub owner: UserSummary,
    pub members: Vec<PlanMemberWithUser>,
    pub member_count: i64,
    pub is_owner: bool,
    pub renews_in: i64,
    pub share: Decimal,
    pub savings: Decimal,
}

impl PlanOverview {
    /// Builds the annotated view for `caller_id` as of `today`.
    pub fn from_details(details: PlanDetails, caller_id: &str, today: NaiveDate) -> Self {
        let accepted = details.accepted_member_count();
        let share = share_of(details.plan.cost, accepted);
        let savings = savings_of(details.plan.cost, accepted);
        let renews_in = days_until_renewal(details.plan.next_renewal_date, today);
        let is_owner = details.plan.owner_id == caller_id;
        Self {
            member_count: accepted as i64 + 1,
            is_owner,
            renews_in,
            share,
            savings,
            plan: details.plan,
            owner: details.owner,
            members: details.members,
        }
    }
}
