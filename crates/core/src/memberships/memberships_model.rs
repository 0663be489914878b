use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::plans::plans_model::Plan;
use crate::users::UserSummary;

/// Lifecycle status of a plan membership.
///
/// `PENDING → {ACCEPTED, DECLINED}`; an ACCEPTED row is removed (deleted)
/// when the member leaves or is removed. DECLINED and removed are terminal;
/// re-inviting requires the old row to be gone first since at most one row
/// may exist per (plan, user).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Pending,
    Accepted,
    Declined,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Pending => "PENDING",
            MemberStatus::Accepted => "ACCEPTED",
            MemberStatus::Declined => "DECLINED",
        }
    }
}

impl From<&str> for MemberStatus {
    fn from(value: &str) -> Self {
        match value {
            "ACCEPTED" => MemberStatus::Accepted,
            "DECLINED" => MemberStatus::Declined,
            _ => MemberStatus::Pending,
        }
    }
}

/// The invitee's answer to a pending invitation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationAction {
    Accept,
    Decline,
}

/// Domain model representing one user's relationship to one plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanMember {
    pub id: String,
    pub plan_id: String,
    pub user_id: String,
    pub status: MemberStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating an invitation row. Status is seeded to
/// PENDING by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlanMember {
    pub plan_id: String,
    pub user_id: String,
}

/// A member row joined with its user's summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanMemberWithUser {
    #[serde(flatten)]
    pub member: PlanMember,
    pub user: UserSummary,
}

/// An invitation as shown to the invitee: the member row plus the plan it
/// belongs to and the plan's owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    #[serde(flatten)]
    pub member: PlanMember,
    pub plan: Plan,
    pub owner: UserSummary,
}
