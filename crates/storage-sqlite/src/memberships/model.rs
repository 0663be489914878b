//! Database model for plan memberships.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use klypp_core::memberships::{MemberStatus, NewPlanMember, PlanMember};

/// Database model for plan members
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::plan_members)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlanMemberDB {
    pub id: String,
    pub plan_id: String,
    pub user_id: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PlanMemberDB {
    /// Builds a fresh PENDING row for an invitation.
    pub fn from_new(invitation: NewPlanMember) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            plan_id: invitation.plan_id,
            user_id: invitation.user_id,
            status: MemberStatus::Pending.as_str().to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn member_status(&self) -> MemberStatus {
        MemberStatus::from(self.status.as_str())
    }
}

impl From<PlanMemberDB> for PlanMember {
    fn from(db: PlanMemberDB) -> Self {
        let status = db.member_status();
        Self {
            id: db.id,
            plan_id: db.plan_id,
            user_id: db.user_id,
            status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
