//! Database model for canceled-plan snapshots.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use klypp_core::canceled_plans::{CanceledPlan, NewCanceledPlan};
use klypp_core::plans::RenewalFrequency;

use crate::utils::parse_decimal_tolerant;

/// Database model for canceled plans. Rows are write-once.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::canceled_plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CanceledPlanDB {
    pub id: String,
    pub name: String,
    pub cost: String,
    pub renewal_frequency: String,
    pub user_id: String,
    pub member_count: i32,
    pub was_owner: bool,
    pub original_plan_id: String,
    pub canceled_at: NaiveDateTime,
}

impl CanceledPlanDB {
    /// Builds the row to insert; `member_count` carries the count taken
    /// inside the surrounding transaction.
    pub fn from_new(snapshot: NewCanceledPlan, member_count: i32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: snapshot.name,
            cost: snapshot.cost.to_string(),
            renewal_frequency: snapshot.renewal_frequency.as_str().to_string(),
            user_id: snapshot.user_id,
            member_count,
            was_owner: snapshot.was_owner,
            original_plan_id: snapshot.original_plan_id,
            canceled_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl From<CanceledPlanDB> for CanceledPlan {
    fn from(db: CanceledPlanDB) -> Self {
        Self {
            cost: parse_decimal_tolerant(&db.cost, "canceled_plan.cost"),
            renewal_frequency: RenewalFrequency::from(db.renewal_frequency.as_str()),
            id: db.id,
            name: db.name,
            user_id: db.user_id,
            member_count: db.member_count,
            was_owner: db.was_owner,
            original_plan_id: db.original_plan_id,
            canceled_at: db.canceled_at,
        }
    }
}
