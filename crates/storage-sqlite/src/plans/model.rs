//! Database model for plans.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use klypp_core::plans::{NewPlan, Plan, PlanUpdate, RenewalFrequency};

use crate::utils::{format_date, parse_date_tolerant, parse_decimal_tolerant};

/// Database model for plans. Money and dates are TEXT columns, parsed
/// tolerantly on the way out.
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
#[diesel(table_name = crate::schema::plans)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PlanDB {
    pub id: String,
    pub name: String,
    pub cost: String,
    pub renewal_frequency: String,
    pub max_members: i32,
    pub current_members: i32,
    pub start_date: String,
    pub next_renewal_date: String,
    pub owner_id: String,
    pub logo_url: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PlanDB {
    pub fn from_new(new_plan: NewPlan, owner: &str, next_renewal: NaiveDate) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: new_plan
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: new_plan.name,
            cost: new_plan.cost.to_string(),
            renewal_frequency: new_plan.renewal_frequency.as_str().to_string(),
            max_members: new_plan.max_members,
            current_members: 1,
            start_date: format_date(new_plan.start_date),
            next_renewal_date: format_date(next_renewal),
            owner_id: owner.to_string(),
            logo_url: new_plan.logo_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Folds an update into the stored row. Counter, owner and audit
    /// fields come from the existing record; a missing logo keeps the
    /// stored one.
    pub fn apply_update(existing: PlanDB, update: PlanUpdate, next_renewal: NaiveDate) -> Self {
        Self {
            id: existing.id,
            name: update.name,
            cost: update.cost.to_string(),
            renewal_frequency: update.renewal_frequency.as_str().to_string(),
            max_members: update.max_members,
            current_members: existing.current_members,
            start_date: format_date(update.start_date),
            next_renewal_date: format_date(next_renewal),
            owner_id: existing.owner_id,
            logo_url: update.logo_url.or(existing.logo_url),
            created_at: existing.created_at,
            updated_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl From<PlanDB> for Plan {
    fn from(db: PlanDB) -> Self {
        Self {
            cost: parse_decimal_tolerant(&db.cost, "plan.cost"),
            renewal_frequency: RenewalFrequency::from(db.renewal_frequency.as_str()),
            start_date: parse_date_tolerant(&db.start_date, "plan.start_date"),
            next_renewal_date: parse_date_tolerant(
                &db.next_renewal_date,
                "plan.next_renewal_date",
            ),
            id: db.id,
            name: db.name,
            max_members: db.max_members,
            current_members: db.current_members,
            owner_id: db.owner_id,
            logo_url: db.logo_url,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
