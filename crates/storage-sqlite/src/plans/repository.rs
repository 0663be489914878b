use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use klypp_core::canceled_plans::NewCanceledPlan;
use klypp_core::memberships::memberships_model::PlanMemberWithUser;
use klypp_core::plans::{
    NewPlan, Plan, PlanDetails, PlanError, PlanRepositoryTrait, PlanUpdate,
};
use klypp_core::users::UserSummary;
use klypp_core::Result;

use super::model::PlanDB;
use crate::canceled_plans::repository::insert_snapshot_in_tx;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::memberships::model::PlanMemberDB;
use crate::memberships::repository::count_accepted_rows;
use crate::schema::{notifications, plan_members, plans, users};
use crate::users::model::UserDB;
use crate::utils::format_date;

pub struct PlanRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

fn plan_not_found(plan_id: &str) -> klypp_core::Error {
    PlanError::NotFound(format!("Plan with id {} not found", plan_id)).into()
}

/// Loads one plan row, mapping a miss to the domain NotFound.
pub(crate) fn load_plan_row(conn: &mut SqliteConnection, plan_id: &str) -> Result<PlanDB> {
    plans::table
        .find(plan_id)
        .first::<PlanDB>(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => plan_not_found(plan_id),
            other => StorageError::from(other).into(),
        })
}

impl PlanRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PlanRepository { pool, writer }
    }

    /// Joins member and owner summaries onto a batch of plan rows.
    fn attach_details(
        conn: &mut SqliteConnection,
        plan_rows: Vec<PlanDB>,
    ) -> Result<Vec<PlanDetails>> {
        let plan_ids: Vec<String> = plan_rows.iter().map(|p| p.id.clone()).collect();
        let owner_ids: Vec<String> = plan_rows.iter().map(|p| p.owner_id.clone()).collect();

        let member_rows: Vec<(PlanMemberDB, UserDB)> = plan_members::table
            .inner_join(users::table)
            .filter(plan_members::plan_id.eq_any(&plan_ids))
            .order(plan_members::created_at.asc())
            .load::<(PlanMemberDB, UserDB)>(conn)
            .map_err(StorageError::from)?;

        let owner_rows: Vec<UserDB> = users::table
            .filter(users::id.eq_any(&owner_ids))
            .load::<UserDB>(conn)
            .map_err(StorageError::from)?;
        let owners: HashMap<String, UserSummary> = owner_rows
            .into_iter()
            .map(|u| (u.id.clone(), UserSummary::from(u)))
            .collect();

        let mut members_by_plan: HashMap<String, Vec<PlanMemberWithUser>> = HashMap::new();
        for (member_db, user_db) in member_rows {
            members_by_plan
                .entry(member_db.plan_id.clone())
                .or_default()
                .push(PlanMemberWithUser {
                    member: member_db.into(),
                    user: user_db.into(),
                });
        }

        plan_rows
            .into_iter()
            .map(|plan_db| {
                let owner = owners.get(&plan_db.owner_id).cloned().ok_or_else(|| {
                    klypp_core::Error::Database(klypp_core::errors::DatabaseError::Internal(
                        format!("Owner {} of plan {} not found", plan_db.owner_id, plan_db.id),
                    ))
                })?;
                let members = members_by_plan.remove(&plan_db.id).unwrap_or_default();
                Ok(PlanDetails {
                    plan: plan_db.into(),
                    owner,
                    members,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PlanRepositoryTrait for PlanRepository {
    async fn insert(
        &self,
        new_plan: NewPlan,
        owner_id: &str,
        next_renewal_date: NaiveDate,
    ) -> Result<Plan> {
        let owner_id = owner_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Plan> {
                let plan_db = PlanDB::from_new(new_plan, &owner_id, next_renewal_date);
                diesel::insert_into(plans::table)
                    .values(&plan_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(plan_db.into())
            })
            .await
    }

    async fn update(&self, update: PlanUpdate, next_renewal_date: NaiveDate) -> Result<Plan> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Plan> {
                let plan_id = update.id.clone().unwrap_or_default();
                let existing = load_plan_row(conn, &plan_id)?;
                let plan_db = PlanDB::apply_update(existing, update, next_renewal_date);
                diesel::update(plans::table.find(&plan_db.id))
                    .set(&plan_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(plan_db.into())
            })
            .await
    }

    async fn set_logo_url(&self, plan_id: &str, logo_url: Option<String>) -> Result<()> {
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(plans::table.find(&plan_id))
                    .set(plans::logo_url.eq(logo_url))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn set_next_renewal_date(&self, plan_id: &str, date: NaiveDate) -> Result<()> {
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(plans::table.find(&plan_id))
                    .set(plans::next_renewal_date.eq(format_date(date)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    fn get_by_id(&self, plan_id: &str) -> Result<Plan> {
        let mut conn = get_connection(&self.pool)?;
        load_plan_row(&mut conn, plan_id).map(Plan::from)
    }

    fn get_details(&self, plan_id: &str) -> Result<PlanDetails> {
        let mut conn = get_connection(&self.pool)?;
        let plan_db = load_plan_row(&mut conn, plan_id)?;
        let mut details = Self::attach_details(&mut conn, vec![plan_db])?;
        details.pop().ok_or_else(|| plan_not_found(plan_id))
    }

    fn list_for_user(&self, for_user_id: &str) -> Result<Vec<PlanDetails>> {
        let mut conn = get_connection(&self.pool)?;
        let accepted_plan_ids = plan_members::table
            .filter(plan_members::user_id.eq(for_user_id))
            .filter(plan_members::status.eq("ACCEPTED"))
            .select(plan_members::plan_id);
        let plan_rows = plans::table
            .filter(
                plans::owner_id
                    .eq(for_user_id)
                    .or(plans::id.eq_any(accepted_plan_ids)),
            )
            .order(plans::created_at.desc())
            .load::<PlanDB>(&mut conn)
            .map_err(StorageError::from)?;
        Self::attach_details(&mut conn, plan_rows)
    }

    fn list_due_for_renewal(&self, on_or_before: NaiveDate) -> Result<Vec<Plan>> {
        let mut conn = get_connection(&self.pool)?;
        // ISO dates compare correctly as text.
        let rows = plans::table
            .filter(plans::next_renewal_date.le(format_date(on_or_before)))
            .load::<PlanDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Plan::from).collect())
    }

    async fn delete_cascade(&self, plan_id: &str, snapshot: NewCanceledPlan) -> Result<()> {
        let plan_id = plan_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                load_plan_row(conn, &plan_id)?;

                let accepted = count_accepted_rows(conn, &plan_id)?;
                insert_snapshot_in_tx(conn, snapshot, accepted as i32)?;

                diesel::delete(plan_members::table.filter(plan_members::plan_id.eq(&plan_id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                // Plan-scoped notifications are matched on the planId key
                // inside the JSON metadata column.
                let metadata_pattern = format!("%\"planId\":\"{}\"%", plan_id);
                diesel::delete(
                    notifications::table.filter(notifications::metadata.like(metadata_pattern)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                diesel::delete(plans::table.find(&plan_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}
