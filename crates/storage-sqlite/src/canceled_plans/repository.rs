use std::sync::Arc;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use klypp_core::canceled_plans::{CanceledPlan, CanceledPlanRepositoryTrait, NewCanceledPlan};
use klypp_core::Result;

use super::model::CanceledPlanDB;
use crate::db::get_connection;
use crate::errors::StorageError;
use crate::schema::canceled_plans;

/// Inserts a snapshot on an existing connection, with the member count
/// taken inside the surrounding transaction. Used by the plan and
/// membership repositories.
pub(crate) fn insert_snapshot_in_tx(
    conn: &mut SqliteConnection,
    snapshot: NewCanceledPlan,
    member_count: i32,
) -> Result<CanceledPlanDB> {
    let snapshot_db = CanceledPlanDB::from_new(snapshot, member_count);
    diesel::insert_into(canceled_plans::table)
        .values(&snapshot_db)
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(snapshot_db)
}

pub struct CanceledPlanRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl CanceledPlanRepository {
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        CanceledPlanRepository { pool }
    }
}

impl CanceledPlanRepositoryTrait for CanceledPlanRepository {
    fn list_since(&self, for_user_id: &str, since: NaiveDateTime) -> Result<Vec<CanceledPlan>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = canceled_plans::table
            .filter(canceled_plans::user_id.eq(for_user_id))
            .filter(canceled_plans::canceled_at.ge(since))
            .order(canceled_plans::canceled_at.desc())
            .load::<CanceledPlanDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CanceledPlan::from).collect())
    }
}
