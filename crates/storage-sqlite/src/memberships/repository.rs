use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use klypp_core::canceled_plans::NewCanceledPlan;
use klypp_core::memberships::{
    InvitationAction, MemberStatus, MembershipError, MembershipRepositoryTrait, NewPlanMember,
    PlanMember, PlanMemberWithUser,
};
use klypp_core::notifications::{NewNotification, NotificationType};
use klypp_core::sharing::total_member_count;
use klypp_core::Result;

use super::model::PlanMemberDB;
use crate::canceled_plans::repository::insert_snapshot_in_tx;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::notifications::model::NotificationDB;
use crate::notifications::repository::insert_notification_in_tx;
use crate::plans::repository::load_plan_row;
use crate::schema::{notifications, plan_members, plans, users};
use crate::users::model::UserDB;

pub struct MembershipRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

fn member_not_found(member_id: &str) -> klypp_core::Error {
    MembershipError::NotFound(format!("Member with id {} not found", member_id)).into()
}

fn load_member_row(conn: &mut SqliteConnection, member_id: &str) -> Result<PlanMemberDB> {
    plan_members::table
        .find(member_id)
        .first::<PlanMemberDB>(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => member_not_found(member_id),
            other => StorageError::from(other).into(),
        })
}

/// Counts ACCEPTED member rows of a plan on an existing connection.
pub(crate) fn count_accepted_rows(conn: &mut SqliteConnection, for_plan_id: &str) -> Result<i64> {
    plan_members::table
        .filter(plan_members::plan_id.eq(for_plan_id))
        .filter(plan_members::status.eq(MemberStatus::Accepted.as_str()))
        .count()
        .get_result(conn)
        .map_err(|e| StorageError::from(e).into())
}

/// Rewrites the embedded status of the original invitation notification,
/// matched by the memberId key in its JSON metadata.
fn update_invitation_status_in_tx(
    conn: &mut SqliteConnection,
    member_id: &str,
    new_status: MemberStatus,
) -> Result<()> {
    let pattern = format!("%\"memberId\":\"{}\"%", member_id);
    let invitation = notifications::table
        .filter(notifications::notification_type.eq(NotificationType::PlanInvitation.as_str()))
        .filter(notifications::metadata.like(pattern))
        .first::<NotificationDB>(conn)
        .optional()
        .map_err(StorageError::from)?;

    if let Some(row) = invitation {
        let mut metadata = row.parsed_metadata();
        metadata.status = Some(new_status);
        let metadata_json = serde_json::to_string(&metadata)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        diesel::update(notifications::table.find(&row.id))
            .set(notifications::metadata.eq(metadata_json))
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(())
}

impl MembershipRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        MembershipRepository { pool, writer }
    }
}

#[async_trait]
impl MembershipRepositoryTrait for MembershipRepository {
    fn get_by_id(&self, member_id: &str) -> Result<PlanMember> {
        let mut conn = get_connection(&self.pool)?;
        load_member_row(&mut conn, member_id).map(PlanMember::from)
    }

    fn find_by_plan_and_user(
        &self,
        for_plan_id: &str,
        for_user_id: &str,
    ) -> Result<Option<PlanMember>> {
        let mut conn = get_connection(&self.pool)?;
        let row = plan_members::table
            .filter(plan_members::plan_id.eq(for_plan_id))
            .filter(plan_members::user_id.eq(for_user_id))
            .first::<PlanMemberDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(PlanMember::from))
    }

    fn list_by_plan(&self, for_plan_id: &str) -> Result<Vec<PlanMemberWithUser>> {
        let mut conn = get_connection(&self.pool)?;
        let rows: Vec<(PlanMemberDB, UserDB)> = plan_members::table
            .inner_join(users::table)
            .filter(plan_members::plan_id.eq(for_plan_id))
            .order(plan_members::created_at.asc())
            .load::<(PlanMemberDB, UserDB)>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows
            .into_iter()
            .map(|(member_db, user_db)| PlanMemberWithUser {
                member: member_db.into(),
                user: user_db.into(),
            })
            .collect())
    }

    fn count_accepted(&self, for_plan_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        count_accepted_rows(&mut conn, for_plan_id)
    }

    async fn insert_invitation(
        &self,
        invitation: NewPlanMember,
        mut notification: NewNotification,
    ) -> Result<PlanMember> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PlanMember> {
                let plan = load_plan_row(conn, &invitation.plan_id)?;

                let existing = plan_members::table
                    .filter(plan_members::plan_id.eq(&invitation.plan_id))
                    .filter(plan_members::user_id.eq(&invitation.user_id))
                    .first::<PlanMemberDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                if existing.is_some() {
                    return Err(MembershipError::AlreadyMember(format!(
                        "user {} already has a membership in plan {}",
                        invitation.user_id, invitation.plan_id
                    ))
                    .into());
                }

                let accepted = count_accepted_rows(conn, &invitation.plan_id)?;
                if total_member_count(accepted as usize) >= plan.max_members as i64 {
                    return Err(MembershipError::CapacityExceeded(format!(
                        "plan {} is full ({} members)",
                        invitation.plan_id, plan.max_members
                    ))
                    .into());
                }

                let member_db = PlanMemberDB::from_new(invitation);
                diesel::insert_into(plan_members::table)
                    .values(&member_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                notification.metadata.member_id = Some(member_db.id.clone());
                insert_notification_in_tx(conn, notification)?;

                Ok(member_db.into())
            })
            .await
    }

    async fn respond(
        &self,
        member_id: &str,
        action: InvitationAction,
        owner_notification: NewNotification,
    ) -> Result<PlanMember> {
        let member_id = member_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<PlanMember> {
                let member = load_member_row(conn, &member_id)?;
                if member.member_status() != MemberStatus::Pending {
                    return Err(MembershipError::AlreadyProcessed(format!(
                        "invitation {} is {}",
                        member_id, member.status
                    ))
                    .into());
                }

                let new_status = match action {
                    InvitationAction::Accept => {
                        // Capacity may have filled between invite and
                        // response; re-check before flipping the row.
                        let plan = load_plan_row(conn, &member.plan_id)?;
                        let accepted = count_accepted_rows(conn, &member.plan_id)?;
                        if total_member_count(accepted as usize) >= plan.max_members as i64 {
                            return Err(MembershipError::CapacityExceeded(format!(
                                "plan {} filled before the invitation was accepted",
                                member.plan_id
                            ))
                            .into());
                        }
                        diesel::update(plans::table.find(&member.plan_id))
                            .set(plans::current_members.eq(plans::current_members + 1))
                            .execute(conn)
                            .map_err(StorageError::from)?;
                        MemberStatus::Accepted
                    }
                    InvitationAction::Decline => MemberStatus::Declined,
                };

                let now = chrono::Utc::now().naive_utc();
                diesel::update(plan_members::table.find(&member_id))
                    .set((
                        plan_members::status.eq(new_status.as_str()),
                        plan_members::updated_at.eq(now),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                update_invitation_status_in_tx(conn, &member_id, new_status)?;
                insert_notification_in_tx(conn, owner_notification)?;

                load_member_row(conn, &member_id).map(PlanMember::from)
            })
            .await
    }

    async fn remove(
        &self,
        member_id: &str,
        snapshot: Option<NewCanceledPlan>,
        notification: Option<NewNotification>,
    ) -> Result<()> {
        let member_id = member_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let member = load_member_row(conn, &member_id)?;
                let was_accepted = member.member_status() == MemberStatus::Accepted;

                if let Some(snap) = snapshot {
                    // Accepted count excluding the row being removed.
                    let accepted = count_accepted_rows(conn, &member.plan_id)?
                        - if was_accepted { 1 } else { 0 };
                    insert_snapshot_in_tx(conn, snap, accepted as i32)?;
                }

                diesel::delete(plan_members::table.find(&member_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                if was_accepted {
                    diesel::update(plans::table.find(&member.plan_id))
                        .set(plans::current_members.eq(plans::current_members - 1))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }

                if let Some(n) = notification {
                    insert_notification_in_tx(conn, n)?;
                }

                Ok(())
            })
            .await
    }
}
