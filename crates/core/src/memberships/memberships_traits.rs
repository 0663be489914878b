use async_trait::async_trait;

use super::memberships_model::{
    Invitation, InvitationAction, NewPlanMember, PlanMember, PlanMemberWithUser,
};
use crate::canceled_plans::NewCanceledPlan;
use crate::errors::Result;
use crate::notifications::NewNotification;

/// Trait defining the contract for membership repository operations.
///
/// The write operations carry their notification/snapshot side effects so
/// the storage layer can commit the state change and its effects in one
/// transaction. They also re-validate the lifecycle invariants (PENDING
/// status, capacity, uniqueness) inside that transaction — the service's
/// earlier checks only provide fast-path errors.
#[async_trait]
pub trait MembershipRepositoryTrait: Send + Sync {
    fn get_by_id(&self, member_id: &str) -> Result<PlanMember>;
    fn find_by_plan_and_user(&self, plan_id: &str, user_id: &str)
        -> Result<Option<PlanMember>>;
    fn list_by_plan(&self, plan_id: &str) -> Result<Vec<PlanMemberWithUser>>;
    fn count_accepted(&self, plan_id: &str) -> Result<i64>;
    /// Creates a PENDING row and the invitation notification. The
    /// notification's `memberId` metadata is filled with the new row's id.
    async fn insert_invitation(
        &self,
        invitation: NewPlanMember,
        notification: NewNotification,
    ) -> Result<PlanMember>;
    /// Applies an accept/decline to a PENDING row, updates the embedded
    /// status of the original invitation notification and inserts the
    /// owner's response notification.
    async fn respond(
        &self,
        member_id: &str,
        action: InvitationAction,
        owner_notification: NewNotification,
    ) -> Result<PlanMember>;
    /// Deletes a member row. An attached snapshot has its `member_count`
    /// recounted (accepted rows excluding the one being removed) before
    /// insertion; an attached notification is inserted alongside.
    async fn remove(
        &self,
        member_id: &str,
        snapshot: Option<NewCanceledPlan>,
        notification: Option<NewNotification>,
    ) -> Result<()>;
}

/// Trait defining the contract for membership service operations.
#[async_trait]
pub trait MembershipServiceTrait: Send + Sync {
    async fn invite_member(
        &self,
        caller_id: &str,
        plan_id: &str,
        email: &str,
    ) -> Result<PlanMember>;
    async fn respond_to_invitation(
        &self,
        caller_id: &str,
        member_id: &str,
        action: InvitationAction,
    ) -> Result<PlanMember>;
    fn get_invitation(&self, caller_id: &str, member_id: &str) -> Result<Invitation>;
    fn list_plan_members(
        &self,
        caller_id: &str,
        plan_id: &str,
    ) -> Result<Vec<PlanMemberWithUser>>;
    async fn remove_member(&self, caller_id: &str, plan_id: &str, user_id: &str) -> Result<()>;
}
