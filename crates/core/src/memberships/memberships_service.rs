use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::memberships_model::{
    Invitation, InvitationAction, MemberStatus, NewPlanMember, PlanMember, PlanMemberWithUser,
};
use super::memberships_traits::{MembershipRepositoryTrait, MembershipServiceTrait};
use super::MembershipError;
use crate::canceled_plans::NewCanceledPlan;
use crate::errors::Result;
use crate::notifications::{
    NewNotification, NotificationMetadata, NotificationType, PushDispatcherTrait,
};
use crate::plans::PlanRepositoryTrait;
use crate::sharing::total_member_count;
use crate::users::{UserError, UserRepositoryTrait};

/// Service for the invitation → accept/decline → removal lifecycle.
///
/// Archival policy: only a member's own voluntary departure is archived as
/// a CanceledPlan; owner-initiated removal notifies the removed user but
/// takes no snapshot.
pub struct MembershipService {
    membership_repository: Arc<dyn MembershipRepositoryTrait>,
    plan_repository: Arc<dyn PlanRepositoryTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    dispatcher: Arc<dyn PushDispatcherTrait>,
}

impl MembershipService {
    pub fn new(
        membership_repository: Arc<dyn MembershipRepositoryTrait>,
        plan_repository: Arc<dyn PlanRepositoryTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        dispatcher: Arc<dyn PushDispatcherTrait>,
    ) -> Self {
        Self {
            membership_repository,
            plan_repository,
            user_repository,
            dispatcher,
        }
    }
}

#[async_trait]
impl MembershipServiceTrait for MembershipService {
    async fn invite_member(
        &self,
        caller_id: &str,
        plan_id: &str,
        email: &str,
    ) -> Result<PlanMember> {
        let plan = self.plan_repository.get_by_id(plan_id)?;
        if plan.owner_id != caller_id {
            return Err(MembershipError::NotAuthorized(format!(
                "only the owner of plan {} may invite members",
                plan_id
            ))
            .into());
        }

        let invited = self
            .user_repository
            .find_by_email(email)?
            .ok_or_else(|| UserError::NotFound(format!("no user with email {}", email)))?;

        if self
            .membership_repository
            .find_by_plan_and_user(plan_id, &invited.id)?
            .is_some()
        {
            return Err(MembershipError::AlreadyMember(format!(
                "user {} already has a membership in plan {}",
                invited.id, plan_id
            ))
            .into());
        }

        let accepted = self.membership_repository.count_accepted(plan_id)?;
        if total_member_count(accepted as usize) >= plan.max_members as i64 {
            return Err(MembershipError::CapacityExceeded(format!(
                "plan {} is full ({} members)",
                plan_id, plan.max_members
            ))
            .into());
        }

        let inviter = self.user_repository.get_by_id(caller_id)?;
        let mut notification = NewNotification {
            user_id: invited.id.clone(),
            title: "New Plan Invitation".to_string(),
            message: format!(
                "{} has invited you to join their {} plan",
                inviter.name, plan.name
            ),
            notification_type: NotificationType::PlanInvitation,
            metadata: NotificationMetadata {
                plan_id: Some(plan.id.clone()),
                plan_name: Some(plan.name.clone()),
                inviter_id: Some(inviter.id.clone()),
                inviter_name: Some(inviter.name.clone()),
                ..Default::default()
            },
        };

        let member = self
            .membership_repository
            .insert_invitation(
                NewPlanMember {
                    plan_id: plan_id.to_string(),
                    user_id: invited.id,
                },
                notification.clone(),
            )
            .await?;

        debug!("Invited user {} to plan {}", member.user_id, plan_id);
        // The repository assigned the row id; carry it on the dispatched copy.
        notification.metadata.member_id = Some(member.id.clone());
        self.dispatcher.dispatch(&notification);
        Ok(member)
    }

    async fn respond_to_invitation(
        &self,
        caller_id: &str,
        member_id: &str,
        action: InvitationAction,
    ) -> Result<PlanMember> {
        let member = self.membership_repository.get_by_id(member_id)?;
        if member.user_id != caller_id {
            return Err(MembershipError::NotAuthorized(format!(
                "user {} is not the invitee on member {}",
                caller_id, member_id
            ))
            .into());
        }
        if member.status != MemberStatus::Pending {
            return Err(MembershipError::AlreadyProcessed(format!(
                "invitation {} is {}",
                member_id,
                member.status.as_str()
            ))
            .into());
        }

        let plan = self.plan_repository.get_by_id(&member.plan_id)?;
        let invitee = self.user_repository.get_by_id(caller_id)?;
        let (title_word, verb, status) = match action {
            InvitationAction::Accept => ("Accepted", "accepted", MemberStatus::Accepted),
            InvitationAction::Decline => ("Declined", "declined", MemberStatus::Declined),
        };
        let owner_notification = NewNotification {
            user_id: plan.owner_id.clone(),
            title: format!("Plan Invitation {}", title_word),
            message: format!(
                "{} has {} the invitation to join {}",
                invitee.name, verb, plan.name
            ),
            notification_type: NotificationType::PlanInvitationResponse,
            metadata: NotificationMetadata {
                plan_id: Some(plan.id.clone()),
                plan_name: Some(plan.name.clone()),
                member_id: Some(member.id.clone()),
                status: Some(status),
                ..Default::default()
            },
        };

        let updated = self
            .membership_repository
            .respond(member_id, action, owner_notification.clone())
            .await?;

        debug!(
            "Invitation {} on plan {} {}",
            member_id, plan.id, verb
        );
        self.dispatcher.dispatch(&owner_notification);
        Ok(updated)
    }

    fn get_invitation(&self, caller_id: &str, member_id: &str) -> Result<Invitation> {
        let member = self.membership_repository.get_by_id(member_id)?;
        let plan = self.plan_repository.get_by_id(&member.plan_id)?;
        if member.user_id != caller_id && plan.owner_id != caller_id {
            return Err(MembershipError::NotAuthorized(format!(
                "user {} may not view invitation {}",
                caller_id, member_id
            ))
            .into());
        }
        let owner = self.user_repository.get_by_id(&plan.owner_id)?;
        Ok(Invitation {
            member,
            plan,
            owner: owner.into(),
        })
    }

    fn list_plan_members(
        &self,
        caller_id: &str,
        plan_id: &str,
    ) -> Result<Vec<PlanMemberWithUser>> {
        let plan = self.plan_repository.get_by_id(plan_id)?;
        if plan.owner_id != caller_id {
            return Err(MembershipError::NotAuthorized(format!(
                "only the owner of plan {} may list its members",
                plan_id
            ))
            .into());
        }
        self.membership_repository.list_by_plan(plan_id)
    }

    async fn remove_member(&self, caller_id: &str, plan_id: &str, user_id: &str) -> Result<()> {
        let plan = self.plan_repository.get_by_id(plan_id)?;
        let member = self
            .membership_repository
            .find_by_plan_and_user(plan_id, user_id)?
            .ok_or_else(|| {
                MembershipError::NotFound(format!(
                    "no membership for user {} in plan {}",
                    user_id, plan_id
                ))
            })?;

        let is_owner = plan.owner_id == caller_id;
        let is_self = user_id == caller_id;
        if !is_owner && !is_self {
            return Err(MembershipError::NotAuthorized(format!(
                "user {} may not remove user {} from plan {}",
                caller_id, user_id, plan_id
            ))
            .into());
        }

        let (snapshot, notification) = if is_self {
            // Voluntary leave: archive the leaver's share history, nothing
            // to notify. member_count is recounted inside the transaction.
            (
                Some(NewCanceledPlan {
                    name: plan.name.clone(),
                    cost: plan.cost,
                    renewal_frequency: plan.renewal_frequency,
                    user_id: user_id.to_string(),
                    member_count: 0,
                    was_owner: false,
                    original_plan_id: plan.id.clone(),
                }),
                None,
            )
        } else {
            (
                None,
                Some(NewNotification {
                    user_id: user_id.to_string(),
                    title: "Removed from Plan".to_string(),
                    message: format!("You have been removed from the {} plan", plan.name),
                    notification_type: NotificationType::PlanUpdate,
                    metadata: NotificationMetadata {
                        plan_id: Some(plan.id.clone()),
                        plan_name: Some(plan.name.clone()),
                        action: Some("REMOVED".to_string()),
                        ..Default::default()
                    },
                }),
            )
        };

        self.membership_repository
            .remove(&member.id, snapshot, notification.clone())
            .await?;

        debug!("Removed user {} from plan {}", user_id, plan_id);
        if let Some(n) = notification {
            self.dispatcher.dispatch(&n);
        }
        Ok(())
    }
}
