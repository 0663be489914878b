use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use super::plans_model::{NewPlan, Plan, PlanOverview, PlanUpdate};
use super::plans_traits::{PlanRepositoryTrait, PlanServiceTrait};
use super::renewal::next_renewal_date;
use super::PlanError;
use crate::canceled_plans::NewCanceledPlan;
use crate::errors::{Result, ValidationError};

/// Service for managing plans.
pub struct PlanService {
    repository: Arc<dyn PlanRepositoryTrait>,
}

impl PlanService {
    pub fn new(repository: Arc<dyn PlanRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_owner(plan: &Plan, caller_id: &str) -> Result<()> {
        if plan.owner_id != caller_id {
            return Err(PlanError::NotAuthorized(format!(
                "user {} does not own plan {}",
                caller_id, plan.id
            ))
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl PlanServiceTrait for PlanService {
    async fn create_plan(&self, owner_id: &str, new_plan: NewPlan) -> Result<Plan> {
        new_plan.validate()?;
        let renewal = next_renewal_date(new_plan.start_date, new_plan.renewal_frequency);
        debug!(
            "Creating plan '{}' for owner {}, next renewal {}",
            new_plan.name, owner_id, renewal
        );
        self.repository.insert(new_plan, owner_id, renewal).await
    }

    async fn update_plan(&self, caller_id: &str, update: PlanUpdate) -> Result<Plan> {
        update.validate()?;
        let plan_id = update
            .id
            .clone()
            .ok_or_else(|| ValidationError::MissingField("id".to_string()))?;
        let existing = self.repository.get_by_id(&plan_id)?;
        Self::ensure_owner(&existing, caller_id)?;

        let renewal = next_renewal_date(update.start_date, update.renewal_frequency);
        self.repository.update(update, renewal).await
    }

    async fn set_plan_logo(&self, plan_id: &str, logo_url: Option<String>) -> Result<()> {
        self.repository.set_logo_url(plan_id, logo_url).await
    }

    fn get_plan(&self, caller_id: &str, plan_id: &str) -> Result<PlanOverview> {
        let details = self.repository.get_details(plan_id)?;
        let is_visible = details.plan.owner_id == caller_id
            || details
                .members
                .iter()
                .any(|m| m.member.user_id == caller_id);
        if !is_visible {
            return Err(PlanError::NotAuthorized(format!(
                "user {} has no membership in plan {}",
                caller_id, plan_id
            ))
            .into());
        }
        let today = Utc::now().date_naive();
        Ok(PlanOverview::from_details(details, caller_id, today))
    }

    fn list_plans(&self, caller_id: &str) -> Result<Vec<PlanOverview>> {
        let today = Utc::now().date_naive();
        let details = self.repository.list_for_user(caller_id)?;
        Ok(details
            .into_iter()
            .map(|d| PlanOverview::from_details(d, caller_id, today))
            .collect())
    }

    async fn delete_plan(&self, caller_id: &str, plan_id: &str) -> Result<()> {
        let plan = self.repository.get_by_id(plan_id)?;
        Self::ensure_owner(&plan, caller_id)?;

        // member_count is recounted inside the delete transaction.
        let snapshot = NewCanceledPlan {
            name: plan.name,
            cost: plan.cost,
            renewal_frequency: plan.renewal_frequency,
            user_id: caller_id.to_string(),
            member_count: 0,
            was_owner: true,
            original_plan_id: plan.id,
        };
        self.repository.delete_cascade(plan_id, snapshot).await
    }

    async fn roll_due_renewals(&self) -> Result<Vec<Plan>> {
        let today = Utc::now().date_naive();
        let due = self.repository.list_due_for_renewal(today)?;
        let mut rolled = Vec::with_capacity(due.len());
        for mut plan in due {
            let mut next = plan.next_renewal_date;
            while next <= today {
                next = next_renewal_date(next, plan.renewal_frequency);
            }
            self.repository.set_next_renewal_date(&plan.id, next).await?;
            debug!(
                "Rolled renewal date of plan {} from {} to {}",
                plan.id, plan.next_renewal_date, next
            );
            plan.next_renewal_date = next;
            rolled.push(plan);
        }
        Ok(rolled)
    }
}
