use async_trait::async_trait;
use chrono::NaiveDate;

use super::plans_model::{NewPlan, Plan, PlanDetails, PlanOverview, PlanUpdate};
use crate::canceled_plans::NewCanceledPlan;
use crate::errors::Result;

/// Trait defining the contract for plan repository operations.
#[async_trait]
pub trait PlanRepositoryTrait: Send + Sync {
    async fn insert(
        &self,
        new_plan: NewPlan,
        owner_id: &str,
        next_renewal_date: NaiveDate,
    ) -> Result<Plan>;
    async fn update(&self, update: PlanUpdate, next_renewal_date: NaiveDate) -> Result<Plan>;
    async fn set_logo_url(&self, plan_id: &str, logo_url: Option<String>) -> Result<()>;
    async fn set_next_renewal_date(&self, plan_id: &str, date: NaiveDate) -> Result<()>;
    fn get_by_id(&self, plan_id: &str) -> Result<Plan>;
    fn get_details(&self, plan_id: &str) -> Result<PlanDetails>;
    /// Plans the user owns or is an accepted member of, newest first.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<PlanDetails>>;
    fn list_due_for_renewal(&self, on_or_before: NaiveDate) -> Result<Vec<Plan>>;
    /// Atomically archives the owner's snapshot (its `member_count` is
    /// recounted inside the transaction), then deletes all member rows,
    /// plan-scoped notifications and the plan itself.
    async fn delete_cascade(&self, plan_id: &str, snapshot: NewCanceledPlan) -> Result<()>;
}

/// Trait defining the contract for plan service operations.
#[async_trait]
pub trait PlanServiceTrait: Send + Sync {
    async fn create_plan(&self, owner_id: &str, new_plan: NewPlan) -> Result<Plan>;
    async fn update_plan(&self, caller_id: &str, update: PlanUpdate) -> Result<Plan>;
    async fn set_plan_logo(&self, plan_id: &str, logo_url: Option<String>) -> Result<()>;
    fn get_plan(&self, caller_id: &str, plan_id: &str) -> Result<PlanOverview>;
    fn list_plans(&self, caller_id: &str) -> Result<Vec<PlanOverview>>;
    async fn delete_plan(&self, caller_id: &str, plan_id: &str) -> Result<()>;
    /// Advances every past-due `next_renewal_date` by whole frequency
    /// steps until it lies in the future; returns the rolled plans.
    async fn roll_due_renewals(&self) -> Result<Vec<Plan>>;
}
