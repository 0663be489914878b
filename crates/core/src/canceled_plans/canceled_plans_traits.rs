use chrono::NaiveDateTime;

use super::canceled_plans_model::CanceledPlan;
use crate::errors::Result;

/// Trait defining the read contract for canceled-plan snapshots.
///
/// Snapshots are inserted by the plans/memberships repositories inside
/// their lifecycle transactions; this trait only reads them back for
/// analytics.
pub trait CanceledPlanRepositoryTrait: Send + Sync {
    /// Snapshots belonging to the user, canceled at or after `since`,
    /// newest first.
    fn list_since(&self, user_id: &str, since: NaiveDateTime) -> Result<Vec<CanceledPlan>>;
}
