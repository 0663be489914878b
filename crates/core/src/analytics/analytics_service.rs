use std::sync::Arc;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::error;
use rust_decimal::Decimal;

use super::analytics_model::{
    AnalyticsSummary, SavingsLog, SavingsLogEntry, SavingsLogKind, SavingsLogSummary,
};
use super::analytics_traits::AnalyticsServiceTrait;
use crate::canceled_plans::{CanceledPlan, CanceledPlanRepositoryTrait};
use crate::constants::CANCELED_PLAN_WINDOW_MONTHS;
use crate::errors::Result;
use crate::plans::plans_model::PlanDetails;
use crate::plans::PlanRepositoryTrait;
use crate::sharing::{canceled_share, savings_of, share_of};

/// Recomputes the user's spending/savings aggregates from persisted plans
/// and canceled-plan snapshots on every call.
pub struct AnalyticsService {
    plan_repository: Arc<dyn PlanRepositoryTrait>,
    canceled_plan_repository: Arc<dyn CanceledPlanRepositoryTrait>,
}

/// First day of the month `CANCELED_PLAN_WINDOW_MONTHS` months back, at
/// midnight.
fn window_start(today: NaiveDate) -> NaiveDateTime {
    let first_of_month = today.with_day(1).unwrap_or(today);
    first_of_month
        .checked_sub_months(Months::new(CANCELED_PLAN_WINDOW_MONTHS))
        .unwrap_or(first_of_month)
        .and_time(NaiveTime::MIN)
}

fn join_errors(a: Option<String>, b: Option<String>) -> Option<String> {
    match (a, b) {
        (Some(a), Some(b)) => Some(format!("{}; {}", a, b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

impl AnalyticsService {
    pub fn new(
        plan_repository: Arc<dyn PlanRepositoryTrait>,
        canceled_plan_repository: Arc<dyn CanceledPlanRepositoryTrait>,
    ) -> Self {
        Self {
            plan_repository,
            canceled_plan_repository,
        }
    }

    /// Loads active plans, degrading to an empty section on failure.
    fn load_plans(&self, user_id: &str) -> (Vec<PlanDetails>, Option<String>) {
        match self.plan_repository.list_for_user(user_id) {
            Ok(plans) => (plans, None),
            Err(e) => {
                error!("Failed to load plans for analytics: {}", e);
                (Vec::new(), Some("plans unavailable".to_string()))
            }
        }
    }

    /// Loads canceled plans inside the trailing window, degrading to an
    /// empty section on failure.
    fn load_canceled(&self, user_id: &str) -> (Vec<CanceledPlan>, Option<String>) {
        let since = window_start(Utc::now().date_naive());
        match self.canceled_plan_repository.list_since(user_id, since) {
            Ok(rows) => (rows, None),
            Err(e) => {
                error!("Failed to load canceled plans for analytics: {}", e);
                (Vec::new(), Some("canceled plans unavailable".to_string()))
            }
        }
    }
}

impl AnalyticsServiceTrait for AnalyticsService {
    fn get_summary(&self, user_id: &str) -> Result<AnalyticsSummary> {
        let (plans, plans_error) = self.load_plans(user_id);
        let (canceled, canceled_error) = self.load_canceled(user_id);

        let mut current_month_spending = Decimal::ZERO;
        let mut shared_plan_savings = Decimal::ZERO;
        for details in &plans {
            let accepted = details.accepted_member_count();
            current_month_spending += share_of(details.plan.cost, accepted);
            shared_plan_savings += savings_of(details.plan.cost, accepted);
        }

        let canceled_plan_savings: Decimal = canceled
            .iter()
            .map(|c| canceled_share(c.cost, c.member_count, c.renewal_frequency))
            .sum();

        Ok(AnalyticsSummary {
            current_month_spending,
            plan_count: plans.len(),
            total_savings: shared_plan_savings + canceled_plan_savings,
            canceled_plan_count: canceled.len(),
            canceled_plan_savings,
            shared_plan_savings,
            error: join_errors(plans_error, canceled_error),
        })
    }

    fn get_savings_log(&self, user_id: &str) -> Result<SavingsLog> {
        let (plans, plans_error) = self.load_plans(user_id);
        let (canceled, canceled_error) = self.load_canceled(user_id);

        let mut logs: Vec<SavingsLogEntry> = Vec::new();

        for c in &canceled {
            let user_share = canceled_share(c.cost, c.member_count, c.renewal_frequency);
            logs.push(SavingsLogEntry {
                id: c.id.clone(),
                name: c.name.clone(),
                cost: c.cost,
                user_share,
                saved_amount: user_share,
                date: c.canceled_at.date(),
                kind: SavingsLogKind::Canceled,
                was_owner: Some(c.was_owner),
                is_owner: None,
                member_count: c.member_count as i64,
            });
        }

        for details in &plans {
            let accepted = details.accepted_member_count();
            if accepted == 0 {
                continue;
            }
            logs.push(SavingsLogEntry {
                id: details.plan.id.clone(),
                name: details.plan.name.clone(),
                cost: details.plan.cost,
                user_share: share_of(details.plan.cost, accepted),
                saved_amount: savings_of(details.plan.cost, accepted),
                date: details.plan.next_renewal_date,
                kind: SavingsLogKind::Shared,
                was_owner: None,
                is_owner: Some(details.plan.owner_id == user_id),
                member_count: accepted as i64,
            });
        }

        logs.sort_by(|a, b| b.date.cmp(&a.date));

        let shared_plan_savings: Decimal = logs
            .iter()
            .filter(|l| l.kind == SavingsLogKind::Shared)
            .map(|l| l.saved_amount)
            .sum();
        let canceled_plan_savings: Decimal = logs
            .iter()
            .filter(|l| l.kind == SavingsLogKind::Canceled)
            .map(|l| l.saved_amount)
            .sum();

        Ok(SavingsLog {
            logs,
            summary: SavingsLogSummary {
                total_savings: shared_plan_savings + canceled_plan_savings,
                shared_plan_savings,
                canceled_plan_savings,
            },
            error: join_errors(plans_error, canceled_error),
        })
    }
}
