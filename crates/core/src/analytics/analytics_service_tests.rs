use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};
use rust_decimal_macros::dec;

use super::analytics_service::AnalyticsService;
use super::analytics_traits::AnalyticsServiceTrait;
use super::SavingsLogKind;
use crate::canceled_plans::{CanceledPlan, CanceledPlanRepositoryTrait, NewCanceledPlan};
use crate::errors::{DatabaseError, Error, Result};
use crate::memberships::memberships_model::{MemberStatus, PlanMember, PlanMemberWithUser};
use crate::plans::plans_model::{NewPlan, Plan, PlanDetails, PlanUpdate, RenewalFrequency};
use crate::plans::PlanRepositoryTrait;
use crate::users::UserSummary;

fn summary(id: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        name: id.to_string(),
        email: format!("{}@example.com", id),
        username: id.to_string(),
    }
}

fn plan_details(
    id: &str,
    owner_id: &str,
    cost: rust_decimal::Decimal,
    accepted: usize,
) -> PlanDetails {
    let now = Utc::now().naive_utc();
    let members = (0..accepted)
        .map(|i| PlanMemberWithUser {
            member: PlanMember {
                id: format!("{}-m{}", id, i),
                plan_id: id.to_string(),
                user_id: format!("user-{}", i),
                status: MemberStatus::Accepted,
                created_at: now,
                updated_at: now,
            },
            user: summary(&format!("user-{}", i)),
        })
        .collect();
    PlanDetails {
        plan: Plan {
            id: id.to_string(),
            name: format!("{} plan", id),
            cost,
            renewal_frequency: RenewalFrequency::Monthly,
            max_members: 6,
            current_members: accepted as i32 + 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            next_renewal_date: Utc::now().date_naive() + Duration::days(10),
            owner_id: owner_id.to_string(),
            logo_url: None,
            created_at: now,
            updated_at: now,
        },
        owner: summary(owner_id),
        members,
    }
}

struct MockPlanRepository {
    plans: Vec<PlanDetails>,
    fail: bool,
}

#[async_trait]
impl PlanRepositoryTrait for MockPlanRepository {
    async fn insert(
        &self,
        _new_plan: NewPlan,
        _owner_id: &str,
        _next_renewal_date: NaiveDate,
    ) -> Result<Plan> {
        unimplemented!()
    }

    async fn update(&self, _update: PlanUpdate, _next_renewal_date: NaiveDate) -> Result<Plan> {
        unimplemented!()
    }

    async fn set_logo_url(&self, _plan_id: &str, _logo_url: Option<String>) -> Result<()> {
        unimplemented!()
    }

    async fn set_next_renewal_date(&self, _plan_id: &str, _date: NaiveDate) -> Result<()> {
        unimplemented!()
    }

    fn get_by_id(&self, _plan_id: &str) -> Result<Plan> {
        unimplemented!()
    }

    fn get_details(&self, _plan_id: &str) -> Result<PlanDetails> {
        unimplemented!()
    }

    fn list_for_user(&self, _user_id: &str) -> Result<Vec<PlanDetails>> {
        if self.fail {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "plans table unavailable".to_string(),
            )));
        }
        Ok(self.plans.clone())
    }

    fn list_due_for_renewal(&self, _on_or_before: NaiveDate) -> Result<Vec<Plan>> {
        unimplemented!()
    }

    async fn delete_cascade(&self, _plan_id: &str, _snapshot: NewCanceledPlan) -> Result<()> {
        unimplemented!()
    }
}

struct MockCanceledPlanRepository {
    rows: Vec<CanceledPlan>,
    fail: bool,
}

impl CanceledPlanRepositoryTrait for MockCanceledPlanRepository {
    fn list_since(&self, _user_id: &str, since: NaiveDateTime) -> Result<Vec<CanceledPlan>> {
        if self.fail {
            return Err(Error::Database(DatabaseError::QueryFailed(
                "canceled_plans table unavailable".to_string(),
            )));
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| r.canceled_at >= since)
            .cloned()
            .collect())
    }
}

fn canceled(
    id: &str,
    cost: rust_decimal::Decimal,
    member_count: i32,
    frequency: RenewalFrequency,
    days_ago: i64,
) -> CanceledPlan {
    CanceledPlan {
        id: id.to_string(),
        name: format!("{} plan", id),
        cost,
        renewal_frequency: frequency,
        user_id: "me".to_string(),
        member_count,
        was_owner: true,
        original_plan_id: format!("orig-{}", id),
        canceled_at: Utc::now().naive_utc() - Duration::days(days_ago),
    }
}

fn service(
    plans: Vec<PlanDetails>,
    plans_fail: bool,
    rows: Vec<CanceledPlan>,
    canceled_fail: bool,
) -> AnalyticsService {
    AnalyticsService::new(
        Arc::new(MockPlanRepository {
            plans,
            fail: plans_fail,
        }),
        Arc::new(MockCanceledPlanRepository {
            rows,
            fail: canceled_fail,
        }),
    )
}

#[test]
fn summary_splits_costs_across_members() {
    // $30 plan, 2 accepted members + owner: share $10, savings $20.
    // $15.99 solo plan: full share, no savings.
    let svc = service(
        vec![
            plan_details("netflix", "me", dec!(30), 2),
            plan_details("solo", "me", dec!(15.99), 0),
        ],
        false,
        vec![],
        false,
    );

    let summary = svc.get_summary("me").unwrap();
    assert_eq!(summary.current_month_spending, dec!(25.99));
    assert_eq!(summary.plan_count, 2);
    assert_eq!(summary.shared_plan_savings, dec!(20.00));
    assert_eq!(summary.canceled_plan_count, 0);
    assert_eq!(summary.total_savings, dec!(20.00));
    assert!(summary.error.is_none());
}

#[test]
fn summary_includes_recent_cancellations_with_fallbacks() {
    let svc = service(
        vec![],
        false,
        vec![
            // Stored member count: 30 / (2 + 1) = 10.
            canceled("a", dec!(30), 2, RenewalFrequency::Yearly, 10),
            // Monthly heuristic: 20 / 2 = 10.
            canceled("b", dec!(20), 0, RenewalFrequency::Monthly, 20),
            // No data, not monthly: full cost.
            canceled("c", dec!(5), 0, RenewalFrequency::Yearly, 30),
        ],
        false,
    );

    let summary = svc.get_summary("me").unwrap();
    assert_eq!(summary.canceled_plan_count, 3);
    assert_eq!(summary.canceled_plan_savings, dec!(25.00));
    assert_eq!(summary.total_savings, dec!(25.00));
}

#[test]
fn summary_ignores_cancellations_outside_window() {
    let svc = service(
        vec![],
        false,
        vec![canceled("old", dec!(30), 2, RenewalFrequency::Monthly, 200)],
        false,
    );

    let summary = svc.get_summary("me").unwrap();
    assert_eq!(summary.canceled_plan_count, 0);
    assert_eq!(summary.canceled_plan_savings, dec!(0));
}

#[test]
fn summary_degrades_when_canceled_source_fails() {
    let svc = service(
        vec![plan_details("netflix", "me", dec!(30), 2)],
        false,
        vec![],
        true,
    );

    let summary = svc.get_summary("me").unwrap();
    // Shared section still reported.
    assert_eq!(summary.shared_plan_savings, dec!(20.00));
    assert_eq!(summary.current_month_spending, dec!(10.00));
    // Canceled section zeroed, annotated.
    assert_eq!(summary.canceled_plan_count, 0);
    assert_eq!(summary.canceled_plan_savings, dec!(0));
    assert!(summary.error.is_some());
}

#[test]
fn summary_degrades_when_plans_source_fails() {
    let svc = service(
        vec![],
        true,
        vec![canceled("a", dec!(30), 2, RenewalFrequency::Monthly, 5)],
        false,
    );

    let summary = svc.get_summary("me").unwrap();
    assert_eq!(summary.plan_count, 0);
    assert_eq!(summary.current_month_spending, dec!(0));
    assert_eq!(summary.canceled_plan_savings, dec!(10.00));
    assert!(summary.error.is_some());
}

#[test]
fn savings_log_lists_shared_and_canceled_entries() {
    let svc = service(
        vec![
            plan_details("netflix", "me", dec!(30), 2),
            // Solo plans are not savings.
            plan_details("solo", "me", dec!(9.99), 0),
        ],
        false,
        vec![canceled("gym", dec!(40), 1, RenewalFrequency::Monthly, 15)],
        false,
    );

    let log = svc.get_savings_log("me").unwrap();
    assert_eq!(log.logs.len(), 2);

    let shared = log
        .logs
        .iter()
        .find(|l| l.kind == SavingsLogKind::Shared)
        .unwrap();
    assert_eq!(shared.user_share, dec!(10.00));
    assert_eq!(shared.saved_amount, dec!(20.00));
    assert_eq!(shared.is_owner, Some(true));

    let canceled_entry = log
        .logs
        .iter()
        .find(|l| l.kind == SavingsLogKind::Canceled)
        .unwrap();
    assert_eq!(canceled_entry.user_share, dec!(20.00));
    assert_eq!(canceled_entry.saved_amount, dec!(20.00));
    assert_eq!(canceled_entry.was_owner, Some(true));

    assert_eq!(log.summary.shared_plan_savings, dec!(20.00));
    assert_eq!(log.summary.canceled_plan_savings, dec!(20.00));
    assert_eq!(log.summary.total_savings, dec!(40.00));
}

#[test]
fn savings_log_sorts_newest_first() {
    let svc = service(
        vec![plan_details("netflix", "me", dec!(30), 2)],
        false,
        vec![canceled("gym", dec!(40), 1, RenewalFrequency::Monthly, 60)],
        false,
    );

    let log = svc.get_savings_log("me").unwrap();
    // Shared entry is dated at the upcoming renewal, canceled 60 days back.
    assert_eq!(log.logs[0].kind, SavingsLogKind::Shared);
    assert_eq!(log.logs[1].kind, SavingsLogKind::Canceled);
}
