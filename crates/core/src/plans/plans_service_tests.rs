use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;

use super::plans_model::{
    NewPlan, Plan, PlanDetails, PlanOverview, PlanUpdate, RenewalFrequency,
};
use super::plans_service::PlanService;
use super::plans_traits::{PlanRepositoryTrait, PlanServiceTrait};
use super::PlanError;
use crate::canceled_plans::NewCanceledPlan;
use crate::errors::{Error, Result};
use crate::memberships::memberships_model::{MemberStatus, PlanMember, PlanMemberWithUser};
use crate::users::UserSummary;

#[derive(Default)]
struct MockPlanRepository {
    plans: Mutex<Vec<Plan>>,
    members: Mutex<Vec<PlanMemberWithUser>>,
    snapshots: Mutex<Vec<NewCanceledPlan>>,
}

fn user_summary(id: &str) -> UserSummary {
    UserSummary {
        id: id.to_string(),
        name: id.to_string(),
        email: format!("{}@example.com", id),
        username: id.to_string(),
    }
}

impl MockPlanRepository {
    fn add_plan(&self, id: &str, owner_id: &str) -> Plan {
        let now = Utc::now().naive_utc();
        let plan = Plan {
            id: id.to_string(),
            name: format!("{} plan", id),
            cost: dec!(30),
            renewal_frequency: RenewalFrequency::Monthly,
            max_members: 4,
            current_members: 1,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            next_renewal_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            owner_id: owner_id.to_string(),
            logo_url: None,
            created_at: now,
            updated_at: now,
        };
        self.plans.lock().unwrap().push(plan.clone());
        plan
    }

    fn add_accepted_member(&self, plan_id: &str, user_id: &str) {
        let now = Utc::now().naive_utc();
        self.members.lock().unwrap().push(PlanMemberWithUser {
            member: PlanMember {
                id: format!("{}-{}", plan_id, user_id),
                plan_id: plan_id.to_string(),
                user_id: user_id.to_string(),
                status: MemberStatus::Accepted,
                created_at: now,
                updated_at: now,
            },
            user: user_summary(user_id),
        });
    }
}

#[async_trait]
impl PlanRepositoryTrait for MockPlanRepository {
    async fn insert(
        &self,
        new_plan: NewPlan,
        owner_id: &str,
        next_renewal_date: NaiveDate,
    ) -> Result<Plan> {
        let now = Utc::now().naive_utc();
        let plan = Plan {
            id: new_plan.id.unwrap_or_else(|| "generated".to_string()),
            name: new_plan.name,
            cost: new_plan.cost,
            renewal_frequency: new_plan.renewal_frequency,
            max_members: new_plan.max_members,
            current_members: 1,
            start_date: new_plan.start_date,
            next_renewal_date,
            owner_id: owner_id.to_string(),
            logo_url: new_plan.logo_url,
            created_at: now,
            updated_at: now,
        };
        self.plans.lock().unwrap().push(plan.clone());
        Ok(plan)
    }

    async fn update(&self, update: PlanUpdate, next_renewal_date: NaiveDate) -> Result<Plan> {
        let mut plans = self.plans.lock().unwrap();
        let plan = plans
            .iter_mut()
            .find(|p| Some(&p.id) == update.id.as_ref())
            .ok_or_else(|| PlanError::NotFound("missing".to_string()))?;
        plan.name = update.name;
        plan.cost = update.cost;
        plan.renewal_frequency = update.renewal_frequency;
        plan.max_members = update.max_members;
        plan.start_date = update.start_date;
        plan.next_renewal_date = next_renewal_date;
        if update.logo_url.is_some() {
            plan.logo_url = update.logo_url;
        }
        Ok(plan.clone())
    }

    async fn set_logo_url(&self, plan_id: &str, logo_url: Option<String>) -> Result<()> {
        let mut plans = self.plans.lock().unwrap();
        if let Some(plan) = plans.iter_mut().find(|p| p.id == plan_id) {
            plan.logo_url = logo_url;
        }
        Ok(())
    }

    async fn set_next_renewal_date(&self, _plan_id: &str, _date: NaiveDate) -> Result<()> {
        unimplemented!()
    }

    fn get_by_id(&self, plan_id: &str) -> Result<Plan> {
        self.plans
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == plan_id)
            .cloned()
            .ok_or_else(|| PlanError::NotFound(plan_id.to_string()).into())
    }

    fn get_details(&self, plan_id: &str) -> Result<PlanDetails> {
        let plan = self.get_by_id(plan_id)?;
        let members = self
            .members
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.member.plan_id == plan_id)
            .cloned()
            .collect();
        let owner = user_summary(&plan.owner_id);
        Ok(PlanDetails {
            plan,
            owner,
            members,
        })
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<PlanDetails>> {
        let ids: Vec<String> = self
            .plans
            .lock()
            .unwrap()
            .iter()
            .filter(|p| {
                p.owner_id == user_id
                    || self.members.lock().unwrap().iter().any(|m| {
                        m.member.plan_id == p.id
                            && m.member.user_id == user_id
                            && m.member.status == MemberStatus::Accepted
                    })
            })
            .map(|p| p.id.clone())
            .collect();
        ids.iter().map(|id| self.get_details(id)).collect()
    }

    fn list_due_for_renewal(&self, _on_or_before: NaiveDate) -> Result<Vec<Plan>> {
        unimplemented!()
    }

    async fn delete_cascade(&self, plan_id: &str, snapshot: NewCanceledPlan) -> Result<()> {
        self.snapshots.lock().unwrap().push(snapshot);
        self.plans.lock().unwrap().retain(|p| p.id != plan_id);
        Ok(())
    }
}

fn new_plan(name: &str, start: NaiveDate, frequency: RenewalFrequency) -> NewPlan {
    NewPlan {
        id: None,
        name: name.to_string(),
        cost: dec!(30),
        renewal_frequency: frequency,
        max_members: 4,
        start_date: start,
        logo_url: None,
    }
}

#[tokio::test]
async fn create_plan_computes_next_renewal_date() {
    let repo = Arc::new(MockPlanRepository::default());
    let service = PlanService::new(repo.clone());

    let plan = service
        .create_plan(
            "owner",
            new_plan(
                "Netflix",
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                RenewalFrequency::Monthly,
            ),
        )
        .await
        .unwrap();

    assert_eq!(
        plan.next_renewal_date,
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    );
    assert_eq!(plan.owner_id, "owner");
    assert_eq!(plan.current_members, 1);
}

#[tokio::test]
async fn create_plan_rejects_invalid_input() {
    let service = PlanService::new(Arc::new(MockPlanRepository::default()));

    let mut bad = new_plan(
        "",
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        RenewalFrequency::Monthly,
    );
    let err = service.create_plan("owner", bad.clone()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    bad.name = "Netflix".to_string();
    bad.max_members = 0;
    let err = service.create_plan("owner", bad).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn update_by_non_owner_is_rejected() {
    let repo = Arc::new(MockPlanRepository::default());
    repo.add_plan("netflix", "owner");
    let service = PlanService::new(repo);

    let update = PlanUpdate {
        id: Some("netflix".to_string()),
        name: "Netflix 4K".to_string(),
        cost: dec!(45),
        renewal_frequency: RenewalFrequency::Yearly,
        max_members: 5,
        start_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        logo_url: None,
    };
    let err = service.update_plan("intruder", update).await.unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::NotAuthorized(_))));
}

#[tokio::test]
async fn update_recomputes_renewal_date() {
    let repo = Arc::new(MockPlanRepository::default());
    repo.add_plan("netflix", "owner");
    let service = PlanService::new(repo);

    let update = PlanUpdate {
        id: Some("netflix".to_string()),
        name: "Netflix".to_string(),
        cost: dec!(30),
        renewal_frequency: RenewalFrequency::Quarterly,
        max_members: 4,
        start_date: NaiveDate::from_ymd_opt(2024, 11, 30).unwrap(),
        logo_url: None,
    };
    let updated = service.update_plan("owner", update).await.unwrap();
    assert_eq!(
        updated.next_renewal_date,
        NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
    );
}

#[tokio::test]
async fn get_plan_is_limited_to_owner_and_members() {
    let repo = Arc::new(MockPlanRepository::default());
    repo.add_plan("netflix", "owner");
    repo.add_accepted_member("netflix", "friend");
    let service = PlanService::new(repo);

    assert!(service.get_plan("owner", "netflix").is_ok());
    assert!(service.get_plan("friend", "netflix").is_ok());
    let err = service.get_plan("stranger", "netflix").unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::NotAuthorized(_))));
}

#[tokio::test]
async fn overview_annotates_share_savings_and_ownership() {
    let repo = Arc::new(MockPlanRepository::default());
    repo.add_plan("netflix", "owner");
    repo.add_accepted_member("netflix", "a");
    repo.add_accepted_member("netflix", "b");
    let service = PlanService::new(repo);

    let overview = service.get_plan("a", "netflix").unwrap();
    assert_eq!(overview.member_count, 3);
    assert_eq!(overview.share, dec!(10.00));
    assert_eq!(overview.savings, dec!(20.00));
    assert!(!overview.is_owner);

    let owner_view = service.get_plan("owner", "netflix").unwrap();
    assert!(owner_view.is_owner);
}

#[tokio::test]
async fn delete_plan_archives_owner_snapshot() {
    let repo = Arc::new(MockPlanRepository::default());
    repo.add_plan("netflix", "owner");
    let service = PlanService::new(repo.clone());

    let err = service.delete_plan("stranger", "netflix").await.unwrap_err();
    assert!(matches!(err, Error::Plan(PlanError::NotAuthorized(_))));

    service.delete_plan("owner", "netflix").await.unwrap();
    let snapshots = repo.snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].was_owner);
    assert_eq!(snapshots[0].user_id, "owner");
    assert!(repo.plans.lock().unwrap().is_empty());
}

#[test]
fn overview_computes_days_until_renewal() {
    let repo = MockPlanRepository::default();
    let plan = repo.add_plan("netflix", "owner");
    let details = PlanDetails {
        plan,
        owner: user_summary("owner"),
        members: vec![],
    };
    let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
    let overview = PlanOverview::from_details(details, "owner", today);
    assert_eq!(overview.renews_in, 12);
}
