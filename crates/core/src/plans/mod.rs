pub mod plans_errors;
pub mod plans_model;
pub mod plans_service;
pub mod plans_traits;
pub mod renewal;

#[cfg(test)]
mod plans_service_tests;

pub use plans_errors::PlanError;
pub use plans_model::{
    NewPlan, Plan, PlanDetails, PlanOverview, PlanUpdate, RenewalFrequency,
};
pub use plans_service::PlanService;
pub use plans_traits::{PlanRepositoryTrait, PlanServiceTrait};
