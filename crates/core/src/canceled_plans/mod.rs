pub mod canceled_plans_model;
pub mod canceled_plans_traits;

pub use canceled_plans_model::{CanceledPlan, NewCanceledPlan};
pub use canceled_plans_traits::CanceledPlanRepositoryTrait;
