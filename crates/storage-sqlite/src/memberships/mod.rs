pub mod model;
pub mod repository;

pub use model::PlanMemberDB;
pub use repository::MembershipRepository;
