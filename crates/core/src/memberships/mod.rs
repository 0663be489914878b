pub mod memberships_errors;
pub mod memberships_model;
pub mod memberships_service;
pub mod memberships_traits;


pub use memberships_errors::MembershipError;
pub use memberships_model::{
    Invitation, InvitationAction, MemberStatus, NewPlanMember, PlanMember, PlanMemberWithUser,
};
pub use memberships_service::MembershipService;
pub use memberships_traits::{MembershipRepositoryTrait, MembershipServiceTrait};
