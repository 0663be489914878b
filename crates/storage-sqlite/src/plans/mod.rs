pub mod model;
pub mod repository;

pub use model::PlanDB;
pub use repository::PlanRepository;
