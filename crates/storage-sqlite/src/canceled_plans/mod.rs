pub mod model;
pub mod repository;

pub use model::CanceledPlanDB;
pub use repository::CanceledPlanRepository;
