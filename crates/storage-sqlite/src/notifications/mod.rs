pub mod model;
pub mod repository;

pub use model::{DeviceDB, NotificationDB};
pub use repository::NotificationRepository;
