pub mod notifications_model;
pub mod notifications_service;
pub mod notifications_traits;

pub use notifications_model::{
    Device, NewDevice, NewNotification, Notification, NotificationMetadata, NotificationType,
};
pub use notifications_service::NotificationService;
pub use notifications_traits::{
    NoopPushDispatcher, NotificationRepositoryTrait, NotificationServiceTrait,
    PushDispatcherTrait,
};
