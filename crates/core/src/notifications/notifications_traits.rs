use async_trait::async_trait;

use super::notifications_model::{Device, NewDevice, NewNotification, Notification};
use crate::errors::Result;

/// Trait defining the contract for notification repository operations.
///
/// Lifecycle notifications (invitation, response, removal) are inserted by
/// the membership/plan repositories inside the same transaction as the
/// state change; `insert` exists for standalone notifications such as
/// renewal reminders.
#[async_trait]
pub trait NotificationRepositoryTrait: Send + Sync {
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Notification>>;
    async fn insert(&self, new_notification: NewNotification) -> Result<Notification>;
    /// Marks one of the recipient's notifications as read. A foreign
    /// notification id behaves like a missing one.
    async fn mark_read(&self, notification_id: &str, user_id: &str) -> Result<Notification>;
    async fn mark_all_read(&self, user_id: &str) -> Result<usize>;
    async fn register_device(&self, user_id: &str, device: NewDevice) -> Result<Device>;
    fn list_device_tokens(&self, user_id: &str) -> Result<Vec<String>>;
}

/// Trait defining the contract for notification service operations.
#[async_trait]
pub trait NotificationServiceTrait: Send + Sync {
    fn list_notifications(&self, caller_id: &str) -> Result<Vec<Notification>>;
    async fn create_notification(&self, new_notification: NewNotification)
        -> Result<Notification>;
    async fn mark_notification_read(
        &self,
        caller_id: &str,
        notification_id: &str,
    ) -> Result<Notification>;
    async fn mark_all_read(&self, caller_id: &str) -> Result<usize>;
    async fn register_device(&self, caller_id: &str, device: NewDevice) -> Result<Device>;
}

/// Seam to the external push-delivery channel.
///
/// Dispatch is fire-and-forget: implementations schedule the delivery and
/// return immediately; delivery failures are logged and never propagated
/// back into the mutation that triggered them.
pub trait PushDispatcherTrait: Send + Sync {
    fn dispatch(&self, notification: &NewNotification);
}

/// Dispatcher that drops everything; used where no delivery channel is
/// configured.
pub struct NoopPushDispatcher;

impl PushDispatcherTrait for NoopPushDispatcher {
    fn dispatch(&self, _notification: &NewNotification) {}
}
