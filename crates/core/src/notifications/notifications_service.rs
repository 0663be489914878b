use std::sync::Arc;

use async_trait::async_trait;

use super::notifications_model::{Device, NewDevice, NewNotification, Notification};
use super::notifications_traits::{
    NotificationRepositoryTrait, NotificationServiceTrait, PushDispatcherTrait,
};
use crate::errors::Result;

/// Service for reading and maintaining a user's notifications.
pub struct NotificationService {
    repository: Arc<dyn NotificationRepositoryTrait>,
    dispatcher: Arc<dyn PushDispatcherTrait>,
}

impl NotificationService {
    pub fn new(
        repository: Arc<dyn NotificationRepositoryTrait>,
        dispatcher: Arc<dyn PushDispatcherTrait>,
    ) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }
}

#[async_trait]
impl NotificationServiceTrait for NotificationService {
    fn list_notifications(&self, caller_id: &str) -> Result<Vec<Notification>> {
        self.repository.list_for_user(caller_id)
    }

    async fn create_notification(
        &self,
        new_notification: NewNotification,
    ) -> Result<Notification> {
        let created = self.repository.insert(new_notification.clone()).await?;
        self.dispatcher.dispatch(&new_notification);
        Ok(created)
    }

    async fn mark_notification_read(
        &self,
        caller_id: &str,
        notification_id: &str,
    ) -> Result<Notification> {
        self.repository.mark_read(notification_id, caller_id).await
    }

    async fn mark_all_read(&self, caller_id: &str) -> Result<usize> {
        self.repository.mark_all_read(caller_id).await
    }

    async fn register_device(&self, caller_id: &str, device: NewDevice) -> Result<Device> {
        self.repository.register_device(caller_id, device).await
    }
}
