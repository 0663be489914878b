//! Fire-and-forget push dispatch.
//!
//! The actual delivery channel (FCM or similar) is an external
//! collaborator; this implementation resolves the recipient's registered
//! device tokens and hands the message over in a detached task. Failures
//! are logged and never reach the mutation that triggered the dispatch.

use std::sync::Arc;

use klypp_core::notifications::{
    NewNotification, NotificationRepositoryTrait, PushDispatcherTrait,
};

pub struct DevicePushDispatcher {
    notifications: Arc<dyn NotificationRepositoryTrait>,
}

impl DevicePushDispatcher {
    pub fn new(notifications: Arc<dyn NotificationRepositoryTrait>) -> Self {
        Self { notifications }
    }
}

fn token_suffix(token: &str) -> &str {
    token
        .get(token.len().saturating_sub(6)..)
        .unwrap_or("******")
}

impl PushDispatcherTrait for DevicePushDispatcher {
    fn dispatch(&self, notification: &NewNotification) {
        let repository = self.notifications.clone();
        let notification = notification.clone();
        tokio::spawn(async move {
            match repository.list_device_tokens(&notification.user_id) {
                Ok(tokens) if tokens.is_empty() => {
                    tracing::debug!(
                        user_id = %notification.user_id,
                        "no registered devices, skipping push dispatch"
                    );
                }
                Ok(tokens) => {
                    for token in tokens {
                        tracing::info!(
                            user_id = %notification.user_id,
                            token = %token_suffix(&token),
                            title = %notification.title,
                            "dispatching push notification"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %notification.user_id,
                        "failed to load device tokens for push dispatch: {}",
                        e
                    );
                }
            }
        });
    }
}
