//! Database models for notifications and device tokens.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use klypp_core::notifications::{
    Device, NewDevice, NewNotification, Notification, NotificationMetadata, NotificationType,
};

/// Database model for notifications. The metadata bag is stored as a JSON
/// TEXT column.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NotificationDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub metadata: Option<String>,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

impl NotificationDB {
    pub fn from_new(new_notification: NewNotification) -> Self {
        let metadata_json = serde_json::to_string(&new_notification.metadata).ok();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: new_notification.user_id,
            title: new_notification.title,
            message: new_notification.message,
            notification_type: new_notification.notification_type.as_str().to_string(),
            metadata: metadata_json,
            is_read: false,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Parses the stored metadata bag, tolerating missing or corrupt JSON.
    pub fn parsed_metadata(&self) -> NotificationMetadata {
        match &self.metadata {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                error!("Failed to parse notification metadata '{}': {}", raw, e);
                NotificationMetadata::default()
            }),
            None => NotificationMetadata::default(),
        }
    }
}

impl From<NotificationDB> for Notification {
    fn from(db: NotificationDB) -> Self {
        let metadata = db.parsed_metadata();
        Self {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            message: db.message,
            notification_type: NotificationType::from(db.notification_type.as_str()),
            metadata,
            is_read: db.is_read,
            created_at: db.created_at,
        }
    }
}

/// Database model for registered device tokens.
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::devices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DeviceDB {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub platform: Option<String>,
    pub created_at: NaiveDateTime,
}

impl DeviceDB {
    pub fn from_new(owner_id: &str, new_device: NewDevice) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: owner_id.to_string(),
            token: new_device.token,
            platform: new_device.platform,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

impl From<DeviceDB> for Device {
    fn from(db: DeviceDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            token: db.token,
            platform: db.platform,
            created_at: db.created_at,
        }
    }
}
