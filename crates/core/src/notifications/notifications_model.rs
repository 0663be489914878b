use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::memberships::memberships_model::MemberStatus;

/// Kinds of notifications the lifecycle produces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    PlanInvitation,
    PlanInvitationResponse,
    PlanUpdate,
    Renewal,
    Payment,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::PlanInvitation => "PLAN_INVITATION",
            NotificationType::PlanInvitationResponse => "PLAN_INVITATION_RESPONSE",
            NotificationType::PlanUpdate => "PLAN_UPDATE",
            NotificationType::Renewal => "RENEWAL",
            NotificationType::Payment => "PAYMENT",
        }
    }
}

impl From<&str> for NotificationType {
    fn from(value: &str) -> Self {
        match value {
            "PLAN_INVITATION" => NotificationType::PlanInvitation,
            "PLAN_INVITATION_RESPONSE" => NotificationType::PlanInvitationResponse,
            "RENEWAL" => NotificationType::Renewal,
            "PAYMENT" => NotificationType::Payment,
            _ => NotificationType::PlanUpdate,
        }
    }
}

/// Small structured bag carried alongside a notification. Serialized as
/// JSON; absent fields are omitted from the wire form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inviter_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MemberStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

/// Domain model representing a notification delivered to one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub metadata: NotificationMetadata,
    pub is_read: bool,
    pub created_at: NaiveDateTime,
}

/// Input model for creating a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub metadata: NotificationMetadata,
}

/// A registered push-delivery endpoint for one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub platform: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input model for registering a device token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    pub token: String,
    #[serde(default)]
    pub platform: Option<String>,
}
