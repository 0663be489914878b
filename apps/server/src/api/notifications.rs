use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use klypp_core::notifications::{Device, NewDevice, Notification};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadRequest {
    notification_id: String,
}

async fn list_notifications(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Notification>>> {
    let notifications = state.notification_service.list_notifications(&user_id)?;
    Ok(Json(notifications))
}

async fn mark_notification_read(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MarkReadRequest>,
) -> ApiResult<Json<Notification>> {
    let notification = state
        .notification_service
        .mark_notification_read(&user_id, &payload.notification_id)
        .await?;
    Ok(Json(notification))
}

async fn mark_all_read(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<serde_json::Value>> {
    let updated = state.notification_service.mark_all_read(&user_id).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}

async fn register_device(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewDevice>,
) -> ApiResult<Json<Device>> {
    let device = state
        .notification_service
        .register_device(&user_id, payload)
        .await?;
    Ok(Json(device))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/notifications",
            get(list_notifications).patch(mark_notification_read),
        )
        .route("/notifications/read-all", post(mark_all_read))
        .route("/devices", post(register_device))
}
