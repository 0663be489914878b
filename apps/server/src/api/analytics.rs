use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};

use klypp_core::analytics::{AnalyticsSummary, SavingsLog};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

async fn get_summary(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AnalyticsSummary>> {
    let summary = state.analytics_service.get_summary(&user_id)?;
    Ok(Json(summary))
}

async fn get_savings_log(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SavingsLog>> {
    let log = state.analytics_service.get_savings_log(&user_id)?;
    Ok(Json(log))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analytics", get(get_summary))
        .route("/analytics/savings-logs", get(get_savings_log))
}
