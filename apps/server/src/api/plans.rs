use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};

use klypp_core::plans::{NewPlan, Plan, PlanOverview, PlanUpdate};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::logo::spawn_logo_refresh;
use crate::main_lib::AppState;

async fn list_plans(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PlanOverview>>> {
    let plans = state.plan_service.list_plans(&user_id)?;
    Ok(Json(plans))
}

async fn create_plan(
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPlan>,
) -> ApiResult<Json<Plan>> {
    let has_explicit_logo = payload.logo_url.is_some();
    let plan = state.plan_service.create_plan(&user_id, payload).await?;
    if !has_explicit_logo {
        spawn_logo_refresh(state.clone(), plan.id.clone(), plan.name.clone());
    }
    Ok(Json(plan))
}

async fn get_plan(
    Path(id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PlanOverview>> {
    let plan = state.plan_service.get_plan(&user_id, &id)?;
    Ok(Json(plan))
}

async fn update_plan(
    Path(id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(mut payload): Json<PlanUpdate>,
) -> ApiResult<Json<Plan>> {
    payload.id = Some(id.clone());
    let has_explicit_logo = payload.logo_url.is_some();
    let previous_name = state.plan_service.get_plan(&user_id, &id)?.plan.name;

    let updated = state.plan_service.update_plan(&user_id, payload).await?;

    // A renamed plan refreshes its looked-up logo unless one was supplied.
    if !has_explicit_logo && updated.name != previous_name {
        spawn_logo_refresh(state.clone(), updated.id.clone(), updated.name.clone());
    }
    Ok(Json(updated))
}

async fn delete_plan(
    Path(id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.plan_service.delete_plan(&user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans", get(list_plans).post(create_plan))
        .route(
            "/plans/{id}",
            get(get_plan).put(update_plan).delete(delete_plan),
        )
}
