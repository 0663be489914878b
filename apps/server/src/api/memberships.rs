use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use klypp_core::memberships::{Invitation, InvitationAction, PlanMember, PlanMemberWithUser};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Deserialize)]
struct InviteRequest {
    email: String,
}

#[derive(Deserialize)]
struct InvitationResponseRequest {
    action: InvitationAction,
}

async fn invite_member(
    Path(plan_id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InviteRequest>,
) -> ApiResult<Json<PlanMember>> {
    let member = state
        .membership_service
        .invite_member(&user_id, &plan_id, &payload.email)
        .await?;
    Ok(Json(member))
}

async fn list_plan_members(
    Path(plan_id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PlanMemberWithUser>>> {
    let members = state
        .membership_service
        .list_plan_members(&user_id, &plan_id)?;
    Ok(Json(members))
}

async fn get_invitation(
    Path(member_id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Invitation>> {
    let invitation = state
        .membership_service
        .get_invitation(&user_id, &member_id)?;
    Ok(Json(invitation))
}

async fn respond_to_invitation(
    Path(member_id): Path<String>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<InvitationResponseRequest>,
) -> ApiResult<Json<PlanMember>> {
    let member = state
        .membership_service
        .respond_to_invitation(&user_id, &member_id, payload.action)
        .await?;
    Ok(Json(member))
}

/// Covers both the owner removing a member and a member leaving.
async fn remove_member(
    Path((plan_id, member_user_id)): Path<(String, String)>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state
        .membership_service
        .remove_member(&user_id, &plan_id, &member_user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/plans/{id}/invite", post(invite_member))
        .route("/plans/{id}/members", get(list_plan_members))
        .route("/plans/{id}/members/{user_id}", delete(remove_member))
        .route(
            "/plans/invitations/{member_id}",
            get(get_invitation).put(respond_to_invitation),
        )
}
