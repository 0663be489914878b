use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use klypp_server::{api::app_router, build_state, config::Config};

fn test_config(tmp: &TempDir) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().to_string_lossy().to_string(),
        jwt_secret: vec![7u8; 32],
        token_ttl: std::time::Duration::from_secs(3600),
        cors_allow: vec!["*".to_string()],
        request_timeout: std::time::Duration::from_secs(30),
        logo_lookup_enabled: false,
        renewal_rollover_enabled: false,
    }
}

async fn build_test_router() -> (Router, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = test_config(&tmp);
    let state = build_state(&config).await.unwrap();
    (app_router(state, &config), tmp)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn signup_and_login(app: &Router, name: &str, email: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/v1/auth/signup",
        None,
        Some(json!({ "name": name, "email": email, "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "hunter2hunter2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["accessToken"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (app, _tmp) = build_test_router().await;

    let (status, _) = send(&app, Method::GET, "/api/v1/plans", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/v1/plans", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/api/v1/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn signup_login_and_me() {
    let (app, _tmp) = build_test_router().await;
    let token = signup_and_login(&app, "John Doe", "john@example.com").await;

    let (status, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "john@example.com");
    assert_eq!(me["username"], "johndoe");
    assert!(me.get("passwordHash").is_none());

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "john@example.com", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Duplicate email is a conflict.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/signup",
        None,
        Some(json!({ "name": "John", "email": "john@example.com", "password": "whatever1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn plan_and_invitation_flow_over_http() {
    let (app, _tmp) = build_test_router().await;
    let owner_token = signup_and_login(&app, "Owner", "owner@example.com").await;
    let friend_token = signup_and_login(&app, "Friend", "friend@example.com").await;

    // Create a plan with room for the owner and one member.
    let (status, plan) = send(
        &app,
        Method::POST,
        "/api/v1/plans",
        Some(&owner_token),
        Some(json!({
            "name": "Netflix",
            "cost": 30.0,
            "renewalFrequency": "monthly",
            "maxMembers": 2,
            "startDate": "2024-01-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plan["nextRenewalDate"], "2024-02-29");
    let plan_id = plan["id"].as_str().unwrap().to_string();

    // The friend cannot see it yet.
    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/plans/{plan_id}"),
        Some(&friend_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Invite the friend; only the owner may do that.
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/plans/{plan_id}/invite"),
        Some(&friend_token),
        Some(json!({ "email": "owner@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, member) = send(
        &app,
        Method::POST,
        &format!("/api/v1/plans/{plan_id}/invite"),
        Some(&owner_token),
        Some(json!({ "email": "friend@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["status"], "PENDING");
    let member_id = member["id"].as_str().unwrap().to_string();

    // The invitation shows up in the friend's notifications.
    let (status, notifications) = send(
        &app,
        Method::GET,
        "/api/v1/notifications",
        Some(&friend_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notifications[0]["type"], "PLAN_INVITATION");

    // Accept it.
    let (status, accepted) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/plans/invitations/{member_id}"),
        Some(&friend_token),
        Some(json!({ "action": "ACCEPT" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "ACCEPTED");

    // Second response conflicts.
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/api/v1/plans/invitations/{member_id}"),
        Some(&friend_token),
        Some(json!({ "action": "DECLINE" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Both sides now list the plan, annotated per caller.
    let (status, plans) = send(&app, Method::GET, "/api/v1/plans", Some(&friend_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plans.as_array().unwrap().len(), 1);
    assert_eq!(plans[0]["isOwner"], false);
    assert_eq!(plans[0]["memberCount"], 2);
    assert_eq!(plans[0]["share"], 15.0);
    assert_eq!(plans[0]["savings"], 15.0);
    assert!(plans[0]["renewsIn"].is_i64());

    // Plan is full now: inviting a third user conflicts.
    signup_and_login(&app, "Third", "third@example.com").await;
    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/v1/plans/{plan_id}/invite"),
        Some(&owner_token),
        Some(json!({ "email": "third@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Analytics reflect the split.
    let (status, analytics) = send(
        &app,
        Method::GET,
        "/api/v1/analytics",
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["planCount"], 1);
    assert_eq!(analytics["currentMonthSpending"], 15.0);
    assert_eq!(analytics["sharedPlanSavings"], 15.0);

    // The friend leaves; the owner deletes the plan.
    let friend_id = {
        let (_, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&friend_token), None).await;
        me["id"].as_str().unwrap().to_string()
    };
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/plans/{plan_id}/members/{friend_id}"),
        Some(&friend_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/v1/plans/{plan_id}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/v1/plans/{plan_id}"),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The friend's savings log records the voluntary departure.
    let (status, log) = send(
        &app,
        Method::GET,
        "/api/v1/analytics/savings-logs",
        Some(&friend_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(log["logs"][0]["type"], "canceled");
}
