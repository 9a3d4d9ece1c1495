#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, clippy::must_use_candidate, missing_debug_implementations, unreachable_pub)]
use axum::http::{Method, StatusCode};
use classifier_console::config::Surface;
use classifier_console::error::ClientError;
use classifier_console::services::gateway::RequestConfig;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde_json::json;
mod common;

#[tokio::test]
async fn test_rejected_token_clears_session_and_navigates_once() {
    let api = common::MockApi::spawn().await;
    api.on(Method::GET, "/api/v1/stats/today", StatusCode::UNAUTHORIZED, json!({"detail": "Token expired"}));
    let t = common::TestConsole::new(&api, Surface::Admin);
    t.sign_in("stale", 60_000);

    let res = t.console.api().today_stats().await;

    assert!(matches!(res, Err(ClientError::SessionExpired)));
    assert!(t.session_keys_absent());
    assert_eq!(t.navigator.visits(), 1);
    assert_eq!(t.navigator.last().as_deref(), Some("/login.html"));
}

#[tokio::test]
async fn test_bearer_token_attached() {
    let api = common::MockApi::spawn().await;
    api.ok("/api/v1/stats/today", json!({"data": {"total_requests": 5}}));
    let t = common::TestConsole::new(&api, Surface::Admin);
    t.sign_in("tok-123", 60_000);

    let stats = t.console.api().today_stats().await.unwrap();

    assert!((stats.total_requests - 5.0).abs() < f64::EPSILON);
    let sent = api.requests_to("/api/v1/stats/today");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].authorization(), Some("Bearer tok-123"));
    assert!(sent[0].headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_caller_supplied_header_wins() {
    let api = common::MockApi::spawn().await;
    api.ok("/api/v1/health", json!({"status": "healthy"}));
    let t = common::TestConsole::new(&api, Surface::Admin);
    t.sign_in("stored", 60_000);

    let config = RequestConfig::get().with_header(AUTHORIZATION, HeaderValue::from_static("Bearer explicit"));
    let resp = t
        .console
        .api()
        .gateway()
        .authenticated_request(&format!("{}/api/v1/health", api.url), config)
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let sent = api.requests_to("/api/v1/health");
    assert_eq!(sent[0].headers.get_all(AUTHORIZATION).iter().count(), 1);
    assert_eq!(sent[0].authorization(), Some("Bearer explicit"));
}

#[tokio::test]
async fn test_other_error_statuses_pass_through() {
    let api = common::MockApi::spawn().await;
    api.on(Method::GET, "/api/v1/stats/today", StatusCode::INTERNAL_SERVER_ERROR, json!({"detail": "db down"}));
    let t = common::TestConsole::new(&api, Surface::Admin);
    t.sign_in("tok", 60_000);

    let resp = t
        .console
        .api()
        .gateway()
        .authenticated_request(&format!("{}/api/v1/stats/today", api.url), RequestConfig::get())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    match t.console.api().today_stats().await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "db down");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(!t.session_keys_absent());
    assert_eq!(t.navigator.visits(), 0);
}

#[tokio::test]
async fn test_expired_session_blocks_page() {
    let api = common::MockApi::spawn().await;
    let t = common::TestConsole::new(&api, Surface::Admin);
    t.sign_in("old", 0);

    assert!(!t.console.open());
    assert_eq!(t.navigator.visits(), 1);
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn test_public_surface_needs_no_session() {
    let api = common::MockApi::spawn().await;
    api.ok("/api/v1/stats/today", json!({"data": {"total_requests": 1}}));
    let t = common::TestConsole::new(&api, Surface::Public);

    assert!(t.console.open());
    t.console.api().today_stats().await.unwrap();
    assert_eq!(api.requests_to("/api/v1/stats/today")[0].authorization(), None);

    let res = t.console.api().core_metrics().await;
    assert!(matches!(res, Err(ClientError::Unsupported { surface: "public", .. })));
    assert_eq!(api.requests().len(), 1);
    assert_eq!(t.navigator.visits(), 0);
}

#[tokio::test]
async fn test_login_establishes_session() {
    let api = common::MockApi::spawn().await;
    api.on(
        Method::POST,
        "/api/v1/auth/login",
        StatusCode::OK,
        json!({"access_token": "fresh", "token_type": "bearer", "expires_in": 86400}),
    );
    api.ok("/api/v1/stats/cache-efficiency", json!({"data": {}}));
    let t = common::TestConsole::new(&api, Surface::Admin);
    assert!(!t.console.session().has_valid_session());

    let out = t.console.login("alice", "secret").await.unwrap();
    assert!(out.contains("alice"));
    assert!(t.console.session().has_valid_session());
    assert_eq!(t.console.session().username(), "alice");

    let login = &api.requests_to("/api/v1/auth/login")[0];
    let body: serde_json::Value = serde_json::from_slice(&login.body).unwrap();
    assert_eq!(body, json!({"username": "alice", "password": "secret"}));
    assert_eq!(login.authorization(), None);

    t.console.api().cache_efficiency().await.unwrap();
    assert_eq!(api.requests_to("/api/v1/stats/cache-efficiency")[0].authorization(), Some("Bearer fresh"));
}

#[tokio::test]
async fn test_failed_login_does_not_redirect() {
    let api = common::MockApi::spawn().await;
    api.on(Method::POST, "/api/v1/auth/login", StatusCode::UNAUTHORIZED, json!({"detail": "用户名或密码错误"}));
    let t = common::TestConsole::new(&api, Surface::Admin);

    match t.console.login("alice", "wrong").await {
        Err(ClientError::Status { status, message }) => {
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(message, "用户名或密码错误");
        }
        other => panic!("expected rejected credentials, got {other:?}"),
    }
    assert_eq!(t.navigator.visits(), 0);
    assert!(!t.console.session().has_valid_session());
}

#[tokio::test]
async fn test_logout_clears_and_redirects() {
    let api = common::MockApi::spawn().await;
    let t = common::TestConsole::new(&api, Surface::Admin);
    t.sign_in("tok", 60_000);
    assert!(t.console.whoami().contains("ops"));

    let out = t.console.logout().unwrap();
    assert!(out.contains("已退出登录"));
    assert!(t.session_keys_absent());
    assert_eq!(t.navigator.visits(), 1);
    assert!(t.console.whoami().contains("未登录"));
}

#[tokio::test]
async fn test_whoami_reports_expired_session() {
    let api = common::MockApi::spawn().await;
    let t = common::TestConsole::new(&api, Surface::Admin);
    t.sign_in("tok", 0);

    assert!(t.console.whoami().contains("未登录或登录已过期"));
    assert!(!t.session_keys_absent());
    assert_eq!(t.navigator.visits(), 0);
}
