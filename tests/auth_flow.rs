//! Session lifecycle behavior
//!
//! Login non-enumeration, cookie attributes, refresh-token rotation with
//! reuse detection, best-effort logout, and role enforcement.

mod common;

use common::*;
use serde_json::json;
use stockroom::auth::JwtConfig;
use stockroom::{JwtService, Role};

#[tokio::test]
async fn login_sets_both_session_cookies() {
    let app = spawn_app().await;

    let resp = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD })),
        )
        .await;
    assert_eq!(resp.status(), 200);

    for name in ["access_token", "refresh_token"] {
        let raw = set_cookie_raw(&resp, name).expect("session cookie missing");
        assert!(raw.contains("HttpOnly"), "{name} must be HttpOnly");
        assert!(raw.contains("Path=/"), "{name} must span the whole API");
        // cookie lifetime equals the refresh-token TTL from the config
        assert!(raw.contains("Max-Age=3600"), "unexpected lifetime: {raw}");
        assert!(!raw.contains("Secure"), "Secure is off in test config");
    }

    let body = body_json(resp).await;
    assert_eq!(body["status"], 200);
    assert!(body["data"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = spawn_app().await;
    seed_user(&app.state, "alice", Role::Basic).await;

    let unknown_user = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "whatever1" })),
        )
        .await;
    let wrong_password = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "alice", "password": "wrong-password" })),
        )
        .await;

    // same status, same body; the endpoint must not leak which part failed
    assert_eq!(unknown_user.status(), 404);
    assert_eq!(wrong_password.status(), 404);
    assert_eq!(
        body_json(unknown_user).await,
        body_json(wrong_password).await
    );
}

#[tokio::test]
async fn login_rejects_blank_credentials() {
    let app = spawn_app().await;

    let resp = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": "", "password": "" })),
        )
        .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn me_requires_authentication() {
    let app = spawn_app().await;

    let resp = app.request("GET", "/auth/me", None, None).await;
    assert_eq!(resp.status(), 401);
    assert_eq!(
        resp.headers()
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok()),
        Some("Bearer")
    );

    let session = app.login_admin().await;
    let resp = app
        .request("GET", "/auth/me", Some(&session.cookie_header()), None)
        .await;
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["id"], session.user_id.as_str());
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn garbage_access_cookie_is_unauthorized() {
    let app = spawn_app().await;

    let resp = app
        .request(
            "GET",
            "/auth/me",
            Some("access_token=not-a-jwt; refresh_token=whatever"),
            None,
        )
        .await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn refresh_rotates_and_rejects_reuse() {
    let app = spawn_app().await;
    let session = app.login_admin().await;

    let resp = app
        .request("POST", "/auth/refresh", Some(&session.cookie_header()), None)
        .await;
    assert_eq!(resp.status(), 204);
    let rotated_access = set_cookie(&resp, "access_token").expect("access cookie missing");
    let rotated_refresh = set_cookie(&resp, "refresh_token").expect("refresh cookie missing");
    assert_ne!(rotated_refresh, session.refresh, "refresh token must rotate");

    // replaying the pre-rotation pair fails closed
    let resp = app
        .request("POST", "/auth/refresh", Some(&session.cookie_header()), None)
        .await;
    assert_eq!(resp.status(), 403);

    // the rotated pair still works
    let rotated = format!("access_token={rotated_access}; refresh_token={rotated_refresh}");
    let resp = app.request("POST", "/auth/refresh", Some(&rotated), None).await;
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn refresh_requires_both_cookies() {
    let app = spawn_app().await;
    let session = app.login_admin().await;

    let resp = app.request("POST", "/auth/refresh", None, None).await;
    assert_eq!(resp.status(), 401);

    let only_access = format!("access_token={}", session.access);
    let resp = app
        .request("POST", "/auth/refresh", Some(&only_access), None)
        .await;
    assert_eq!(resp.status(), 401);

    let only_refresh = format!("refresh_token={}", session.refresh);
    let resp = app
        .request("POST", "/auth/refresh", Some(&only_refresh), None)
        .await;
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn refresh_rejects_foreign_access_token() {
    let app = spawn_app().await;
    let session = app.login_admin().await;

    // signed with a different key, for the same user id
    let forger = JwtService::with_config(JwtConfig {
        secret: "a-completely-different-secret-key-xyz".to_string(),
        access_ttl_minutes: 15,
    });
    let forged = forger
        .generate_access_token(&session.user_id, Role::Admin)
        .expect("failed to forge token");

    let cookies = format!("access_token={forged}; refresh_token={}", session.refresh);
    let resp = app.request("POST", "/auth/refresh", Some(&cookies), None).await;
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn expired_access_token_still_refreshes() {
    let app = spawn_app().await;
    let session = app.login_admin().await;

    // same key, already-expired token; only the refresh token carries state
    let expired_signer = JwtService::with_config(JwtConfig {
        secret: JWT_SECRET.to_string(),
        access_ttl_minutes: -5,
    });
    let expired = expired_signer
        .generate_access_token(&session.user_id, Role::Admin)
        .expect("failed to sign token");

    let refreshed = app
        .state
        .sessions()
        .refresh(&expired, &session.refresh)
        .await
        .expect("refresh with expired access token should succeed");
    assert_eq!(refreshed.user_id, session.user_id);
    assert_ne!(refreshed.refresh_token, session.refresh);
}

#[tokio::test]
async fn expired_refresh_token_is_rejected() {
    let app = spawn_app().await;
    let session = app.login_admin().await;

    // age the stored token past its expiry
    sqlx::query("UPDATE users SET refresh_token_expires_at = datetime('now', '-1 hour') WHERE id = ?")
        .bind(&session.user_id)
        .execute(app.state.pool())
        .await
        .expect("failed to age refresh token");

    let resp = app
        .request("POST", "/auth/refresh", Some(&session.cookie_header()), None)
        .await;
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn logout_revokes_and_always_succeeds() {
    let app = spawn_app().await;
    let session = app.login_admin().await;

    let resp = app
        .request("POST", "/auth/logout", Some(&session.cookie_header()), None)
        .await;
    assert_eq!(resp.status(), 204);

    // both cookies are cleared
    for name in ["access_token", "refresh_token"] {
        let raw = set_cookie_raw(&resp, name).expect("removal cookie missing");
        assert!(raw.contains("Max-Age=0"), "cookie should be expired: {raw}");
    }

    // the stored token is gone, so the old pair can no longer refresh
    let stored: Option<String> = sqlx::query_scalar("SELECT refresh_token FROM users WHERE id = ?")
        .bind(&session.user_id)
        .fetch_one(app.state.pool())
        .await
        .expect("failed to read user row");
    assert!(stored.is_none());

    let resp = app
        .request("POST", "/auth/refresh", Some(&session.cookie_header()), None)
        .await;
    assert_eq!(resp.status(), 403);

    // logout is idempotent, with or without cookies
    let resp = app
        .request("POST", "/auth/logout", Some(&session.cookie_header()), None)
        .await;
    assert_eq!(resp.status(), 204);
    let resp = app.request("POST", "/auth/logout", None, None).await;
    assert_eq!(resp.status(), 204);
    let resp = app
        .request("POST", "/auth/logout", Some("access_token=garbage"), None)
        .await;
    assert_eq!(resp.status(), 204);
}

#[tokio::test]
async fn role_hierarchy_is_enforced() {
    let app = spawn_app().await;
    seed_user(&app.state, "manager1", Role::Manager).await;
    seed_user(&app.state, "seller1", Role::Seller).await;

    // manager can run catalog mutations but not user administration
    let manager = app.login("manager1", USER_PASSWORD).await;
    let manager_cookies = manager.cookie_header();
    let resp = app
        .request(
            "POST",
            "/locations",
            Some(&manager_cookies),
            Some(json!({ "address": "2 Side St" })),
        )
        .await;
    assert_eq!(resp.status(), 201);
    let resp = app
        .request(
            "POST",
            "/users",
            Some(&manager_cookies),
            Some(json!({ "username": "x", "password": "password-x1", "role": "basic" })),
        )
        .await;
    assert_eq!(resp.status(), 403);

    // seller cannot touch the catalog
    let seller = app.login("seller1", USER_PASSWORD).await;
    let resp = app
        .request(
            "POST",
            "/locations",
            Some(&seller.cookie_header()),
            Some(json!({ "address": "3 Back St" })),
        )
        .await;
    assert_eq!(resp.status(), 403);
}
