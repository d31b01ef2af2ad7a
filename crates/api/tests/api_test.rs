//! HTTP tests driving the full router against an in-memory database.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use gridx_api::{AppState, create_router};
use gridx_db::UserRepository;
use gridx_db::migration::{Migrator, MigratorTrait};
use gridx_shared::types::Currency;
use gridx_shared::{JwtConfig, JwtService};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    jwt: Arc<JwtService>,
    db: DatabaseConnection,
}

impl TestApp {
    async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.expect("open database");
        Migrator::up(&db, None).await.expect("migrate");

        let jwt = Arc::new(JwtService::new(JwtConfig::default()));
        let state = AppState {
            db: Arc::new(db.clone()),
            jwt_service: jwt.clone(),
            storage_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            currency: Currency::Zar,
        };

        Self {
            router: create_router(state),
            jwt,
            db,
        }
    }

    async fn user_token(&self) -> String {
        let email = format!("{}@example.com", Uuid::new_v4());
        let user = UserRepository::new(self.db.clone())
            .create(&email, "hash", "Api User")
            .await
            .expect("create user");
        self.jwt.generate_access_token(user.id).expect("token")
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let app = TestApp::new().await;
    app.db.clone().close().await.expect("close pool");

    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["success"], false);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "down");
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app.send("GET", "/api/topup/balance", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "missing_token");
}

#[tokio::test]
async fn test_garbage_token_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send("GET", "/api/topup/balance", Some("not.a.jwt"), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_top_up_then_balance() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/topup",
            Some(&token),
            Some(r#"{"amount": 100, "type": "card"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["new_balance"], "100.00");
    assert!(body["top_up_id"].is_string());

    let (status, body) = app
        .send(
            "POST",
            "/api/topup",
            Some(&token),
            Some(r#"{"amount": "50", "type": "card", "promoCode": "WINTER"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["new_balance"], "150.00");

    let (status, body) = app
        .send("GET", "/api/topup/balance", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "balance": "150.00", "currency": "ZAR"}));

    let (status, body) = app
        .send("GET", "/api/topup/history", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["amount"], "50.00");
    assert_eq!(body["data"][0]["promo_code"], "WINTER");
}

#[tokio::test]
async fn test_balance_starts_at_zero() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    let (status, body) = app
        .send("GET", "/api/topup/balance", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "0.00");
}

#[tokio::test]
async fn test_invalid_amounts_are_400_and_change_nothing() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    for payload in [
        r#"{"amount": -5, "type": "card"}"#,
        r#"{"amount": 0, "type": "card"}"#,
        r#"{"amount": "abc", "type": "card"}"#,
        r#"{"type": "card"}"#,
        r#"{"amount": 10}"#,
        r#"{"amount": 10.001, "type": "card"}"#,
    ] {
        let (status, body) = app
            .send("POST", "/api/topup", Some(&token), Some(payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    let (_, body) = app
        .send("GET", "/api/topup/balance", Some(&token), None)
        .await;
    assert_eq!(body["balance"], "0.00");
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    let (status, body) = app
        .send("POST", "/api/topup", Some(&token), Some("{not json"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_token_for_unknown_user_is_404() {
    let app = TestApp::new().await;
    let token = app.jwt.generate_access_token(Uuid::new_v4()).unwrap();

    let (status, body) = app
        .send(
            "POST",
            "/api/topup",
            Some(&token),
            Some(r#"{"amount": 10, "type": "card"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_auto_top_up_settings_flow() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    let (status, body) = app
        .send("GET", "/api/auto-topup/settings", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["configured"], false);
    assert_eq!(body["settings"]["is_enabled"], false);
    assert_eq!(body["settings"]["frequency"], "weekly");

    let (status, body) = app
        .send(
            "POST",
            "/api/auto-topup/settings",
            Some(&token),
            Some(
                r#"{"minBalance": 100, "autoTopUpAmount": "50", "autoTopUpFrequency": "monthly"}"#,
            ),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["min_balance"], "100.00");
    assert_eq!(body["settings"]["is_enabled"], true);

    let (status, body) = app
        .send(
            "POST",
            "/api/auto-topup/toggle",
            Some(&token),
            Some(r#"{"isEnabled": false}"#),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "isEnabled": false}));

    let (_, body) = app
        .send("GET", "/api/auto-topup/settings", Some(&token), None)
        .await;
    assert_eq!(body["configured"], true);
    assert_eq!(body["settings"]["frequency"], "monthly");
    assert_eq!(body["settings"]["top_up_amount"], "50.00");
    assert_eq!(body["settings"]["is_enabled"], false);
}

#[tokio::test]
async fn test_invalid_frequency_is_400() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/auto-topup/settings",
            Some(&token),
            Some(r#"{"minBalance": 100, "autoTopUpAmount": 50, "autoTopUpFrequency": "daily"}"#),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, body) = app
        .send("GET", "/api/auto-topup/settings", Some(&token), None)
        .await;
    assert_eq!(body["configured"], false);
}

#[tokio::test]
async fn test_toggle_without_settings_is_404() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    let (status, body) = app
        .send(
            "POST",
            "/api/auto-topup/toggle",
            Some(&token),
            Some(r#"{"isEnabled": true}"#),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (_, body) = app
        .send("GET", "/api/auto-topup/settings", Some(&token), None)
        .await;
    assert_eq!(body["configured"], false);
}

#[tokio::test]
async fn test_notifications_and_expenses_follow_top_ups() {
    let app = TestApp::new().await;
    let token = app.user_token().await;

    app.send(
        "POST",
        "/api/topup",
        Some(&token),
        Some(r#"{"amount": 200, "type": "eft"}"#),
    )
    .await;

    let (status, body) = app
        .send("GET", "/api/expenses", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["purpose"], "eft - Energy Credit");
    assert_eq!(body["data"][0]["amount"], "200.00");

    let (status, body) = app
        .send("GET", "/api/notifications?unread_only=true", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(body["unread"], 1);
    assert_eq!(notifications[0]["type"], "success");
    let id = notifications[0]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send("PUT", &format!("/api/notifications/{id}/read"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (_, body) = app
        .send("GET", "/api/notifications?unread_only=true", Some(&token), None)
        .await;
    assert_eq!(body["notifications"].as_array().unwrap().len(), 0);
    assert_eq!(body["unread"], 0);

    let (_, body) = app
        .send("GET", "/api/notifications", Some(&token), None)
        .await;
    assert_eq!(body["notifications"].as_array().unwrap().len(), 1);
    assert_eq!(body["notifications"][0]["is_read"], true);
    assert_eq!(body["unread"], 0);

    let (status, _) = app
        .send(
            "PUT",
            &format!("/api/notifications/{}/read", Uuid::new_v4()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
