use std::env;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn init_test_config() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATABASE_URL", "postgres://localhost/talentflow_test");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("INTEGRATION_RPS", "100");
    env::set_var("PUBLIC_RPS", "100");
    let _ = talentflow_backend::config::init_config();
}

fn bearer(role: Option<&str>) -> String {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        role: Option<String>,
    }
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let token = encode(
        &Header::default(),
        &Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            exp,
            role: role.map(str::to_string),
        },
        &EncodingKey::from_secret(
            talentflow_backend::config::get_config().jwt_secret.as_bytes(),
        ),
    )
    .expect("sign token");
    format!("Bearer {}", token)
}

/// HR routes wired exactly as in main, but over a lazy pool: requests that
/// fail validation never reach the database, which is what these tests pin.
fn hr_app() -> Router {
    init_test_config();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&talentflow_backend::config::get_config().database_url)
        .expect("lazy pool");
    let app_state = talentflow_backend::AppState::with_property_store(
        pool,
        Arc::new(talentflow_backend::sheets::MemoryStore::new()),
    );

    Router::new()
        .route(
            "/api/automation",
            get(talentflow_backend::routes::automation::list_triggers)
                .post(talentflow_backend::routes::automation::create_trigger),
        )
        .route(
            "/api/notifications/bulk",
            post(talentflow_backend::routes::notifications::send_bulk),
        )
        .route(
            "/api/candidates/count",
            get(talentflow_backend::routes::candidates::count_candidates),
        )
        .layer(axum::middleware::from_fn(
            talentflow_backend::middleware::auth::require_hr_or_admin,
        ))
        .with_state(app_state)
}

async fn post_json(app: &Router, auth: &str, uri: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", auth)
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let parsed = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, parsed)
}

#[tokio::test]
async fn trigger_without_channels_is_rejected() {
    let app = hr_app();
    let auth = bearer(Some("HR"));

    let (status, body) = post_json(
        &app,
        &auth,
        "/api/automation",
        json!({ "name": "Welcome mail", "event": "CANDIDATE_REGISTERED" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Name, event, and at least one channel are required"
    );

    let (status, _) = post_json(
        &app,
        &auth,
        "/api/automation",
        json!({ "name": "Welcome mail", "event": "CANDIDATE_REGISTERED", "channels": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trigger_with_unknown_event_or_channel_is_rejected() {
    let app = hr_app();
    let auth = bearer(Some("admin"));

    let (status, body) = post_json(
        &app,
        &auth,
        "/api/automation",
        json!({ "name": "x", "event": "SOMETHING_ELSE", "channels": ["INTERNAL"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unknown event"));

    let (status, body) = post_json(
        &app,
        &auth,
        "/api/automation",
        json!({ "name": "x", "event": "OFFER_SENT", "channels": ["CARRIER_PIGEON"] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unknown channel"));
}

#[tokio::test]
async fn bulk_dispatch_validates_before_selecting() {
    let app = hr_app();
    let auth = bearer(Some("HR"));

    let (status, body) = post_json(
        &app,
        &auth,
        "/api/notifications/bulk",
        json!({ "statuses": ["IN_COURSE"], "message": "hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title and message are required");

    let (status, body) = post_json(
        &app,
        &auth,
        "/api/notifications/bulk",
        json!({ "statuses": ["NOT_A_STATUS"], "title": "t", "message": "m" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Unknown status"));

    let (status, _) = post_json(
        &app,
        &auth,
        "/api/notifications/bulk",
        json!({ "title": "t", "message": "m", "channel": "SMOKE_SIGNAL" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn hr_routes_enforce_roles() {
    let app = hr_app();

    let req = Request::builder()
        .method("GET")
        .uri("/api/candidates/count")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("GET")
        .uri("/api/candidates/count")
        .header("authorization", bearer(Some("STUDENT")))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = Request::builder()
        .method("GET")
        .uri("/api/candidates/count")
        .header("authorization", bearer(None))
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = Request::builder()
        .method("GET")
        .uri("/api/candidates/count")
        .header("authorization", "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
