use std::env;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use talentflow_backend::models::property::Property;
use talentflow_backend::sheets::MemoryStore;
use tower::ServiceExt;

fn init_test_config() {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("DATABASE_URL", "postgres://localhost/talentflow_test");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("INTEGRATION_RPS", "100");
    env::set_var("PUBLIC_RPS", "100");
    let _ = talentflow_backend::config::init_config();
}

fn bearer(role: &str) -> String {
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
            role: Some(role.to_string()),
        },
        &EncodingKey::from_secret(
            talentflow_backend::config::get_config().jwt_secret.as_bytes(),
        ),
    )
    .expect("sign token");
    format!("Bearer {}", token)
}

fn seeded_properties() -> Vec<Property> {
    vec![
        Property {
            id: "prop-1".into(),
            emirate: "Dubai".into(),
            area: "Dubai Marina".into(),
            bedrooms: "2".into(),
            total_price_aed: "1500000".into(),
            title_en: "Marina skyline apartment".into(),
            amenities_basic: "Balcony, Central A/C".into(),
            ..Property::default()
        },
        Property {
            id: "prop-2".into(),
            emirate: "Dubai".into(),
            area: "Business Bay".into(),
            bedrooms: "3".into(),
            total_price_aed: "2400000".into(),
            title_en: "Canal view penthouse".into(),
            ..Property::default()
        },
        Property {
            id: "prop-3".into(),
            emirate: "Sharjah".into(),
            area: "Al Majaz".into(),
            bedrooms: "2".into(),
            total_price_aed: "700000".into(),
            ..Property::default()
        },
    ]
}

fn catalog_app(store: Arc<MemoryStore>) -> Router {
    init_test_config();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy(&talentflow_backend::config::get_config().database_url)
        .expect("lazy pool");
    let app_state = talentflow_backend::AppState::with_property_store(pool, store);

    Router::new()
        .route(
            "/api/properties",
            get(talentflow_backend::routes::properties::list_properties)
                .post(talentflow_backend::routes::properties::create_property),
        )
        .route(
            "/api/properties/:id",
            get(talentflow_backend::routes::properties::get_property)
                .put(talentflow_backend::routes::properties::update_property),
        )
        .route(
            "/api/areas",
            get(talentflow_backend::routes::catalog::list_areas),
        )
        .route(
            "/api/users",
            get(talentflow_backend::routes::catalog::list_catalog_users),
        )
        .layer(axum::middleware::from_fn(
            talentflow_backend::middleware::auth::require_bearer_auth,
        ))
        .with_state(app_state)
}

async fn get_json(app: &Router, auth: &str, uri: &str) -> (StatusCode, JsonValue) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", auth)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null);
    (status, body)
}

#[tokio::test]
async fn list_filter_and_lookup() {
    let app = catalog_app(Arc::new(MemoryStore::with_properties(seeded_properties())));
    let auth = bearer("STUDENT");

    let (status, body) = get_json(&app, &auth, "/api/properties").await;
    assert_eq!(status, StatusCode::OK);
    let unfiltered = body["properties"].as_array().unwrap().clone();
    assert_eq!(unfiltered.len(), 3);

    let (status, body) = get_json(&app, &auth, "/api/properties?emirate=Dubai&bedrooms=2").await;
    assert_eq!(status, StatusCode::OK);
    let filtered = body["properties"].as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    for property in filtered {
        assert_eq!(property["emirate"], "Dubai");
        assert_eq!(property["bedrooms"], "2");
        assert!(unfiltered.iter().any(|u| u["id"] == property["id"]));
    }

    let (status, body) = get_json(&app, &auth, "/api/properties?minPrice=1000000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"].as_array().unwrap().len(), 2);

    let (status, body) = get_json(&app, &auth, "/api/properties/prop-2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["property"]["titleEn"], "Canal view penthouse");

    let (status, _) = get_json(&app, &auth, "/api/properties/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_then_update_roundtrip() {
    let app = catalog_app(Arc::new(MemoryStore::new()));
    let auth = bearer("HR");

    let create_body = json!({
        "listingUser": "Broker 1",
        "emirate": "Dubai",
        "area": "Business Bay",
        "titleEn": "New listing",
        "totalPrice": "999000",
        "hidePrice": false,
        "contacts": [{"name": "Owner", "phone": "+971"}],
        "amenitiesBasic": ["Balcony", "Storage"]
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/properties")
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(create_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let created: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(created["success"], true);
    let id = created["property"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(created["property"]["amenitiesBasic"], "Balcony, Storage");

    let update_body = json!({
        "listingUser": "Broker 1",
        "emirate": "Dubai",
        "area": "Business Bay",
        "titleEn": "Renamed listing",
        "totalPrice": "1050000"
    });
    let req = Request::builder()
        .method("PUT")
        .uri(format!("/api/properties/{}", id))
        .header("content-type", "application/json")
        .header("authorization", auth.clone())
        .body(Body::from(update_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let (status, body) = get_json(&app, &auth, &format!("/api/properties/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["property"]["titleEn"], "Renamed listing");
    assert_eq!(body["property"]["totalPriceAed"], "1050000");

    // Updating an id that never existed is a 404, not an append.
    let req = Request::builder()
        .method("PUT")
        .uri("/api/properties/ghost")
        .header("content-type", "application/json")
        .header("authorization", auth)
        .body(Body::from(update_body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn areas_and_users_fall_back_to_defaults() {
    let app = catalog_app(Arc::new(MemoryStore::new()));
    let auth = bearer("HR");

    let (status, body) = get_json(&app, &auth, "/api/areas").await;
    assert_eq!(status, StatusCode::OK);
    let areas = body["areas"].as_array().unwrap();
    assert!(areas.contains(&json!("Dubai Marina")));
    assert_eq!(areas.len(), 5);

    let (status, body) = get_json(&app, &auth, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users[0]["name"], "Admin");
    assert_eq!(users.len(), 3);
}

#[tokio::test]
async fn populated_catalog_tabs_pass_through() {
    use talentflow_backend::sheets::CatalogUser;
    let store = MemoryStore::new().with_catalog(
        vec!["Jumeirah Village Circle".to_string()],
        vec![CatalogUser::named("Broker 9")],
    );
    let app = catalog_app(Arc::new(store));
    let auth = bearer("HR");

    let (status, body) = get_json(&app, &auth, "/api/areas").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["areas"], json!(["Jumeirah Village Circle"]));

    let (status, body) = get_json(&app, &auth, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], json!([{"name": "Broker 9"}]));
}

#[tokio::test]
async fn catalog_requires_a_token() {
    let app = catalog_app(Arc::new(MemoryStore::new()));
    let req = Request::builder()
        .method("GET")
        .uri("/api/properties")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
