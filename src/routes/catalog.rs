use crate::{error::Result, AppState};
use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

// Both lookups degrade to defaults inside the service; they never 5xx on a
// missing tab.
pub async fn list_areas(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let areas = state.property_service.areas().await;
    Ok(Json(json!({ "areas": areas })))
}

pub async fn list_catalog_users(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let users = state.property_service.catalog_users().await;
    Ok(Json(json!({ "users": users })))
}
