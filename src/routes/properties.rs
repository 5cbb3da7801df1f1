use crate::{
    dto::property_dto::{PropertyFilter, PropertyPayload},
    error::{Error, Result},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

pub async fn list_properties(
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> Result<impl IntoResponse> {
    let properties = state.property_service.list(&filter).await?;
    Ok(Json(json!({ "properties": properties })))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let property = state.property_service.get(&id).await?;
    match property {
        Some(property) => Ok(Json(json!({ "property": property }))),
        None => Err(Error::NotFound("Property not found".to_string())),
    }
}

#[axum::debug_handler]
pub async fn create_property(
    State(state): State<AppState>,
    Json(payload): Json<PropertyPayload>,
) -> Result<impl IntoResponse> {
    let property = state.property_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "property": property })),
    ))
}

#[axum::debug_handler]
pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<PropertyPayload>,
) -> Result<impl IntoResponse> {
    let property = state.property_service.update(&id, payload).await?;
    Ok(Json(json!({ "success": true, "property": property })))
}
