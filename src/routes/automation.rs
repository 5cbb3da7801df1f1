use crate::{
    dto::automation_dto::{CreateTriggerPayload, ToggleTriggerPayload, UpdateTriggerPayload},
    error::Result,
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

pub async fn list_triggers(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let triggers = state.trigger_service.list().await?;
    Ok(Json(json!({ "triggers": triggers })))
}

#[axum::debug_handler]
pub async fn create_trigger(
    State(state): State<AppState>,
    Json(payload): Json<CreateTriggerPayload>,
) -> Result<impl IntoResponse> {
    let trigger = state.trigger_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "trigger": trigger }))))
}

pub async fn get_trigger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let trigger = state.trigger_service.get(id).await?;
    Ok(Json(json!({ "trigger": trigger })))
}

#[axum::debug_handler]
pub async fn update_trigger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTriggerPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let trigger = state.trigger_service.update(id, payload).await?;
    Ok(Json(json!({ "trigger": trigger })))
}

pub async fn delete_trigger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.trigger_service.delete(id).await?;
    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn toggle_trigger(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleTriggerPayload>,
) -> Result<impl IntoResponse> {
    let trigger = state.trigger_service.set_active(id, payload.is_active).await?;
    Ok(Json(json!({ "trigger": trigger })))
}
