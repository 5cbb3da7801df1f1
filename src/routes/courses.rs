use crate::{
    dto::course_dto::CreateCoursePayload,
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

#[axum::debug_handler]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCoursePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created_by = claims.user_id()?;

    let known: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
        .bind(created_by)
        .fetch_optional(&state.pool)
        .await?;
    if known.is_none() {
        return Err(Error::Unauthorized("Unknown user".to_string()));
    }

    let detail = state.course_service.create_course(payload, created_by).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

pub async fn list_courses(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let courses = state.course_service.list().await?;
    Ok(Json(json!({ "courses": courses })))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.course_service.get_detail(id).await?;
    Ok(Json(detail))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.course_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
