use crate::{error::Result, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateVacancyPayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
}

pub async fn list_vacancies(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let vacancies = state.vacancy_service.list().await?;
    Ok(Json(json!({ "vacancies": vacancies })))
}

#[axum::debug_handler]
pub async fn create_vacancy(
    State(state): State<AppState>,
    Json(payload): Json<CreateVacancyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let vacancy = state
        .vacancy_service
        .create(&payload.title, payload.description.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "vacancy": vacancy }))))
}

pub async fn get_vacancy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let vacancy = state.vacancy_service.get_by_id(id).await?;
    Ok(Json(json!({ "vacancy": vacancy })))
}
