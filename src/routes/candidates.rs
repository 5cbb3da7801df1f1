use crate::{
    dto::notification_dto::CandidateFilterQuery,
    error::{Error, Result},
    models::status::CandidateStatus,
    services::candidate_service::CandidateFilter,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

pub async fn count_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateFilterQuery>,
) -> Result<impl IntoResponse> {
    let filter = CandidateFilter::from_query(query.statuses.as_deref(), query.vacancy_id)?;
    let count = state.candidate_service.count_by_filter(&filter).await?;
    Ok(Json(json!({ "count": count })))
}

pub async fn list_candidates(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let candidates = state.candidate_service.list().await?;
    Ok(Json(json!({ "candidates": candidates })))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidatePayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    pub vacancy_id: Option<Uuid>,
}

#[axum::debug_handler]
pub async fn create_candidate(
    State(state): State<AppState>,
    Json(payload): Json<CreateCandidatePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let profile = state
        .candidate_service
        .create(&payload.name, &payload.email, payload.vacancy_id)
        .await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(json!({ "candidate": profile })),
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: String,
}

#[axum::debug_handler]
pub async fn update_candidate_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    if CandidateStatus::parse(&payload.status).is_none() {
        return Err(Error::BadRequest(format!(
            "Unknown status: {}",
            payload.status
        )));
    }
    let profile = state
        .candidate_service
        .update_status(id, &payload.status)
        .await?;
    Ok(Json(json!({ "candidate": profile })))
}

pub async fn funnel_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let funnel = state.candidate_service.funnel_counts().await?;
    Ok(Json(json!({ "funnel": funnel })))
}
