use crate::{
    dto::notification_dto::{BulkNotificationPayload, BulkNotificationResponse},
    error::{Error, Result},
    middleware::auth::Claims,
    models::status::Channel,
    services::candidate_service::CandidateFilter,
    services::notification_service::BulkDispatchRequest,
    AppState,
};
use axum::{extract::State, response::IntoResponse, Extension, Json};
use uuid::Uuid;

#[axum::debug_handler]
pub async fn send_bulk(
    State(state): State<AppState>,
    Json(payload): Json<BulkNotificationPayload>,
) -> Result<impl IntoResponse> {
    if payload.title.is_empty() || payload.message.is_empty() {
        return Err(Error::BadRequest(
            "Title and message are required".to_string(),
        ));
    }

    let channel = payload.channel.unwrap_or_else(|| "INTERNAL".to_string());
    if Channel::parse(&channel).is_none() {
        return Err(Error::BadRequest(format!("Unknown channel: {}", channel)));
    }

    let filter = CandidateFilter::new(payload.statuses, payload.vacancy_id)?;

    let vacancy_id_for_offer = match payload.vacancy_id_for_offer.as_deref() {
        None | Some("") | Some("none") => None,
        Some(raw) => Some(
            Uuid::parse_str(raw)
                .map_err(|_| Error::BadRequest(format!("Invalid vacancy id: {}", raw)))?,
        ),
    };

    let outcome = state
        .notification_service
        .dispatch_bulk(BulkDispatchRequest {
            filter,
            title: payload.title,
            message: payload.message,
            kind: payload.kind.unwrap_or_else(|| "info".to_string()),
            channel,
            include_offer: payload.include_offer,
            offer_content: payload.offer_content,
            vacancy_id_for_offer,
        })
        .await?;

    Ok(Json(BulkNotificationResponse {
        success: true,
        notifications_sent: outcome.notifications_sent,
        offers_created: outcome.offers_created,
    }))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let notifications = state.notification_service.list_for_user(user_id).await?;
    Ok(Json(
        serde_json::json!({ "notifications": notifications }),
    ))
}
