use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub offer_status: String,
    pub score: Option<i32>,
    pub active_course_id: Option<Uuid>,
    pub current_vacancy_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile row joined with the owning user, for HR listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CandidateListItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub status: String,
    pub offer_status: String,
    pub score: Option<i32>,
    pub current_vacancy_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
