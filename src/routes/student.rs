use crate::{
    dto::course_dto::{QuizSummary, SelectCoursePayload, SubmitQuizPayload},
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};
use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Serialize;
use serde_json::json;

use crate::models::candidate::CandidateProfile;
use crate::models::course::{Course, Lesson, QuizAttempt};
use crate::models::user::User;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub user: User,
    pub profile: CandidateProfile,
    pub active_course: Option<Course>,
    pub lessons: Vec<Lesson>,
    pub quiz: Option<QuizSummary>,
    pub attempts: Vec<QuizAttempt>,
}

pub async fn list_courses(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let courses = state.course_service.list().await?;
    Ok(Json(json!({ "courses": courses })))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, role, is_active, created_at, updated_at FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.pool)
    .await?
    .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
    let profile = state
        .candidate_service
        .get_by_user(user_id)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate profile not found".to_string()))?;

    let mut active_course = None;
    let mut lessons = Vec::new();
    let mut quiz = None;
    if let Some(course_id) = profile.active_course_id {
        active_course = Some(state.course_service.get(course_id).await?);
        lessons = state.course_service.lessons(course_id).await?;
        if let Some(q) = state.course_service.quiz_for_course(course_id).await? {
            let questions = state.course_service.questions(q.id).await?;
            quiz = Some(QuizSummary {
                id: q.id,
                title: q.title,
                passing_score: q.passing_score,
                questions: questions.into_iter().map(Into::into).collect(),
            });
        }
    }

    let attempts = state.course_service.attempts_for_user(user_id).await?;

    Ok(Json(StudentDashboard {
        user,
        profile,
        active_course,
        lessons,
        quiz,
        attempts,
    }))
}

#[axum::debug_handler]
pub async fn select_course(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SelectCoursePayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    // Reject unknown courses before touching the profile.
    state.course_service.get(payload.course_id).await?;
    let profile = state
        .candidate_service
        .set_active_course(user_id, payload.course_id)
        .await?;
    Ok(Json(json!({ "profile": profile })))
}

#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitQuizPayload>,
) -> Result<impl IntoResponse> {
    let user_id = claims.user_id()?;
    let result = state
        .course_service
        .submit_quiz(user_id, payload.answers)
        .await?;
    Ok(Json(result))
}

pub async fn accept_offer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let profile = state
        .candidate_service
        .resolve_offer(claims.user_id()?, true)
        .await?;
    Ok(Json(json!({ "profile": profile })))
}

pub async fn decline_offer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let profile = state
        .candidate_service
        .resolve_offer(claims.user_id()?, false)
        .await?;
    Ok(Json(json!({ "profile": profile })))
}
