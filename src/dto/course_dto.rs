use crate::models::course::{Course, Lesson, Question, Quiz, QuizAttempt};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCoursePayload {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub lessons: Vec<CreateLessonPayload>,
    pub quiz: Option<CreateQuizPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonPayload {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizPayload {
    pub title: String,
    pub passing_score: Option<f64>,
    #[serde(default)]
    pub questions: Vec<CreateQuestionPayload>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionPayload {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    #[serde(default = "default_points")]
    pub points: i32,
}

fn default_points() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub lessons: Vec<Lesson>,
    pub quiz: Option<Quiz>,
    pub questions: Vec<Question>,
}

/// Quiz as shown to a student: question texts and options, no answer key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: Uuid,
    pub title: String,
    pub passing_score: Option<f64>,
    pub questions: Vec<StudentQuestion>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuestion {
    pub id: Uuid,
    pub position: i32,
    pub question: String,
    pub options: serde_json::Value,
    pub points: i32,
}

impl From<Question> for StudentQuestion {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            position: q.position,
            question: q.question,
            options: q.options,
            points: q.points,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCoursePayload {
    pub course_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizPayload {
    #[serde(default)]
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_id: Uuid,
    pub selected: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    #[serde(flatten)]
    pub attempt: QuizAttempt,
    pub status: String,
}
