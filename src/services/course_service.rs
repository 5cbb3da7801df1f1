use crate::dto::course_dto::{CourseDetail, CreateCoursePayload, QuizAnswer, QuizResult};
use crate::error::{Error, Result};
use crate::models::course::{Course, Lesson, Question, Quiz, QuizAttempt};
use crate::services::candidate_service::CandidateService;
use sqlx::PgPool;
use uuid::Uuid;

const COURSE_COLUMNS: &str = "id, title, description, created_by, created_at, updated_at";
const LESSON_COLUMNS: &str = "id, course_id, position, title, content, created_at";
const QUIZ_COLUMNS: &str = "id, course_id, title, passing_score, created_at";
const QUESTION_COLUMNS: &str = "id, quiz_id, position, question, options, correct_answer, points";
const ATTEMPT_COLUMNS: &str =
    "id, quiz_id, user_id, answers, score, max_score, percentage, passed, created_at";

/// Weighted multiple-choice grading: a question scores its full `points`
/// when the selected index equals the answer key, zero otherwise. Returns
/// (earned, maximum).
pub fn grade_answers(questions: &[Question], answers: &[QuizAnswer]) -> (i32, i32) {
    let mut earned = 0;
    let mut max = 0;
    for question in questions {
        max += question.points;
        let selected = answers
            .iter()
            .find(|a| a.question_id == question.id)
            .map(|a| a.selected);
        if selected == Some(question.correct_answer) {
            earned += question.points;
        }
    }
    (earned, max)
}

#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_course(
        &self,
        payload: CreateCoursePayload,
        created_by: Uuid,
    ) -> Result<CourseDetail> {
        let mut tx = self.pool.begin().await?;

        let course = sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (title, description, created_by) VALUES ($1, $2, $3) RETURNING {}",
            COURSE_COLUMNS
        ))
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        for (position, lesson) in payload.lessons.iter().enumerate() {
            sqlx::query(
                "INSERT INTO lessons (course_id, position, title, content) VALUES ($1, $2, $3, $4)",
            )
            .bind(course.id)
            .bind(position as i32)
            .bind(&lesson.title)
            .bind(&lesson.content)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(ref quiz) = payload.quiz {
            let quiz_id: Uuid = sqlx::query_scalar(
                "INSERT INTO quizzes (course_id, title, passing_score) VALUES ($1, $2, $3) RETURNING id",
            )
            .bind(course.id)
            .bind(&quiz.title)
            .bind(quiz.passing_score)
            .fetch_one(&mut *tx)
            .await?;

            for (position, question) in quiz.questions.iter().enumerate() {
                let option_count = question.options.len() as i32;
                if question.correct_answer < 0 || question.correct_answer >= option_count {
                    return Err(Error::BadRequest(format!(
                        "Question {} has no option at index {}",
                        position + 1,
                        question.correct_answer
                    )));
                }
                sqlx::query(
                    r#"
                    INSERT INTO questions (quiz_id, position, question, options, correct_answer, points)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    "#,
                )
                .bind(quiz_id)
                .bind(position as i32)
                .bind(&question.question)
                .bind(serde_json::to_value(&question.options)?)
                .bind(question.correct_answer)
                .bind(question.points)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        self.get_detail(course.id).await
    }

    pub async fn list(&self) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses ORDER BY created_at DESC",
            COURSE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    pub async fn get(&self, id: Uuid) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(&format!(
            "SELECT {} FROM courses WHERE id = $1",
            COURSE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        course.ok_or_else(|| Error::NotFound("Course not found".to_string()))
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<CourseDetail> {
        let course = self.get(id).await?;
        let lessons = self.lessons(id).await?;
        let quiz = self.quiz_for_course(id).await?;
        let questions = match &quiz {
            Some(quiz) => self.questions(quiz.id).await?,
            None => Vec::new(),
        };
        Ok(CourseDetail {
            course,
            lessons,
            quiz,
            questions,
        })
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Course not found".to_string()));
        }
        Ok(())
    }

    pub async fn lessons(&self, course_id: Uuid) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons WHERE course_id = $1 ORDER BY position",
            LESSON_COLUMNS
        ))
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    pub async fn quiz_for_course(&self, course_id: Uuid) -> Result<Option<Quiz>> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {} FROM quizzes WHERE course_id = $1",
            QUIZ_COLUMNS
        ))
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(quiz)
    }

    pub async fn questions(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(&format!(
            "SELECT {} FROM questions WHERE quiz_id = $1 ORDER BY position",
            QUESTION_COLUMNS
        ))
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    pub async fn attempts_for_user(&self, user_id: Uuid) -> Result<Vec<QuizAttempt>> {
        let attempts = sqlx::query_as::<_, QuizAttempt>(&format!(
            "SELECT {} FROM quiz_attempts WHERE user_id = $1 ORDER BY created_at DESC",
            ATTEMPT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attempts)
    }

    /// Grades a submission against the active course's quiz, records the
    /// attempt, and moves the candidate to TEST_COMPLETED with the earned
    /// score on the profile.
    pub async fn submit_quiz(&self, user_id: Uuid, answers: Vec<QuizAnswer>) -> Result<QuizResult> {
        let candidate_service = CandidateService::new(self.pool.clone());
        let profile = candidate_service
            .get_by_user(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate profile not found".to_string()))?;
        let course_id = profile
            .active_course_id
            .ok_or_else(|| Error::BadRequest("No active course".to_string()))?;

        let quiz = self
            .quiz_for_course(course_id)
            .await?
            .ok_or_else(|| Error::NotFound("Active course has no quiz".to_string()))?;
        let questions = self.questions(quiz.id).await?;

        let (score, max_score) = grade_answers(&questions, &answers);
        let percentage = if max_score > 0 {
            f64::from(score) / f64::from(max_score) * 100.0
        } else {
            0.0
        };
        let passed = quiz.passing_score.map(|threshold| percentage >= threshold);

        let attempt = sqlx::query_as::<_, QuizAttempt>(&format!(
            r#"
            INSERT INTO quiz_attempts (quiz_id, user_id, answers, score, max_score, percentage, passed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ATTEMPT_COLUMNS
        ))
        .bind(quiz.id)
        .bind(user_id)
        .bind(serde_json::to_value(
            answers
                .iter()
                .map(|a| serde_json::json!({"questionId": a.question_id, "selected": a.selected}))
                .collect::<Vec<_>>(),
        )?)
        .bind(score)
        .bind(max_score)
        .bind(percentage)
        .bind(passed)
        .fetch_one(&self.pool)
        .await?;

        let profile = candidate_service.record_quiz_result(user_id, score).await?;

        Ok(QuizResult {
            attempt,
            status: profile.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn question(id: Uuid, correct: i32, points: i32) -> Question {
        Question {
            id,
            quiz_id: Uuid::new_v4(),
            position: 0,
            question: "q".into(),
            options: json!(["a", "b", "c", "d"]),
            correct_answer: correct,
            points,
        }
    }

    #[test]
    fn grading_sums_points_of_correct_answers() {
        let q1 = Uuid::new_v4();
        let q2 = Uuid::new_v4();
        let q3 = Uuid::new_v4();
        let questions = vec![question(q1, 1, 2), question(q2, 0, 3), question(q3, 3, 5)];
        let answers = vec![
            QuizAnswer {
                question_id: q1,
                selected: 1,
            },
            QuizAnswer {
                question_id: q2,
                selected: 2,
            },
            QuizAnswer {
                question_id: q3,
                selected: 3,
            },
        ];
        assert_eq!(grade_answers(&questions, &answers), (7, 10));
    }

    #[test]
    fn grading_treats_missing_answers_as_wrong() {
        let q1 = Uuid::new_v4();
        let questions = vec![question(q1, 0, 4)];
        assert_eq!(grade_answers(&questions, &[]), (0, 4));
    }

    #[test]
    fn grading_ignores_answers_to_unknown_questions() {
        let q1 = Uuid::new_v4();
        let questions = vec![question(q1, 0, 1)];
        let answers = vec![QuizAnswer {
            question_id: Uuid::new_v4(),
            selected: 0,
        }];
        assert_eq!(grade_answers(&questions, &answers), (0, 1));
    }
}
