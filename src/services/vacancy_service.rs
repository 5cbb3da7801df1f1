use crate::error::{Error, Result};
use crate::models::vacancy::Vacancy;
use sqlx::PgPool;
use uuid::Uuid;

const VACANCY_COLUMNS: &str = "id, title, description, status, created_at, updated_at";

#[derive(Clone)]
pub struct VacancyService {
    pool: PgPool,
}

impl VacancyService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Vacancy>> {
        let vacancies = sqlx::query_as::<_, Vacancy>(&format!(
            "SELECT {} FROM vacancies ORDER BY created_at DESC",
            VACANCY_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(vacancies)
    }

    pub async fn create(&self, title: &str, description: Option<&str>) -> Result<Vacancy> {
        let vacancy = sqlx::query_as::<_, Vacancy>(&format!(
            r#"
            INSERT INTO vacancies (title, description)
            VALUES ($1, $2)
            RETURNING {}
            "#,
            VACANCY_COLUMNS
        ))
        .bind(title)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(vacancy)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Vacancy> {
        let vacancy = sqlx::query_as::<_, Vacancy>(&format!(
            "SELECT {} FROM vacancies WHERE id = $1",
            VACANCY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        vacancy.ok_or_else(|| Error::NotFound("Vacancy not found".to_string()))
    }
}
