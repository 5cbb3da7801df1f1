use crate::error::{Error, Result};
use crate::models::candidate::{CandidateListItem, CandidateProfile};
use crate::models::offer::Offer;
use crate::models::status::CandidateStatus;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

const PROFILE_COLUMNS: &str =
    "id, user_id, status, offer_status, score, active_course_id, current_vacancy_id, created_at, updated_at";

/// One WHERE clause shared by the count endpoint and the bulk dispatcher, so
/// a count for a filter always equals the selection the dispatcher makes.
const FILTER_WHERE: &str =
    "($1::text[] IS NULL OR status = ANY($1)) AND ($2::uuid IS NULL OR current_vacancy_id = $2)";

#[derive(Debug, Clone, Default)]
pub struct CandidateFilter {
    pub statuses: Option<Vec<String>>,
    pub vacancy_id: Option<Uuid>,
}

impl CandidateFilter {
    pub fn new(statuses: Vec<String>, vacancy_id: Option<String>) -> Result<Self> {
        for status in &statuses {
            if CandidateStatus::parse(status).is_none() {
                return Err(Error::BadRequest(format!("Unknown status: {}", status)));
            }
        }
        let statuses = if statuses.is_empty() {
            None
        } else {
            Some(statuses)
        };
        let vacancy_id = match vacancy_id.as_deref() {
            None | Some("") | Some("none") => None,
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| Error::BadRequest(format!("Invalid vacancy id: {}", raw)))?,
            ),
        };
        Ok(Self {
            statuses,
            vacancy_id,
        })
    }

    /// Parses the query-string form: comma-separated statuses plus the
    /// "none" vacancy sentinel.
    pub fn from_query(statuses: Option<&str>, vacancy_id: Option<String>) -> Result<Self> {
        let statuses = statuses
            .unwrap_or("")
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self::new(statuses, vacancy_id)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelCount {
    pub status: String,
    pub count: i64,
}

#[derive(Clone)]
pub struct CandidateService {
    pool: PgPool,
}

impl CandidateService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn select_by_filter(&self, filter: &CandidateFilter) -> Result<Vec<CandidateProfile>> {
        let profiles = sqlx::query_as::<_, CandidateProfile>(&format!(
            "SELECT {} FROM candidate_profiles WHERE {} ORDER BY created_at DESC",
            PROFILE_COLUMNS, FILTER_WHERE
        ))
        .bind(&filter.statuses)
        .bind(filter.vacancy_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }

    pub async fn count_by_filter(&self, filter: &CandidateFilter) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM candidate_profiles WHERE {}",
            FILTER_WHERE
        ))
        .bind(&filter.statuses)
        .bind(filter.vacancy_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Registers a candidate: one user row (STUDENT role) plus one profile
    /// row entering the funnel at REGISTERED.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        vacancy_id: Option<Uuid>,
    ) -> Result<CandidateProfile> {
        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(Error::BadRequest(
                "A candidate with this email address already exists.".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let user_id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (name, email, role) VALUES ($1, $2, 'STUDENT') RETURNING id",
        )
        .bind(name)
        .bind(email)
        .fetch_one(&mut *tx)
        .await?;

        let profile = sqlx::query_as::<_, CandidateProfile>(&format!(
            r#"
            INSERT INTO candidate_profiles (user_id, current_vacancy_id)
            VALUES ($1, $2)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(vacancy_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(profile)
    }

    pub async fn list(&self) -> Result<Vec<CandidateListItem>> {
        let items = sqlx::query_as::<_, CandidateListItem>(
            r#"
            SELECT cp.id, cp.user_id, u.name, u.email, cp.status, cp.offer_status,
                   cp.score, cp.current_vacancy_id, cp.created_at
            FROM candidate_profiles cp
            JOIN users u ON u.id = cp.user_id
            ORDER BY cp.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<CandidateProfile>> {
        let profile = sqlx::query_as::<_, CandidateProfile>(&format!(
            "SELECT {} FROM candidate_profiles WHERE id = $1",
            PROFILE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Result<Option<CandidateProfile>> {
        let profile = sqlx::query_as::<_, CandidateProfile>(&format!(
            "SELECT {} FROM candidate_profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    /// Direct status overwrite; any valid funnel value is accepted.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<CandidateProfile> {
        let profile = sqlx::query_as::<_, CandidateProfile>(&format!(
            r#"
            UPDATE candidate_profiles SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        profile.ok_or_else(|| Error::NotFound("Candidate not found".to_string()))
    }

    pub async fn bulk_update_status(&self, ids: &[Uuid], status: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE candidate_profiles SET status = $2, updated_at = NOW() WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(status)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Per-status counts in funnel order; states with no candidates are
    /// reported with a zero so the dashboard always sees the full funnel.
    pub async fn funnel_counts(&self) -> Result<Vec<FunnelCount>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM candidate_profiles GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;

        let counts: std::collections::HashMap<String, i64> = rows.into_iter().collect();
        Ok(CandidateStatus::ALL
            .iter()
            .map(|status| FunnelCount {
                status: status.as_str().to_string(),
                count: counts.get(status.as_str()).copied().unwrap_or(0),
            })
            .collect())
    }

    pub async fn set_active_course(&self, user_id: Uuid, course_id: Uuid) -> Result<CandidateProfile> {
        let profile = self
            .get_by_user(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate profile not found".to_string()))?;
        if profile.active_course_id.is_some() {
            return Err(Error::BadRequest(
                "A course is already in progress".to_string(),
            ));
        }

        let profile = sqlx::query_as::<_, CandidateProfile>(&format!(
            r#"
            UPDATE candidate_profiles
            SET active_course_id = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile.id)
        .bind(course_id)
        .bind(CandidateStatus::InCourse.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn record_quiz_result(&self, user_id: Uuid, score: i32) -> Result<CandidateProfile> {
        let profile = sqlx::query_as::<_, CandidateProfile>(&format!(
            r#"
            UPDATE candidate_profiles
            SET score = $2, status = $3, updated_at = NOW()
            WHERE user_id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(score)
        .bind(CandidateStatus::TestCompleted.as_str())
        .fetch_optional(&self.pool)
        .await?;
        profile.ok_or_else(|| Error::NotFound("Candidate profile not found".to_string()))
    }

    /// Accept or decline the latest pending offer for this user. Updates the
    /// offer row, the profile's offer status and the funnel state in one
    /// pass; there is no legality check beyond "a sent offer must exist".
    pub async fn resolve_offer(&self, user_id: Uuid, accept: bool) -> Result<CandidateProfile> {
        let profile = self
            .get_by_user(user_id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate profile not found".to_string()))?;

        let offer = sqlx::query_as::<_, Offer>(
            r#"
            SELECT id, offer_type, candidate_id, vacancy_id, content, status, created_at, updated_at
            FROM offers
            WHERE candidate_id = $1 AND status = 'sent'
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(profile.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("No pending offer".to_string()))?;

        let (offer_row_status, offer_status, status) = if accept {
            ("accepted", "ACCEPTED", CandidateStatus::OfferAccepted)
        } else {
            ("declined", "DECLINED", CandidateStatus::OfferDeclined)
        };

        sqlx::query("UPDATE offers SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(offer.id)
            .bind(offer_row_status)
            .execute(&self.pool)
            .await?;

        let profile = sqlx::query_as::<_, CandidateProfile>(&format!(
            r#"
            UPDATE candidate_profiles
            SET offer_status = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(profile.id)
        .bind(offer_status)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_validates_statuses() {
        let err = CandidateFilter::new(vec!["NOT_A_STATUS".into()], None).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));

        let filter =
            CandidateFilter::new(vec!["IN_COURSE".into(), "HIRED".into()], None).unwrap();
        assert_eq!(filter.statuses.as_deref().map(|s| s.len()), Some(2));
    }

    #[test]
    fn filter_treats_none_vacancy_as_absent() {
        let filter = CandidateFilter::new(vec![], Some("none".into())).unwrap();
        assert!(filter.vacancy_id.is_none());
        assert!(filter.statuses.is_none());

        let id = Uuid::new_v4();
        let filter = CandidateFilter::new(vec![], Some(id.to_string())).unwrap();
        assert_eq!(filter.vacancy_id, Some(id));

        let err = CandidateFilter::new(vec![], Some("not-a-uuid".into())).unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[test]
    fn filter_from_query_splits_commas() {
        let filter = CandidateFilter::from_query(Some("IN_COURSE,HIRED"), None).unwrap();
        assert_eq!(
            filter.statuses,
            Some(vec!["IN_COURSE".to_string(), "HIRED".to_string()])
        );

        let filter = CandidateFilter::from_query(Some(""), None).unwrap();
        assert!(filter.statuses.is_none());
    }
}
