use crate::error::{Error, Result};
use crate::models::notification::Notification;
use crate::models::status::CandidateStatus;
use crate::services::candidate_service::{CandidateFilter, CandidateService};
use sqlx::PgPool;
use tokio::task::JoinSet;
use uuid::Uuid;

const NOTIFICATION_COLUMNS: &str =
    "id, user_id, title, message, type, channel, read_at, created_at";

/// Validated bulk-dispatch request, built from the wire payload by the
/// route handler.
#[derive(Debug, Clone)]
pub struct BulkDispatchRequest {
    pub filter: CandidateFilter,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub channel: String,
    pub include_offer: bool,
    pub offer_content: Option<String>,
    pub vacancy_id_for_offer: Option<Uuid>,
}

#[derive(Debug, Clone, Copy)]
pub struct BulkDispatchOutcome {
    pub notifications_sent: usize,
    pub offers_created: usize,
}

#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {} FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
            NOTIFICATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(notifications)
    }

    /// Fan a notification (and optionally an offer) out to every candidate
    /// matching the filter. Selection is all-or-nothing: zero matches reject
    /// the whole request before any write. The per-candidate writes after
    /// that are independent; a failed insert is logged and dropped from the
    /// reported count without rolling back its siblings.
    pub async fn dispatch_bulk(&self, request: BulkDispatchRequest) -> Result<BulkDispatchOutcome> {
        let candidate_service = CandidateService::new(self.pool.clone());
        let candidates = candidate_service.select_by_filter(&request.filter).await?;
        if candidates.is_empty() {
            return Err(Error::BadRequest(
                "No candidates found matching criteria".to_string(),
            ));
        }

        let mut tasks = JoinSet::new();
        for candidate in &candidates {
            let pool = self.pool.clone();
            let user_id = candidate.user_id;
            let title = request.title.clone();
            let message = request.message.clone();
            let kind = request.kind.clone();
            let channel = request.channel.clone();
            tasks.spawn(async move {
                sqlx::query(
                    r#"
                    INSERT INTO notifications (user_id, title, message, type, channel)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(user_id)
                .bind(title)
                .bind(message)
                .bind(kind)
                .bind(channel)
                .execute(&pool)
                .await
            });
        }

        let mut notifications_sent = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(_)) => notifications_sent += 1,
                Ok(Err(e)) => tracing::error!(error = ?e, "Bulk notification insert failed"),
                Err(e) => tracing::error!(error = ?e, "Bulk notification task failed"),
            }
        }

        let mut offers_created = 0;
        let offer_content = request.offer_content.clone().unwrap_or_default();
        if request.include_offer && !offer_content.is_empty() {
            if let Some(vacancy_id) = request.vacancy_id_for_offer {
                let vacancy: Option<Uuid> =
                    sqlx::query_scalar("SELECT id FROM vacancies WHERE id = $1")
                        .bind(vacancy_id)
                        .fetch_optional(&self.pool)
                        .await?;

                if vacancy.is_some() {
                    let mut offer_tasks = JoinSet::new();
                    for candidate in &candidates {
                        let pool = self.pool.clone();
                        let candidate_id = candidate.id;
                        let content = offer_content.clone();
                        offer_tasks.spawn(async move {
                            sqlx::query(
                                r#"
                                INSERT INTO offers (offer_type, candidate_id, vacancy_id, content, status)
                                VALUES ('personal', $1, $2, $3, 'sent')
                                "#,
                            )
                            .bind(candidate_id)
                            .bind(vacancy_id)
                            .bind(content)
                            .execute(&pool)
                            .await
                        });
                    }
                    while let Some(joined) = offer_tasks.join_next().await {
                        match joined {
                            Ok(Ok(_)) => offers_created += 1,
                            Ok(Err(e)) => tracing::error!(error = ?e, "Bulk offer insert failed"),
                            Err(e) => tracing::error!(error = ?e, "Bulk offer task failed"),
                        }
                    }

                    let ids: Vec<Uuid> = candidates.iter().map(|c| c.id).collect();
                    candidate_service
                        .bulk_update_status(&ids, CandidateStatus::OfferSent.as_str())
                        .await?;
                } else {
                    tracing::warn!(%vacancy_id, "Offer vacancy not found, skipping offer creation");
                }
            }
        }

        Ok(BulkDispatchOutcome {
            notifications_sent,
            offers_created,
        })
    }
}
