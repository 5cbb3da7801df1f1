use crate::dto::automation_dto::{CreateTriggerPayload, UpdateTriggerPayload};
use crate::error::{Error, Result};
use crate::models::status::{Channel, TriggerEvent};
use crate::models::trigger::Trigger;
use sqlx::PgPool;
use uuid::Uuid;

const TRIGGER_COLUMNS: &str =
    "id, name, event, conditions, channels, template, is_active, created_at, updated_at";

fn check_event(event: &str) -> Result<()> {
    TriggerEvent::parse(event)
        .map(|_| ())
        .ok_or_else(|| Error::BadRequest(format!("Unknown event: {}", event)))
}

fn check_channels(channels: &[String]) -> Result<()> {
    for channel in channels {
        if Channel::parse(channel).is_none() {
            return Err(Error::BadRequest(format!("Unknown channel: {}", channel)));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct TriggerService {
    pool: PgPool,
}

impl TriggerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Trigger>> {
        let triggers = sqlx::query_as::<_, Trigger>(&format!(
            "SELECT {} FROM triggers ORDER BY created_at DESC",
            TRIGGER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(triggers)
    }

    pub async fn create(&self, payload: CreateTriggerPayload) -> Result<Trigger> {
        if payload.name.is_empty() || payload.event.is_empty() || payload.channels.is_empty() {
            return Err(Error::BadRequest(
                "Name, event, and at least one channel are required".to_string(),
            ));
        }
        check_event(&payload.event)?;
        check_channels(&payload.channels)?;

        let trigger = sqlx::query_as::<_, Trigger>(&format!(
            r#"
            INSERT INTO triggers (name, event, conditions, channels, template, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            TRIGGER_COLUMNS
        ))
        .bind(&payload.name)
        .bind(&payload.event)
        .bind(&payload.conditions)
        .bind(&payload.channels)
        .bind(&payload.template)
        .bind(payload.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;
        Ok(trigger)
    }

    pub async fn get(&self, id: Uuid) -> Result<Trigger> {
        let trigger = sqlx::query_as::<_, Trigger>(&format!(
            "SELECT {} FROM triggers WHERE id = $1",
            TRIGGER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        trigger.ok_or_else(|| Error::NotFound("Trigger not found".to_string()))
    }

    /// Partial merge: absent fields keep their stored value.
    pub async fn update(&self, id: Uuid, payload: UpdateTriggerPayload) -> Result<Trigger> {
        if let Some(ref event) = payload.event {
            check_event(event)?;
        }
        if let Some(ref channels) = payload.channels {
            if channels.is_empty() {
                return Err(Error::BadRequest(
                    "At least one channel is required".to_string(),
                ));
            }
            check_channels(channels)?;
        }

        let trigger = sqlx::query_as::<_, Trigger>(&format!(
            r#"
            UPDATE triggers
            SET
                name = COALESCE($2, name),
                event = COALESCE($3, event),
                conditions = COALESCE($4, conditions),
                channels = COALESCE($5, channels),
                template = COALESCE($6, template),
                is_active = COALESCE($7, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TRIGGER_COLUMNS
        ))
        .bind(id)
        .bind(&payload.name)
        .bind(&payload.event)
        .bind(&payload.conditions)
        .bind(&payload.channels)
        .bind(&payload.template)
        .bind(payload.is_active)
        .fetch_optional(&self.pool)
        .await?;
        trigger.ok_or_else(|| Error::NotFound("Trigger not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM triggers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Trigger not found".to_string()));
        }
        Ok(())
    }

    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Trigger> {
        let trigger = sqlx::query_as::<_, Trigger>(&format!(
            r#"
            UPDATE triggers SET is_active = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TRIGGER_COLUMNS
        ))
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?;
        trigger.ok_or_else(|| Error::NotFound("Trigger not found".to_string()))
    }
}
