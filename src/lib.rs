pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod sheets;

use crate::services::{
    candidate_service::CandidateService, course_service::CourseService,
    notification_service::NotificationService, property_service::PropertyService,
    trigger_service::TriggerService, vacancy_service::VacancyService,
};
use crate::sheets::{GoogleSheetsStore, MemoryStore, TabularStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub trigger_service: TriggerService,
    pub candidate_service: CandidateService,
    pub notification_service: NotificationService,
    pub course_service: CourseService,
    pub vacancy_service: VacancyService,
    pub property_service: PropertyService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let store: Arc<dyn TabularStore> = match config.sheets_credentials() {
            Some((sheets_id, email, key)) => {
                Arc::new(GoogleSheetsStore::new(sheets_id, email, key))
            }
            None => {
                tracing::warn!(
                    "Google Sheets credentials not configured; property catalog uses the in-memory store"
                );
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_property_store(pool, store)
    }

    pub fn with_property_store(pool: PgPool, store: Arc<dyn TabularStore>) -> Self {
        Self {
            trigger_service: TriggerService::new(pool.clone()),
            candidate_service: CandidateService::new(pool.clone()),
            notification_service: NotificationService::new(pool.clone()),
            course_service: CourseService::new(pool.clone()),
            vacancy_service: VacancyService::new(pool.clone()),
            property_service: PropertyService::new(store),
            pool,
        }
    }
}
