use crate::error::{Error, Result};
use crate::models::property::Property;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogUser {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CatalogUser {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            email: None,
            phone: None,
        }
    }
}

/// Narrow interface over the spreadsheet-backed listing store: read-all,
/// append-row, update-row-by-key, plus the two auxiliary single-column tabs.
/// Everything else (filtering, id generation, defaults) lives above it.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TabularStore: Send + Sync {
    async fn read_properties(&self) -> Result<Vec<Property>>;
    async fn append_property(&self, property: &Property) -> Result<()>;
    async fn update_property(&self, id: &str, property: &Property) -> Result<()>;
    async fn read_areas(&self) -> Result<Vec<String>>;
    async fn read_users(&self) -> Result<Vec<CatalogUser>>;
}

/// In-memory store used by the test suite and when the service runs without
/// Sheets credentials.
#[derive(Debug, Default)]
pub struct MemoryStore {
    properties: RwLock<Vec<Property>>,
    areas: Vec<String>,
    users: Vec<CatalogUser>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: Vec<Property>) -> Self {
        Self {
            properties: RwLock::new(properties),
            ..Self::default()
        }
    }

    pub fn with_catalog(mut self, areas: Vec<String>, users: Vec<CatalogUser>) -> Self {
        self.areas = areas;
        self.users = users;
        self
    }
}

#[async_trait::async_trait]
impl TabularStore for MemoryStore {
    async fn read_properties(&self) -> Result<Vec<Property>> {
        Ok(self.properties.read().await.clone())
    }

    async fn append_property(&self, property: &Property) -> Result<()> {
        self.properties.write().await.push(property.clone());
        Ok(())
    }

    async fn update_property(&self, id: &str, property: &Property) -> Result<()> {
        let mut rows = self.properties.write().await;
        match rows.iter_mut().find(|p| p.id == id) {
            Some(slot) => {
                *slot = property.clone();
                Ok(())
            }
            None => Err(Error::NotFound(format!("Property with id {} not found", id))),
        }
    }

    async fn read_areas(&self) -> Result<Vec<String>> {
        Ok(self.areas.clone())
    }

    async fn read_users(&self) -> Result<Vec<CatalogUser>> {
        Ok(self.users.clone())
    }
}
