use serde::Deserialize;
use serde_json::Value as JsonValue;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTriggerPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub event: String,
    pub conditions: Option<JsonValue>,
    #[serde(default)]
    pub channels: Vec<String>,
    pub template: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTriggerPayload {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub event: Option<String>,
    pub conditions: Option<JsonValue>,
    pub channels: Option<Vec<String>>,
    pub template: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleTriggerPayload {
    pub is_active: bool,
}
