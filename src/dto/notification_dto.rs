use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkNotificationPayload {
    pub statuses: Vec<String>,
    /// Vacancy filter; absent or the literal "none" means no filter.
    pub vacancy_id: Option<String>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub channel: Option<String>,
    pub include_offer: bool,
    pub offer_content: Option<String>,
    pub vacancy_id_for_offer: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkNotificationResponse {
    pub success: bool,
    pub notifications_sent: usize,
    pub offers_created: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateFilterQuery {
    /// Comma-separated funnel states.
    pub statuses: Option<String>,
    pub vacancy_id: Option<String>,
}
