use crate::error::{Error, Result};
use crate::models::property::Property;
use crate::sheets::rows::{property_to_row, row_to_property};
use crate::sheets::store::{CatalogUser, TabularStore};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const PROPERTIES_RANGE: &str = "Properties!A2:AQ";
const PROPERTIES_ID_RANGE: &str = "Properties!A2:A";
const PROPERTIES_APPEND_RANGE: &str = "Properties!A1";
const AREAS_TAB: &str = "DubaiAreas";
const USERS_TAB: &str = "Employee";

#[derive(Debug)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Google Sheets REST v4 adapter. One instance lives for the process; the
/// service-account access token is fetched lazily and cached until shortly
/// before expiry.
pub struct GoogleSheetsStore {
    client: Client,
    sheets_id: String,
    service_account_email: String,
    private_key: String,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct ValuesResponse {
    #[serde(default)]
    values: Vec<Vec<JsonValue>>,
}

impl GoogleSheetsStore {
    pub fn new(sheets_id: String, service_account_email: String, private_key: String) -> Self {
        Self {
            client: Client::new(),
            sheets_id,
            service_account_email,
            private_key,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        let now = chrono::Utc::now().timestamp();
        let claims = json!({
            "iss": self.service_account_email,
            "scope": SHEETS_SCOPE,
            "aud": TOKEN_URL,
            "iat": now,
            "exp": now + 3600,
        });
        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| Error::Config(format!("Invalid Google service account key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| Error::Internal(format!("Failed to sign token assertion: {}", e)))?;

        let resp = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Sheet(format!(
                "Token exchange failed ({}): {}",
                status, body
            )));
        }
        let token: TokenResponse = resp.json().await?;

        let expires_at =
            Instant::now() + Duration::from_secs(token.expires_in.saturating_sub(60));
        let value = token.access_token.clone();
        *guard = Some(CachedToken {
            value: token.access_token,
            expires_at,
        });
        Ok(value)
    }

    async fn values_get(&self, range: &str) -> Result<Vec<Vec<JsonValue>>> {
        let token = self.access_token().await?;
        let url = format!("{}/{}/values/{}", SHEETS_API, self.sheets_id, range);
        let resp = self.client.get(&url).bearer_auth(token).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Sheet(format!(
                "Sheets read {} failed ({}): {}",
                range, status, body
            )));
        }
        let values: ValuesResponse = resp.json().await?;
        Ok(values.values)
    }

    async fn values_append(&self, range: &str, row: Vec<JsonValue>) -> Result<()> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/{}/values/{}:append?valueInputOption=USER_ENTERED",
            SHEETS_API, self.sheets_id, range
        );
        let resp = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Sheet(format!(
                "Sheets append failed ({}): {}",
                status, body
            )));
        }
        Ok(())
    }

    async fn values_update(&self, range: &str, row: Vec<JsonValue>) -> Result<()> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/{}/values/{}?valueInputOption=USER_ENTERED",
            SHEETS_API, self.sheets_id, range
        );
        let resp = self
            .client
            .put(&url)
            .bearer_auth(token)
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Sheet(format!(
                "Sheets update {} failed ({}): {}",
                range, status, body
            )));
        }
        Ok(())
    }

    async fn sheet_titles(&self) -> Result<Vec<String>> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/{}?fields=sheets.properties.title",
            SHEETS_API, self.sheets_id
        );
        let resp = self.client.get(&url).bearer_auth(token).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Sheet(format!(
                "Sheets metadata read failed ({}): {}",
                status, body
            )));
        }
        let body: JsonValue = resp.json().await?;
        let titles = body["sheets"]
            .as_array()
            .map(|sheets| {
                sheets
                    .iter()
                    .filter_map(|s| s["properties"]["title"].as_str())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        Ok(titles)
    }

    /// Single-column tab reader: drops an optional "Name" header row,
    /// trims cells and discards empties.
    fn column_names(rows: Vec<Vec<JsonValue>>) -> Vec<String> {
        let mut names: Vec<String> = rows
            .into_iter()
            .filter_map(|row| row.into_iter().next())
            .filter_map(|cell| cell.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect();
        if names
            .first()
            .map(|first| first.eq_ignore_ascii_case("name"))
            .unwrap_or(false)
        {
            names.remove(0);
        }
        names
    }
}

#[async_trait::async_trait]
impl TabularStore for GoogleSheetsStore {
    async fn read_properties(&self) -> Result<Vec<Property>> {
        let rows = self.values_get(PROPERTIES_RANGE).await?;
        Ok(rows
            .iter()
            .filter(|row| row.first().and_then(|c| c.as_str()).unwrap_or("") != "")
            .map(|row| row_to_property(row))
            .collect())
    }

    async fn append_property(&self, property: &Property) -> Result<()> {
        self.values_append(PROPERTIES_APPEND_RANGE, property_to_row(property))
            .await
    }

    // Read-locate-write without locking: concurrent updates to the same row
    // are a lost-update race, tolerated at this store's single-operator
    // write rate.
    async fn update_property(&self, id: &str, property: &Property) -> Result<()> {
        let ids = self.values_get(PROPERTIES_ID_RANGE).await?;
        let index = ids
            .iter()
            .position(|row| row.first().and_then(|c| c.as_str()) == Some(id))
            .ok_or_else(|| Error::NotFound(format!("Property with id {} not found", id)))?;

        // Data starts on sheet row 2, one past the header.
        let sheet_row = index + 2;
        let range = format!("Properties!A{}:AQ{}", sheet_row, sheet_row);
        self.values_update(&range, property_to_row(property)).await
    }

    async fn read_areas(&self) -> Result<Vec<String>> {
        let titles = self.sheet_titles().await?;
        if !titles.iter().any(|t| t == AREAS_TAB) {
            return Ok(Vec::new());
        }
        let rows = self.values_get(&format!("{}!A:A", AREAS_TAB)).await?;
        Ok(Self::column_names(rows))
    }

    async fn read_users(&self) -> Result<Vec<CatalogUser>> {
        let titles = self.sheet_titles().await?;
        if !titles.iter().any(|t| t == USERS_TAB) {
            return Ok(Vec::new());
        }
        let rows = self.values_get(&format!("{}!A:A", USERS_TAB)).await?;
        Ok(Self::column_names(rows)
            .into_iter()
            .map(|name| CatalogUser {
                name,
                email: None,
                phone: None,
            })
            .collect())
    }
}
