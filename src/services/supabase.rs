use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use crate::models::{Person, CompetencyScore};

/// Errors that can occur when reading from the score store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing SUPABASE_URL or SUPABASE_SERVICE_KEY")]
    MissingCredentials,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: StatusCode, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Read-only access to project people and their competency averages
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// All people registered on a project
    async fn fetch_people(&self, project_id: &str) -> Result<Vec<Person>, StoreError>;

    /// Score rows of a project restricted to the given competency ids
    async fn fetch_scores(
        &self,
        project_id: &str,
        competency_ids: &[String],
    ) -> Result<Vec<CompetencyScore>, StoreError>;
}

/// Table and view names queried on the Supabase project
#[derive(Debug, Clone)]
pub struct SupabaseTables {
    pub people: String,
    pub scores: String,
}

impl Default for SupabaseTables {
    fn default() -> Self {
        Self {
            people: "project_people".to_string(),
            scores: "v_kompas_series".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    base_url: String,
    service_key: String,
}

/// Supabase REST (PostgREST) client
///
/// Credentials are optional at construction time so the service can boot
/// without them; every query then fails with `MissingCredentials`.
pub struct SupabaseClient {
    credentials: Option<Credentials>,
    tables: SupabaseTables,
    client: Client,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: Option<String>,
        service_key: Option<String>,
        tables: SupabaseTables,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;

        let credentials = match (base_url, service_key) {
            (Some(base_url), Some(service_key)) if !base_url.is_empty() && !service_key.is_empty() => {
                Some(Credentials {
                    base_url: base_url.trim_end_matches('/').to_string(),
                    service_key,
                })
            }
            _ => None,
        };

        Ok(Self {
            credentials,
            tables,
            client,
        })
    }

    /// GET a table with PostgREST filters and decode the JSON array body
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let credentials = self.credentials.as_ref().ok_or(StoreError::MissingCredentials)?;

        let query = filters
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        let url = format!("{}/rest/v1/{}?{}", credentials.base_url, table, query);

        tracing::debug!("Querying Supabase table {}", table);

        let response = self
            .client
            .get(&url)
            .header("apikey", &credentials.service_key)
            .header("Authorization", format!("Bearer {}", credentials.service_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(StoreError::ApiError { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse {} rows: {}", table, e)))
    }
}

/// Build a PostgREST `in.(...)` filter, quoting each value
fn in_filter(values: &[String]) -> String {
    let quoted = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(",");
    format!("in.({})", quoted)
}

#[async_trait]
impl ScoreStore for SupabaseClient {
    async fn fetch_people(&self, project_id: &str) -> Result<Vec<Person>, StoreError> {
        let filters = [
            ("select", "id,full_name".to_string()),
            ("project_id", format!("eq.{}", project_id)),
        ];

        let people: Vec<Person> = self.select(&self.tables.people, &filters).await?;
        tracing::debug!("Fetched {} people for project {}", people.len(), project_id);
        Ok(people)
    }

    async fn fetch_scores(
        &self,
        project_id: &str,
        competency_ids: &[String],
    ) -> Result<Vec<CompetencyScore>, StoreError> {
        if competency_ids.is_empty() {
            return Ok(Vec::new());
        }

        let filters = [
            ("select", "target_id,category_id,category_name,safe_avg".to_string()),
            ("project_id", format!("eq.{}", project_id)),
            ("category_id", in_filter(competency_ids)),
        ];

        let rows: Vec<CompetencyScore> = self.select(&self.tables.scores, &filters).await?;
        tracing::debug!("Fetched {} score rows for project {}", rows.len(), project_id);
        Ok(rows)
    }
}
