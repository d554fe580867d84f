/// API client — the single point of entry for all scoring backend calls.
///
/// The controller only ever talks to the backend through the `ScoringApi`
/// trait; `ApiClient` is the reqwest-backed implementation of it.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, Request, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;
use tracing::{debug, debug_span, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{extract_backend_message, ApiError};
use crate::models::insights::{GenerateInsightsRequest, InsightsResponse};
use crate::models::score::{ScoreHistoryResponse, ScoreResponse};
use crate::models::settings::{JobSettingsResponse, SettingsResponse};
use crate::models::{
    AiInsights, ScoreHistoryEntry, ScoreResult, ScoringPreferences, ScoringSettingsUpdate,
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Backend operations consumed by the score controller.
///
/// Carried in `ScoreController` as `Arc<dyn ScoringApi>` so the HTTP client can be
/// swapped for an in-memory fake.
#[async_trait]
pub trait ScoringApi: Send + Sync {
    /// GET /candidates/{id}/success-score?jobId=
    async fn calculate_score(
        &self,
        candidate_id: &str,
        job_id: Option<&str>,
    ) -> Result<ScoreResult, ApiError>;

    /// GET /candidates/{id}/success-score/history?limit=
    async fn score_history(
        &self,
        candidate_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ScoreHistoryEntry>, ApiError>;

    /// POST /candidates/{id}/success-score/insights
    async fn generate_insights(
        &self,
        candidate_id: &str,
        job_id: Option<&str>,
    ) -> Result<AiInsights, ApiError>;

    /// GET /candidates/{id}/success-score/insights
    ///
    /// A 404 is returned as an error; deciding that it means "empty" is the caller's call.
    async fn get_insights(&self, candidate_id: &str) -> Result<Option<AiInsights>, ApiError>;

    /// GET /settings/scoring
    async fn global_settings(&self) -> Result<ScoringPreferences, ApiError>;

    /// PUT /settings/scoring
    async fn update_global_settings(
        &self,
        update: &ScoringSettingsUpdate,
    ) -> Result<ScoringPreferences, ApiError>;

    /// GET /settings/scoring/job/{jobId}
    async fn job_settings(&self, job_id: &str) -> Result<JobSettingsResponse, ApiError>;

    /// PUT /settings/scoring/job/{jobId}
    async fn update_job_settings(
        &self,
        job_id: &str,
        update: &ScoringSettingsUpdate,
    ) -> Result<ScoringPreferences, ApiError>;

    /// DELETE /settings/scoring/job/{jobId}; returns the backend's confirmation message.
    async fn delete_job_settings(&self, job_id: &str) -> Result<Option<String>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Bearer-authenticated JSON client for the scoring backend.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Validation(format!("Invalid backend base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Validation(format!(
                "Backend base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.api_base_url,
            config.api_token.clone(),
            config.http_timeout,
        )
    }

    /// Joins percent-encoded path segments onto the base URL and appends the
    /// query pairs whose value is present.
    fn endpoint(&self, segments: &[&str], query: &[(&str, Option<String>)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request_id = Uuid::new_v4();
        let builder = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id.to_string());
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request inside a span carrying its request id and unwraps the
    /// `{ success, ... }` envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request = request.build()?;
        let span = debug_span!(
            "scoring_api_request",
            request_id = %request_id_of(&request),
            method = %request.method(),
            url = %request.url(),
        );
        self.execute(request).instrument(span).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request) -> Result<T, ApiError> {
        debug!("Sending scoring API request");
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .as_ref()
                .and_then(extract_backend_message);
            warn!("Scoring API returned {}: {}", status, message.as_deref().unwrap_or(&body));
            return Err(ApiError::Http {
                status: status.as_u16(),
                message,
                body,
            });
        }

        let envelope: Value = serde_json::from_str(&body)?;
        if envelope.get("success").and_then(Value::as_bool) == Some(false) {
            let message = extract_backend_message(&envelope);
            warn!("Scoring API rejected request: {:?}", message);
            return Err(ApiError::Rejected { message });
        }

        debug!(status = status.as_u16(), "Scoring API request succeeded");
        Ok(serde_json::from_value(envelope)?)
    }
}

fn request_id_of(request: &Request) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

#[async_trait]
impl ScoringApi for ApiClient {
    async fn calculate_score(
        &self,
        candidate_id: &str,
        job_id: Option<&str>,
    ) -> Result<ScoreResult, ApiError> {
        let url = self.endpoint(
            &["candidates", candidate_id, "success-score"],
            &[("jobId", job_id.map(str::to_string))],
        );
        let resp: ScoreResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(resp.score)
    }

    async fn score_history(
        &self,
        candidate_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ScoreHistoryEntry>, ApiError> {
        let url = self.endpoint(
            &["candidates", candidate_id, "success-score", "history"],
            &[("limit", limit.map(|l| l.to_string()))],
        );
        let resp: ScoreHistoryResponse = self.send(self.request(Method::GET, url)).await?;
        debug!(
            "Fetched {} history entries (backend total: {:?})",
            resp.history.len(),
            resp.total_entries
        );
        Ok(resp.history)
    }

    async fn generate_insights(
        &self,
        candidate_id: &str,
        job_id: Option<&str>,
    ) -> Result<AiInsights, ApiError> {
        let url = self.endpoint(
            &["candidates", candidate_id, "success-score", "insights"],
            &[],
        );
        let request = self
            .request(Method::POST, url)
            .json(&GenerateInsightsRequest { job_id });
        let resp: InsightsResponse = self.send(request).await?;
        resp.insights.ok_or_else(|| ApiError::Rejected {
            message: Some("Backend returned no insights".to_string()),
        })
    }

    async fn get_insights(&self, candidate_id: &str) -> Result<Option<AiInsights>, ApiError> {
        let url = self.endpoint(
            &["candidates", candidate_id, "success-score", "insights"],
            &[],
        );
        let resp: InsightsResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(resp.insights)
    }

    async fn global_settings(&self) -> Result<ScoringPreferences, ApiError> {
        let url = self.endpoint(&["settings", "scoring"], &[]);
        let resp: SettingsResponse = self.send(self.request(Method::GET, url)).await?;
        Ok(resp.settings)
    }

    async fn update_global_settings(
        &self,
        update: &ScoringSettingsUpdate,
    ) -> Result<ScoringPreferences, ApiError> {
        let url = self.endpoint(&["settings", "scoring"], &[]);
        let resp: SettingsResponse = self
            .send(self.request(Method::PUT, url).json(update))
            .await?;
        Ok(resp.settings)
    }

    async fn job_settings(&self, job_id: &str) -> Result<JobSettingsResponse, ApiError> {
        let url = self.endpoint(&["settings", "scoring", "job", job_id], &[]);
        self.send(self.request(Method::GET, url)).await
    }

    async fn update_job_settings(
        &self,
        job_id: &str,
        update: &ScoringSettingsUpdate,
    ) -> Result<ScoringPreferences, ApiError> {
        let url = self.endpoint(&["settings", "scoring", "job", job_id], &[]);
        let resp: SettingsResponse = self
            .send(self.request(Method::PUT, url).json(update))
            .await?;
        Ok(resp.settings)
    }

    async fn delete_job_settings(&self, job_id: &str) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["settings", "scoring", "job", job_id], &[]);
        let resp: MessageResponse = self.send(self.request(Method::DELETE, url)).await?;
        Ok(resp.message)
    }
}
