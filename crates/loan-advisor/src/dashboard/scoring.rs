//! Wire contract and HTTP client for the external scoring service.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use super::profile::ApplicantProfile;
use crate::config::ScoringConfig;

/// One feature attribution as reported by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplanationEntry {
    pub feature: String,
    pub value: f64,
    /// Missing labels render as empty text.
    #[serde(default)]
    pub display_name: String,
}

/// Response body of `POST /api/predict`.
///
/// Every member is optional on the wire; interpretation happens when the body is
/// turned into an outcome. A member of the wrong shape reads as absent, so one bad
/// member never hides the rest of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub status: String,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub prediction: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub probability: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub explanation: Option<Vec<ExplanationEntry>>,
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

impl PredictResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("scoring request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("profile could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("scoring response (HTTP {status}) is not valid JSON: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Seam between the request controller and whatever answers predictions.
#[async_trait]
pub trait ScoringClient: Send + Sync {
    async fn predict(&self, profile: &ApplicantProfile) -> Result<PredictResponse, ScoringError>;
}

/// Posts profiles as JSON to the scoring service.
#[derive(Debug, Clone)]
pub struct HttpScoringClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpScoringClient {
    pub fn new(config: &ScoringConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config.predict_url())
    }

    pub fn with_client(client: reqwest::Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ScoringClient for HttpScoringClient {
    async fn predict(&self, profile: &ApplicantProfile) -> Result<PredictResponse, ScoringError> {
        let body = serde_json::to_vec(profile).map_err(ScoringError::Encode)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(body)
            .send()
            .await?;

        // Error bodies arrive with 4xx codes, so the status line is not checked.
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), bytes = text.len(), "scoring response received");

        serde_json::from_str(&text).map_err(|source| ScoringError::Decode {
            status: status.as_u16(),
            source,
        })
    }
}
