//! Skin-analysis inference service client
//!
//! The model is served from a standalone HTTP function, separate from the
//! backend API. It takes a multipart upload under the `file` field and
//! answers with an `AnalysisResult` JSON document. No credentials are sent.

use reqwest::{Client, header};
use skinlens_core::{AnalysisResult, types::ImageFile};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    ClientError, Result,
    api::decode_json,
    client::{HttpClientConfig, create_client},
    error::extract_server_message,
    request::multipart_form,
};

/// Default public inference endpoint
pub const DEFAULT_INFERENCE_ENDPOINT: &str =
    "https://us-central1-aurora-457407.cloudfunctions.net/predict";

/// Multipart field the inference service reads the image from
pub const INFERENCE_FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Full URL of the prediction endpoint
    pub endpoint: String,

    /// Per-attempt timeout in seconds (default: 60)
    pub timeout_secs: u64,

    pub client_config: HttpClientConfig,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            timeout_secs: 60,
            client_config: HttpClientConfig::default(),
        }
    }
}

impl InferenceConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

pub struct InferenceClient {
    http: Client,
    config: InferenceConfig,
}

impl InferenceClient {
    pub fn new(config: InferenceConfig) -> Result<Self> {
        let http = create_client(&config.client_config)?;
        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Run a single prediction; retries are the caller's concern
    ///
    /// # Errors
    /// - `ClientError::Server` for non-2xx responses, with the service's
    ///   `message` when it sends one
    /// - `ClientError::Http` on timeout or connection failure
    /// - `ClientError::Parse` if the body isn't an analysis result
    #[instrument(skip_all, fields(file = %image.file_name, size = image.len()))]
    pub async fn predict(&self, image: &ImageFile) -> Result<AnalysisResult> {
        let form = multipart_form(INFERENCE_FILE_FIELD, image)?;

        let response = self
            .http
            .post(&self.config.endpoint)
            .header(header::ACCEPT, "application/json")
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Inference service returned {}", status);
            return Err(ClientError::Server {
                status_code: status.as_u16(),
                message: extract_server_message(&body),
            });
        }

        let result: AnalysisResult = decode_json(response).await?;
        debug!(
            "Inference result: {} ({})",
            result.condition,
            result.confidence_display()
        );
        Ok(result)
    }
}

impl std::fmt::Debug for InferenceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceClient")
            .field("endpoint", &self.config.endpoint)
            .field("timeout_secs", &self.config.timeout_secs)
            .finish_non_exhaustive()
    }
}
