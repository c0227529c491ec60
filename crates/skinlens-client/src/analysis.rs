//! Image analysis pipeline
//!
//! Upload (best effort) → inference with bounded retries → result storage
//! (best effort). Only the inference step can fail the pipeline.

use skinlens_core::{
    AnalysisOutcome,
    types::{ImageFile, ImageUpload},
};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::{ApiClient, ClientError, InferenceClient, Result, RetryPolicy};

pub struct AnalysisPipeline {
    api: Arc<ApiClient>,
    inference: InferenceClient,
    policy: RetryPolicy,
}

impl AnalysisPipeline {
    pub fn new(api: Arc<ApiClient>, inference: InferenceClient) -> Self {
        Self {
            api,
            inference,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Analyze one image
    ///
    /// # Errors
    /// - `ClientError::Validation` if the image is empty (nothing is sent)
    /// - `ClientError::AnalysisFailed` once every inference attempt failed
    #[instrument(skip_all, fields(file = %image.file_name))]
    pub async fn analyze(&self, image: &ImageFile) -> Result<AnalysisOutcome> {
        if image.is_empty() {
            return Err(ClientError::Validation(
                "Please select an image to analyze".to_string(),
            ));
        }

        let signed_in = self.api.session().access_token().await?.is_some();

        let upload = if signed_in {
            self.upload(image).await
        } else {
            None
        };

        let result = self
            .policy
            .run(|attempt| async move {
                let outcome = self.inference.predict(image).await;
                if let Some(metrics) = self.api.metrics() {
                    metrics.record_inference_attempt(outcome.is_ok());
                }
                if outcome.is_ok() && attempt > 1 {
                    info!("Inference succeeded on attempt {}", attempt);
                }
                outcome
            })
            .await
            .map_err(|e| match e {
                ClientError::RetriesExhausted { attempts, source } => {
                    error!("Image analysis failed after {} attempts: {}", attempts, source);
                    ClientError::AnalysisFailed { attempts, source }
                }
                other => other,
            })?;

        if signed_in && let Some(upload) = &upload {
            let record = result.to_record(upload.id);
            if let Err(e) = self.api.images().store_result(&record).await {
                warn!("Failed to store analysis result for image {}: {}", upload.id, e);
                self.note_best_effort_failure("store_result");
            }
        }

        info!(
            "Analysis complete: {} ({})",
            result.condition,
            result.confidence_display()
        );

        Ok(AnalysisOutcome {
            result,
            image_id: upload.as_ref().map(|u| u.id),
            image_url: upload.and_then(|u| u.image_url),
        })
    }

    async fn upload(&self, image: &ImageFile) -> Option<ImageUpload> {
        match self.api.images().upload(image.clone()).await {
            Ok(upload) => Some(upload),
            Err(e) => {
                warn!("Image upload failed, continuing without an image id: {}", e);
                self.note_best_effort_failure("upload");
                None
            }
        }
    }

    fn note_best_effort_failure(&self, step: &str) {
        if let Some(metrics) = self.api.metrics() {
            metrics.record_best_effort_failure(step);
        }
    }
}
