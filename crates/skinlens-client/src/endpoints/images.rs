//! `/analysis/` endpoints

use skinlens_core::{
    AnalysisResult,
    types::{AnalysisRecord, ImageFile, ImageUpload},
};

use crate::{ApiClient, PendingRequest, Result};

pub struct ImageApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ImageApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Store an image server-side (multipart field `image`)
    pub async fn upload(&self, image: ImageFile) -> Result<ImageUpload> {
        let request = PendingRequest::post("/analysis/upload/").multipart("image", image);
        self.client.execute_json(request).await
    }

    /// Ask the backend to analyze a previously uploaded image
    pub async fn analyze(&self, image_id: i64) -> Result<AnalysisResult> {
        self.client
            .execute_json(PendingRequest::post(format!("/analysis/{}/analyze/", image_id)))
            .await
    }

    /// Persist an inference result against a stored image
    pub async fn store_result(&self, record: &AnalysisRecord) -> Result<()> {
        let request = PendingRequest::post("/analysis-results/").json(record)?;
        self.client.execute(request).await?;
        Ok(())
    }
}
