//! `/consultations/` endpoints

use skinlens_core::{
    types::{Consultation, ConsultationRequest},
    validation::validate_consultation,
};

use crate::{ApiClient, PendingRequest, Result};

pub struct ConsultationApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ConsultationApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Book a consultation for the logged-in user
    ///
    /// # Errors
    /// - `ClientError::Validation` before any request for a missing message
    ///   or a date that isn't `YYYY-MM-DD`
    pub async fn create(&self, request: &ConsultationRequest) -> Result<Consultation> {
        validate_consultation(request)?;
        let pending = PendingRequest::post("/consultations/create/").json(request)?;
        self.client.execute_json(pending).await
    }

    /// Consultations booked by the logged-in user
    pub async fn list_mine(&self) -> Result<Vec<Consultation>> {
        self.client
            .execute_json(PendingRequest::get("/consultations/user/"))
            .await
    }
}
