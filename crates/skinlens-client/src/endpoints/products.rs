//! `/products/` endpoints
//!
//! Product bodies never carry the image; it goes through `update_image`.

use skinlens_core::{
    types::{ImageFile, Product, ProductDraft},
    validation::validate_product,
};
use tracing::info;

use crate::{ApiClient, PendingRequest, Result};

pub struct ProductApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Product>> {
        self.client.execute_json(PendingRequest::get("/products/")).await
    }

    pub async fn get(&self, product_id: i64) -> Result<Product> {
        self.client
            .execute_json(PendingRequest::get(format!("/products/{}/", product_id)))
            .await
    }

    /// # Errors
    /// - `ClientError::Validation` before any request if the draft is incomplete
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        validate_product(draft)?;
        let request = PendingRequest::post("/products/").json(draft)?;
        let product: Product = self.client.execute_json(request).await?;
        info!(product_id = product.id, "Created product");
        Ok(product)
    }

    /// # Errors
    /// - `ClientError::Validation` before any request if the draft is incomplete
    pub async fn update(&self, product_id: i64, draft: &ProductDraft) -> Result<Product> {
        validate_product(draft)?;
        let request = PendingRequest::patch(format!("/products/{}/", product_id)).json(draft)?;
        self.client.execute_json(request).await
    }

    pub async fn update_image(&self, product_id: i64, image: ImageFile) -> Result<Product> {
        let request = PendingRequest::post(format!("/products/{}/update_image/", product_id))
            .multipart("image", image);
        self.client.execute_json(request).await
    }

    pub async fn delete(&self, product_id: i64) -> Result<()> {
        self.client
            .execute(PendingRequest::delete(format!("/products/{}/", product_id)))
            .await?;
        info!(product_id, "Deleted product");
        Ok(())
    }
}
