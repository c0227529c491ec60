//! `/users/` endpoints used by the admin dashboard

use skinlens_core::types::{User, UserUpdate};
use tracing::info;

use crate::{ApiClient, PendingRequest, Result};

pub struct UserApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.client.execute_json(PendingRequest::get("/users/")).await
    }

    pub async fn get(&self, user_id: i64) -> Result<User> {
        self.client
            .execute_json(PendingRequest::get(format!("/users/{}/", user_id)))
            .await
    }

    pub async fn update(&self, user_id: i64, update: &UserUpdate) -> Result<User> {
        let request = PendingRequest::patch(format!("/users/{}/", user_id)).json(update)?;
        self.client.execute_json(request).await
    }

    /// Activate or deactivate an account
    pub async fn set_active(&self, user_id: i64, active: bool) -> Result<User> {
        let user = self
            .update(
                user_id,
                &UserUpdate {
                    is_active: Some(active),
                    ..Default::default()
                },
            )
            .await?;
        info!(user_id, active, "Updated user status");
        Ok(user)
    }

    pub async fn delete(&self, user_id: i64) -> Result<()> {
        self.client
            .execute(PendingRequest::delete(format!("/users/{}/", user_id)))
            .await?;
        info!(user_id, "Deleted user");
        Ok(())
    }
}
