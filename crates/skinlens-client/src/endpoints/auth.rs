//! Login, registration and token endpoints
//!
//! Login and registration bypass the refresh interceptor: a 401 there means
//! the credentials are wrong, not that a token expired.

use serde_json::Value;
use skinlens_core::{
    types::{Credentials, Registration, RegistrationResponse, TokenPair},
    validation::{validate_credentials, validate_registration},
};
use tracing::{info, instrument, warn};

use crate::{
    ApiClient, ClientError, PendingRequest, Result,
    api::decode_json,
    error::{extract_server_message, first_string},
};

/// Registration field errors, in the order they are reported
const REGISTRATION_ERROR_FIELDS: [&str; 3] = ["email", "password", "username"];

pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token pair and store it in the session
    ///
    /// # Errors
    /// - `ClientError::Validation` if email or password is empty
    /// - `ClientError::Authentication` with the server's reason (or
    ///   "Invalid credentials") when the backend rejects the login
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
        validate_credentials(credentials)?;

        let request = PendingRequest::post("/token/").json(credentials)?;
        let response = self.client.execute_public(request).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Login rejected with status {}", status);
            return Err(ClientError::Authentication(
                extract_server_message(&body).unwrap_or_else(|| "Invalid credentials".to_string()),
            ));
        }

        let tokens: TokenPair = decode_json(response).await?;
        self.client.session().store_tokens(&tokens).await?;
        info!("Logged in");
        Ok(tokens)
    }

    /// Create an account; tokens returned with it are stored in the session
    ///
    /// # Errors
    /// - `ClientError::Validation` for incomplete forms or mismatched passwords
    /// - `ClientError::Authentication` with the first field error reported by
    ///   the backend
    #[instrument(skip_all, fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) -> Result<RegistrationResponse> {
        validate_registration(registration)?;

        let request = PendingRequest::post("/users/").json(&registration.to_payload())?;
        let response = self.client.execute_public(request).await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Registration rejected with status {}", status);
            return Err(ClientError::Authentication(registration_error(&body)));
        }

        let created: RegistrationResponse = decode_json(response).await?;
        if let Some(tokens) = &created.tokens {
            self.client.session().store_tokens(tokens).await?;
        }

        info!("Registered new account");
        Ok(created)
    }

    /// Mint a new access token from the stored refresh token
    pub async fn refresh(&self) -> Result<String> {
        self.client.refresh_access_token().await
    }

    /// Forget both tokens
    pub async fn logout(&self) -> Result<()> {
        self.client.session().clear().await?;
        info!("Logged out");
        Ok(())
    }
}

fn registration_error(body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    parsed
        .as_ref()
        .and_then(|json| {
            REGISTRATION_ERROR_FIELDS
                .iter()
                .find_map(|field| first_string(json.get(*field)))
                .or_else(|| first_string(json.get("detail")))
        })
        .unwrap_or_else(|| "Registration failed. Please check your input.".to_string())
}
