//! Authenticated backend API client
//!
//! Every request carries `Authorization: Bearer <access token>` when the
//! session holds one. A 401 on a request that hasn't been retried yet triggers
//! one refresh through `POST /token/refresh/` and one replay of the request
//! with the new token. If the refresh itself fails the session is cleared and
//! the navigator is sent to the login view.
//!
//! Concurrent requests that all hit a 401 each run their own refresh; there
//! is no coalescing.

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use skinlens_core::{
    Navigator, NoopNavigator, Redirect, Session, navigation::AUTH_ROUTE,
};
use skinlens_observability::ClientMetrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::{
    ClientError, Result,
    client::{HttpClientConfig, create_client},
    endpoints::{AuthApi, ConsultationApi, ImageApi, ProductApi, UserApi},
    error::server_error,
    request::PendingRequest,
};

/// Refresh endpoint path
pub const TOKEN_REFRESH_PATH: &str = "/token/refresh/";

/// Backend API client configuration
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL including the `/api` prefix (default: http://localhost:8000/api)
    pub base_url: String,

    /// View the user is sent to when the session can't be refreshed
    pub login_route: String,

    /// HTTP client configuration
    pub client_config: HttpClientConfig,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            login_route: AUTH_ROUTE.to_string(),
            client_config: HttpClientConfig::default(),
        }
    }
}

impl ApiClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
        self.login_route = route.into();
        self
    }
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// HTTP client wrapper for the backend REST API
pub struct ApiClient {
    http: Client,
    base_url: String,
    login_route: String,
    session: Session,
    navigator: Arc<dyn Navigator>,
    metrics: Option<Arc<ClientMetrics>>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(config: ApiClientConfig, session: Session) -> Result<Self> {
        let http = create_client(&config.client_config)?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            login_route: config.login_route,
            session,
            navigator: Arc::new(NoopNavigator),
            metrics: None,
        })
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<ClientMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn metrics(&self) -> Option<&Arc<ClientMetrics>> {
        self.metrics.as_ref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    pub fn products(&self) -> ProductApi<'_> {
        ProductApi::new(self)
    }

    pub fn images(&self) -> ImageApi<'_> {
        ImageApi::new(self)
    }

    pub fn consultations(&self) -> ConsultationApi<'_> {
        ConsultationApi::new(self)
    }

    /// Send an authenticated request, refreshing the access token once on 401
    ///
    /// # Errors
    /// - `ClientError::Server` for non-2xx responses (including a 401 when no
    ///   refresh token is stored, or a 401 on the replayed request)
    /// - `ClientError::RefreshFailed` when the refresh call fails; the session
    ///   has been cleared and the navigator redirected by then
    /// - `ClientError::Http` when no response was received
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: PendingRequest) -> Result<Response> {
        let token = self.session.access_token().await?;
        let response = self.send_once(&request, token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED || request.is_retried() {
            return ensure_success(response).await;
        }

        let original = server_error(response).await;

        let Some(refresh_token) = self.session.refresh_token().await? else {
            debug!("Got 401 and no refresh token is stored");
            return Err(original);
        };

        let access = match self.refresh_with(&refresh_token).await {
            Ok(access) => access,
            Err(e) => {
                warn!("Token refresh failed: {}", e);
                self.expire_session().await;
                return Err(ClientError::RefreshFailed {
                    source: Box::new(e),
                });
            }
        };

        debug!("Replaying request with refreshed access token");
        let retry = request.into_retry();
        let response = self.send_once(&retry, Some(&access)).await?;
        ensure_success(response).await
    }

    /// Send an authenticated request and decode its JSON body
    pub async fn execute_json<T: DeserializeOwned>(&self, request: PendingRequest) -> Result<T> {
        let response = self.execute(request).await?;
        decode_json(response).await
    }

    /// Send a request without a token and without the refresh interceptor
    ///
    /// The response is returned whatever its status.
    pub async fn execute_public(&self, request: PendingRequest) -> Result<Response> {
        self.send_once(&request, None).await
    }

    /// Exchange the stored refresh token for a new access token
    ///
    /// # Errors
    /// - `ClientError::Authentication` if no refresh token is stored
    pub async fn refresh_access_token(&self) -> Result<String> {
        let refresh_token = self.session.refresh_token().await?.ok_or_else(|| {
            ClientError::Authentication("No refresh token available".to_string())
        })?;
        self.refresh_with(&refresh_token).await
    }

    async fn refresh_with(&self, refresh_token: &str) -> Result<String> {
        let request = PendingRequest::post(TOKEN_REFRESH_PATH)
            .json(&serde_json::json!({ "refresh": refresh_token }))?;

        let outcome = async {
            let response = ensure_success(self.send_once(&request, None).await?).await?;
            let refreshed = decode_json::<RefreshResponse>(response).await?;
            if refreshed.access.is_empty() {
                return Err(ClientError::Authentication(
                    "Refresh response carried no access token".to_string(),
                ));
            }
            Ok::<RefreshResponse, ClientError>(refreshed)
        }
        .await;

        if let Some(metrics) = &self.metrics {
            metrics.record_refresh(outcome.is_ok());
        }

        let refreshed = outcome?;
        self.session.set_access_token(&refreshed.access).await?;
        if let Some(rotated) = refreshed.refresh.as_deref().filter(|r| !r.is_empty()) {
            self.session.set_refresh_token(rotated).await?;
        }

        info!("Access token refreshed");
        Ok(refreshed.access)
    }

    async fn expire_session(&self) {
        if let Err(e) = self.session.clear().await {
            warn!("Failed to clear session after refresh failure: {}", e);
        }
        self.navigator.redirect(Redirect::to(self.login_route.clone()));
    }

    async fn send_once(&self, request: &PendingRequest, token: Option<&str>) -> Result<Response> {
        let url = self.url(&request.path);
        let mut builder = request.build(&self.http, &url)?;
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let started = Instant::now();
        let result = builder.send().await;
        let elapsed = started.elapsed().as_secs_f64();

        if let Some(metrics) = &self.metrics {
            let status = result.as_ref().ok().map(|r| r.status().as_u16());
            metrics.record_request(request.method.as_str(), status, elapsed);
        }

        match &result {
            Ok(response) => debug!(
                "{} {} -> {} ({:.3}s)",
                request.method,
                request.path,
                response.status(),
                elapsed
            ),
            Err(e) => warn!("{} {} failed: {}", request.method, request.path, e),
        }

        result.map_err(ClientError::from)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("login_route", &self.login_route)
            .finish_non_exhaustive()
    }
}

pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(server_error(response).await)
    }
}

pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Parse(e.to_string()))
}
