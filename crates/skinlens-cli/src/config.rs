use anyhow::Context;
use serde::{Deserialize, Serialize};
use skinlens_client::{
    AdminCredentials, ApiClientConfig, HttpClientConfig, InferenceConfig, RetryPolicy,
    inference::DEFAULT_INFERENCE_ENDPOINT,
};
use skinlens_core::navigation::AUTH_ROUTE;
use skinlens_routing::RouteTable;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkinLensConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub inference: InferenceSettings,

    #[serde(default)]
    pub session: SessionSettings,

    #[serde(default)]
    pub http: HttpSettings,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<AdminSettings>,

    #[serde(default)]
    pub routes: RouteTable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_api_url")]
    pub base_url: String,

    /// View shown when the session can't be refreshed
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceSettings {
    #[serde(default = "default_inference_url")]
    pub endpoint: String,

    #[serde(default = "default_inference_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_file")]
    pub file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_pool_size")]
    pub pool_max_idle_per_host: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_false")]
    pub json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSettings {
    pub email: String,
    pub password: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_url(),
            login_route: default_login_route(),
        }
    }
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            endpoint: default_inference_url(),
            timeout_secs: default_inference_timeout(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            pool_max_idle_per_host: default_pool_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl SkinLensConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml::from_str(&contents)
                .with_context(|| format!("Invalid TOML in {}", path.display()))?
        } else {
            // Default to YAML
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?
        };

        Ok(config)
    }

    /// Merge environment variables into config (env vars take precedence)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("SKINLENS_API_URL") {
            self.api.base_url = val;
        }

        if let Ok(val) = std::env::var("SKINLENS_INFERENCE_URL") {
            self.inference.endpoint = val;
        }

        if let Ok(val) = std::env::var("SKINLENS_INFERENCE_MAX_ATTEMPTS") {
            match val.parse::<u32>() {
                Ok(attempts) if attempts > 0 => self.inference.max_attempts = attempts,
                _ => eprintln!(
                    "Warning: Invalid SKINLENS_INFERENCE_MAX_ATTEMPTS '{}', using {}",
                    val, self.inference.max_attempts
                ),
            }
        }

        if let Ok(val) = std::env::var("SKINLENS_INFERENCE_TIMEOUT_SECS") {
            match val.parse::<u64>() {
                Ok(secs) => self.inference.timeout_secs = secs,
                Err(_) => eprintln!(
                    "Warning: Invalid SKINLENS_INFERENCE_TIMEOUT_SECS '{}', using {}",
                    val, self.inference.timeout_secs
                ),
            }
        }

        if let Ok(val) = std::env::var("SKINLENS_SESSION_FILE") {
            self.session.file = val;
        }

        // Logging settings
        if let Ok(val) = std::env::var("SKINLENS_LOG_LEVEL") {
            self.logging.level = val;
        }

        if let Ok(val) = std::env::var("SKINLENS_LOG_JSON")
            && let Ok(json) = val.parse::<bool>()
        {
            self.logging.json = json;
        }

        // Admin account; both halves are needed
        let admin_email = std::env::var("SKINLENS_ADMIN_EMAIL").ok();
        let admin_password = std::env::var("SKINLENS_ADMIN_PASSWORD").ok();
        match (admin_email, admin_password) {
            (Some(email), Some(password)) => {
                self.admin = Some(AdminSettings { email, password });
            }
            (Some(email), None) => {
                if let Some(admin) = self.admin.as_mut() {
                    admin.email = email;
                }
            }
            (None, Some(password)) => {
                if let Some(admin) = self.admin.as_mut() {
                    admin.password = password;
                }
            }
            (None, None) => {}
        }
    }

    /// Session file with `~` expanded
    pub fn session_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.session.file).to_string())
    }

    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            timeout_secs: self.http.timeout_secs,
            connect_timeout_secs: self.http.connect_timeout_secs,
            pool_max_idle_per_host: self.http.pool_max_idle_per_host,
            ..Default::default()
        }
    }

    pub fn api_client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api.base_url.clone(),
            login_route: self.api.login_route.clone(),
            client_config: self.http_client_config(),
        }
    }

    pub fn inference_config(&self) -> InferenceConfig {
        InferenceConfig {
            endpoint: self.inference.endpoint.clone(),
            timeout_secs: self.inference.timeout_secs,
            client_config: self.http_client_config(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.inference.max_attempts,
            Duration::from_millis(self.inference.base_delay_ms),
        )
    }

    pub fn admin_credentials(&self) -> Option<AdminCredentials> {
        self.admin
            .as_ref()
            .map(|admin| AdminCredentials::new(&admin.email, &admin.password))
    }
}

fn default_api_url() -> String {
    ApiClientConfig::default().base_url
}

fn default_login_route() -> String {
    AUTH_ROUTE.to_string()
}

fn default_inference_url() -> String {
    DEFAULT_INFERENCE_ENDPOINT.to_string()
}

fn default_inference_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_session_file() -> String {
    "~/.skinlens/session.json".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_pool_size() -> usize {
    8
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_false() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use skinlens_routing::Access;
    use std::io::Write;

    const ENV_VARS: [&str; 9] = [
        "SKINLENS_API_URL",
        "SKINLENS_INFERENCE_URL",
        "SKINLENS_SESSION_FILE",
        "SKINLENS_LOG_LEVEL",
        "SKINLENS_LOG_JSON",
        "SKINLENS_ADMIN_EMAIL",
        "SKINLENS_ADMIN_PASSWORD",
        "SKINLENS_INFERENCE_MAX_ATTEMPTS",
        "SKINLENS_INFERENCE_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }

    #[test]
    fn test_defaults() {
        let config = SkinLensConfig::default();

        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.api.login_route, "/auth");
        assert_eq!(config.inference.endpoint, DEFAULT_INFERENCE_ENDPOINT);
        assert_eq!(config.inference.timeout_secs, 60);
        assert_eq!(config.retry_policy(), RetryPolicy::default());
        assert_eq!(config.session.file, "~/.skinlens/session.json");
        assert!(config.admin_credentials().is_none());
        assert_eq!(config.routes.access_for("/results"), Access::User);
    }

    #[test]
    fn test_yaml_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            r#"
api:
  base_url: https://skinlens.example.com/api
inference:
  max_attempts: 5
  base_delay_ms: 250
session:
  file: /tmp/skinlens-session.json
admin:
  email: admin@skinlens.test
  password: s3cret
"#
        )
        .unwrap();

        let config = SkinLensConfig::from_file(file.path()).unwrap();

        assert_eq!(config.api.base_url, "https://skinlens.example.com/api");
        assert_eq!(config.api.login_route, "/auth");
        assert_eq!(
            config.retry_policy(),
            RetryPolicy::new(5, Duration::from_millis(250))
        );
        assert_eq!(config.session_path(), PathBuf::from("/tmp/skinlens-session.json"));
        assert_eq!(
            config.admin_credentials(),
            Some(AdminCredentials::new("admin@skinlens.test", "s3cret"))
        );
    }

    #[test]
    fn test_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[logging]
level = "debug"
json = true

[inference]
endpoint = "http://localhost:9000/predict"
timeout_secs = 15
"#
        )
        .unwrap();

        let config = SkinLensConfig::from_file(file.path()).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(config.inference_config().endpoint, "http://localhost:9000/predict");
        assert_eq!(config.inference_config().timeout_secs, 15);
        assert_eq!(config.inference.max_attempts, 3);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "api: [not, a, map").unwrap();

        assert!(SkinLensConfig::from_file(file.path()).is_err());
        assert!(SkinLensConfig::from_file("/nonexistent/skinlens.yaml").is_err());
    }

    #[test]
    fn test_session_path_expands_home() {
        let config = SkinLensConfig::default();
        let path = config.session_path();

        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with(".skinlens/session.json"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        unsafe {
            std::env::set_var("SKINLENS_API_URL", "http://backend.test/api");
            std::env::set_var("SKINLENS_LOG_JSON", "true");
            std::env::set_var("SKINLENS_INFERENCE_MAX_ATTEMPTS", "4");
            std::env::set_var("SKINLENS_ADMIN_EMAIL", "ops@skinlens.test");
            std::env::set_var("SKINLENS_ADMIN_PASSWORD", "hunter2");
        }

        let mut config = SkinLensConfig::default();
        config.merge_env();
        clear_env();

        assert_eq!(config.api.base_url, "http://backend.test/api");
        assert!(config.logging.json);
        assert_eq!(config.inference.max_attempts, 4);
        assert_eq!(
            config.admin_credentials(),
            Some(AdminCredentials::new("ops@skinlens.test", "hunter2"))
        );
    }

    #[test]
    #[serial]
    fn test_invalid_env_values_are_ignored() {
        clear_env();
        unsafe {
            std::env::set_var("SKINLENS_INFERENCE_MAX_ATTEMPTS", "0");
            std::env::set_var("SKINLENS_INFERENCE_TIMEOUT_SECS", "soon");
            std::env::set_var("SKINLENS_LOG_JSON", "yes please");
        }

        let mut config = SkinLensConfig::default();
        config.merge_env();
        clear_env();

        assert_eq!(config.inference.max_attempts, 3);
        assert_eq!(config.inference.timeout_secs, 60);
        assert!(!config.logging.json);
    }

    #[test]
    #[serial]
    fn test_admin_password_alone_needs_configured_admin() {
        clear_env();
        unsafe {
            std::env::set_var("SKINLENS_ADMIN_PASSWORD", "rotated");
        }

        let mut config = SkinLensConfig::default();
        config.merge_env();
        assert!(config.admin.is_none());

        config.admin = Some(AdminSettings {
            email: "admin@skinlens.test".to_string(),
            password: "old".to_string(),
        });
        config.merge_env();
        clear_env();

        assert_eq!(
            config.admin_credentials(),
            Some(AdminCredentials::new("admin@skinlens.test", "rotated"))
        );
    }
}
