use std::path::PathBuf;
use std::time::Duration;

/// Process-level settings read from the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub provider_config_path: PathBuf,
    pub log_level: String,
    pub update_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Overrides `api_key` from the provider config file when set.
    pub api_key: Option<String>,
    /// Overrides `secret` from the provider config file when set.
    pub api_secret: Option<String>,
}

impl AppConfig {
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider_config_path", &self.provider_config_path)
            .field("log_level", &self.log_level)
            .field("update_interval_secs", &self.update_interval_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}
