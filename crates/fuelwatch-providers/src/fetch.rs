//! Shared HTTP plumbing for the adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;

/// Browser user agent for the HTML scrapers; both sites serve a reduced page
/// to unknown agents.
pub(crate) const BROWSER_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Client settings shared by every adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "fuelwatch/0.1 (smart-mirror)".to_string(),
        }
    }
}

impl HttpSettings {
    /// Builds a `reqwest::Client` with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the client cannot be constructed.
    pub fn build_client(&self) -> Result<Client, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&self.user_agent)
            .build()?;
        Ok(client)
    }
}

/// Parses `base_url` and makes sure it ends with exactly one slash, so
/// `Url::join` appends to it instead of replacing the last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ProviderError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ProviderError::InvalidBaseUrl {
        base_url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Joins a relative path onto a base produced by [`parse_base_url`].
pub(crate) fn join_url(base: &Url, path: &str) -> Result<Url, ProviderError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ProviderError::InvalidBaseUrl {
            base_url: base.to_string(),
            reason: e.to_string(),
        })
}

/// Sends `request` and decodes a JSON body. Non-2xx statuses become
/// [`ProviderError::UnexpectedStatus`].
pub(crate) async fn request_json<T: DeserializeOwned>(
    request: RequestBuilder,
    context: &str,
) -> Result<T, ProviderError> {
    let response = request
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            url: response.url().to_string(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}

/// GETs an HTML page with the browser user agent.
pub(crate) async fn fetch_html(client: &Client, url: &Url) -> Result<String, ProviderError> {
    let response = client
        .get(url.clone())
        .header(reqwest::header::USER_AGENT, BROWSER_UA)
        .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_url_appends_single_slash() {
        let url = parse_base_url("https://www.autoblog.com//").unwrap();
        assert_eq!(url.as_str(), "https://www.autoblog.com/");
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        let err = parse_base_url("not a url").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn join_url_keeps_base_path() {
        let base = parse_base_url("http://127.0.0.1:8080/json").unwrap();
        let url = join_url(&base, "/list.php").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/json/list.php");
    }

    #[test]
    fn default_settings_match_app_defaults() {
        let settings = HttpSettings::default();
        assert_eq!(settings.timeout_secs, 30);
        assert!(settings.build_client().is_ok());
    }
}
