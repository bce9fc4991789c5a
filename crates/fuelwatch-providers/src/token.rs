//! Bearer-token holder for providers with periodic credential refresh.

use tokio::sync::RwLock;

/// Holds the current access token.
///
/// A refresh replaces the whole value in one write; readers either see the
/// old token or the new one. A failed refresh leaves the old token in place.
#[derive(Debug, Default)]
pub struct TokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if one was ever obtained.
    pub async fn current(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn replace(&self, token: String) {
        *self.token.write().await = Some(token);
    }

    /// Awaits `fetch` and stores its token on success. On failure the
    /// previous token stays and the error is handed back.
    ///
    /// # Errors
    ///
    /// Returns whatever `fetch` fails with.
    pub async fn refresh_with<F, E>(&self, fetch: F) -> Result<(), E>
    where
        F: std::future::Future<Output = Result<String, E>>,
    {
        let token = fetch.await?;
        self.replace(token).await;
        Ok(())
    }
}
