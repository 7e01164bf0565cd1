use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use gcp_auth::TokenProvider;
use tracing::{debug, info};

/// Supplies the `Authorization` header value for notification API calls.
#[async_trait]
pub trait AuthHeaderProvider: Send + Sync {
    async fn auth_header(&self) -> Result<String, Error>;
}

/// A fixed bearer token, typically injected through configuration.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl AuthHeaderProvider for StaticTokenProvider {
    async fn auth_header(&self) -> Result<String, Error> {
        if self.token.trim().is_empty() {
            return Err(anyhow!("Notification API token is empty"));
        }

        Ok(format!("Bearer {}", self.token))
    }
}

/// Bearer tokens from the ambient Google credentials for a single scope.
pub struct GcpTokenProvider {
    provider: Arc<dyn TokenProvider>,
    scope: String,
}

impl GcpTokenProvider {
    pub async fn new(scope: impl Into<String>) -> Result<Self, Error> {
        let provider = gcp_auth::provider()
            .await
            .map_err(|e| anyhow!("Failed to initialise credentials provider: {}", e))?;
        let scope = scope.into();

        info!(scope = %scope, "Token provider initialized");

        Ok(Self { provider, scope })
    }
}

#[async_trait]
impl AuthHeaderProvider for GcpTokenProvider {
    async fn auth_header(&self) -> Result<String, Error> {
        let scopes = [self.scope.as_str()];
        let token = self.provider.token(&scopes).await?;

        debug!(scope = %self.scope, "Access token acquired");

        Ok(format!("Bearer {}", token.as_str()))
    }
}
