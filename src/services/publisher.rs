//! Publishing boundary.
//!
//! "Deploy to platform" is a pluggable external operation with a binary
//! outcome: a public URL, or a `PublishError`. The deployer wraps every
//! call in a timeout; a publisher implementation does not need its own.

use crate::configuration::DeploymentSettings;
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
#[error("publish failed: {0}")]
pub struct PublishError(pub String);

/// What the platform needs to know besides the document itself.
#[derive(Debug, Clone)]
pub struct PublishMeta {
    pub deployment_id: Uuid,
    pub slug: String,
    pub custom_domain: Option<String>,
}

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Push the rendered document live and return its public address.
    async fn publish(&self, document: &str, meta: &PublishMeta) -> Result<String, PublishError>;
}

/// Publishes to the internal CDN over HTTP: the document is PUT to
/// `<publish_url>/<slug>` and the site becomes `https://<slug>.<base_domain>`.
pub struct CdnPublisher {
    client: reqwest::Client,
    settings: DeploymentSettings,
}

impl CdnPublisher {
    pub fn new(settings: DeploymentSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl Publisher for CdnPublisher {
    async fn publish(&self, document: &str, meta: &PublishMeta) -> Result<String, PublishError> {
        let url = format!("{}/{}", self.settings.publish_url.trim_end_matches('/'), meta.slug);
        tracing::info!(deployment_id = %meta.deployment_id, %url, "Publishing rendered document");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(document.to_string())
            .send()
            .await
            .map_err(|err| PublishError(format!("platform unreachable: {}", err)))?;

        if !response.status().is_success() {
            return Err(PublishError(format!(
                "platform returned {} for {}",
                response.status(),
                meta.slug
            )));
        }

        Ok(self.settings.public_url(&meta.slug))
    }
}
