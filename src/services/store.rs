use crate::models::{Deployment, DeploymentStatus, Template};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Which unique key fired on insert. The allocator retries slug collisions;
/// a custom-domain collision is a hard error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Slug,
    CustomDomain,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique key already taken: {0:?}")]
    Unique(UniqueKey),
    #[error("record not found")]
    NotFound,
    #[error("database failure: {0}")]
    Database(String),
}

/// Content fields the owner may change on an existing deployment. The
/// pipeline itself never touches these.
#[derive(Debug, Clone, Default)]
pub struct ContentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub custom_css: Option<String>,
    pub custom_js: Option<String>,
    pub analytics_id: Option<String>,
    pub is_public: Option<bool>,
    pub password_protected: Option<bool>,
    pub password: Option<String>,
}

impl ContentPatch {
    /// Fold the non-null fields into the record and stamp `last_updated`.
    pub fn apply(&self, deployment: &mut Deployment) {
        if let Some(v) = &self.title {
            deployment.title = v.clone();
        }
        if let Some(v) = &self.description {
            deployment.description = Some(v.clone());
        }
        if let Some(v) = &self.meta_title {
            deployment.meta_title = Some(v.clone());
        }
        if let Some(v) = &self.meta_description {
            deployment.meta_description = Some(v.clone());
        }
        if let Some(v) = &self.meta_keywords {
            deployment.meta_keywords = Some(v.clone());
        }
        if let Some(v) = &self.custom_css {
            deployment.custom_css = Some(v.clone());
        }
        if let Some(v) = &self.custom_js {
            deployment.custom_js = Some(v.clone());
        }
        if let Some(v) = &self.analytics_id {
            deployment.analytics_id = Some(v.clone());
        }
        if let Some(v) = self.is_public {
            deployment.is_public = v;
        }
        if let Some(v) = self.password_protected {
            deployment.password_protected = v;
        }
        if let Some(v) = &self.password {
            deployment.password = Some(v.clone());
        }
        deployment.last_updated = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.meta_title.is_none()
            && self.meta_description.is_none()
            && self.meta_keywords.is_none()
            && self.custom_css.is_none()
            && self.custom_js.is_none()
            && self.analytics_id.is_none()
            && self.is_public.is_none()
            && self.password_protected.is_none()
            && self.password.is_none()
    }
}

/// Result of a successful build, folded into the record together with the
/// `deploying -> deployed` transition.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub public_url: String,
    pub build_log: String,
    pub deployed_at: DateTime<Utc>,
}

/// Keyed persistence for deployment records.
///
/// Two operations carry the concurrency contract of the whole pipeline:
/// `insert` must be an atomic unique insert (slug reservation), and
/// `try_transition` must be a compare-and-swap on the status column so a
/// record can act as its own build lock.
#[async_trait]
pub trait DeploymentStore: Send + Sync {
    async fn insert(&self, deployment: Deployment) -> Result<Deployment, StoreError>;

    async fn fetch(&self, id: Uuid) -> Result<Option<Deployment>, StoreError>;

    /// Lookup by slug or custom domain, active records only.
    async fn fetch_by_host(&self, host: &str) -> Result<Option<Deployment>, StoreError>;

    async fn fetch_active_by_owner(&self, user_id: &str) -> Result<Vec<Deployment>, StoreError>;

    /// Persist owner-mutable content fields and `last_updated`.
    async fn update_content(&self, deployment: &Deployment) -> Result<(), StoreError>;

    /// Atomically move `id` from one of `from` to `to`, stamping
    /// `last_build_time` when entering `building`. Returns false when the
    /// record is not currently in any of the `from` states.
    async fn try_transition(
        &self,
        id: Uuid,
        from: &[DeploymentStatus],
        to: DeploymentStatus,
    ) -> Result<bool, StoreError>;

    /// CAS `deploying -> deployed` recording url, timestamps and an
    /// incremented build version. Returns false if the CAS lost.
    async fn finish_build(&self, id: Uuid, outcome: BuildOutcome) -> Result<bool, StoreError>;

    /// Move a record in a transitional state to `failed` with a log entry.
    /// A record disabled mid-build is left untouched.
    async fn mark_failed(&self, id: Uuid, build_log: &str) -> Result<(), StoreError>;

    /// Soft delete: `is_active = false`, `status = disabled`.
    async fn disable(&self, id: Uuid) -> Result<(), StoreError>;

    /// Best-effort view counter bump.
    async fn bump_view(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Template catalog, read-only from the pipeline's point of view.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn get_active(&self, template_id: i32) -> Result<Option<Template>, StoreError>;
}

/// Structured profile data for the render context. Implementations must be
/// tolerant of missing profiles and return an empty object instead.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn get_context(&self, user_id: &str) -> Result<serde_json::Value, StoreError>;
}
