use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle of a deployment record. Transitions are driven exclusively by
/// the deployer through compare-and-swap updates on the stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Pending,
    Building,
    Deploying,
    Deployed,
    Failed,
    Updating,
    Disabled,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Building => "building",
            Self::Deploying => "deploying",
            Self::Deployed => "deployed",
            Self::Failed => "failed",
            Self::Updating => "updating",
            Self::Disabled => "disabled",
        }
    }

    /// A transitional state means a build is in flight and the record is
    /// soft-locked against a second build entering the pipeline.
    pub fn is_transitional(&self) -> bool {
        matches!(self, Self::Building | Self::Deploying)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for DeploymentStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(Self::Pending),
            "building" => Ok(Self::Building),
            "deploying" => Ok(Self::Deploying),
            "deployed" => Ok(Self::Deployed),
            "failed" => Ok(Self::Failed),
            "updating" => Ok(Self::Updating),
            "disabled" => Ok(Self::Disabled),
            other => Err(format!("unknown deployment status: {}", other)),
        }
    }
}

// One published portfolio site. The slug is reserved forever, even after the
// record is disabled, so stale links can never be hijacked by a later signup.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Deployment {
    pub id: Uuid,
    pub user_id: String,
    pub template_id: i32,
    pub slug: String,
    pub custom_domain: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: DeploymentStatus,
    pub public_url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub custom_css: Option<String>,
    pub custom_js: Option<String>,
    pub analytics_id: Option<String>,
    pub is_active: bool,
    pub is_public: bool,
    pub password_protected: bool,
    pub password: Option<String>,
    pub view_count: i64,
    pub last_viewed: Option<DateTime<Utc>>,
    pub build_version: i32,
    pub build_log: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_build_time: Option<DateTime<Utc>>,
    pub deployed_at: Option<DateTime<Utc>>,
    pub last_updated: DateTime<Utc>,
}

impl Deployment {
    pub fn new(user_id: String, template_id: i32, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            template_id,
            slug: String::new(),
            custom_domain: None,
            status: DeploymentStatus::Pending,
            public_url: None,
            title,
            description: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            custom_css: None,
            custom_js: None,
            analytics_id: None,
            is_active: true,
            is_public: true,
            password_protected: false,
            password: None,
            view_count: 0,
            last_viewed: None,
            build_version: 0,
            build_log: None,
            created_at: Utc::now(),
            last_build_time: None,
            deployed_at: None,
            last_updated: Utc::now(),
        }
    }
}
