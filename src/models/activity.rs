use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    TemplateSelection,
    PortfolioDeployment,
    PortfolioUpdate,
    PortfolioDelete,
    Error,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TemplateSelection => "template_selection",
            Self::PortfolioDeployment => "portfolio_deployment",
            Self::PortfolioUpdate => "portfolio_update",
            Self::PortfolioDelete => "portfolio_delete",
            Self::Error => "error",
        }
    }
}

// Append-only audit trail entry. Never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    pub id: i64,
    pub user_id: Option<String>,
    pub action: String,
    pub description: String,
    pub entity_type: String,
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}
