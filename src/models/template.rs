use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Portfolio template as authored in the catalog. `html_content` may carry
/// `{{placeholder}}` syntax; css/js are served alongside the rendered page.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Template {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub html_content: String,
    pub css_content: Option<String>,
    pub js_content: Option<String>,
    pub preview_image_url: Option<String>,
    pub is_premium: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
