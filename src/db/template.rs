use crate::models::Template;
use crate::services::store::{StoreError, TemplateStore};
use async_trait::async_trait;
use sqlx::PgPool;

const COLUMNS: &str = "id, name, description, category, html_content, css_content, js_content, \
     preview_image_url, is_premium, is_active, created_at, updated_at";

fn map_err(err: sqlx::Error) -> StoreError {
    tracing::error!("Failed to execute template query: {:?}", err);
    StoreError::Database(err.to_string())
}

pub async fn fetch_active(pool: &PgPool, id: i32) -> Result<Option<Template>, StoreError> {
    sqlx::query_as::<_, Template>(&format!(
        "SELECT {} FROM portfolio_template WHERE id = $1 AND is_active = true LIMIT 1",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_err)
}

pub async fn fetch_all_active(pool: &PgPool) -> Result<Vec<Template>, StoreError> {
    sqlx::query_as::<_, Template>(&format!(
        "SELECT {} FROM portfolio_template WHERE is_active = true ORDER BY created_at DESC",
        COLUMNS
    ))
    .fetch_all(pool)
    .await
    .map_err(map_err)
}

pub struct PgTemplateStore {
    pool: PgPool,
}

impl PgTemplateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for PgTemplateStore {
    async fn get_active(&self, template_id: i32) -> Result<Option<Template>, StoreError> {
        fetch_active(&self.pool, template_id).await
    }
}
