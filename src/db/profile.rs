use crate::models::Profile;
use crate::services::context;
use crate::services::store::{ProfileProvider, StoreError};
use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::PgPool;

pub async fn fetch_by_user(pool: &PgPool, user_id: &str) -> Result<Option<Profile>, StoreError> {
    sqlx::query_as::<_, Profile>(
        r#"
        SELECT user_id, display_name, profession, location, bio, phone_number,
               website, linkedin_url, github_url, twitter_url, skills,
               experience, education, certifications, profile_image_url,
               years_of_experience, available_for_hire, updated_at
        FROM user_profile
        WHERE user_id = $1
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|err| {
        tracing::error!("Failed to fetch profile: {:?}", err);
        StoreError::Database(err.to_string())
    })
}

pub struct PgProfileProvider {
    pool: PgPool,
}

impl PgProfileProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileProvider for PgProfileProvider {
    /// A user without a profile row still deploys; they just get an empty
    /// context and a mostly blank page.
    async fn get_context(&self, user_id: &str) -> Result<Value, StoreError> {
        let profile = fetch_by_user(&self.pool, user_id).await?;
        Ok(match profile {
            Some(profile) => context::profile_context(&profile),
            None => json!({}),
        })
    }
}
