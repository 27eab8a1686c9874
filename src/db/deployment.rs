use crate::models::{Deployment, DeploymentStatus};
use crate::services::store::{BuildOutcome, DeploymentStore, StoreError, UniqueKey};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, template_id, slug, custom_domain, status, public_url, \
     title, description, meta_title, meta_description, meta_keywords, \
     custom_css, custom_js, analytics_id, is_active, is_public, \
     password_protected, password, view_count, last_viewed, build_version, \
     build_log, created_at, last_build_time, deployed_at, last_updated";

fn map_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("deployment_custom_domain_key") => StoreError::Unique(UniqueKey::CustomDomain),
                _ => StoreError::Unique(UniqueKey::Slug),
            };
        }
    }
    tracing::error!("Failed to execute query: {:?}", err);
    StoreError::Database(err.to_string())
}

pub async fn insert(pool: &PgPool, deployment: Deployment) -> Result<Deployment, StoreError> {
    let query_span = tracing::info_span!("Saving new deployment into the database");
    sqlx::query(
        r#"
        INSERT INTO deployment (
            id, user_id, template_id, slug, custom_domain, status, public_url,
            title, description, meta_title, meta_description, meta_keywords,
            custom_css, custom_js, analytics_id, is_active, is_public,
            password_protected, password, view_count, build_version,
            created_at, last_updated
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                $15, $16, $17, $18, $19, $20, $21, $22, $23)
        "#,
    )
    .bind(deployment.id)
    .bind(&deployment.user_id)
    .bind(deployment.template_id)
    .bind(&deployment.slug)
    .bind(&deployment.custom_domain)
    .bind(deployment.status.as_str())
    .bind(&deployment.public_url)
    .bind(&deployment.title)
    .bind(&deployment.description)
    .bind(&deployment.meta_title)
    .bind(&deployment.meta_description)
    .bind(&deployment.meta_keywords)
    .bind(&deployment.custom_css)
    .bind(&deployment.custom_js)
    .bind(&deployment.analytics_id)
    .bind(deployment.is_active)
    .bind(deployment.is_public)
    .bind(deployment.password_protected)
    .bind(&deployment.password)
    .bind(deployment.view_count)
    .bind(deployment.build_version)
    .bind(deployment.created_at)
    .bind(deployment.last_updated)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| deployment)
    .map_err(map_err)
}

pub async fn fetch(pool: &PgPool, id: Uuid) -> Result<Option<Deployment>, StoreError> {
    sqlx::query_as::<_, Deployment>(&format!(
        "SELECT {} FROM deployment WHERE id = $1 LIMIT 1",
        COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(map_err)
}

pub async fn fetch_by_host(pool: &PgPool, host: &str) -> Result<Option<Deployment>, StoreError> {
    sqlx::query_as::<_, Deployment>(&format!(
        r#"
        SELECT {}
        FROM deployment
        WHERE is_active = true AND (slug = $1 OR custom_domain = $1)
        LIMIT 1
        "#,
        COLUMNS
    ))
    .bind(host)
    .fetch_optional(pool)
    .await
    .map_err(map_err)
}

pub async fn fetch_active_by_owner(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<Deployment>, StoreError> {
    sqlx::query_as::<_, Deployment>(&format!(
        r#"
        SELECT {}
        FROM deployment
        WHERE user_id = $1 AND is_active = true
        ORDER BY created_at DESC
        "#,
        COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(map_err)
}

pub async fn update_content(pool: &PgPool, deployment: &Deployment) -> Result<(), StoreError> {
    let query_span = tracing::info_span!("Updating deployment content in the database");
    sqlx::query(
        r#"
        UPDATE deployment
        SET title = $2,
            description = $3,
            meta_title = $4,
            meta_description = $5,
            meta_keywords = $6,
            custom_css = $7,
            custom_js = $8,
            analytics_id = $9,
            is_public = $10,
            password_protected = $11,
            password = $12,
            last_updated = NOW()
        WHERE id = $1
        "#,
    )
    .bind(deployment.id)
    .bind(&deployment.title)
    .bind(&deployment.description)
    .bind(&deployment.meta_title)
    .bind(&deployment.meta_description)
    .bind(&deployment.meta_keywords)
    .bind(&deployment.custom_css)
    .bind(&deployment.custom_js)
    .bind(&deployment.analytics_id)
    .bind(deployment.is_public)
    .bind(deployment.password_protected)
    .bind(&deployment.password)
    .execute(pool)
    .instrument(query_span)
    .await
    .map(|_| ())
    .map_err(map_err)
}

/// Compare-and-swap on the status column; the deployment's own row is the
/// build lock, no extra locking required.
pub async fn try_transition(
    pool: &PgPool,
    id: Uuid,
    from: &[DeploymentStatus],
    to: DeploymentStatus,
) -> Result<bool, StoreError> {
    let from: Vec<String> = from.iter().map(|s| s.to_string()).collect();
    let result = sqlx::query(
        r#"
        UPDATE deployment
        SET status = $3,
            last_build_time = CASE WHEN $3 = 'building'
                THEN NOW() ELSE last_build_time END,
            last_updated = NOW()
        WHERE id = $1 AND status = ANY($2)
        "#,
    )
    .bind(id)
    .bind(&from)
    .bind(to.as_str())
    .execute(pool)
    .await
    .map_err(map_err)?;
    Ok(result.rows_affected() > 0)
}

pub async fn finish_build(
    pool: &PgPool,
    id: Uuid,
    outcome: &BuildOutcome,
) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE deployment
        SET status = 'deployed',
            public_url = $2,
            build_log = $3,
            deployed_at = $4,
            build_version = build_version + 1,
            last_updated = NOW()
        WHERE id = $1 AND status = 'deploying'
        "#,
    )
    .bind(id)
    .bind(&outcome.public_url)
    .bind(&outcome.build_log)
    .bind(outcome.deployed_at)
    .execute(pool)
    .await
    .map_err(map_err)?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_failed(pool: &PgPool, id: Uuid, build_log: &str) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        UPDATE deployment
        SET status = 'failed',
            build_log = $2,
            last_updated = NOW()
        WHERE id = $1
          AND status = ANY('{pending,building,deploying,updating}')
        "#,
    )
    .bind(id)
    .bind(build_log)
    .execute(pool)
    .await
    .map(|_| ())
    .map_err(map_err)
}

pub async fn disable(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        UPDATE deployment
        SET is_active = false,
            status = 'disabled',
            last_updated = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await
    .map(|_| ())
    .map_err(map_err)
}

pub async fn bump_view(pool: &PgPool, id: Uuid) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        UPDATE deployment
        SET view_count = view_count + 1,
            last_viewed = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await
    .map(|_| ())
    .map_err(map_err)
}

/// PostgreSQL-backed deployment store. Slug uniqueness rides on the
/// whole-table unique index, so slugs of disabled records stay reserved.
pub struct PgDeploymentStore {
    pool: PgPool,
}

impl PgDeploymentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeploymentStore for PgDeploymentStore {
    async fn insert(&self, deployment: Deployment) -> Result<Deployment, StoreError> {
        insert(&self.pool, deployment).await
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Deployment>, StoreError> {
        fetch(&self.pool, id).await
    }

    async fn fetch_by_host(&self, host: &str) -> Result<Option<Deployment>, StoreError> {
        fetch_by_host(&self.pool, host).await
    }

    async fn fetch_active_by_owner(&self, user_id: &str) -> Result<Vec<Deployment>, StoreError> {
        fetch_active_by_owner(&self.pool, user_id).await
    }

    async fn update_content(&self, deployment: &Deployment) -> Result<(), StoreError> {
        update_content(&self.pool, deployment).await
    }

    async fn try_transition(
        &self,
        id: Uuid,
        from: &[DeploymentStatus],
        to: DeploymentStatus,
    ) -> Result<bool, StoreError> {
        try_transition(&self.pool, id, from, to).await
    }

    async fn finish_build(&self, id: Uuid, outcome: BuildOutcome) -> Result<bool, StoreError> {
        finish_build(&self.pool, id, &outcome).await
    }

    async fn mark_failed(&self, id: Uuid, build_log: &str) -> Result<(), StoreError> {
        mark_failed(&self.pool, id, build_log).await
    }

    async fn disable(&self, id: Uuid) -> Result<(), StoreError> {
        disable(&self.pool, id).await
    }

    async fn bump_view(&self, id: Uuid) -> Result<(), StoreError> {
        bump_view(&self.pool, id).await
    }
}
