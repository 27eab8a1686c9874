use crate::models::ActivityKind;
use crate::services::activity::ActivityRecorder;
use sqlx::PgPool;

pub async fn insert(
    pool: &PgPool,
    user_id: Option<String>,
    action: &str,
    description: &str,
    entity_type: &str,
    entity_id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO activity_log (user_id, action, description, entity_type, entity_id)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user_id)
    .bind(action)
    .bind(description)
    .bind(entity_type)
    .bind(entity_id)
    .execute(pool)
    .await
    .map(|_| ())
}

/// Audit recorder writing to the `activity_log` table. The write happens on
/// a spawned task; a failed insert is logged and dropped, never propagated.
pub struct PgActivityRecorder {
    pool: PgPool,
}

impl PgActivityRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ActivityRecorder for PgActivityRecorder {
    fn record(
        &self,
        user_id: Option<&str>,
        kind: ActivityKind,
        description: &str,
        entity_type: &str,
        entity_id: &str,
    ) {
        let pool = self.pool.clone();
        let user_id = user_id.map(str::to_string);
        let description = description.to_string();
        let entity_type = entity_type.to_string();
        let entity_id = entity_id.to_string();
        tokio::spawn(async move {
            if let Err(err) = insert(
                &pool,
                user_id,
                kind.as_str(),
                &description,
                &entity_type,
                &entity_id,
            )
            .await
            {
                tracing::error!("Failed to log activity {:?}: {:?}", kind, err);
            }
        });
    }
}
