use async_trait::async_trait;
use sqlx::PgPool;

use super::db_key;
use crate::domain::principal::models::PrincipalRef;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Activity;
use crate::domain::session::ports::ActivityRepository;

/// Records session activities; account and user activities live in separate tables.
pub struct PostgresActivityRepository {
    pool: PgPool,
}

impl PostgresActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PostgresActivityRepository {
    async fn create(&self, activity: Activity) -> Result<Activity, SessionError> {
        let result = match activity.principal {
            PrincipalRef::Account(account_id) => {
                sqlx::query(
                    r#"
                    INSERT INTO account_activities (id, account_id, activity_type, created_at)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(activity.id)
                .bind(account_id.0)
                .bind(activity.kind.as_str())
                .bind(activity.created_at)
                .execute(&self.pool)
                .await
            }
            PrincipalRef::User(user_id) => {
                let key = db_key(user_id.0).ok_or_else(|| {
                    SessionError::StorageError(format!("user id {} out of range", user_id))
                })?;

                sqlx::query(
                    r#"
                    INSERT INTO user_activities (id, user_id, activity_type, created_at)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(activity.id)
                .bind(key)
                .bind(activity.kind.as_str())
                .bind(activity.created_at)
                .execute(&self.pool)
                .await
            }
        };

        result.map_err(|e| SessionError::StorageError(e.to_string()))?;

        tracing::debug!(
            activity_id = %activity.id,
            principal = %activity.principal,
            kind = %activity.kind,
            "Session activity recorded"
        );

        Ok(activity)
    }
}
