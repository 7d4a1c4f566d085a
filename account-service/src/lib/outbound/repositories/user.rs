use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use super::db_key;
use super::from_db_key;
use crate::domain::principal::errors::PrincipalError;
use crate::domain::principal::models::Age;
use crate::domain::principal::models::EmailAddress;
use crate::domain::principal::models::RegisterUserCommand;
use crate::domain::principal::models::User;
use crate::domain::principal::models::UserId;
use crate::domain::principal::models::Username;
use crate::domain::principal::ports::PrincipalRepository;

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    age: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = PrincipalError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(from_db_key(row.id).map_err(PrincipalError::DatabaseError)?),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            age: Age::new(from_db_key(row.age).map_err(PrincipalError::DatabaseError)?)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PrincipalRepository for PostgresUserRepository {
    type Principal = User;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PrincipalError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, age, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PrincipalError> {
        let Some(key) = db_key(id.0) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, age, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn create(
        &self,
        registration: RegisterUserCommand,
        password_hash: String,
    ) -> Result<User, PrincipalError> {
        let age = i64::try_from(registration.age.value())
            .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, age)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, age, created_at, updated_at
            "#,
        )
        .bind(registration.username.as_str())
        .bind(registration.email.as_str())
        .bind(&password_hash)
        .bind(age)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("users_username_key")
                {
                    return PrincipalError::UsernameAlreadyExists(
                        registration.username.as_str().to_string(),
                    );
                }
            }
            PrincipalError::DatabaseError(e.to_string())
        })?;

        User::try_from(row)
    }
}
