use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::principal::errors::PrincipalError;
use crate::domain::principal::models::Account;
use crate::domain::principal::models::AccountId;
use crate::domain::principal::models::CreateAccountCommand;
use crate::domain::principal::models::Username;
use crate::domain::principal::ports::PrincipalRepository;

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = PrincipalError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId(row.id),
            username: Username::new(row.username)?,
            password_hash: row.password_hash,
            role: row.role.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl PrincipalRepository for PostgresAccountRepository {
    type Principal = Account;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, PrincipalError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, PrincipalError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, password_hash, role, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PrincipalError::DatabaseError(e.to_string()))?;

        row.map(Account::try_from).transpose()
    }

    async fn create(
        &self,
        registration: CreateAccountCommand,
        password_hash: String,
    ) -> Result<Account, PrincipalError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(AccountId::new().0)
        .bind(registration.username.as_str())
        .bind(&password_hash)
        .bind(registration.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("accounts_username_key")
                {
                    return PrincipalError::UsernameAlreadyExists(
                        registration.username.as_str().to_string(),
                    );
                }
            }
            PrincipalError::DatabaseError(e.to_string())
        })?;

        Account::try_from(row)
    }
}
