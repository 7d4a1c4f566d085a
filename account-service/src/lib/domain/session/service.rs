use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenBundle;

use crate::domain::principal::errors::PrincipalError;
use crate::domain::principal::models::LoginCommand;
use crate::domain::principal::models::Principal;
use crate::domain::principal::models::RegistrationCommand;
use crate::domain::principal::ports::PrincipalRepository;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::Activity;
use crate::domain::session::ports::ActivityRepository;
use crate::domain::session::ports::SessionServicePort;

/// Login and registration orchestrator for one principal kind.
///
/// Login runs lookup, password verification, activity recording and token
/// issuance in that order, stopping at the first failure.
pub struct SessionService<PR, AR>
where
    PR: PrincipalRepository,
    AR: ActivityRepository,
{
    principals: Arc<PR>,
    activities: Arc<AR>,
    authenticator: Arc<Authenticator>,
}

impl<PR, AR> SessionService<PR, AR>
where
    PR: PrincipalRepository,
    AR: ActivityRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `principals` - Principal persistence implementation
    /// * `activities` - Session activity recorder
    /// * `authenticator` - Credential hasher and token issuer
    pub fn new(
        principals: Arc<PR>,
        activities: Arc<AR>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            principals,
            activities,
            authenticator,
        }
    }
}

#[async_trait]
impl<PR, AR> SessionServicePort<PR::Principal> for SessionService<PR, AR>
where
    PR: PrincipalRepository,
    AR: ActivityRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<TokenBundle, SessionError> {
        let principal = self
            .principals
            .find_by_username(command.username())
            .await?
            .ok_or_else(|| {
                tracing::info!(username = %command.username(), "Login rejected: unknown username");
                SessionError::CredentialMismatch
            })?;

        self.authenticator
            .verify_password(command.password(), principal.password_hash())
            .map_err(|e| {
                tracing::info!(
                    principal = %principal.reference(),
                    error = %e,
                    "Login rejected: password verification failed"
                );
                SessionError::from(e)
            })?;

        let activity = self
            .activities
            .create(Activity::login(principal.reference()))
            .await
            .map_err(|e| {
                tracing::error!(
                    principal = %principal.reference(),
                    error = %e,
                    "Failed to record login activity"
                );
                e
            })?;

        let session_id = activity.id.to_string();
        let bundle = self
            .authenticator
            .issue_tokens(
                &principal.id().to_string(),
                principal.username().as_str(),
                principal.role().as_str(),
                &session_id,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    principal = %principal.reference(),
                    session_id = %session_id,
                    error = %e,
                    "Failed to issue session tokens"
                );
                SessionError::from(e)
            })?;

        tracing::info!(
            principal = %principal.reference(),
            session_id = %session_id,
            "Login succeeded"
        );

        Ok(bundle)
    }

    async fn register(
        &self,
        registration: <PR::Principal as Principal>::Registration,
    ) -> Result<PR::Principal, SessionError> {
        let password_hash = self
            .authenticator
            .hash_password(registration.password().expose())?;

        let principal = self.principals.create(registration, password_hash).await?;

        tracing::info!(
            principal = %principal.reference(),
            username = %principal.username(),
            "Principal registered"
        );

        Ok(principal)
    }

    async fn get_principal(
        &self,
        id: &<PR::Principal as Principal>::Id,
    ) -> Result<PR::Principal, SessionError> {
        self.principals
            .find_by_id(id)
            .await?
            .ok_or_else(|| PrincipalError::NotFound(id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use mockall::mock;
    use uuid::Uuid;

    use super::*;
    use crate::domain::principal::models::Age;
    use crate::domain::principal::models::EmailAddress;
    use crate::domain::principal::models::PrincipalRef;
    use crate::domain::principal::models::RegisterUserCommand;
    use crate::domain::principal::models::User;
    use crate::domain::principal::models::UserId;
    use crate::domain::principal::models::Username;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl PrincipalRepository for TestUserRepository {
            type Principal = User;

            async fn find_by_username(&self, username: &str) -> Result<Option<User>, PrincipalError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PrincipalError>;
            async fn create(&self, registration: RegisterUserCommand, password_hash: String) -> Result<User, PrincipalError>;
        }
    }

    mock! {
        pub TestActivityRepository {}

        #[async_trait]
        impl ActivityRepository for TestActivityRepository {
            async fn create(&self, activity: Activity) -> Result<Activity, SessionError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET))
    }

    fn bob(authenticator: &Authenticator) -> User {
        User {
            id: UserId(7),
            username: Username::new("bob".to_string()).unwrap(),
            email: EmailAddress::new("bob@example.com".to_string()).unwrap(),
            password_hash: authenticator.hash_password("secret123").unwrap(),
            age: Age::new(30).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn login(username: &str, password: &str) -> LoginCommand {
        LoginCommand::new(username.to_string(), password.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = authenticator();
        let mut principals = MockTestUserRepository::new();
        let mut activities = MockTestActivityRepository::new();

        let user = bob(&authenticator);
        principals
            .expect_find_by_username()
            .withf(|username| username == "bob")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let recorded = Arc::new(Mutex::new(None::<Uuid>));
        let recorded_in_mock = Arc::clone(&recorded);
        activities
            .expect_create()
            .withf(|activity| activity.principal == PrincipalRef::User(UserId(7)))
            .times(1)
            .returning(move |activity| {
                *recorded_in_mock.lock().unwrap() = Some(activity.id);
                Ok(activity)
            });

        let service = SessionService::new(
            Arc::new(principals),
            Arc::new(activities),
            Arc::clone(&authenticator),
        );

        let bundle = service.login(login("bob", "secret123")).await.unwrap();

        let access = authenticator
            .validate_access_token(&bundle.access_token)
            .unwrap();
        let session_id = recorded.lock().unwrap().unwrap().to_string();
        assert_eq!(access.user_id, "7");
        assert_eq!(access.role, "normal");
        assert_eq!(access.base.jti, session_id);
    }

    #[tokio::test]
    async fn test_login_wrong_password_records_nothing() {
        let authenticator = authenticator();
        let mut principals = MockTestUserRepository::new();
        let mut activities = MockTestActivityRepository::new();

        let user = bob(&authenticator);
        principals
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        activities.expect_create().times(0);

        let service = SessionService::new(Arc::new(principals), Arc::new(activities), authenticator);

        let result = service.login(login("bob", "wrong")).await;
        assert!(matches!(result, Err(SessionError::CredentialMismatch)));
    }

    #[tokio::test]
    async fn test_login_unknown_username_matches_wrong_password() {
        let mut principals = MockTestUserRepository::new();
        let mut activities = MockTestActivityRepository::new();

        principals
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        activities.expect_create().times(0);

        let service =
            SessionService::new(Arc::new(principals), Arc::new(activities), authenticator());

        let result = service.login(login("mallory", "secret123")).await;
        assert!(matches!(result, Err(SessionError::CredentialMismatch)));
    }

    #[tokio::test]
    async fn test_login_activity_failure_issues_no_tokens() {
        let authenticator = authenticator();
        let mut principals = MockTestUserRepository::new();
        let mut activities = MockTestActivityRepository::new();

        let user = bob(&authenticator);
        principals
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));
        activities
            .expect_create()
            .times(1)
            .returning(|_| Err(SessionError::StorageError("connection reset".to_string())));

        let service = SessionService::new(Arc::new(principals), Arc::new(activities), authenticator);

        let result = service.login(login("bob", "secret123")).await;
        assert!(matches!(result, Err(SessionError::StorageError(_))));
    }

    #[tokio::test]
    async fn test_login_lookup_failure() {
        let mut principals = MockTestUserRepository::new();
        let mut activities = MockTestActivityRepository::new();

        principals
            .expect_find_by_username()
            .times(1)
            .returning(|_| Err(PrincipalError::DatabaseError("timeout".to_string())));
        activities.expect_create().times(0);

        let service =
            SessionService::new(Arc::new(principals), Arc::new(activities), authenticator());

        let result = service.login(login("bob", "secret123")).await;
        assert!(matches!(
            result,
            Err(SessionError::Principal(PrincipalError::DatabaseError(_)))
        ));
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let authenticator = authenticator();
        let mut principals = MockTestUserRepository::new();
        let activities = MockTestActivityRepository::new();

        principals
            .expect_create()
            .withf(|registration, hash| {
                registration.username.as_str() == "alice"
                    && hash.starts_with("$argon2")
                    && !hash.contains("secret123")
            })
            .times(1)
            .returning(|registration, password_hash| {
                Ok(User {
                    id: UserId(1),
                    username: registration.username,
                    email: registration.email,
                    password_hash,
                    age: registration.age,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let service = SessionService::new(
            Arc::new(principals),
            Arc::new(activities),
            Arc::clone(&authenticator),
        );

        let registration = RegisterUserCommand::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "secret123".to_string(),
            "21".to_string(),
        )
        .unwrap();

        let user = service.register(registration).await.unwrap();
        assert_eq!(user.id, UserId(1));
        assert!(authenticator
            .verify_password("secret123", &user.password_hash)
            .is_ok());
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut principals = MockTestUserRepository::new();
        let activities = MockTestActivityRepository::new();

        principals.expect_create().times(1).returning(|registration, _| {
            Err(PrincipalError::UsernameAlreadyExists(
                registration.username.as_str().to_string(),
            ))
        });

        let service =
            SessionService::new(Arc::new(principals), Arc::new(activities), authenticator());

        let registration = RegisterUserCommand::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "secret123".to_string(),
            "21".to_string(),
        )
        .unwrap();

        let result = service.register(registration).await;
        assert!(matches!(
            result,
            Err(SessionError::Principal(
                PrincipalError::UsernameAlreadyExists(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_get_principal_not_found() {
        let mut principals = MockTestUserRepository::new();
        let activities = MockTestActivityRepository::new();

        principals
            .expect_find_by_id()
            .withf(|id| *id == UserId(99))
            .times(1)
            .returning(|_| Ok(None));

        let service =
            SessionService::new(Arc::new(principals), Arc::new(activities), authenticator());

        let result = service.get_principal(&UserId(99)).await;
        assert!(matches!(
            result,
            Err(SessionError::Principal(PrincipalError::NotFound(_)))
        ));
    }
}
