use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::principal::errors::PrincipalError;
use account_service::domain::principal::models::Account;
use account_service::domain::principal::models::AccountId;
use account_service::domain::principal::models::CreateAccountCommand;
use account_service::domain::principal::models::Principal;
use account_service::domain::principal::models::RegisterUserCommand;
use account_service::domain::principal::models::User;
use account_service::domain::principal::models::UserId;
use account_service::domain::principal::ports::PrincipalRepository;
use account_service::domain::resource::errors::ResourceError;
use account_service::domain::resource::models::Comment;
use account_service::domain::resource::models::CommentDraft;
use account_service::domain::resource::models::OwnedResource;
use account_service::domain::resource::models::Photo;
use account_service::domain::resource::models::PhotoDraft;
use account_service::domain::resource::models::ResourceId;
use account_service::domain::resource::models::SocialMedia;
use account_service::domain::resource::models::SocialMediaDraft;
use account_service::domain::resource::ports::ResourceRepository;
use account_service::domain::resource::service::ResourceService;
use account_service::domain::session::errors::SessionError;
use account_service::domain::session::models::Activity;
use account_service::domain::session::ports::ActivityRepository;
use account_service::domain::session::service::SessionService;
use account_service::inbound::http::router::create_router;
use account_service::inbound::http::router::AppState;
use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns the real router over in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub activities: Arc<InMemoryActivityRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(JWT_SECRET));
        let activities = Arc::new(InMemoryActivityRepository::default());

        let state = AppState {
            accounts: Arc::new(SessionService::new(
                Arc::new(InMemoryAccountRepository::default()),
                Arc::clone(&activities),
                Arc::clone(&authenticator),
            )),
            users: Arc::new(SessionService::new(
                Arc::new(InMemoryUserRepository::default()),
                Arc::clone(&activities),
                Arc::clone(&authenticator),
            )),
            photos: Arc::new(ResourceService::new(Arc::new(InMemoryResources::new(
                build_photo,
            )))),
            comments: Arc::new(ResourceService::new(Arc::new(InMemoryResources::new(
                build_comment,
            )))),
            social_medias: Arc::new(ResourceService::new(Arc::new(InMemoryResources::new(
                build_social_media,
            )))),
            authenticator: Arc::clone(&authenticator),
        };

        let router = create_router(state);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            authenticator,
            activities,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user with a valid profile and return the response body
    pub async fn register_user(&self, username: &str, password: &str) -> Value {
        let response = self
            .post("/v1/user/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": password,
                "age": 21
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
        response.json().await.expect("Failed to parse response")
    }

    /// Log a user in and return the token bundle
    pub async fn login_user(&self, username: &str, password: &str) -> Value {
        let response = self
            .post("/v1/user/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Register and log in, returning the user id and its access token
    pub async fn signed_in_user(&self, username: &str) -> (u64, String) {
        let registered = self.register_user(username, "secret123").await;
        let tokens = self.login_user(username, "secret123").await;

        (
            registered["data"]["id"].as_u64().unwrap(),
            tokens["access_token"].as_str().unwrap().to_string(),
        )
    }
}

#[derive(Default)]
pub struct InMemoryActivityRepository {
    pub recorded: Mutex<Vec<Activity>>,
}

impl InMemoryActivityRepository {
    pub fn recorded(&self) -> Vec<Activity> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryActivityRepository {
    async fn create(&self, activity: Activity) -> Result<Activity, SessionError> {
        self.recorded.lock().unwrap().push(activity.clone());
        Ok(activity)
    }
}

#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<Vec<Account>>,
}

#[async_trait]
impl PrincipalRepository for InMemoryAccountRepository {
    type Principal = Account;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, PrincipalError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .iter()
            .find(|account| account.username.as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, PrincipalError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|account| account.id == *id).cloned())
    }

    async fn create(
        &self,
        registration: CreateAccountCommand,
        password_hash: String,
    ) -> Result<Account, PrincipalError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .iter()
            .any(|account| account.username == registration.username)
        {
            return Err(PrincipalError::UsernameAlreadyExists(
                registration.username.as_str().to_string(),
            ));
        }

        let account = Account {
            id: AccountId::new(),
            username: registration.username,
            password_hash,
            role: registration.role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        accounts.push(account.clone());
        Ok(account)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl PrincipalRepository for InMemoryUserRepository {
    type Principal = User;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, PrincipalError> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|user| user.username().as_str() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PrincipalError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|user| user.id == *id).cloned())
    }

    async fn create(
        &self,
        registration: RegisterUserCommand,
        password_hash: String,
    ) -> Result<User, PrincipalError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|user| user.username == registration.username) {
            return Err(PrincipalError::UsernameAlreadyExists(
                registration.username.as_str().to_string(),
            ));
        }

        let user = User {
            id: UserId(users.len() as u64 + 1),
            username: registration.username,
            email: registration.email,
            password_hash,
            age: registration.age,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }
}

/// In-memory resource table; deleted records disappear from every query.
pub struct InMemoryResources<R: OwnedResource> {
    records: Mutex<Vec<R>>,
    next_id: Mutex<u64>,
    build: fn(ResourceId, R::Draft) -> R,
}

impl<R: OwnedResource> InMemoryResources<R> {
    pub fn new(build: fn(ResourceId, R::Draft) -> R) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            build,
        }
    }
}

#[async_trait]
impl<R: OwnedResource> ResourceRepository for InMemoryResources<R> {
    type Resource = R;

    async fn list(&self, limit: i64) -> Result<Vec<R>, ResourceError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ResourceId) -> Result<Option<R>, ResourceError> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().find(|record| record.id() == id).cloned())
    }

    async fn create(&self, draft: R::Draft) -> Result<R, ResourceError> {
        let mut next_id = self.next_id.lock().unwrap();
        let record = (self.build)(ResourceId(*next_id), draft);
        *next_id += 1;

        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: ResourceId, draft: R::Draft) -> Result<R, ResourceError> {
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| ResourceError::NotFound(format!("{} {}", R::KIND, id)))?;

        *slot = (self.build)(id, draft);
        Ok(slot.clone())
    }

    async fn delete(&self, id: ResourceId) -> Result<R, ResourceError> {
        let mut records = self.records.lock().unwrap();
        let position = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| ResourceError::NotFound(format!("{} {}", R::KIND, id)))?;

        Ok(records.remove(position))
    }
}

fn build_photo(id: ResourceId, draft: PhotoDraft) -> Photo {
    Photo {
        id,
        owner: draft.owner,
        title: draft.title,
        caption: draft.caption,
        photo_url: draft.photo_url,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn build_comment(id: ResourceId, draft: CommentDraft) -> Comment {
    Comment {
        id,
        owner: draft.owner,
        photo_id: draft.photo_id,
        message: draft.message,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn build_social_media(id: ResourceId, draft: SocialMediaDraft) -> SocialMedia {
    SocialMedia {
        id,
        owner: draft.owner,
        name: draft.name,
        social_media_url: draft.social_media_url,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
