use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::ports::AccountServicePort;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::user::errors::AccountError;
use async_trait::async_trait;
use auth::JwtHandler;
use auth::TokenIssuer;
use uuid::Uuid;

pub const ACCESS_SECRET: &[u8] = b"test-access-secret-at-least-32-bytes!";
pub const REFRESH_SECRET: &[u8] = b"test-refresh-secret-at-least-32-byte!";

/// In-memory user store for the API tests.
///
/// Mirrors the Postgres repository's contract: email uniqueness on
/// create/update, NotFound on missing ids, per-record atomic updates
/// (one mutex around the map).
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AccountError> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.email.as_str() == user.email.as_str())
        {
            return Err(AccountError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AccountError> {
        Ok(self.users.lock().unwrap().get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, AccountError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn update(&self, user: User) -> Result<User, AccountError> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.id != user.id && u.email.as_str() == user.email.as_str())
        {
            return Err(AccountError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }
        match users.get_mut(&user.id.0) {
            Some(existing) => {
                existing.name = user.name.clone();
                existing.email = user.email.clone();
                existing.password_hash = user.password_hash.clone();
                Ok(user)
            }
            None => Err(AccountError::NotFound(user.id.to_string())),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<(), AccountError> {
        self.users
            .lock()
            .unwrap()
            .remove(&id.0)
            .map(|_| ())
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn set_refresh_token(&self, id: &UserId, token: &str) -> Result<(), AccountError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id.0) {
            Some(user) => {
                user.refresh_token = Some(token.to_string());
                Ok(())
            }
            None => Err(AccountError::NotFound(id.to_string())),
        }
    }

    async fn clear_refresh_token(&self, id: &UserId) -> Result<(), AccountError> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(&id.0) {
            Some(user) => {
                user.refresh_token = None;
                Ok(())
            }
            None => Err(AccountError::NotFound(id.to_string())),
        }
    }
}

/// Test application that spawns a real server on a random port.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub access_jwt: JwtHandler,
    pub refresh_jwt: JwtHandler,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let token_issuer = Arc::new(TokenIssuer::new(ACCESS_SECRET, REFRESH_SECRET));
        let repository = Arc::new(InMemoryUserRepository::new());
        let account_service: Arc<dyn AccountServicePort> = Arc::new(AccountService::new(
            repository,
            Arc::clone(&token_issuer),
        ));

        let router = create_router(account_service, token_issuer);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            access_jwt: JwtHandler::new(ACCESS_SECRET),
            refresh_jwt: JwtHandler::new(REFRESH_SECRET),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register a user and return their id.
    pub async fn register_user(&self, name: &str, email: &str, password: &str) -> String {
        let response = self
            .post("/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute register request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["id"].as_str().expect("Missing user id").to_string()
    }

    /// Log a user in and return (access token, refresh token).
    pub async fn login_user(&self, email: &str, password: &str) -> (String, String) {
        let response = self
            .post("/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute login request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        (
            body["accessToken"]
                .as_str()
                .expect("Missing access token")
                .to_string(),
            body["refreshToken"]
                .as_str()
                .expect("Missing refresh token")
                .to_string(),
        )
    }
}
