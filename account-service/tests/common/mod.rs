use std::sync::Arc;

use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserRepository;
use auth::AuthService;
use auth::TokenCodec;
use serde_json::json;

pub const TEST_SECRET: &[u8] = b"testsecret";

/// Test application that spawns a real server over an in-memory user store
pub struct TestApp {
    pub address: String,
    pub repository: Arc<InMemoryUserRepository>,
    pub api_client: reqwest::Client,
    pub token_codec: TokenCodec,
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

        let repository = Arc::new(InMemoryUserRepository::new());
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            TokenCodec::new(TEST_SECRET).expect("Failed to create token codec"),
        ));
        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));

        let router = create_router(user_service, auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            repository,
            api_client: reqwest::Client::new(),
            token_codec: TokenCodec::new(TEST_SECRET).expect("Failed to create token codec"),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user through the API
    pub async fn sign_up(&self, username: &str, password: &str, full_name: &str) -> reqwest::Response {
        self.post("/api/auth/signup")
            .json(&json!({
                "username": username,
                "password": password,
                "full_name": full_name
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Sign in through the API
    pub async fn sign_in(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/signin")
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register and sign in, returning the issued token
    pub async fn signed_in_token(&self, username: &str, password: &str) -> String {
        self.sign_up(username, password, "Test User").await;
        let body: serde_json::Value = self
            .sign_in(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}
