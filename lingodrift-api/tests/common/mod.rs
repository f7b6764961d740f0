use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use auth::Authenticator;
use auth::HashCost;
use auth::PasswordHasher;
use auth::TokenService;
use chrono::Utc;
use lingodrift_api::domain::user::models::EmailAddress;
use lingodrift_api::domain::user::models::User;
use lingodrift_api::domain::user::models::UserId;
use lingodrift_api::domain::user::ports::UserRepository;
use lingodrift_api::domain::user::service::UserService;
use lingodrift_api::inbound::http::router::cors_layer;
use lingodrift_api::inbound::http::router::create_router;
use lingodrift_api::user::errors::UserError;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// User store kept in memory so the API can be exercised without Postgres
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn insert(&self, user: User) {
        self.users
            .write()
            .expect("User store lock poisoned")
            .insert(user.email.as_str().to_string(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .expect("User store lock poisoned")
            .get(email)
            .cloned())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
    pub authenticator: Arc<Authenticator>,
    pub token_service: TokenService,
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

        let hasher = PasswordHasher::with_cost(HashCost {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");
        let token_service = TokenService::new(JWT_SECRET);
        let authenticator = Arc::new(Authenticator::new(hasher, token_service.clone()));

        let users = Arc::new(InMemoryUserRepository::default());
        let user_service = Arc::new(
            UserService::new(Arc::clone(&users), Arc::clone(&authenticator))
                .expect("Failed to build user service"),
        );

        let cors = cors_layer(&["http://localhost:5173".to_string()])
            .expect("Failed to build CORS layer");
        let router = create_router(user_service, cors);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            users,
            authenticator,
            token_service,
        }
    }

    /// Store a user whose password is hashed the way the service hashes it
    pub fn seed_user(&self, email: &str, password: &str) -> User {
        let password_hash = self
            .authenticator
            .hash_password(password)
            .expect("Failed to hash password");
        self.seed_user_with_hash(email, password_hash)
    }

    /// Store a user with a precomputed hash (e.g. a legacy bcrypt hash)
    pub fn seed_user_with_hash(&self, email: &str, password_hash: String) -> User {
        let user = User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).expect("Invalid test email"),
            password_hash,
            created_at: Utc::now(),
        };
        self.users.insert(user.clone());
        user
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to submit the OAuth2 password form
    pub fn login(&self, email: &str, password: &str) -> reqwest::RequestBuilder {
        self.api_client
            .post(&format!("{}/token", self.address))
            .form(&[("username", email), ("password", password)])
    }
}
