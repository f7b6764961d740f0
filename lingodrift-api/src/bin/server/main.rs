use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenService;
use lingodrift_api::config::Config;
use lingodrift_api::domain::user::service::UserService;
use lingodrift_api::inbound::http::router::cors_layer;
use lingodrift_api::inbound::http::router::create_router;
use lingodrift_api::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lingodrift_api=debug,auth=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "lingodrift-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let run_mode = lingodrift_api::config::run_mode();
    if run_mode == "development" {
        tracing::warn!(
            run_mode = %run_mode,
            "Development profile active; its signing secret is not fit for deployment"
        );
    }

    let config = Config::load()?;

    tracing::info!(
        run_mode = %run_mode,
        http_port = config.server.http_port,
        token_ttl_minutes = config.jwt.access_token_expire_minutes,
        cors_origins = ?config.cors.allowed_origins,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = PasswordHasher::with_cost(config.password.cost())?;
    let token_service = TokenService::new(config.jwt.secret.as_bytes())
        .with_default_ttl(config.jwt.access_token_ttl()?);
    let authenticator = Arc::new(Authenticator::new(password_hasher, token_service));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(UserService::new(user_repository, authenticator)?);

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, cors_layer(&config.cors.allowed_origins)?);
    axum::serve(http_listener, http_application).await?;

    tracing::info!("Server exited successfully");

    Ok(())
}
