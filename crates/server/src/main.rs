//! Tallysheet server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Router, middleware};
use sea_orm::Set;
use tallysheet_api::{
    middleware::{AppState, TokenKey, auth_middleware},
    router as api_router,
};
use tallysheet_common::Config;
use tallysheet_core::{
    ApprovalService, PollService, SheetService, UserService, VoteService, generate_id,
    hash_password,
};
use tallysheet_db::entities::{user, user::Role};
use tallysheet_db::repositories::{
    NotificationRepository, PollRepository, SheetRepository, UserRepository, VoteRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Seed the super-admin account on first run, when configured.
async fn seed_super_admin(
    config: &Config,
    user_repo: &UserRepository,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(phone), Some(password)) = (
        config.bootstrap.super_admin_phone.as_deref(),
        config.bootstrap.super_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    if let Some(existing) = user_repo.find_by_phone(phone).await? {
        if existing.role != Role::SuperAdmin || !existing.is_verified {
            user_repo
                .set_role(&existing.id, Role::SuperAdmin, true)
                .await?;
            info!(user_id = %existing.id, "Restored super-admin role");
        }
        return Ok(());
    }

    let model = user::ActiveModel {
        id: Set(generate_id()),
        name: Set(config
            .bootstrap
            .super_admin_name
            .clone()
            .unwrap_or_else(|| "Super Admin".to_string())),
        phone: Set(phone.to_string()),
        organization: Set(config
            .bootstrap
            .super_admin_organization
            .clone()
            .unwrap_or_default()),
        password_hash: Set(hash_password(password)?),
        role: Set(Role::SuperAdmin),
        is_verified: Set(true),
        created_at: Set(chrono::Utc::now().into()),
        updated_at: Set(None),
    };

    let created = user_repo.create(model).await?;
    info!(user_id = %created.id, "Seeded super-admin account");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tallysheet=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting tallysheet server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = tallysheet_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    tallysheet_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let sheet_repo = SheetRepository::new(Arc::clone(&db));
    let poll_repo = PollRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));

    seed_super_admin(&config, &user_repo).await?;

    // Initialize services
    let approval_service = ApprovalService::new(
        notification_repo,
        user_repo.clone(),
        sheet_repo.clone(),
    );
    let poll_service = PollService::new(poll_repo.clone(), vote_repo.clone());
    let vote_service = VoteService::new(poll_repo, vote_repo);
    let sheet_service = SheetService::new(
        sheet_repo,
        user_repo.clone(),
        poll_service.clone(),
        approval_service.clone(),
    );
    let user_service = UserService::new(user_repo, approval_service.clone());

    let state = AppState {
        user_service,
        sheet_service,
        poll_service,
        vote_service,
        approval_service,
        token_key: TokenKey::new(&config.auth.token_secret),
    };

    // Build the application router. Every request carries a bounded
    // deadline enforced by the timeout layer.
    let app = Router::new()
        .nest("/api/v1", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
