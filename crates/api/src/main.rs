use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use limacentro_api::auth::provider::JwtIdentityProvider;
use limacentro_api::background;
use limacentro_api::config::ServerConfig;
use limacentro_api::router::build_app_router;
use limacentro_api::state::AppState;
use limacentro_core::presence::{PresenceTracker, SystemClock};
use limacentro_db::repositories::UserRepo;
use limacentro_notify::{EmailConfig, EventBus, Mailer, NotificationRouter};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "limacentro_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = limacentro_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    limacentro_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    limacentro_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Admin bootstrap ---
    if let Some(admin_email) = &config.admin_email {
        let admin = UserRepo::bootstrap_admin(&pool, admin_email)
            .await
            .expect("Failed to bootstrap admin account");
        tracing::info!(user_id = admin.id, "Admin account ensured");
    }

    // --- Presence tracker + sweep task ---
    let presence = Arc::new(PresenceTracker::new(
        chrono::Duration::seconds(config.presence_ttl_secs as i64),
        SystemClock,
    ));
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = tokio::spawn(background::presence_sweep::run(
        Arc::clone(&presence),
        config.presence_ttl_secs,
        sweep_cancel.clone(),
    ));

    // --- Event bus + notification router ---
    let event_bus = EventBus::new();
    let mailer = match EmailConfig::from_env() {
        Some(email_config) => match Mailer::new(&email_config) {
            Ok(mailer) => {
                tracing::info!(host = %email_config.host, "Email delivery enabled");
                Some(mailer)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Email transport setup failed, delivery disabled");
                None
            }
        },
        None => {
            tracing::info!("SMTP_HOST not set, email delivery disabled");
            None
        }
    };
    let notification_router = NotificationRouter::new(
        mailer,
        config.admin_email.clone(),
        config.public_url.clone(),
    );
    let router_handle = tokio::spawn(notification_router.run(event_bus.subscribe()));

    // --- Identity provider ---
    let identity = Arc::new(JwtIdentityProvider::new(&config.identity_jwt_secret));

    // --- App state + router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        presence,
        event_bus: event_bus.clone(),
        identity,
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Presence sweep task stopped");

    // Drop the event bus sender to close the broadcast channel, which
    // signals the notification router to shut down.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), router_handle).await;
    tracing::info!("Notification router shut down");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
