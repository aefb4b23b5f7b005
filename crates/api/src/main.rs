use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kiss_api::config::ServerConfig;
use kiss_api::notifications::NotificationRouter;
use kiss_api::router::build_app_router;
use kiss_api::state::AppState;
use kiss_events::{EmailConfig, EmailDelivery, EscalationSweeper, EventBus, EventPersistence};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kiss_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = kiss_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    kiss_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    kiss_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // Spawn event persistence (writes all events to the database).
    let persistence_handle = tokio::spawn(EventPersistence::run(
        pool.clone(),
        event_bus.subscribe(),
    ));

    // Spawn the notification router (fans ticket events out to staff
    // and assignees, with optional email for escalations).
    let email = EmailConfig::from_env().map(EmailDelivery::new);
    if email.is_some() {
        tracing::info!("Email delivery configured for escalation alerts");
    }
    let notification_router = NotificationRouter::new(pool.clone(), email);
    let router_handle = tokio::spawn(notification_router.run(event_bus.subscribe()));

    // Spawn the escalation sweeper (flags overdue tickets on an interval).
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweeper = EscalationSweeper::new(pool.clone(), Arc::clone(&event_bus))
        .with_interval(Duration::from_secs(config.escalation_sweep_interval_secs));
    let sweep_cancel_clone = sweep_cancel.clone();
    let sweeper_handle = tokio::spawn(async move {
        sweeper.run(sweep_cancel_clone).await;
    });

    tracing::info!("Event services started (persistence, notification router, escalation sweeper)");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    // --- Router ---
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

    // Stop the escalation sweeper.
    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweeper_handle).await;
    tracing::info!("Escalation sweeper stopped");

    // Drop the event bus sender to close the broadcast channel.
    // This signals persistence and the notification router to shut down.
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), persistence_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), router_handle).await;
    tracing::info!("Event services shut down");

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
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
