use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyperion_api::config::ServerConfig;
use hyperion_api::notifications::NotificationRouter;
use hyperion_api::router::build_app_router;
use hyperion_api::state::AppState;
use hyperion_db::DbPool;
use hyperion_events::{EventBus, Mailer, SmtpConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "hyperion_api=debug,tower_http=debug";

/// `LOG_FORMAT=json` switches to one JSON object per line.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn prepare_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = hyperion_db::create_pool(&url)
        .await
        .expect("cannot connect to the database");
    hyperion_db::health_check(&pool)
        .await
        .expect("database is not answering");
    hyperion_db::run_migrations(&pool)
        .await
        .expect("migrations failed");
    tracing::info!("Database ready, migrations applied");
    pool
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let pool = prepare_database().await;

    let mailer = Arc::new(Mailer::new(SmtpConfig::from_env()).expect("mailer setup failed"));
    if !mailer.is_configured() {
        tracing::warn!("SMTP_HOST not set, emails are logged instead of sent");
    }

    let event_bus = Arc::new(EventBus::default());
    let notifications = tokio::spawn(
        NotificationRouter::new(pool.clone(), Arc::clone(&mailer)).run(event_bus.subscribe()),
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("hyperion/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .expect("cannot build the HTTP client");

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
        mailer,
        http,
    };
    let app = build_app_router(state, &config);

    let ip = config.host.parse().expect("HOST is not an IP address");
    let addr = SocketAddr::new(ip, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("cannot bind the listen address");
    tracing::info!(%addr, "Hyperion listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    // The router and every state clone are gone once `serve` returns, so
    // the bus sender is dropped and the notification task drains and exits.
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(grace, notifications).await.is_err() {
        tracing::warn!("Pending notifications abandoned at shutdown");
    }
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("cannot listen for Ctrl-C");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())
            .expect("cannot listen for SIGTERM")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("Interrupted"),
        () = terminate => tracing::info!("Terminated"),
    }
}
