use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use tourbook_api::{app, AppState, AuthConfig};
use tourbook_booking::BookingWorkflow;
use tourbook_catalog::PackageRepository;
use tourbook_core::{BookingRepository, Notifier};
use tourbook_store::{
    app_config::Config, DbClient, EmailJsNotifier, InMemoryStore, PgBookingRepository,
    PgPackageRepository, UnconfiguredNotifier,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourbook_api=debug,tourbook_booking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Tourbook API on port {}", config.server.port);

    let (bookings, packages) = match &config.database.url {
        Some(url) => {
            let db = DbClient::new(url, config.database.max_connections)
                .await
                .context("Failed to connect to Postgres")?;
            db.migrate().await.context("Failed to run migrations")?;
            (
                Arc::new(PgBookingRepository::new(db.pool.clone())) as Arc<dyn BookingRepository>,
                Arc::new(PgPackageRepository::new(db.pool.clone())) as Arc<dyn PackageRepository>,
            )
        }
        None => {
            tracing::warn!("No database configured, using in-memory store; data is lost on restart");
            let store = Arc::new(InMemoryStore::new());
            (
                store.clone() as Arc<dyn BookingRepository>,
                store as Arc<dyn PackageRepository>,
            )
        }
    };

    let notifier: Arc<dyn Notifier> = match config.email.clone() {
        Some(email) => Arc::new(EmailJsNotifier::new(email).context("Failed to build email client")?),
        None => {
            tracing::warn!("No [email] section configured, confirmation emails will not be sent");
            Arc::new(UnconfiguredNotifier)
        }
    };

    let app_state = AppState {
        workflow: Arc::new(BookingWorkflow::new(bookings, notifier)),
        packages,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
