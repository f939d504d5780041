use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rive::config::Config;
use rive::db;
use rive::draft::DraftStore;
use rive::migrations::{run_local_migrations, run_migrations};
use rive::repositories::AuthRepository;
use rive::storage::LocalStorage;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rive=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);
    let pool = db::create_pool(&config.database_url)?;
    run_migrations(&pool)?;

    tracing::info!("Opening local storage: {}", config.local_storage_url);
    let local_pool = db::create_pool(&config.local_storage_url)?;
    run_local_migrations(&local_pool)?;

    let expired = AuthRepository::with_ttl_days(pool.clone(), config.session_ttl_days)
        .cleanup_expired()
        .await?;
    if expired > 0 {
        tracing::info!("Removed {} expired sessions", expired);
    }

    let drafts = DraftStore::new(LocalStorage::new(local_pool));
    match drafts.active_workout_id().await? {
        Some(workout_id) => tracing::info!("Unsaved workout draft for {}", workout_id),
        None => tracing::debug!("No workout draft in progress"),
    }

    tracing::info!("Ready");
    Ok(())
}
