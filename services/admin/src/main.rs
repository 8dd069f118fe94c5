use anyhow::Result;
use chrono::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use admin::{
    AppState,
    config::{AdminConfig, BackendMode},
    create_router, notifications,
};
use common::{
    backend::{Backend, MemoryBackend},
    config::BackendConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AdminConfig::from_env()?;

    // Initialize logging; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting admin service");

    let mut backend_config = BackendConfig::from_env()?;
    let backend = match config.backend {
        BackendMode::Supabase => Backend::hosted(&backend_config).await?,
        BackendMode::Memory => {
            if backend_config.jwt_secret.is_empty() {
                backend_config.jwt_secret = Uuid::new_v4().to_string();
            }

            let memory = MemoryBackend::new(
                &backend_config.jwt_secret,
                &backend_config.url,
                &backend_config.storage.bucket,
            );
            match config.memory_staff() {
                Some((email, password)) => {
                    let id = memory.add_staff(email, password).await;
                    info!("Seeded staff account {} ({})", email, id);
                }
                None => warn!("Memory backend has no staff account; sign-in will fail"),
            }
            Backend::memory(memory)
        }
    };

    // Check backend connectivity
    if backend.health_check().await? {
        info!("Backend connection successful");
    } else {
        anyhow::bail!("Failed to connect to backend");
    }

    let state = AppState::new(
        backend,
        &backend_config.jwt_secret,
        Duration::milliseconds(config.notification_ttl_ms as i64),
    )
    .with_max_upload_bytes(config.max_upload_bytes);

    let _sweeper =
        notifications::start_sweeper(state.sessions.clone(), &config.notification_sweep_schedule)
            .await?;

    info!("Admin service initialized successfully");

    // Start the web server
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Admin service listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
