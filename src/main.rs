use cinematch::{
    api::{create_router, AppState},
    config::Config,
    services::loader,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinematch=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Without the catalog there is nothing to serve
    let catalog = match loader::shared(&config.artifact_paths()).await {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load movie data");
            return Err(e.into());
        }
    };

    let state = AppState::new(catalog);
    state
        .sessions
        .spawn_sweeper(config.session_ttl(), config.session_sweep_period());

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
