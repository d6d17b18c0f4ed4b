//! Server binary: `cargo run --bin school-registry`. Reads `.env`, prepares the database and
//! serves the API.

use school_registry::{apply_migrations, build_router, connect, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("school_registry=info,tower_http=info")
            }),
        )
        .init();

    let settings = Settings::from_env()?;
    let pool = connect(&settings).await?;
    let state = AppState::new(pool, &settings);
    apply_migrations(&state.pool, &state.catalog).await?;

    let app = build_router(state);
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        delete_policy = ?settings.delete_policy,
        "{} listening",
        settings.app_name
    );
    axum::serve(listener, app).await?;
    Ok(())
}
