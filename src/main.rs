use matchlens::{create_router, init, AppState, Config, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Environment overrides (MATCHLENS_*) may come from a .env file
    dotenv::dotenv().ok();

    // Initialize the application
    init()?;

    let config = Config::from_env();
    let addr = config.addr;

    // Initialize application state (catalog + encoder, loaded once)
    let state = AppState::from_config(config).await?;
    if !state.matcher.encoder_available() {
        log::warn!("Starting in degraded mode: search endpoints will return 503");
    }

    // Build our application with routes
    let app = create_router().with_state(state);

    // Set up the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
