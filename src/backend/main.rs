/**
 * Tripboard Server Entry Point
 *
 * Loads configuration, initializes tracing and serves the itinerary API
 * until Ctrl-C.
 */

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tripboard=debug,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = tripboard::shared::config::load()?;
    tracing::info!(port = config.server_port, "[Startup] Configuration loaded");

    let port = config.server_port;
    let (app, state) = tripboard::backend::server::create_app(config).await;

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("[Startup] Listening on {}", addr);

    let channels = state.channels.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(%err, "[Shutdown] Failed to listen for Ctrl-C");
            }
            tracing::info!("[Shutdown] Signal received, closing plan channels");
            // Open SSE streams end once their channel closes
            channels.shutdown();
        })
        .await?;

    tracing::info!("[Shutdown] Server stopped");
    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("Server requires the 'ssr' feature to be enabled.");
    eprintln!("Run with: cargo run --bin tripboard-server --features ssr");
    std::process::exit(1);
}
