//! Headless server binary.
//!
//! Starts the axum web server and waits for Ctrl+C.

use tracing_subscriber::EnvFilter;

use smartqr_lib::app::SharedState;
use smartqr_lib::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting SmartQR server");

    let config = smartqr_lib::init_foundation();
    let state = SharedState::new(config);

    let server_state = state.clone();
    let mut server_handle = tokio::spawn(server::start_server(server_state));

    tracing::info!(
        port = state.server_port(),
        "Server running. Press Ctrl+C to stop."
    );

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            result?;
            tracing::info!("Shutting down...");
            state.shutdown_token().cancel();
            server_handle.await??;
        }
        result = &mut server_handle => {
            result??;
        }
    }

    Ok(())
}
