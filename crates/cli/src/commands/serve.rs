use crate::server::{router, AppState};
use rescope_config::Settings;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

pub async fn execute(settings: &Settings, bind: Option<SocketAddr>) -> eyre::Result<()> {
    let addr = bind.unwrap_or(settings.bind);
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(AppState::new(settings)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
