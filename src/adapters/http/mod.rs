//! JSON API in front of the reading pipeline

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::ReadingAppState;
pub use routes::{app, routes};

use crate::utils::error::Result;

/// Bind and serve until the process is stopped
pub async fn serve(addr: &str, state: ReadingAppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🌙 Listening on http://{}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
