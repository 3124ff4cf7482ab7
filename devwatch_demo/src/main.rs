//! devwatch_demo entry: serves the synthetic backend until interrupted.

use std::net::SocketAddr;

use devwatch_demo::{parse_port, router, DemoState, DEFAULT_PORT};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_env("DEVWATCH_DEMO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = parse_port(std::env::args(), DEFAULT_PORT);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("demo backend listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(DemoState::seeded()))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
