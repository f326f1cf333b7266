use resp_codec::{Config, Server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new(std::env::args().collect())?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        bind = %config.bind,
        port = config.port,
        max_depth = config.limits.max_depth,
        max_bulk_len = config.limits.max_bulk_len,
        "starting server"
    );

    let server = Server::bind(&config).await?;
    server.run().await?;
    Ok(())
}
