use portal_proxy::ProxyConfig;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = ProxyConfig::from_env().map_err(|e| {
        error!("invalid proxy configuration: {e}");
        std::io::Error::other(e)
    })?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(upstream = %config.upstream, "proxy listening on {addr}");
    portal_proxy::run(listener, config).await
}
