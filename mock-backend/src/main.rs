use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let secret = std::env::var("PORTAL_SECRET_KEY").unwrap_or_else(|_| mock_backend::TEST_SECRET.to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("mock backend listening on {addr}");
    axum::serve(listener, mock_backend::app_with_secret(&secret)).await
}
