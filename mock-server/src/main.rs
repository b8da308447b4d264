use mock_server::{MockState, APPLICATION_ID, APPLICATION_SECRET};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    init_logging();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let application_id = std::env::var("RALLIO_APPLICATION_ID").unwrap_or_else(|_| APPLICATION_ID.to_string());
    let application_secret =
        std::env::var("RALLIO_APPLICATION_SECRET").unwrap_or_else(|_| APPLICATION_SECRET.to_string());

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, %application_id, "mock Rallio API listening");
    mock_server::run_with_state(listener, MockState::new(&application_id, &application_secret)).await
}
