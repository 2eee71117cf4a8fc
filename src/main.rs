use budgeteer::clock::SystemClock;
use budgeteer::config::Config;
use budgeteer::server;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "budgeteer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let (host, port) = (config.host.clone(), config.port);
    tracing::info!(
        "Starting Budgeteer {} on {}",
        budgeteer::VERSION,
        config.address()
    );

    let (_state, app) = server::build_app(config, Arc::new(SystemClock))?;
    let (actual_port, handle) = server::serve(app, &host, port).await?;
    tracing::info!("Listening on http://{}:{}", host, actual_port);

    handle.await?;
    Ok(())
}
