use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use mindline::domain::ports::SessionStoragePort;
use mindline::infrastructure::{
    AppConfig, CliArgs, DisabledSessionStorage, HttpAssistantClient, StateFileSessionStorage,
    StorageManager,
};
use mindline::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn create_app() -> Result<App> {
    let args = CliArgs::parse();

    let manager = StorageManager::new()?;
    let mut config = manager.load_config(args.config.as_deref())?;
    config.merge_with_args(args);

    init_logging(&config)?;

    info!(
        version = mindline::VERSION,
        api_url = %config.api_url,
        persist = config.persist_session,
        "Starting mindline"
    );

    let api = Arc::new(HttpAssistantClient::new(
        config.api_url.as_str(),
        config.request_timeout(),
    )?);
    let storage: Arc<dyn SessionStoragePort> = if config.persist_session {
        Arc::new(StateFileSessionStorage::new(manager))
    } else {
        Arc::new(DisabledSessionStorage::new())
    };

    Ok(App::new(
        api,
        storage,
        config.persist_session,
        config.ui.timestamp_format,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    color_eyre::install()?;

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
