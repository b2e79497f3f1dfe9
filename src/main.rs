use std::{env, sync::Arc};

use dotenvy::dotenv;
use gratuity_tracker::api::{AppState, create_router};
use gratuity_tracker::auth::ConfiguredAuthenticator;
use gratuity_tracker::config::ConfigLoader;
use gratuity_tracker::notify::SmtpMailer;
use gratuity_tracker::store::{RecordStore, XlsxRecordStore};
use gratuity_tracker::tracker::Tracker;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Mail credentials usually come from .env; it is optional.
    dotenv().ok();

    let config_dir = env::var("TRACKER_CONFIG").unwrap_or_else(|_| "./config".to_string());
    let config = ConfigLoader::load(&config_dir)
        .inspect_err(|e| error!("Failed to load configuration from {}: {}", config_dir, e))?;
    info!(
        config_dir = %config_dir,
        threshold_years = %config.threshold(),
        "Configuration loaded"
    );

    let store: Arc<dyn RecordStore> = Arc::new(XlsxRecordStore::new(config.store_path()));
    info!(store = %store.location(), "Using spreadsheet record store");

    let tracker = Tracker::new(store, config.threshold());
    let mut state = AppState::new(tracker);

    match config.mail() {
        Some(mail) => match SmtpMailer::from_env(mail) {
            Ok(mailer) => {
                info!(relay = %mail.relay, port = mail.port, "Report emails enabled");
                state = state.with_mailer(Arc::new(mailer), mail.clone());
            }
            Err(e) => warn!("Report emails disabled: {}", e),
        },
        None => info!("No mail section configured; report emails disabled"),
    }

    let authenticator = ConfiguredAuthenticator::new(config.users())?;
    if authenticator.is_empty() {
        warn!("No users configured; the API is open to anyone who can reach it");
    } else {
        state = state.with_authenticator(Arc::new(authenticator));
    }

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", config.bind_address(), e))?;
    info!(address = %config.bind_address(), "Gratuity tracker listening");

    axum::serve(listener, create_router(state)).await?;
    Ok(())
}
