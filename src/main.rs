use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use recipe_share_api::application::notification::{DispatcherSettings, NotificationDispatcher};
use recipe_share_api::data::memory::InMemoryStore;
use recipe_share_api::domain::mail::MailSender;
use recipe_share_api::infrastructure::config::AppConfig;
use recipe_share_api::infrastructure::logging::init_logging;
use recipe_share_api::infrastructure::mail::{LogMailSender, SmtpMailSender};
use recipe_share_api::infrastructure::scheduler::start_notification_job;
use recipe_share_api::presentation::handlers::AppState;
use recipe_share_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use recipe_share_api::presentation::routes::{ROUTES_SUMMARY, configure};
use std::sync::Arc;
use tracing::{error, info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> std::io::Result<()> {
    info!("Initializing logging subsystem");
    init_logging();
    info!("Logging initialized successfully");

    info!("Loading configuration");
    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    info!(bind_addr = %config.bind_addr, "Configuration loaded");

    info!("Creating in-memory store");
    let store = Arc::new(InMemoryStore::new());
    info!("Store created");

    info!("Creating mail sender");
    let mailer: Arc<dyn MailSender> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpMailSender::new(smtp).map_err(|e| {
            error!(error = %e, "Failed to set up SMTP transport");
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
        })?),
        None => Arc::new(LogMailSender::new()),
    };
    info!(smtp = config.smtp.is_some(), "Mail sender created");

    info!("Creating notification dispatcher");
    let dispatcher = Arc::new(NotificationDispatcher::new(
        store.clone(),
        mailer,
        DispatcherSettings {
            offset: config.notify_offset,
            from: config.mail_from.clone(),
            send_timeout: config.mail_timeout,
        },
    ));
    info!("Notification dispatcher created");

    info!(schedule = %config.notify_schedule, "Starting notification scheduler");
    // Keep the handle alive for the lifetime of the server.
    let _scheduler =
        start_notification_job(dispatcher, &config.notify_schedule, config.notify_offset)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to start notification scheduler");
                std::io::Error::other(e.to_string())
            })?;
    info!("Notification scheduler started");

    info!("Initializing application state");
    let state = web::Data::new(AppState::new(store, config.jwt_secret.clone()));
    let jwt_secret = config.jwt_secret.clone();
    info!("Application state initialized");

    info!("Configuring HTTP server");
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Cors::permissive())
            .configure(configure)
    });

    info!(address = %config.bind_addr, "Binding server to address");
    let server = server.bind(config.bind_addr.as_str())?;
    info!(address = %config.bind_addr, "Server bound successfully");

    info!(
        address = %config.bind_addr,
        routes = %ROUTES_SUMMARY,
        "Starting HTTP server"
    );
    server.run().await
}
