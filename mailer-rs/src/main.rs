use mailer_rs::api::{ApiServer, AppState};
use mailer_rs::config::{Config, LoggingConfig};
use mailer_rs::dispatch::{DispatchQueue, Dispatcher};
use mailer_rs::service::Mailer;
use mailer_rs::smtp::SmtpRelay;
use mailer_rs::templates::{TemplateRegistry, TemplateRenderer};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    }
    .apply_env()?;

    init_tracing(&config.logging);
    info!("Starting mailer-rs v{}", env!("CARGO_PKG_VERSION"));

    config.validate()?;
    info!("Configuration loaded");
    info!("  HTTP listening on: {}", config.server.listen_addr);
    info!("  Relay: {}:{}", config.relay.host, config.relay.port);
    info!("  Templates: {}", config.templates.dir.display());
    info!(
        "  Workers: {}, queue capacity: {}",
        config.dispatch.workers, config.dispatch.queue_capacity
    );

    let config = Arc::new(config);

    // Templates are loaded once and never change afterwards
    let registry = Arc::new(TemplateRegistry::load(
        &config.templates.dir,
        &config.templates.extension,
    )?);

    let queue = Arc::new(DispatchQueue::new(config.dispatch.queue_capacity));
    let relay = Arc::new(SmtpRelay::new(config.relay.clone()));
    let dispatcher = Arc::new(Dispatcher::new(queue, relay));
    dispatcher.start(config.dispatch.workers);

    let mailer = Mailer::new(TemplateRenderer::new(registry), Arc::clone(&dispatcher));
    let server = ApiServer::new(
        AppState {
            mailer,
            config: Arc::clone(&config),
        },
        config.server.listen_addr.clone(),
    );

    // HTTP stops first so nothing new is accepted, then the queue drains
    let served = server.run(shutdown_signal()).await;
    if let Err(e) = &served {
        error!("API server error: {}", e);
    }
    dispatcher.stop().await;

    served?;
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("mailer_rs={},tower_http=info", logging.level))
    });
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
