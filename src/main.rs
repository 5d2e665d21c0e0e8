//! CLI entry point for `mail2ticket`.

use std::path::Path;

use clap::Parser;
use tracing::info;

use mail2ticket::Settings;

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    setup_logging(settings.log_level(), settings.log_dir.as_deref());

    info!("starting mail2ticket run");
    let summary = mail2ticket::run(&settings)?;
    info!(
        "run finished: {}/{} emails converted",
        summary.processed, summary.total
    );
    Ok(())
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, log_dir: Option<&Path>) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if let Some(dir) = log_dir {
        if std::fs::create_dir_all(dir).is_ok() {
            let file_appender = tracing_appender::rolling::never(dir, "mail2ticket.log");
            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_appender);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
            return;
        }
        eprintln!("could not create log directory {}", dir.display());
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
