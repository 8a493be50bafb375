use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

use crate::config::LogFormat;

/// Installs the global subscriber. Logs go to stderr so stdout stays free for
/// command output.
///
/// `RUST_LOG` wins over `default_filter`. Calling this twice is harmless: the
/// second subscriber is dropped.
pub fn init(name: &str, default_filter: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    match format {
        LogFormat::Pretty => {
            let subscriber = Registry::default()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
            tracing::subscriber::set_global_default(subscriber).ok();
        }
        LogFormat::Json => {
            let subscriber = Registry::default()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(name.to_string(), std::io::stderr));
            tracing::subscriber::set_global_default(subscriber).ok();
        }
    }
}
