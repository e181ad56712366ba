//! Tracing setup: stdout plus an optional daily rolling log file.

use std::path::Path;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "processflow.log";

/// Installed logging for the life of the process.
///
/// Holds the file writer's guard; dropping it stops the background writer,
/// so keep this alive until `main` returns. The level can be changed later
/// with [`Logging::apply`], the file output cannot.
pub struct Logging {
    filter: reload::Handle<EnvFilter, Registry>,
    file_guard: Option<WorkerGuard>,
}

/// `RUST_LOG` when set, else the configured level.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

impl Logging {
    /// Install the global subscriber.
    ///
    /// If one is already installed the existing subscriber is left alone.
    pub fn init(config: &LoggingConfig, log_dir: &Path) -> Self {
        let file_dir = config.file.then_some(log_dir);
        let (subscriber, logging) = Self::build(env_filter(&config.level), file_dir);
        if let Err(e) = subscriber.try_init() {
            tracing::warn!("Logging already initialized: {e}");
        }
        logging
    }

    /// Build the subscriber without installing it.
    pub fn build(filter: EnvFilter, file_dir: Option<&Path>) -> (impl Subscriber + Send + Sync + 'static, Self) {
        let (filter_layer, handle) = reload::Layer::new(filter);

        let (file_layer, file_guard) = match file_dir {
            Some(dir) => {
                let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
            }
            None => (None, None),
        };

        let subscriber = tracing_subscriber::registry()
            .with(filter_layer)
            .with(fmt::layer())
            .with(file_layer);

        (
            subscriber,
            Self {
                filter: handle,
                file_guard,
            },
        )
    }

    /// Switch to the level from a freshly loaded configuration.
    pub fn apply(&self, config: &LoggingConfig) {
        self.set_filter(env_filter(&config.level));
    }

    pub fn set_filter(&self, filter: EnvFilter) {
        if let Err(e) = self.filter.reload(filter) {
            tracing::warn!("Failed to change log level: {e}");
        }
    }

    /// Current filter directives, or `None` once the subscriber is gone.
    pub fn current_filter(&self) -> Option<String> {
        self.filter.with_current(|f| f.to_string()).ok()
    }

    pub fn writes_file(&self) -> bool {
        self.file_guard.is_some()
    }
}
