// src/logging.rs

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LogFormat};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Installs the global tracing subscriber.
///
/// The returned guard flushes the file writer on drop; keep it alive for
/// the lifetime of the process.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    let mut layers: Vec<BoxedLayer> = Vec::new();
    let mut guard = None;

    if config.log_to_stdout {
        let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
        layers.push(match config.log_format {
            LogFormat::Json => stdout_layer.json().boxed(),
            LogFormat::Text => stdout_layer.boxed(),
        });
    }

    if config.log_to_file {
        let file_appender = tracing_appender::rolling::daily(&config.log_dir, "forum.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
        layers.push(match config.log_format {
            LogFormat::Json => file_layer.json().boxed(),
            LogFormat::Text => file_layer.boxed(),
        });
    }

    let env_filter = EnvFilter::try_new(&config.rust_log).unwrap_or_else(|e| {
        eprintln!("invalid RUST_LOG '{}' ({}), falling back to info", config.rust_log, e);
        EnvFilter::new("info")
    });

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .init();

    guard
}
