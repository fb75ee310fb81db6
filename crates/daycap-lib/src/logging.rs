use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::{fmt, EnvFilter};

pub use tracing_appender::rolling::Rotation;

const LOG_FILE_PREFIX: &str = "records.log";

pub struct LogConfig {
    pub directory: PathBuf,
    pub level: Level,
    pub rotation: Rotation,
}

impl LogConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            level: Level::INFO,
            rotation: Rotation::DAILY,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Installs the global subscriber writing to a rolling file in
/// `config.directory`. Nothing touches the disk until this is called, and
/// the library itself never calls it. `RUST_LOG` overrides the configured
/// level when set.
///
/// The returned guard flushes buffered lines on drop; hold it for the
/// process lifetime. Calling this twice in one process is an error.
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard> {
    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!(
            "failed to create log directory {}",
            config.directory.display()
        )
    })?;

    let appender =
        RollingFileAppender::new(config.rotation.clone(), &config.directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("logging is already initialized")?;

    Ok(guard)
}
