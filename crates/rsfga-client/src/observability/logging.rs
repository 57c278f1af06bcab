//! Log output for applications embedding the client.
//!
//! The executor and transports only emit `tracing` events with structured
//! fields (`operation`, `chunk_index`, `status`, `kind`). Nothing is printed
//! until a subscriber is installed, either the application's own or the one
//! described by the `logging` section of [`ClientConfig`]:
//!
//! ```ignore
//! let config = ClientConfig::load("client.yaml")?;
//! rsfga_client::observability::init_from_config(&config)?;
//! let client = Client::from_config(config)?;
//! ```

use std::str::FromStr;

use tracing::{level_filters::LevelFilter, Level, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    prelude::*,
    EnvFilter,
};

use crate::config::{ClientConfig, ConfigLoadError, LogFormat, LoggingSettings};

/// A type-erased subscriber, so pretty and JSON output share one signature.
pub type BoxedSubscriber = Box<dyn Subscriber + Send + Sync + 'static>;

/// How log lines are rendered and filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Most verbose level kept when `RUST_LOG` does not say otherwise
    pub level: Level,
    /// Also log span enter and exit
    pub span_events: bool,
}

impl LoggingConfig {
    pub fn new(format: LogFormat) -> Self {
        Self {
            format,
            level: Level::INFO,
            span_events: false,
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_span_events(mut self) -> Self {
        self.span_events = true;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::default().add_directive(LevelFilter::from_level(self.level).into())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new(LogFormat::default())
    }
}

impl TryFrom<&LoggingSettings> for LoggingConfig {
    type Error = ConfigLoadError;

    fn try_from(settings: &LoggingSettings) -> Result<Self, Self::Error> {
        let level = Level::from_str(&settings.level).map_err(|_| ConfigLoadError::Invalid {
            message: format!("logging.level is not a valid level: {}", settings.level),
        })?;
        Ok(Self::new(settings.format).with_level(level))
    }
}

/// Subscriber for `config` writing to `writer`, filtered at `config.level`.
pub fn subscriber<W>(config: &LoggingConfig, writer: W) -> BoxedSubscriber
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    build(config, config.filter(), writer)
}

fn build<W>(config: &LoggingConfig, filter: EnvFilter, writer: W) -> BoxedSubscriber
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let span_events = if config.span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => Box::new(
            registry.with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_span_events(span_events)
                    .with_current_span(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            ),
        ),
        LogFormat::Pretty => Box::new(
            registry.with(
                fmt::layer()
                    .pretty()
                    .with_writer(writer)
                    .with_span_events(span_events)
                    .with_target(true),
            ),
        ),
    }
}

/// Installs a stdout subscriber as the global default.
///
/// `RUST_LOG` takes precedence over `config.level`. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.filter());
    tracing::subscriber::set_global_default(build(config, filter, std::io::stdout)).is_ok()
}

/// [`init_logging`] driven by the `logging` section of a client config.
pub fn init_from_config(config: &ClientConfig) -> Result<bool, ConfigLoadError> {
    let logging = LoggingConfig::try_from(&config.logging)?;
    Ok(init_logging(&logging))
}
