//! Observability setup for applications embedding the client.

mod logging;

pub use logging::{init_from_config, init_logging, subscriber, BoxedSubscriber, LoggingConfig};
