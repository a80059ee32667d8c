//! Structured logging with tracing

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// The configured level is the default filter; `RUST_LOG` overrides it.
pub fn init_tracing(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // try_init reports Box<dyn Error + Send + Sync>; the return type must
    // carry the same bounds or the `?` conversion does not exist.
    #[test]
    fn init_errors_are_send_and_sync() {
        fn assert_bounds<T: Send + Sync>(_: &T) {}

        let config = LoggingConfig {
            level: "certwatch=debug".to_string(),
        };
        match init_tracing(&config) {
            Ok(()) => {}
            Err(e) => assert_bounds(&e),
        }
    }
}
