//! Logging initialisation via tracing-subscriber.
//!
//! Call [`init`] once at startup.

use crate::error::Error;
use tracing_subscriber::EnvFilter;

/// The filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "warn";

/// Initialise the global tracing subscriber, writing to stderr so that explanations on stdout
/// stay clean.
///
/// `RUST_LOG` takes precedence, and [`DEFAULT_FILTER`] is the fallback.
pub fn init() -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| Error::Logger(format!("invalid log filter: {e}")))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| Error::Logger(format!("failed to set subscriber: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_succeeds_or_already_init() {
        match init() {
            Ok(()) => {},
            Err(Error::Logger(msg)) if msg.contains("set subscriber") => {},
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
