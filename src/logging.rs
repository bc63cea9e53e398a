use crate::error::{GalaxyError, Result};
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber
///
/// With a log file everything `RUST_LOG` allows (default `info`) goes there.
/// Without one only warnings reach stderr, which the alternate screen hides
/// until exit.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .with_writer(std::io::stderr)
            .try_init(),
    };
    result.map_err(|e| GalaxyError::Logging(e.to_string()))
}
