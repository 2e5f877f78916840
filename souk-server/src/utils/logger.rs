//! Logging setup
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies
//! across the whole crate. With a log directory present, output also
//! goes to a daily-rolling `souk-server` file in that directory.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Console-only logger at the `RUST_LOG` level (default `info`)
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Logger with an optional daily-rolling file in `log_dir`
///
/// A missing directory is not an error; logging falls back to the
/// console so a bare deployment still gets output.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_dir {
        Some(dir) if Path::new(dir).exists() => {
            let appender = tracing_appender::rolling::daily(dir, "souk-server");
            builder.with_writer(appender).init();
        }
        _ => builder.init(),
    }
}
