//! Logging Infrastructure
//!
//! `tracing-subscriber` fmt output, optionally redirected to a daily rolling
//! file under `log_dir`.

use std::path::Path;

/// Initialize the logger on stdout at `info`
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional file output
///
/// Falls back to stdout when `log_dir` does not exist. Calling it a second
/// time in one process is a no-op.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir()
            && let Some(dir_str) = log_path.to_str()
        {
            let file_appender = tracing_appender::rolling::daily(dir_str, "floor-engine");
            let _ = subscriber.with_writer(file_appender).try_init();
            return;
        }
    }

    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        init_logger_with_file(Some("debug"), dir.path().to_str());
        init_logger_with_file(Some("not-a-level"), Some("/nonexistent/floor-engine-logs"));
        init_logger();
        tracing::info!("logger initialized");
    }
}
