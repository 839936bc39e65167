//! Logging setup.
//!
//! The subscriber is installed as the thread's default dispatcher and stays
//! active for as long as the returned [`Logging`] handle lives. Nothing is
//! registered process-wide.

use std::fs::{self, OpenOptions};
use std::sync::Arc;

use tracing::dispatcher::{self, DefaultGuard};
use tracing::Dispatch;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Keeps the configured subscriber active until dropped.
pub struct Logging {
    _guard: DefaultGuard,
}

impl Logging {
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let dispatch = build_dispatch(config)?;
        Ok(Logging {
            _guard: dispatcher::set_default(&dispatch),
        })
    }
}

/// Subscriber described by `config`; RUST_LOG takes precedence over `level`.
pub fn build_dispatch(config: &LoggingConfig) -> Result<Dispatch> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| Error::Logging(format!("invalid level '{}': {e}", config.level)))?;

    let (writer, ansi) = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| Error::io(path, e))?;
            (BoxMakeWriter::new(Arc::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_timer(ChronoLocal::new(config.date_format.clone()));

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);
    Ok(Dispatch::new(subscriber))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_config(dir: &TempDir, level: &str) -> LoggingConfig {
        LoggingConfig {
            file: Some(dir.path().join("logs").join("tophn.log")),
            level: level.to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }

    #[test]
    fn file_logging_appends_events() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, "info");

        {
            let _logging = Logging::init(&config).unwrap();
            tracing::info!(top_id = 42, "observed top story");
            tracing::debug!("filtered out");
        }

        let text = fs::read_to_string(config.file.as_ref().unwrap()).unwrap();
        assert!(text.contains("observed top story"));
        assert!(text.contains("top_id=42"));
        assert!(!text.contains("filtered out"));
        // no colour codes in files
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn events_after_drop_are_not_written() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let dir = TempDir::new().unwrap();
        let config = file_config(&dir, "info");

        drop(Logging::init(&config).unwrap());
        tracing::info!("after drop");

        let text = fs::read_to_string(config.file.as_ref().unwrap()).unwrap();
        assert!(!text.contains("after drop"));
    }

    #[test]
    fn bad_level_is_rejected() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        let dir = TempDir::new().unwrap();
        assert!(matches!(
            build_dispatch(&file_config(&dir, "tophn=loud")),
            Err(Error::Logging(_))
        ));
    }
}
