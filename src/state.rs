//! Application state shared across request handlers
//!
//! One [`AppState`] describes one independent service instance: a template
//! directory, a storage root, and a notifier. Nothing in it is mutable, so
//! handlers share it behind a plain `Arc`.

use crate::config::Config;
use crate::error::AppError;
use crate::notifier::{LogNotifier, Notifier, WebhookNotifier};
use crate::services::StorageService;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;

/// Shared state handed to every handler
pub struct AppState {
    /// Directory holding the index template and its assets
    pub template_dir: PathBuf,
    /// Storage service rooted at the configured upload directory
    pub storage: StorageService,
    /// Out-of-band status sink
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Create state with explicit collaborators
    pub fn new(template_dir: PathBuf, storage_dir: PathBuf, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            template_dir,
            storage: StorageService::new(storage_dir),
            notifier,
        }
    }

    /// Build state from configuration, selecting the notifier backend
    pub fn from_config(config: &Config) -> Self {
        let notifier: Arc<dyn Notifier> = match &config.notify.webhook_url {
            Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
            None => Arc::new(LogNotifier),
        };
        Self::new(
            PathBuf::from(&config.paths.template_dir),
            PathBuf::from(&config.paths.storage_dir),
            notifier,
        )
    }

    /// Log a request failure, push it to the notifier, and hand it back
    /// for conversion into the response envelope.
    pub async fn report(&self, err: AppError) -> AppError {
        error!("{}", err);
        self.notifier.notify(&err.to_string()).await;
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_defaults_to_log_notifier() {
        let config = Config {
            server: crate::config::ServerConfig {
                port: 8800,
                host: "127.0.0.1".to_string(),
            },
            paths: crate::config::PathsConfig {
                template_dir: "./templates".to_string(),
                storage_dir: "./uploads".to_string(),
            },
            notify: crate::config::NotifyConfig { webhook_url: None },
        };

        let state = AppState::from_config(&config);
        assert_eq!(state.template_dir, PathBuf::from("./templates"));
        assert_eq!(state.storage.root(), PathBuf::from("./uploads").as_path());

        // report() must hand the error back unchanged
        let err = state
            .report(AppError::AlreadyExists("a.txt".to_string()))
            .await;
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }
}
