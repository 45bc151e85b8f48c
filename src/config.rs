//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Filesystem locations used by the service
    pub paths: PathsConfig,
    /// Notification configuration
    pub notify: NotifyConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Filesystem locations
#[derive(Debug, Clone)]
pub struct PathsConfig {
    /// Directory holding `index.html` and the `assets/` subdirectory
    pub template_dir: String,
    /// Directory receiving uploaded files
    pub storage_dir: String,
}

/// Notification configuration
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Chat webhook receiving status lines; log-only when unset
    pub webhook_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8800),
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            paths: PathsConfig {
                template_dir: env::var("TEMPLATE_DIR")
                    .unwrap_or_else(|_| "./templates".to_string()),
                storage_dir: env::var("STORAGE_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            },
            notify: NotifyConfig {
                webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok().filter(|u| !u.is_empty()),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
