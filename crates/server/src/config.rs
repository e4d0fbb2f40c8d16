//! Server configuration and shared application state.

use std::path::PathBuf;
use std::sync::Arc;

use crate::presence::PresenceRegistry;
use crate::socket::SocketHub;

/// Configuration for the relay server, read from the environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen port
    pub port: u16,
    /// Allowed origin for the socket handshake and CORS
    pub frontend_origin: String,
    /// Parent directory of the two upload categories
    pub uploads_dir: PathBuf,
    /// Remove registry entries when a transport closes without a signout
    pub disconnect_cleanup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            frontend_origin: "http://localhost:3000".to_string(),
            uploads_dir: PathBuf::from("uploads"),
            disconnect_cleanup: true,
        }
    }
}

impl ServerConfig {
    /// Read configuration from `PORT`, `FRONTEND_ORIGIN`, `UPLOADS_DIR` and
    /// `DISCONNECT_CLEANUP`, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            frontend_origin: std::env::var("FRONTEND_ORIGIN").unwrap_or(defaults.frontend_origin),
            uploads_dir: std::env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            disconnect_cleanup: std::env::var("DISCONNECT_CLEANUP")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "off"))
                .unwrap_or(defaults.disconnect_cleanup),
        }
    }

    pub fn recordings_dir(&self) -> PathBuf {
        self.uploads_dir.join("recordings")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.uploads_dir.join("images")
    }

    /// Ensure the upload directories exist
    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(self.recordings_dir()).await?;
        tokio::fs::create_dir_all(self.images_dir()).await?;
        Ok(())
    }
}

/// App state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub registry: Arc<PresenceRegistry>,
    pub hub: Arc<SocketHub>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            registry: Arc::new(PresenceRegistry::new()),
            hub: Arc::new(SocketHub::new()),
            http: reqwest::Client::new(),
        }
    }
}
