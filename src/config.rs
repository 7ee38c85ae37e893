//! Daemon configuration.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::info;
use url::Url;

use scenecast_relay::RelayConfig;

/// Root configuration, loaded from a TOML file with full defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub service: ServiceConfig,
    pub relay: RelayConfig,
    pub storage: StorageConfig,
}

/// Local UI surface binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8090,
        }
    }
}

/// Remote generation service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: Url,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:8000").expect("default service url"),
        }
    }
}

/// Where persisted state lives.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the state directory; defaults to ~/.scenecast/state.
    pub state_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn resolved_state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| scenecast_dir().join("state"))
    }
}

/// The ~/.scenecast directory.
pub fn scenecast_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".scenecast"))
        .unwrap_or_else(|| PathBuf::from(".scenecast"))
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!("no config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(Path::new("/nonexistent/scenecast.toml")).unwrap();
        assert_eq!(config.server.port, 8090);
        assert_eq!(config.service.base_url.as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[service]
base_url = "https://video.example.org"

[relay]
poll_interval = 1.5
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.service.base_url.host_str(), Some("video.example.org"));
        assert_eq!(
            config.relay.poll_interval,
            std::time::Duration::from_millis(1500)
        );
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "server = 12").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_state_dir_override() {
        let storage = StorageConfig {
            state_dir: Some(PathBuf::from("/tmp/elsewhere")),
        };
        assert_eq!(storage.resolved_state_dir(), PathBuf::from("/tmp/elsewhere"));
    }
}
