//! Command line arguments and the optional TOML config file

use clap::Parser;
use serde::Deserialize;
use shared::DEFAULT_SERVER_URL;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// WebSocket URL of the game server
    #[arg(short = 's', long)]
    pub server: Option<String>,

    /// TOML file with default settings, command line flags take precedence
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Simulate network latency in milliseconds
    #[arg(short = 'l', long)]
    pub fake_ping: Option<u64>,

    /// Window scale relative to the 600x400 playfield
    #[arg(long)]
    pub scale: Option<f32>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("scale must be a positive number, got {0}")]
    InvalidScale(f32),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub server: String,
    pub fake_ping_ms: u64,
    pub scale: f32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER_URL.to_string(),
            fake_ping_ms: 0,
            scale: 1.0,
        }
    }
}

impl ClientConfig {
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then the config file if one was given, then explicit flags
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(server) = &args.server {
            config.server = server.clone();
        }
        if let Some(fake_ping) = args.fake_ping {
            config.fake_ping_ms = fake_ping;
        }
        if let Some(scale) = args.scale {
            config.scale = scale;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tokio_test::assert_ok;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "pong-client-{}-{}.toml",
            name,
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = assert_ok!(ClientConfig::resolve(&Args::default()));
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.server, DEFAULT_SERVER_URL);
        assert_eq!(config.fake_ping_ms, 0);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = assert_ok!(ClientConfig::from_toml("fake_ping_ms = 80"));
        assert_eq!(config.fake_ping_ms, 80);
        assert_eq!(config.server, DEFAULT_SERVER_URL);
        assert_eq!(config.scale, 1.0);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ClientConfig::from_toml("colour = \"red\"").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let path = temp_config(
            "override",
            "server = \"ws://file.example:9000\"\nfake_ping_ms = 40\nscale = 2.0\n",
        );

        let args = Args::parse_from([
            "client",
            "--config",
            path.to_str().unwrap(),
            "--server",
            "ws://flag.example:8001",
        ]);
        let config = assert_ok!(ClientConfig::resolve(&args));

        assert_eq!(config.server, "ws://flag.example:8001");
        assert_eq!(config.fake_ping_ms, 40);
        assert_eq!(config.scale, 2.0);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file() {
        let args = Args {
            config: Some(PathBuf::from("/nonexistent/pong-client.toml")),
            ..Args::default()
        };
        assert!(matches!(
            ClientConfig::resolve(&args),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let path = temp_config("malformed", "scale = \"big\"");
        let args = Args {
            config: Some(path.clone()),
            ..Args::default()
        };

        assert!(matches!(
            ClientConfig::resolve(&args),
            Err(ConfigError::Parse { .. })
        ));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_invalid_scale() {
        let args = Args::parse_from(["client", "--scale", "0"]);
        assert!(matches!(
            ClientConfig::resolve(&args),
            Err(ConfigError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_short_flags() {
        let args = Args::parse_from(["client", "-s", "ws://10.0.0.2:8001", "-l", "120"]);
        assert_eq!(args.server.as_deref(), Some("ws://10.0.0.2:8001"));
        assert_eq!(args.fake_ping, Some(120));
    }
}
