//! Configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use wits_broadcaster::ServerConfig;

use crate::cli::Cli;

/// Replay server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Path to configuration file
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Address to listen on (default: "0.0.0.0")
    pub bind_address: String,

    /// TCP port (default: 10001)
    pub port: u16,

    /// Playback speed multiplier (default: 1.0, one record per second)
    pub speed: f64,

    /// Restart from the first record after the last one
    pub loop_replay: bool,

    /// Directory scanned for well CSV files (None = platform data dir)
    pub data_dir: Option<PathBuf>,

    /// Log a progress line every N frames (0 = never)
    pub progress_interval: u64,

    /// Idle client poll interval in milliseconds
    pub idle_poll_ms: u64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            bind_address: "0.0.0.0".to_string(),
            port: 10001,
            speed: 1.0,
            loop_replay: false,
            data_dir: None,
            progress_interval: 1000,
            idle_poll_ms: 100,
        }
    }
}

impl ReplayConfig {
    /// Load configuration from the platform config path, or create default
    pub fn load() -> Result<Self> {
        let config_path =
            wits_paths::get_config_path().context("Failed to resolve config path")?;
        Self::load_from(config_path)
    }

    /// Load configuration from `path`, writing defaults there if it is missing
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config_path = path.as_ref().to_path_buf();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

            let mut config: ReplayConfig = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

            config.config_path = config_path;
            Ok(config)
        } else {
            let config = Self {
                config_path,
                ..Self::default()
            };
            config.save().context("Failed to save default config")?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&self.config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Command-line flags win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(bind) = &cli.bind {
            self.bind_address = bind.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(speed) = cli.speed {
            self.speed = speed;
        }
        if cli.loop_replay {
            self.loop_replay = true;
        } else if cli.no_loop {
            self.loop_replay = false;
        }
        if let Some(dir) = &cli.data_dir {
            self.data_dir = Some(dir.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            bail!("speed must be a positive number, got {}", self.speed);
        }
        if self.idle_poll_ms == 0 {
            bail!("idle_poll_ms must be greater than zero");
        }
        if self.bind_address.trim().is_empty() {
            bail!("bind_address must not be empty");
        }
        Ok(())
    }

    /// Directory scanned for well CSV files.
    pub fn wells_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => wits_paths::get_wells_dir().context("Failed to resolve wells directory"),
        }
    }

    /// Seconds between frames at the configured speed
    pub fn seconds_per_record(&self) -> f64 {
        1.0 / self.speed
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::default()
            .bind(self.bind_address.clone())
            .port(self.port)
            .speed(self.speed)
            .loop_replay(self.loop_replay)
            .idle_poll(Duration::from_millis(self.idle_poll_ms))
            .progress_every(self.progress_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults_are_valid() {
        let config = ReplayConfig::default();
        assert_eq!(config.port, 10001);
        assert_eq!(config.speed, 1.0);
        assert!(!config.loop_replay);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = ReplayConfig::default();
        let cli = Cli {
            port: Some(9100),
            speed: Some(20.0),
            loop_replay: true,
            bind: Some("127.0.0.1".to_string()),
            data_dir: Some(PathBuf::from("/srv/wells")),
            ..Default::default()
        };

        config.apply_cli(&cli);
        assert_eq!(config.port, 9100);
        assert_eq!(config.speed, 20.0);
        assert!(config.loop_replay);
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.wells_dir().unwrap(), PathBuf::from("/srv/wells"));
    }

    #[test]
    fn test_absent_flags_keep_file_values() {
        let mut config = ReplayConfig {
            port: 12000,
            loop_replay: true,
            ..Default::default()
        };
        config.apply_cli(&Cli::default());
        assert_eq!(config.port, 12000);
        assert!(config.loop_replay);
    }

    #[test]
    fn test_no_loop_overrides_file() {
        let mut config = ReplayConfig {
            loop_replay: true,
            ..Default::default()
        };
        let cli = Cli::try_parse_from(["wits-replay", "--no-loop"]).unwrap();
        config.apply_cli(&cli);
        assert!(!config.loop_replay);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for speed in [0.0, -1.0, f64::NAN] {
            let config = ReplayConfig {
                speed,
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        let config = ReplayConfig {
            idle_poll_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_server_config_mapping() {
        let config = ReplayConfig {
            speed: 4.0,
            idle_poll_ms: 250,
            progress_interval: 50,
            ..Default::default()
        };
        let server = config.server_config();
        assert_eq!(server.port, 10001);
        assert_eq!(server.idle_poll, Duration::from_millis(250));
        assert_eq!(server.progress_interval, 50);
        assert_eq!(server.frame_interval(), Duration::from_millis(250));
        assert_eq!(config.seconds_per_record(), 0.25);
    }
}
