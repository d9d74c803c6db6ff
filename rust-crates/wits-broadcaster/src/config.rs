use std::time::Duration;

use crate::error::{BroadcasterError, Result};

/// Replay server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (default: "0.0.0.0")
    pub bind_address: String,

    /// TCP port (default: 10001, 0 = ephemeral)
    pub port: u16,

    /// Playback speed multiplier; records per second at 1.0 is 1
    pub speed: f64,

    /// Restart from the first record after the last one
    pub loop_replay: bool,

    /// How often the feed loop checks for a client while idle
    pub idle_poll: Duration,

    /// Log a progress line every N frames (0 = never)
    pub progress_interval: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 10001,
            speed: 1.0,
            loop_replay: false,
            idle_poll: Duration::from_millis(100),
            progress_interval: 1000,
        }
    }
}

impl ServerConfig {
    /// Set listen address
    pub fn bind<S: Into<String>>(mut self, address: S) -> Self {
        self.bind_address = address.into();
        self
    }

    /// Set TCP port
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set playback speed multiplier
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Enable or disable loop replay
    pub fn loop_replay(mut self, enabled: bool) -> Self {
        self.loop_replay = enabled;
        self
    }

    /// Set idle poll interval
    pub fn idle_poll(mut self, interval: Duration) -> Self {
        self.idle_poll = interval;
        self
    }

    /// Set progress log interval in frames
    pub fn progress_every(mut self, frames: u64) -> Self {
        self.progress_interval = frames;
        self
    }

    /// Delay between consecutive frames: `1 / speed` seconds.
    pub fn frame_interval(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.speed).unwrap_or(Duration::MAX)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(BroadcasterError::InvalidConfig(format!(
                "speed must be a positive number, got {}",
                self.speed
            )));
        }

        if self.idle_poll.is_zero() {
            return Err(BroadcasterError::InvalidConfig(
                "idle poll interval must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
