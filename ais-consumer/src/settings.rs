use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_key: String,
    pub stream_address: String,
    #[serde(with = "humantime_serde")]
    pub commit_interval: Duration,
    pub channel_buffer_size: usize,
    #[serde(with = "humantime_serde", default = "default_reconnect_delay")]
    pub reconnect_delay: Duration,
}

fn default_reconnect_delay() -> Duration {
    Duration::from_secs(5)
}
