use std::time::Duration;

/// How a stream client behaves when its connection drops.
///
/// The live telemetry feed is a soft background service and retries forever;
/// the subscription channel is a primary channel and gives up after a fixed
/// number of attempts. Both share the same control flow, only the
/// configuration differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    pub max_attempts: Option<u32>,
}

impl ReconnectPolicy {
    pub const fn unbounded(delay: Duration) -> ReconnectPolicy {
        ReconnectPolicy {
            delay,
            max_attempts: None,
        }
    }

    pub const fn bounded(delay: Duration, max_attempts: u32) -> ReconnectPolicy {
        ReconnectPolicy {
            delay,
            max_attempts: Some(max_attempts),
        }
    }

    /// Delay before the given 1-based attempt, or `None` once the policy is
    /// exhausted.
    pub fn backoff(&self, attempt: u32) -> Option<Duration> {
        match self.max_attempts {
            Some(max) if attempt > max => None,
            _ => Some(self.delay),
        }
    }
}

/// Lifecycle of a stream connection.
///
/// `Disconnected → Connecting → Connected → (Closing | Error) →
/// Disconnected`, with the reconnect timer driving the loop back into
/// `Connecting`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Closing,
    Error,
}

impl ConnectionState {
    /// Guard shared by every stream client: a new connection may only be
    /// opened from the fully disconnected state.
    pub fn can_connect(self) -> bool {
        matches!(self, ConnectionState::Disconnected)
    }
}
