use std::time::Duration;

use tokio::time::Instant;

/// Number of initial admissions after a (re)connect that refresh the map
/// immediately, so a fresh view fills quickly.
pub const MAP_WARMUP_REFRESHES: u32 = 20;

/// After warmup, refresh the map on every nth admission.
pub const MAP_REFRESH_STRIDE: u32 = 10;

/// Minimum spacing between sidebar list refreshes. User actions bypass it.
pub const LIST_REFRESH_WINDOW: Duration = Duration::from_secs(2);

/// Decouples the per-message ingestion rate from the rate at which the map
/// and the sidebar list are redrawn.
#[derive(Debug, Default)]
pub struct UpdateScheduler {
    admissions: u32,
    last_list_refresh: Option<Instant>,
}

impl UpdateScheduler {
    pub fn new() -> UpdateScheduler {
        UpdateScheduler::default()
    }

    /// Called on every cache admission; returns whether the map should be
    /// redrawn now. Updates for tracked vessels always refresh so the user's
    /// own ships feel live.
    pub fn on_admission(&mut self, tracked: bool) -> bool {
        self.admissions = self.admissions.saturating_add(1);

        if tracked {
            return true;
        }
        if self.admissions <= MAP_WARMUP_REFRESHES {
            return true;
        }
        self.admissions % MAP_REFRESH_STRIDE == 0
    }

    /// Restarts the warmup phase after a (re)connect.
    pub fn reset(&mut self) {
        self.admissions = 0;
    }

    /// At most one list refresh per window unless forced by a user action
    /// (add/remove vessel, filter toggle, search).
    pub fn should_refresh_list(&mut self, force: bool) -> bool {
        let now = Instant::now();
        let due = force
            || self
                .last_list_refresh
                .is_none_or(|last| now.duration_since(last) >= LIST_REFRESH_WINDOW);

        if due {
            self.last_list_refresh = Some(now);
        }
        due
    }
}
