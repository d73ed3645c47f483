use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use vessel_core::ViewportBounds;

/// Settling time for viewport movements before eviction runs.
pub const VIEWPORT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Minimum relative edge displacement required before a movement counts;
/// smaller pans and zooms are suppressed to avoid churn.
pub const MIN_SPAN_CHANGE: f64 = 0.2;

/// Tracks the applied viewport bounds and debounces rapid movements.
///
/// A single timer handle is kept per purpose: scheduling a new delivery
/// aborts the previous one, so two debounce timers can never fire for the
/// same movement burst.
#[derive(Debug, Default)]
pub struct ViewportTracker {
    current: Option<ViewportBounds>,
    pending: Option<JoinHandle<()>>,
}

impl ViewportTracker {
    pub fn new() -> ViewportTracker {
        ViewportTracker::default()
    }

    pub fn current(&self) -> Option<ViewportBounds> {
        self.current
    }

    /// Whether `new` moved far enough from the applied bounds to be worth a
    /// recompute. The first bounds ever seen always qualify.
    pub fn significant_change(&self, new: &ViewportBounds) -> bool {
        self.current
            .is_none_or(|current| current.change_ratio(new) >= MIN_SPAN_CHANGE)
    }

    /// Schedules `deliver` to run after the debounce window, cancelling any
    /// previously scheduled delivery.
    pub fn schedule<F>(&mut self, deliver: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(VIEWPORT_DEBOUNCE).await;
            deliver.await;
        }));
    }

    /// Marks `bounds` as the applied viewport after eviction ran.
    pub fn apply(&mut self, bounds: ViewportBounds) {
        self.current = Some(bounds);
    }
}

impl Drop for ViewportTracker {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
