use async_trait::async_trait;
use tracing::{debug, error, info, warn};
use vessel_core::{Notification, NotificationLevel, TrackedVessel, VesselDisplay, VesselRecord};

/// Renderer used by the binary: logs what a real map and list renderer
/// would draw. Actual rendering is owned by the embedding UI.
#[derive(Debug, Default)]
pub struct LogDisplay;

#[async_trait]
impl VesselDisplay for LogDisplay {
    async fn render_map(&self, vessels: &[VesselRecord]) {
        debug!("map refresh, {} vessels", vessels.len());
    }

    async fn render_list(&self, tracked: &[TrackedVessel]) {
        debug!("list refresh, {} tracked vessels", tracked.len());
    }

    async fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => info!("{}", notification.message),
            NotificationLevel::Warning => warn!("{}", notification.message),
            NotificationLevel::Error => error!("{}", notification.message),
        }
    }
}
