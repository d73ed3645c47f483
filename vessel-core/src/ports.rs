use async_trait::async_trait;

use crate::{
    ApiError, Mmsi, NewTrackedVessel, TrackedVessel, TrackedVesselId, VesselNote, VesselRecord,
    ViewportBounds,
};

/// Operations the engine consumes from the backend collaborator. Transport
/// details are owned by the implementation.
#[async_trait]
pub trait VesselApiPort: Send + Sync {
    /// The tracked vessels of the current session.
    async fn tracked_vessels(&self) -> Result<Vec<TrackedVessel>, ApiError>;
    /// Adds a vessel to the tracked collection and returns the assigned id.
    async fn track_vessel(&self, vessel: &NewTrackedVessel) -> Result<TrackedVesselId, ApiError>;
    async fn untrack_vessel(&self, mmsi: &Mmsi) -> Result<(), ApiError>;
    /// Fallback removal for when the mmsi-based one fails.
    async fn untrack_vessel_by_id(&self, id: TrackedVesselId) -> Result<(), ApiError>;
    async fn vessels_in_bbox(&self, bounds: &ViewportBounds) -> Result<Vec<VesselRecord>, ApiError>;
    async fn vessel_notes(&self, mmsi: &Mmsi) -> Result<Vec<VesselNote>, ApiError>;
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Notification {
        Notification {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Notification {
        Notification {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Notification {
        Notification {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Rendering capabilities injected into the engine at construction.
/// Consumers only ever receive derived display sets through this seam, they
/// never touch the underlying stores.
#[async_trait]
pub trait VesselDisplay: Send + Sync {
    /// Redraw the map layer with the filtered display set.
    async fn render_map(&self, vessels: &[VesselRecord]);
    /// Redraw the tracked-vessel list. Filtered independently of the map.
    async fn render_list(&self, tracked: &[TrackedVessel]);
    async fn notify(&self, notification: Notification);
}
