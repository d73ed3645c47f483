use chrono::{DateTime, Utc};
use serde::Deserialize;
use vessel_core::{Mmsi, ShipCategory, VesselRecord};

/// The recognized envelope type for vessel updates.
pub const VESSEL_UPDATE: &str = "vessel_update";

/// Container operators whose vessels are categorized by name when the ship
/// type is missing or inconclusive.
const CONTAINER_LINES: [&str; 10] = [
    "MSC",
    "MAERSK",
    "CMA CGM",
    "COSCO",
    "EVERGREEN",
    "HAPAG",
    "ONE ",
    "YANG MING",
    "YM ",
    "HMM ",
];

/// Destination keywords that indicate a ballast leg.
const BALLAST_DESTINATIONS: [&str; 4] = ["FOR ORDERS", "WAITING", "AWAITING", "BALLAST"];

/// Draught in meters at or below which a vessel is assumed to be in ballast.
const BALLAST_DRAUGHT_BOUNDARY: f64 = 4.0;

/// Speed in knots below which a vessel counts as stationary.
const STATIONARY_SPEED_BOUNDARY: f64 = 0.5;

/// Convenience struct to deserialize the message type prior to attempting to
/// deserialize the full message.
#[derive(Deserialize)]
pub struct MessageType {
    /// What type of message this is.
    #[serde(rename = "type")]
    pub message_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VesselUpdateMessage {
    pub data: VesselUpdate,
}

/// A single vessel update as received from the feed.
///
/// The identifier, ship type and navigational status arrive loosely typed
/// (string or number) and are normalised during conversion.
#[derive(Debug, Clone, Deserialize)]
pub struct VesselUpdate {
    pub mmsi: Mmsi,
    pub name: Option<String>,
    pub imo: Option<i64>,
    pub callsign: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed: Option<f64>,
    pub course: Option<f64>,
    pub heading: Option<i32>,
    pub destination: Option<String>,
    pub status: Option<NavigationalStatus>,
    pub ship_type: Option<ShipType>,
    pub ship_category: Option<ShipCategory>,
    pub draught: Option<f64>,
    pub is_ballast: Option<bool>,
    pub is_anchored: Option<bool>,
    pub is_stationary: Option<bool>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Navigational status, either an AIS status code or free text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NavigationalStatus {
    Code(i32),
    Text(String),
}

impl NavigationalStatus {
    /// Status code 1 is "at anchor".
    fn is_anchored(&self) -> bool {
        match self {
            NavigationalStatus::Code(code) => *code == 1,
            NavigationalStatus::Text(text) => text.to_uppercase().contains("ANCHOR"),
        }
    }
}

/// Ship type, either an AIS type code or free text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShipType {
    Code(i32),
    Text(String),
}

impl From<VesselUpdate> for Option<VesselRecord> {
    fn from(u: VesselUpdate) -> Self {
        let (latitude, longitude) = match (u.latitude, u.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => (lat, lon),
            _ => return None,
        };

        let VesselUpdate {
            mmsi,
            name,
            imo,
            callsign,
            latitude: _,
            longitude: _,
            speed,
            course,
            heading,
            destination,
            status,
            ship_type,
            ship_category,
            draught,
            is_ballast,
            is_anchored,
            is_stationary,
            timestamp,
        } = u;

        let name = name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Vessel {mmsi}"));

        let destination = destination
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case("n/a"));

        let (ship_type, derived) = normalize_ship_type(ship_type, &name);
        let ship_category = match ship_category {
            Some(c) if c != ShipCategory::Other => c,
            _ => derived,
        };

        let speed = speed.unwrap_or(0.0);
        let is_ballast =
            is_ballast.unwrap_or_else(|| infer_ballast(destination.as_deref(), draught));
        let is_anchored = is_anchored
            .unwrap_or_else(|| status.as_ref().is_some_and(NavigationalStatus::is_anchored));
        let is_stationary = is_stationary.unwrap_or(speed < STATIONARY_SPEED_BOUNDARY);

        Some(VesselRecord {
            mmsi,
            name,
            imo,
            call_sign: callsign
                .map(|c| c.trim().to_owned())
                .filter(|c| !c.is_empty()),
            latitude,
            longitude,
            speed,
            course,
            heading,
            destination,
            ship_type,
            ship_category,
            draught,
            is_ballast,
            is_anchored,
            is_stationary,
            msgtime: timestamp.unwrap_or_else(Utc::now),
        })
    }
}

fn normalize_ship_type(ship_type: Option<ShipType>, name: &str) -> (Option<String>, ShipCategory) {
    let (text, mut category) = match ship_type {
        Some(ShipType::Code(code)) => {
            let category = ShipCategory::from_type_code(code);
            let text = match category {
                ShipCategory::Other => format!("Type {code}"),
                _ => format!("{category} ({code})"),
            };
            (Some(text), category)
        }
        Some(ShipType::Text(text)) => {
            let text = text.trim().to_owned();
            if text.is_empty() || text.eq_ignore_ascii_case("unknown") {
                (None, ShipCategory::Other)
            } else {
                let category = ShipCategory::from_type_text(&text);
                (Some(text), category)
            }
        }
        None => (None, ShipCategory::Other),
    };

    if is_container_line(name) {
        category = ShipCategory::Container;
    }

    (text, category)
}

fn is_container_line(name: &str) -> bool {
    let name = name.to_uppercase();
    CONTAINER_LINES.iter().any(|line| name.contains(line))
}

fn infer_ballast(destination: Option<&str>, draught: Option<f64>) -> bool {
    if let Some(destination) = destination {
        let destination = destination.to_uppercase();
        if BALLAST_DESTINATIONS.iter().any(|k| destination.contains(k)) {
            return true;
        }
    }
    draught.is_some_and(|d| d <= BALLAST_DRAUGHT_BOUNDARY)
}
