use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use vessel_core::{Mmsi, ShipCategory, TrackedVessel, TrackedVesselId, VesselRecord};

/// A tracked vessel as returned by the backend. Live telemetry is not
/// persisted there, positions arrive later from the stream.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackedVesselDto {
    pub id: i64,
    pub mmsi: Mmsi,
    pub name: Option<String>,
    pub imo: Option<i64>,
    pub callsign: Option<String>,
    pub ship_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub added_at: Option<DateTime<Utc>>,
}

impl From<TrackedVesselDto> for TrackedVessel {
    fn from(dto: TrackedVesselDto) -> Self {
        let TrackedVesselDto {
            id,
            mmsi,
            name,
            imo,
            callsign,
            ship_type,
            latitude,
            longitude,
            added_at,
        } = dto;

        let added_at = added_at.unwrap_or_else(Utc::now);
        let ship_category = ship_type
            .as_deref()
            .map(ShipCategory::from_type_text)
            .unwrap_or_default();

        TrackedVessel {
            id: TrackedVesselId(id),
            added_at,
            vessel: VesselRecord {
                name: name.unwrap_or_else(|| format!("Vessel {mmsi}")),
                mmsi,
                imo,
                call_sign: callsign,
                latitude: latitude.unwrap_or(0.0),
                longitude: longitude.unwrap_or(0.0),
                speed: 0.0,
                course: None,
                heading: None,
                destination: None,
                ship_type,
                ship_category,
                draught: None,
                is_ballast: false,
                is_anchored: false,
                is_stationary: false,
                msgtime: added_at,
            },
        }
    }
}

/// A vessel within a bounding-box response.
#[derive(Debug, Clone, Deserialize)]
pub struct VesselDto {
    pub mmsi: Option<Mmsi>,
    pub name: Option<String>,
    pub callsign: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub speed: Option<f64>,
    pub course: Option<f64>,
    pub heading: Option<i32>,
    pub ship_type: Option<String>,
    pub ship_category: Option<ShipCategory>,
    pub draught: Option<f64>,
    pub destination: Option<String>,
    pub is_ballast: Option<bool>,
    pub is_anchored: Option<bool>,
    pub is_stationary: Option<bool>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<VesselDto> for Option<VesselRecord> {
    fn from(dto: VesselDto) -> Self {
        let mmsi = dto.mmsi?;
        let (latitude, longitude) = match (dto.latitude, dto.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => (lat, lon),
            _ => return None,
        };

        let speed = dto.speed.unwrap_or(0.0);
        let ship_category = dto.ship_category.unwrap_or_else(|| {
            dto.ship_type
                .as_deref()
                .map(ShipCategory::from_type_text)
                .unwrap_or_default()
        });

        Some(VesselRecord {
            name: dto
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| format!("Vessel {mmsi}")),
            mmsi,
            imo: None,
            call_sign: dto.callsign.filter(|c| !c.trim().is_empty()),
            latitude,
            longitude,
            speed,
            course: dto.course,
            heading: dto.heading,
            destination: dto
                .destination
                .filter(|d| !d.trim().is_empty() && !d.eq_ignore_ascii_case("n/a")),
            ship_type: dto.ship_type,
            ship_category,
            draught: dto.draught,
            is_ballast: dto.is_ballast.unwrap_or(false),
            is_anchored: dto.is_anchored.unwrap_or(false),
            is_stationary: dto.is_stationary.unwrap_or(speed < 0.5),
            msgtime: dto.timestamp.unwrap_or_else(Utc::now),
        })
    }
}

/// Converts raw bounding-box entries, skipping the ones without a usable
/// identity or position.
pub fn collect_vessels(dtos: Vec<VesselDto>) -> Vec<VesselRecord> {
    dtos.into_iter()
        .filter_map(|dto| {
            let record: Option<VesselRecord> = dto.into();
            if record.is_none() {
                warn!("skipping bounding-box entry without usable mmsi or position");
            }
            record
        })
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackResponseDto {
    pub id: i64,
}
