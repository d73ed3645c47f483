use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Coordinates, ShipCategory, VesselStatus};
use crate::error::{Error, InvalidMmsiSnafu};

/// Maritime Mobile Service Identity, the primary key for every vessel set.
///
/// Upstream sources deliver the identifier both as a JSON string and as a
/// JSON number. All of them are normalised to the same canonical digits
/// string here, at the boundary where records enter the system, so lookups
/// never have to probe multiple representations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Mmsi(String);

impl Mmsi {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Mmsi {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return InvalidMmsiSnafu { value: s }.fail();
        }
        Ok(Self(s.into()))
    }
}

impl From<u64> for Mmsi {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for Mmsi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MmsiVisitor;

        impl Visitor<'_> for MmsiVisitor {
            type Value = Mmsi;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("an mmsi as a digits string or an unsigned integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(de::Error::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Mmsi::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(Mmsi::from)
                    .map_err(|_| de::Error::custom(format!("invalid mmsi '{v}'")))
            }
        }

        deserializer.deserialize_any(MmsiVisitor)
    }
}

/// Backend-assigned identifier of a tracked vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct TrackedVesselId(pub i64);

impl Display for TrackedVesselId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A vessel as known from the live feed or a bounding-box query.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselRecord {
    pub mmsi: Mmsi,
    pub name: String,
    pub imo: Option<i64>,
    pub call_sign: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Speed over ground in knots.
    pub speed: f64,
    pub course: Option<f64>,
    pub heading: Option<i32>,
    pub destination: Option<String>,
    /// Free-text ship type as delivered by the source.
    pub ship_type: Option<String>,
    pub ship_category: ShipCategory,
    /// Draught in meters.
    pub draught: Option<f64>,
    pub is_ballast: bool,
    pub is_anchored: bool,
    pub is_stationary: bool,
    pub msgtime: DateTime<Utc>,
}

impl VesselRecord {
    pub fn position(&self) -> Coordinates {
        Coordinates {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    /// The status flags are mutually exclusive with moving, which is the
    /// absence of all three.
    pub fn status(&self) -> VesselStatus {
        if self.is_ballast {
            VesselStatus::Ballast
        } else if self.is_anchored {
            VesselStatus::Anchored
        } else if self.is_stationary {
            VesselStatus::Stationary
        } else {
            VesselStatus::Moving
        }
    }

    /// Prefers the source-assigned category when it is one of the primary
    /// ones, otherwise derives it from the free-text ship type.
    pub fn category(&self) -> ShipCategory {
        if self.ship_category.is_primary() && self.ship_category != ShipCategory::Other {
            return self.ship_category;
        }
        self.ship_type
            .as_deref()
            .map(ShipCategory::from_type_text)
            .unwrap_or_default()
    }
}

/// A vessel on the user's persisted watchlist.
///
/// Exists only while owned by the tracked collection: created by an explicit
/// track operation, destroyed by untrack, mirrored to the backend store.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedVessel {
    pub id: TrackedVesselId,
    pub added_at: DateTime<Utc>,
    pub vessel: VesselRecord,
}

impl TrackedVessel {
    /// Combines this tracked vessel with a fresh record for the same mmsi.
    ///
    /// Live data wins for telemetry, tracked data wins for identity and
    /// user-entered metadata.
    pub fn merge(&self, fresh: &VesselRecord) -> TrackedVessel {
        let mut vessel = fresh.clone();
        if !self.vessel.name.is_empty() {
            vessel.name = self.vessel.name.clone();
        }
        vessel.imo = self.vessel.imo.or(fresh.imo);
        vessel.call_sign = self.vessel.call_sign.clone().or_else(|| fresh.call_sign.clone());
        TrackedVessel {
            id: self.id,
            added_at: self.added_at,
            vessel,
        }
    }
}

/// Payload sent to the backend when tracking a vessel.
#[derive(Debug, Clone, Serialize)]
pub struct NewTrackedVessel {
    pub mmsi: Mmsi,
    pub name: String,
    pub imo: Option<i64>,
    pub callsign: Option<String>,
    pub ship_type: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&VesselRecord> for NewTrackedVessel {
    fn from(v: &VesselRecord) -> Self {
        NewTrackedVessel {
            mmsi: v.mmsi.clone(),
            name: v.name.clone(),
            imo: v.imo,
            callsign: v.call_sign.clone(),
            ship_type: v.ship_type.clone(),
            latitude: v.latitude,
            longitude: v.longitude,
        }
    }
}

/// A free-text note attached to a vessel. Append-only and owned by the
/// backend, the engine only ever reads them.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VesselNote {
    pub date: DateTime<Utc>,
    pub text: String,
}

/// Batch of validated vessel records flowing from the stream consumer.
#[derive(Debug, Clone, Default)]
pub struct DataMessage {
    pub vessels: Vec<VesselRecord>,
}

/// Events emitted by the stream ingestor towards the engine.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A connection to the live feed was (re)established.
    Connected,
    Batch(DataMessage),
}

#[cfg(feature = "test")]
mod test {
    use chrono::TimeZone;

    use super::*;

    impl Mmsi {
        pub fn test_new(mmsi: u64) -> Mmsi {
            Mmsi::from(mmsi)
        }
    }

    impl VesselRecord {
        pub fn test_default(mmsi: Mmsi) -> VesselRecord {
            VesselRecord {
                name: format!("Vessel {mmsi}"),
                mmsi,
                imo: Some(9_321_483),
                call_sign: Some("LK45".to_string()),
                latitude: 41.0,
                longitude: 28.9,
                speed: 8.4,
                course: Some(123.3),
                heading: Some(320),
                destination: Some("BERGEN".to_string()),
                ship_type: Some("Crude Oil Tanker".to_string()),
                ship_category: ShipCategory::Tanker,
                draught: Some(12.1),
                is_ballast: false,
                is_anchored: false,
                is_stationary: false,
                msgtime: Utc.timestamp_opt(1000, 0).unwrap(),
            }
        }
    }

    impl TrackedVessel {
        pub fn test_default(id: i64, mmsi: Mmsi) -> TrackedVessel {
            TrackedVessel {
                id: TrackedVesselId(id),
                added_at: Utc.timestamp_opt(900, 0).unwrap(),
                vessel: VesselRecord::test_default(mmsi),
            }
        }
    }
}
