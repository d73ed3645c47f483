use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

/// Backend-assigned or derived vessel category.
///
/// Tanker, Container, Cargo and Other are the primary categories used by the
/// type filter; the remaining ones only affect how a vessel is displayed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
pub enum ShipCategory {
    Tanker,
    Container,
    Cargo,
    Passenger,
    Fishing,
    Tug,
    Pilot,
    #[default]
    Other,
}

impl<'de> Deserialize<'de> for ShipCategory {
    /// Unknown category names collapse into `Other` instead of failing the
    /// whole record.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(value.parse().unwrap_or_default())
    }
}

impl ShipCategory {
    pub fn is_primary(self) -> bool {
        matches!(
            self,
            ShipCategory::Tanker | ShipCategory::Container | ShipCategory::Cargo | ShipCategory::Other
        )
    }

    /// Maps an AIS ship type code to a category.
    pub fn from_type_code(code: i32) -> ShipCategory {
        match code {
            80..=89 => ShipCategory::Tanker,
            70..=79 => ShipCategory::Cargo,
            60..=69 => ShipCategory::Passenger,
            30..=39 => ShipCategory::Fishing,
            40..=49 => ShipCategory::Tug,
            50..=59 => ShipCategory::Pilot,
            _ => ShipCategory::Other,
        }
    }

    /// Categorizes a free-text ship type by keyword.
    pub fn from_type_text(text: &str) -> ShipCategory {
        let text = text.to_lowercase();
        if text.contains("tanker")
            || text.contains("oil")
            || text.contains("lng")
            || text.contains("lpg")
        {
            ShipCategory::Tanker
        } else if text.contains("container") {
            ShipCategory::Container
        } else if text.contains("cargo") || text.contains("bulk") || text.contains("general") {
            ShipCategory::Cargo
        } else if text.contains("passenger") {
            ShipCategory::Passenger
        } else {
            ShipCategory::Other
        }
    }
}

/// Operational status of a vessel, derived from its status flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount)]
#[strum(serialize_all = "snake_case")]
pub enum VesselStatus {
    Moving,
    Ballast,
    Anchored,
    Stationary,
}
