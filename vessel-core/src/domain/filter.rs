use std::collections::HashSet;

use strum::{Display, EnumCount, EnumIter, EnumString};

use super::{ShipCategory, VesselRecord, VesselStatus};

/// The four category buckets offered by the type filter. Secondary display
/// categories all collapse into Other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount)]
#[strum(serialize_all = "snake_case")]
pub enum TypeFilter {
    Tanker,
    Container,
    Cargo,
    Other,
}

impl From<ShipCategory> for TypeFilter {
    fn from(category: ShipCategory) -> Self {
        match category {
            ShipCategory::Tanker => TypeFilter::Tanker,
            ShipCategory::Container => TypeFilter::Container,
            ShipCategory::Cargo => TypeFilter::Cargo,
            _ => TypeFilter::Other,
        }
    }
}

/// Active status and type filters for map rendering.
///
/// An empty set places no constraint on its category. Selecting every member
/// of a category is treated identically to selecting none, so users who
/// tick all boxes still see everything. This full-selection rule is a
/// deliberate contract, not an accident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub statuses: HashSet<VesselStatus>,
    pub types: HashSet<TypeFilter>,
}

impl FilterState {
    pub fn status_unconstrained(&self) -> bool {
        self.statuses.is_empty() || self.statuses.len() == VesselStatus::COUNT
    }

    pub fn type_unconstrained(&self) -> bool {
        self.types.is_empty() || self.types.len() == TypeFilter::COUNT
    }

    pub fn is_unconstrained(&self) -> bool {
        self.status_unconstrained() && self.type_unconstrained()
    }

    /// OR within a category, AND between the two categories.
    pub fn matches(&self, vessel: &VesselRecord) -> bool {
        (self.status_unconstrained() || self.statuses.contains(&vessel.status()))
            && (self.type_unconstrained() || self.types.contains(&TypeFilter::from(vessel.category())))
    }

    pub fn toggle_status(&mut self, status: VesselStatus) {
        if !self.statuses.remove(&status) {
            self.statuses.insert(status);
        }
    }

    pub fn toggle_type(&mut self, filter: TypeFilter) {
        if !self.types.remove(&filter) {
            self.types.insert(filter);
        }
    }
}

/// Governs which sets the fusion layer combines into the display set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    AllVessels,
    TrackedOnly,
}

impl DisplayMode {
    pub fn includes_live(self) -> bool {
        matches!(self, DisplayMode::AllVessels)
    }
}
