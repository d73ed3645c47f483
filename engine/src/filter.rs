use vessel_core::{FilterState, VesselRecord};

/// Narrows the display set for map rendering. The tracked-vessel list is
/// rendered unfiltered and never passes through here.
///
/// OR semantics within a category, AND between the status and type
/// categories. An empty category, or one with every member selected, places
/// no constraint; with no constraints at all the input passes through
/// untouched.
pub fn apply_filters(vessels: Vec<VesselRecord>, filters: &FilterState) -> Vec<VesselRecord> {
    if filters.is_unconstrained() {
        return vessels;
    }

    vessels
        .into_iter()
        .filter(|vessel| filters.matches(vessel))
        .collect()
}
