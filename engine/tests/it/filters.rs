use engine::apply_filters;
use strum::IntoEnumIterator;
use vessel_core::{FilterState, Mmsi, ShipCategory, TypeFilter, VesselRecord, VesselStatus};

fn vessel_with(status: VesselStatus, category: ShipCategory) -> VesselRecord {
    let mut vessel = VesselRecord::test_default(Mmsi::test_new(1));
    vessel.is_ballast = status == VesselStatus::Ballast;
    vessel.is_anchored = status == VesselStatus::Anchored;
    vessel.is_stationary = status == VesselStatus::Stationary;
    vessel.ship_category = category;
    vessel.ship_type = None;
    vessel
}

fn fleet() -> Vec<VesselRecord> {
    let mut vessels = Vec::new();
    let mut mmsi = 0;
    for status in VesselStatus::iter() {
        for category in [
            ShipCategory::Tanker,
            ShipCategory::Container,
            ShipCategory::Cargo,
            ShipCategory::Other,
        ] {
            mmsi += 1;
            let mut vessel = vessel_with(status, category);
            vessel.mmsi = Mmsi::test_new(mmsi);
            vessels.push(vessel);
        }
    }
    vessels
}

#[test]
fn test_no_active_filters_passes_everything_through() {
    let vessels = fleet();
    let filtered = apply_filters(vessels.clone(), &FilterState::default());
    assert_eq!(vessels, filtered);
}

#[test]
fn test_selecting_every_status_behaves_like_selecting_none() {
    let vessels = fleet();

    let mut all_selected = FilterState::default();
    for status in VesselStatus::iter() {
        all_selected.statuses.insert(status);
    }

    assert_eq!(
        apply_filters(vessels.clone(), &FilterState::default()),
        apply_filters(vessels, &all_selected),
    );
}

#[test]
fn test_selecting_every_type_behaves_like_selecting_none() {
    let vessels = fleet();

    let mut all_selected = FilterState::default();
    for filter in TypeFilter::iter() {
        all_selected.types.insert(filter);
    }

    assert_eq!(
        apply_filters(vessels.clone(), &FilterState::default()),
        apply_filters(vessels, &all_selected),
    );
}

#[test]
fn test_or_semantics_within_the_status_category() {
    let mut filters = FilterState::default();
    filters.toggle_status(VesselStatus::Anchored);
    filters.toggle_status(VesselStatus::Ballast);

    let filtered = apply_filters(fleet(), &filters);

    assert_eq!(8, filtered.len());
    assert!(
        filtered
            .iter()
            .all(|v| matches!(v.status(), VesselStatus::Anchored | VesselStatus::Ballast))
    );
}

#[test]
fn test_and_semantics_between_status_and_type() {
    let mut filters = FilterState::default();
    filters.toggle_status(VesselStatus::Anchored);
    filters.toggle_type(TypeFilter::Tanker);

    let filtered = apply_filters(fleet(), &filters);

    assert_eq!(1, filtered.len());
    assert_eq!(VesselStatus::Anchored, filtered[0].status());
    assert_eq!(ShipCategory::Tanker, filtered[0].category());
}

#[test]
fn test_moving_means_no_status_flag_is_set() {
    let mut filters = FilterState::default();
    filters.toggle_status(VesselStatus::Moving);

    let filtered = apply_filters(fleet(), &filters);

    assert_eq!(4, filtered.len());
    assert!(
        filtered
            .iter()
            .all(|v| !v.is_ballast && !v.is_anchored && !v.is_stationary)
    );
}

#[test]
fn test_secondary_categories_fall_into_the_other_bucket() {
    let mut filters = FilterState::default();
    filters.toggle_type(TypeFilter::Other);

    let mut tug = VesselRecord::test_default(Mmsi::test_new(10));
    tug.ship_category = ShipCategory::Tug;
    tug.ship_type = Some("Tug".to_string());

    let filtered = apply_filters(vec![tug], &filters);
    assert_eq!(1, filtered.len());
}
