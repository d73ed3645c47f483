use std::collections::HashMap;

use itertools::Itertools;
use vessel_core::{
    DisplayMode, FilterState, Mmsi, TrackedVessel, TypeFilter, VesselRecord, VesselStatus,
    ViewportBounds,
};

/// Outcome of offering a record to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub admitted: bool,
    /// Whether the record belongs to a tracked vessel.
    pub tracked: bool,
}

/// The single owner of the tracked store, the live cache and everything the
/// display set is derived from. Callers never touch the underlying maps,
/// they go through the operations below; consumers only read derived sets.
#[derive(Debug, Default)]
pub struct VesselStore {
    tracked: HashMap<Mmsi, TrackedVessel>,
    live: HashMap<Mmsi, VesselRecord>,
    display_mode: DisplayMode,
    filters: FilterState,
    bounds: Option<ViewportBounds>,
    dynamic_bounds: bool,
}

impl VesselStore {
    pub fn new() -> VesselStore {
        VesselStore {
            dynamic_bounds: true,
            ..Default::default()
        }
    }

    /// Offers a fresh record to the store.
    ///
    /// A record for a tracked vessel always enters and refreshes the tracked
    /// entry's telemetry. Otherwise, when dynamic-bounds filtering is on and
    /// bounds are known, records outside the viewport are rejected. Entries
    /// are keyed by mmsi, the later admission wins.
    pub fn admit(&mut self, record: VesselRecord) -> Admission {
        if let Some(tracked) = self.tracked.get(&record.mmsi) {
            let merged = tracked.merge(&record);
            self.tracked.insert(record.mmsi.clone(), merged);
            self.live.insert(record.mmsi.clone(), record);
            return Admission {
                admitted: true,
                tracked: true,
            };
        }

        if let (true, Some(bounds)) = (self.dynamic_bounds, &self.bounds) {
            if !bounds.contains(record.latitude, record.longitude) {
                return Admission {
                    admitted: false,
                    tracked: false,
                };
            }
        }

        self.live.insert(record.mmsi.clone(), record);
        Admission {
            admitted: true,
            tracked: false,
        }
    }

    /// Applies new viewport bounds, evicting cache entries that fell outside
    /// unless their vessel is tracked. Returns the number of evictions so
    /// the caller can decide whether a recompute is worth it.
    pub fn on_viewport_changed(&mut self, new_bounds: ViewportBounds) -> usize {
        self.bounds = Some(new_bounds);

        let tracked = &self.tracked;
        let before = self.live.len();
        self.live.retain(|mmsi, vessel| {
            tracked.contains_key(mmsi) || new_bounds.contains(vessel.latitude, vessel.longitude)
        });

        before - self.live.len()
    }

    /// The fused display set: tracked ∪ live in all-vessels mode, tracked
    /// alone otherwise. Pure with respect to the store contents, the tracked
    /// entry wins on mmsi collisions.
    pub fn display_set(&self) -> Vec<VesselRecord> {
        let tracked = self.tracked.values().map(|t| t.vessel.clone());
        match self.display_mode {
            DisplayMode::TrackedOnly => tracked.collect(),
            DisplayMode::AllVessels => tracked
                .chain(
                    self.live
                        .values()
                        .filter(|v| !self.tracked.contains_key(&v.mmsi))
                        .cloned(),
                )
                .collect(),
        }
    }

    /// Tracked vessels ordered by when they were added.
    pub fn tracked_vessels(&self) -> Vec<TrackedVessel> {
        self.tracked
            .values()
            .cloned()
            .sorted_by(|a, b| a.added_at.cmp(&b.added_at).then(a.id.cmp(&b.id)))
            .collect()
    }

    /// Replaces the tracked set, keeping the first entry per mmsi.
    pub fn set_tracked(&mut self, vessels: Vec<TrackedVessel>) {
        self.tracked.clear();
        for vessel in vessels {
            self.tracked
                .entry(vessel.vessel.mmsi.clone())
                .or_insert(vessel);
        }
    }

    pub fn insert_tracked(&mut self, vessel: TrackedVessel) {
        self.tracked.insert(vessel.vessel.mmsi.clone(), vessel);
    }

    pub fn remove_tracked(&mut self, mmsi: &Mmsi) -> Option<TrackedVessel> {
        self.tracked.remove(mmsi)
    }

    pub fn tracked_get(&self, mmsi: &Mmsi) -> Option<&TrackedVessel> {
        self.tracked.get(mmsi)
    }

    pub fn is_tracked(&self, mmsi: &Mmsi) -> bool {
        self.tracked.contains_key(mmsi)
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Returns whether the mode actually changed.
    pub fn set_display_mode(&mut self, mode: DisplayMode) -> bool {
        let changed = self.display_mode != mode;
        self.display_mode = mode;
        changed
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    pub fn toggle_status_filter(&mut self, status: VesselStatus) {
        self.filters.toggle_status(status);
    }

    pub fn toggle_type_filter(&mut self, filter: TypeFilter) {
        self.filters.toggle_type(filter);
    }

    pub fn bounds(&self) -> Option<ViewportBounds> {
        self.bounds
    }

    pub fn set_dynamic_bounds(&mut self, enabled: bool) {
        self.dynamic_bounds = enabled;
    }

    /// Resolves a vessel by identifier or name.
    ///
    /// All-digit terms are mmsi lookups, tracked store first, then the live
    /// cache. Anything else is a case-insensitive substring match on the
    /// name, first match wins.
    pub fn find_by_identifier(&self, term: &str) -> Option<VesselRecord> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        if let Ok(mmsi) = term.parse::<Mmsi>() {
            if let Some(tracked) = self.tracked.get(&mmsi) {
                return Some(tracked.vessel.clone());
            }
            return self.live.get(&mmsi).cloned();
        }

        let needle = term.to_lowercase();
        self.tracked
            .values()
            .map(|t| &t.vessel)
            .chain(self.live.values())
            .find(|v| v.name.to_lowercase().contains(&needle))
            .cloned()
    }

    /// Live-cache matches for a bounding box, deduplicated and narrowed by
    /// the current filters. Used by the local-first lookup before any
    /// network call.
    pub fn local_bbox_matches(&self, bounds: &ViewportBounds) -> Vec<VesselRecord> {
        let matches = self
            .live
            .values()
            .filter(|v| bounds.contains(v.latitude, v.longitude))
            .cloned();

        dedupe_by_mmsi(matches)
            .into_iter()
            .filter(|v| self.filters.matches(v))
            .collect()
    }
}

/// First occurrence of an mmsi wins, later duplicates are dropped silently.
pub fn dedupe_by_mmsi<I>(vessels: I) -> Vec<VesselRecord>
where
    I: IntoIterator<Item = VesselRecord>,
{
    vessels
        .into_iter()
        .unique_by(|v| v.mmsi.clone())
        .collect()
}
