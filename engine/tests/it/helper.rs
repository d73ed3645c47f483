use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use engine::Engine;
use vessel_core::{
    ApiError, FailedRequestSnafu, Mmsi, NewTrackedVessel, Notification, StreamEvent,
    TrackedVessel, TrackedVesselId, VesselApiPort, VesselDisplay, VesselNote, VesselRecord,
    ViewportBounds,
};

#[derive(Default)]
pub struct TestApi {
    pub tracked: Mutex<Vec<TrackedVessel>>,
    pub bbox_results: Mutex<Vec<VesselRecord>>,
    pub bbox_calls: AtomicUsize,
    pub fail_tracked_fetch: bool,
    pub fail_untrack_by_mmsi: bool,
    pub fail_bbox: bool,
    pub next_id: AtomicI64,
}

#[async_trait]
impl VesselApiPort for TestApi {
    async fn tracked_vessels(&self) -> Result<Vec<TrackedVessel>, ApiError> {
        if self.fail_tracked_fetch {
            return FailedRequestSnafu {
                url: "http://test/vessels/my-vessels",
                status: 500u16,
                body: "boom",
            }
            .fail();
        }
        Ok(self.tracked.lock().unwrap().clone())
    }

    async fn track_vessel(&self, _vessel: &NewTrackedVessel) -> Result<TrackedVesselId, ApiError> {
        Ok(TrackedVesselId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1))
    }

    async fn untrack_vessel(&self, _mmsi: &Mmsi) -> Result<(), ApiError> {
        if self.fail_untrack_by_mmsi {
            return FailedRequestSnafu {
                url: "http://test/vessels/track/mmsi",
                status: 404u16,
                body: "not found",
            }
            .fail();
        }
        Ok(())
    }

    async fn untrack_vessel_by_id(&self, _id: TrackedVesselId) -> Result<(), ApiError> {
        Ok(())
    }

    async fn vessels_in_bbox(
        &self,
        _bounds: &ViewportBounds,
    ) -> Result<Vec<VesselRecord>, ApiError> {
        self.bbox_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_bbox {
            return FailedRequestSnafu {
                url: "http://test/vessels/bbox",
                status: 502u16,
                body: "bad gateway",
            }
            .fail();
        }
        Ok(self.bbox_results.lock().unwrap().clone())
    }

    async fn vessel_notes(&self, _mmsi: &Mmsi) -> Result<Vec<VesselNote>, ApiError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub struct TestDisplay {
    pub map_renders: Mutex<Vec<Vec<VesselRecord>>>,
    pub list_renders: Mutex<Vec<Vec<TrackedVessel>>>,
    pub notifications: Mutex<Vec<Notification>>,
}

#[async_trait]
impl VesselDisplay for TestDisplay {
    async fn render_map(&self, vessels: &[VesselRecord]) {
        self.map_renders.lock().unwrap().push(vessels.to_vec());
    }

    async fn render_list(&self, tracked: &[TrackedVessel]) {
        self.list_renders.lock().unwrap().push(tracked.to_vec());
    }

    async fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

pub struct TestHelper {
    pub engine: Engine,
    pub sender: async_channel::Sender<StreamEvent>,
    pub api: Arc<TestApi>,
    pub display: Arc<TestDisplay>,
}

pub fn test_engine() -> TestHelper {
    test_engine_with(TestApi::default())
}

pub fn test_engine_with(api: TestApi) -> TestHelper {
    let api = Arc::new(api);
    let display = Arc::new(TestDisplay::default());
    let (sender, receiver) = async_channel::bounded(100);

    let engine = Engine::new(receiver, api.clone(), display.clone());

    TestHelper {
        engine,
        sender,
        api,
        display,
    }
}

pub fn vessel(mmsi: u64, latitude: f64, longitude: f64) -> VesselRecord {
    let mut vessel = VesselRecord::test_default(Mmsi::test_new(mmsi));
    vessel.latitude = latitude;
    vessel.longitude = longitude;
    vessel
}
