use std::str::FromStr;
use std::sync::Arc;

use async_channel::{Receiver, Sender};
use chrono::Utc;
use reqwest::Url;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{error, instrument, warn};
use vessel_core::{
    DataMessage, DisplayMode, Mmsi, NewTrackedVessel, Notification, StreamEvent, TrackedVessel,
    TypeFilter, VesselApiPort, VesselDisplay, VesselNote, VesselRecord, VesselStatus,
    ViewportBounds,
};

use crate::{
    display::LogDisplay,
    filter::apply_filters,
    scheduler::UpdateScheduler,
    settings::Settings,
    store::{VesselStore, dedupe_by_mmsi},
    viewport::ViewportTracker,
};

/// Internal events queued back into the engine loop. A debounce timer's
/// delivery re-enters here as a fresh event instead of running re-entrantly.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Debounced viewport movement ready to apply.
    ViewportSettled(ViewportBounds),
}

/// The fusion engine's event-processing context.
///
/// Owns the [`VesselStore`] exclusively; every mutation flows through the
/// methods below, one event at a time, and each runs to completion
/// (including the recompute it triggers) before the next is processed.
pub struct Engine {
    store: VesselStore,
    scheduler: UpdateScheduler,
    viewport: ViewportTracker,
    api: Arc<dyn VesselApiPort>,
    display: Arc<dyn VesselDisplay>,
    mode_tx: watch::Sender<DisplayMode>,
    stream_rx: Receiver<StreamEvent>,
    events_tx: Sender<EngineEvent>,
    events_rx: Receiver<EngineEvent>,
}

impl Engine {
    pub fn new(
        stream_rx: Receiver<StreamEvent>,
        api: Arc<dyn VesselApiPort>,
        display: Arc<dyn VesselDisplay>,
    ) -> Engine {
        let (mode_tx, _) = watch::channel(DisplayMode::default());
        let (events_tx, events_rx) = async_channel::unbounded();

        Engine {
            store: VesselStore::new(),
            scheduler: UpdateScheduler::new(),
            viewport: ViewportTracker::new(),
            api,
            display,
            mode_tx,
            stream_rx,
            events_tx,
            events_rx,
        }
    }

    /// Receiver for the current display mode, consulted by the stream
    /// ingestor's reconnect loop.
    pub fn display_mode_rx(&self) -> watch::Receiver<DisplayMode> {
        self.mode_tx.subscribe()
    }

    pub fn store(&self) -> &VesselStore {
        &self.store
    }

    pub fn set_dynamic_bounds(&mut self, enabled: bool) {
        self.store.set_dynamic_bounds(enabled);
    }

    pub async fn run(mut self) {
        self.sync_tracked().await;

        loop {
            tokio::select! {
                message = self.stream_rx.recv() => match message {
                    Ok(StreamEvent::Connected) => self.scheduler.reset(),
                    Ok(StreamEvent::Batch(batch)) => self.on_data_message(batch).await,
                    Err(_) => {
                        error!("stream pipeline closed, stopping engine");
                        return;
                    }
                },
                event = self.events_rx.recv() => match event {
                    Ok(EngineEvent::ViewportSettled(bounds)) => {
                        self.on_viewport_settled(bounds).await
                    }
                    // Cannot happen, the engine holds its own sender.
                    Err(_) => return,
                },
            }
        }
    }

    /// Loads the tracked set from the backend at startup.
    pub async fn sync_tracked(&mut self) {
        match self.api.tracked_vessels().await {
            Ok(vessels) => {
                self.store.set_tracked(vessels);
                self.refresh_map().await;
                self.refresh_list(true).await;
            }
            Err(e) => {
                error!("failed to fetch tracked vessels: {e:?}");
                self.display
                    .notify(Notification::error("failed to load tracked vessels"))
                    .await;
            }
        }
    }

    #[instrument(skip_all, fields(app.num_vessels = message.vessels.len()))]
    pub async fn on_data_message(&mut self, message: DataMessage) {
        let mut refresh_map = false;
        let mut tracked_updated = false;

        for vessel in message.vessels {
            let admission = self.store.admit(vessel);
            if !admission.admitted {
                continue;
            }
            tracked_updated |= admission.tracked;
            refresh_map |= self.scheduler.on_admission(admission.tracked);
        }

        if refresh_map {
            self.refresh_map().await;
        }
        if tracked_updated {
            self.refresh_list(false).await;
        }
    }

    /// Restarts the map-refresh warmup, as after a stream (re)connect.
    pub fn on_reconnected(&mut self) {
        self.scheduler.reset();
    }

    /// Applies a raw viewport movement: validated, suppressed when the
    /// change is insignificant, then debounced. The settled bounds come back
    /// through the event queue.
    pub async fn viewport_moved(&mut self, bounds: ViewportBounds) {
        if let Err(e) = bounds.validate() {
            warn!("rejecting viewport update: {e}");
            self.display
                .notify(Notification::warning("invalid map bounds"))
                .await;
            return;
        }

        if !self.viewport.significant_change(&bounds) {
            return;
        }

        let events_tx = self.events_tx.clone();
        self.viewport.schedule(async move {
            let _ = events_tx.send(EngineEvent::ViewportSettled(bounds)).await;
        });
    }

    /// Evicts out-of-view cache entries for the settled bounds. Only
    /// recomputes when something was actually evicted and the current mode
    /// includes the live cache.
    pub async fn on_viewport_settled(&mut self, bounds: ViewportBounds) {
        self.viewport.apply(bounds);

        let evicted = self.store.on_viewport_changed(bounds);
        if evicted > 0 && self.store.display_mode().includes_live() {
            self.refresh_map().await;
        }
    }

    pub async fn set_display_mode(&mut self, mode: DisplayMode) {
        if !self.store.set_display_mode(mode) {
            return;
        }
        let _ = self.mode_tx.send(mode);
        self.refresh_map().await;
        self.refresh_list(true).await;
    }

    pub async fn toggle_status_filter(&mut self, status: VesselStatus) {
        self.store.toggle_status_filter(status);
        self.refresh_map().await;
        self.refresh_list(true).await;
    }

    pub async fn toggle_type_filter(&mut self, filter: TypeFilter) {
        self.store.toggle_type_filter(filter);
        self.refresh_map().await;
        self.refresh_list(true).await;
    }

    /// Adds the vessel to the tracked collection, mirroring it to the
    /// backend first.
    pub async fn track(&mut self, vessel: VesselRecord) {
        if self.store.is_tracked(&vessel.mmsi) {
            self.display
                .notify(Notification::info("already tracking this vessel"))
                .await;
            return;
        }

        match self.api.track_vessel(&NewTrackedVessel::from(&vessel)).await {
            Ok(id) => {
                self.store.insert_tracked(TrackedVessel {
                    id,
                    added_at: Utc::now(),
                    vessel,
                });
                self.refresh_map().await;
                self.refresh_list(true).await;
            }
            Err(e) => {
                error!("failed to track vessel {}: {e:?}", vessel.mmsi);
                self.display
                    .notify(Notification::error("failed to track vessel"))
                    .await;
            }
        }
    }

    /// Removes a vessel from the tracked collection, by mmsi with a
    /// fallback to the persisted id.
    pub async fn untrack(&mut self, mmsi: &Mmsi) {
        let Some(tracked) = self.store.tracked_get(mmsi).cloned() else {
            self.display
                .notify(Notification::info("vessel is not tracked"))
                .await;
            return;
        };

        if let Err(e) = self.api.untrack_vessel(mmsi).await {
            warn!("untrack by mmsi failed, retrying by id {}: {e:?}", tracked.id);
            if let Err(e) = self.api.untrack_vessel_by_id(tracked.id).await {
                error!("failed to untrack vessel {mmsi}: {e:?}");
                self.display
                    .notify(Notification::error("failed to untrack vessel"))
                    .await;
                return;
            }
        }

        self.store.remove_tracked(mmsi);
        self.refresh_map().await;
        self.refresh_list(true).await;
    }

    /// Resolves a vessel by identifier or name across the tracked store and
    /// the live cache.
    pub async fn search(&mut self, term: &str) -> Option<VesselRecord> {
        let result = self.store.find_by_identifier(term);
        self.refresh_list(true).await;
        result
    }

    /// Local-first bounding-box lookup: live-cache matches win, the backend
    /// is only queried when the cache has none. Remote results are admitted
    /// into the cache, a stale response simply merges last-write-wins.
    pub async fn find_in_bounding_box(&mut self, bounds: ViewportBounds) -> Vec<VesselRecord> {
        if let Err(e) = bounds.validate() {
            warn!("rejecting bounding-box lookup: {e}");
            self.display
                .notify(Notification::warning("invalid search bounds"))
                .await;
            return Vec::new();
        }

        let local = self.store.local_bbox_matches(&bounds);
        if !local.is_empty() {
            return local;
        }

        match self.api.vessels_in_bbox(&bounds).await {
            Ok(remote) => {
                let vessels = dedupe_by_mmsi(remote);
                let mut refresh_map = false;
                for vessel in &vessels {
                    let admission = self.store.admit(vessel.clone());
                    if admission.admitted {
                        refresh_map |= self.scheduler.on_admission(admission.tracked);
                    }
                }
                if refresh_map {
                    self.refresh_map().await;
                }
                vessels
            }
            Err(e) => {
                error!("bounding-box query failed: {e:?}");
                self.display
                    .notify(Notification::error("vessel area lookup failed"))
                    .await;
                Vec::new()
            }
        }
    }

    /// Read-through for the vessel's notes, owned by the backend.
    pub async fn vessel_notes(&self, mmsi: &Mmsi) -> Vec<VesselNote> {
        match self.api.vessel_notes(mmsi).await {
            Ok(notes) => notes,
            Err(e) => {
                error!("failed to fetch notes for {mmsi}: {e:?}");
                self.display
                    .notify(Notification::error("failed to load vessel notes"))
                    .await;
                Vec::new()
            }
        }
    }

    async fn refresh_map(&mut self) {
        let filtered = apply_filters(self.store.display_set(), self.store.filters());
        self.display.render_map(&filtered).await;
    }

    async fn refresh_list(&mut self, force: bool) {
        if self.scheduler.should_refresh_list(force) {
            self.display.render_list(&self.store.tracked_vessels()).await;
        }
    }
}

/// The composed binary: live-feed ingestor plus the engine loop.
pub struct App {
    engine: Engine,
    consumer: ais_consumer::startup::App,
}

impl App {
    pub async fn build(settings: Settings) -> App {
        let display: Arc<dyn VesselDisplay> = Arc::new(LogDisplay);
        let api: Arc<dyn VesselApiPort> = Arc::new(api_client::VesselApiClient::new(
            Url::from_str(&settings.api_address).unwrap(),
            settings.bearer_token.clone(),
        ));

        let (sender, receiver) =
            async_channel::bounded::<StreamEvent>(settings.stream.channel_buffer_size);

        let mut engine = Engine::new(receiver, api, display.clone());
        engine.set_dynamic_bounds(settings.dynamic_bounds);

        let consumer = ais_consumer::startup::App::build(
            &settings.stream,
            sender,
            engine.display_mode_rx(),
            display,
        );

        App { engine, consumer }
    }

    pub async fn run(self) {
        let App { engine, consumer } = self;

        let mut set = JoinSet::new();
        set.spawn(consumer.run());
        set.spawn(engine.run());

        let out = set.join_next().await;
        error!("engine or live feed loop exited unexpectedly: {out:?}");
    }
}
