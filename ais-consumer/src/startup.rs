use std::str::FromStr;
use std::sync::Arc;

use async_channel::Sender;
use reqwest::Url;
use tokio::io::AsyncRead;
use tokio::sync::watch;
use tracing::{error, instrument, warn};
use vessel_core::{DisplayMode, Notification, ReconnectPolicy, StreamEvent, VesselDisplay};

use crate::{
    consumer::Consumer,
    error::{ChannelClosedSnafu, Error, Result},
    settings::Settings,
    stream::AisStreamClient,
};

pub struct App {
    consumer: Consumer,
    client: AisStreamClient,
    sender: Sender<StreamEvent>,
    mode_rx: watch::Receiver<DisplayMode>,
    policy: ReconnectPolicy,
    display: Arc<dyn VesselDisplay>,
}

impl App {
    pub fn build(
        settings: &Settings,
        sender: Sender<StreamEvent>,
        mode_rx: watch::Receiver<DisplayMode>,
        display: Arc<dyn VesselDisplay>,
    ) -> App {
        App {
            consumer: Consumer::new(settings.commit_interval),
            client: AisStreamClient::new(
                settings.api_key.clone(),
                Url::from_str(&settings.stream_address).unwrap(),
            ),
            sender,
            mode_rx,
            policy: ReconnectPolicy::unbounded(settings.reconnect_delay),
            display,
        }
    }

    /// Keeps the live feed running for as long as the subscriber wants all
    /// vessels. Reconnects are unbounded, live data is a soft background
    /// service and it is better to keep trying than to silently stop
    /// updating.
    pub async fn run(mut self) {
        loop {
            // Park while the consumer is not looking at the live feed; no
            // reconnects happen outside all-vessels mode.
            while *self.mode_rx.borrow_and_update() != DisplayMode::AllVessels {
                if self.mode_rx.changed().await.is_err() {
                    return;
                }
            }

            match self.run_once().await {
                Err(Error::ChannelClosed { .. }) => {
                    error!("engine channel closed, stopping live feed");
                    return;
                }
                Err(e) => {
                    error!("live feed failed: {e:?}");
                    if *self.mode_rx.borrow() == DisplayMode::AllVessels {
                        self.display
                            .notify(Notification::warning(
                                "live vessel feed interrupted, reconnecting",
                            ))
                            .await;
                    }
                }
                Ok(()) => warn!("live feed ended"),
            }

            self.client.reset();
            tokio::time::sleep(self.policy.delay).await;
        }
    }

    #[instrument(skip_all)]
    async fn run_once(&mut self) -> Result<()> {
        let stream = self.client.connect().await?;
        if self.sender.send(StreamEvent::Connected).await.is_err() {
            return ChannelClosedSnafu.fail();
        }
        self.consumer.run(stream, self.sender.clone()).await
    }

    /// Test seam: drives the consumer from an in-memory source.
    pub async fn run_test(self, source: impl AsyncRead + Unpin) -> Result<()> {
        self.consumer.run(source, self.sender).await
    }
}
