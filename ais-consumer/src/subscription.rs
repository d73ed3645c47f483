use std::time::Duration;

use async_channel::Sender;
use futures::TryStreamExt;
use reqwest::{Client, Url};
use snafu::ResultExt;
use tracing::warn;
use vessel_core::{ConnectionState, ReconnectPolicy, StreamEvent};

use crate::{
    consumer::Consumer,
    error::{
        AlreadyConnectedSnafu, ChannelClosedSnafu, ConnectTimeoutSnafu, Error, FailedRequestSnafu,
        ReconnectExhaustedSnafu, RequestSnafu, Result,
    },
    stream::{CONNECT_TIMEOUT, StreamBody},
};

/// The subscription channel is a primary channel: a fixed number of
/// reconnect attempts, then a terminal failure.
pub const SUBSCRIPTION_RECONNECT: ReconnectPolicy =
    ReconnectPolicy::bounded(Duration::from_secs(3), 5);

/// Client for the simpler subscription channel.
///
/// Shares the connect guard with [`crate::stream::AisStreamClient`] but uses
/// a bounded reconnect policy, it serves a different reliability contract
/// than the best-effort live feed.
pub struct SubscriptionClient {
    subscription_address: Url,
    client: Client,
    state: ConnectionState,
    policy: ReconnectPolicy,
}

impl SubscriptionClient {
    pub fn new(subscription_address: Url) -> SubscriptionClient {
        Self::with_policy(subscription_address, SUBSCRIPTION_RECONNECT)
    }

    pub fn with_policy(subscription_address: Url, policy: ReconnectPolicy) -> SubscriptionClient {
        SubscriptionClient {
            subscription_address,
            client: Client::new(),
            state: ConnectionState::Disconnected,
            policy,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Opens the channel. Rejected while a connection is open or opening.
    pub async fn connect(&mut self) -> Result<StreamBody> {
        if !self.state.can_connect() {
            return AlreadyConnectedSnafu { state: self.state }.fail();
        }

        self.state = ConnectionState::Connecting;

        match tokio::time::timeout(CONNECT_TIMEOUT, self.connect_inner()).await {
            Ok(Ok(stream)) => {
                self.state = ConnectionState::Connected;
                Ok(stream)
            }
            Ok(Err(e)) => {
                self.state = ConnectionState::Error;
                Err(e)
            }
            Err(_) => {
                self.state = ConnectionState::Error;
                ConnectTimeoutSnafu {
                    timeout: CONNECT_TIMEOUT,
                }
                .fail()
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = ConnectionState::Disconnected;
    }

    /// Runs the channel, reconnecting per policy. Returns a terminal error
    /// once the policy is exhausted.
    pub async fn run(&mut self, consumer: &Consumer, sender: Sender<StreamEvent>) -> Result<()> {
        let mut reconnects = 0;
        loop {
            match self.connect().await {
                Ok(stream) => {
                    reconnects = 0;
                    if sender.send(StreamEvent::Connected).await.is_err() {
                        return ChannelClosedSnafu.fail();
                    }
                    match consumer.run(stream, sender.clone()).await {
                        Err(e @ Error::ChannelClosed { .. }) => return Err(e),
                        Err(e) => warn!("subscription channel interrupted: {e:?}"),
                        Ok(()) => return Ok(()),
                    }
                }
                Err(e) => warn!("failed to open subscription channel: {e:?}"),
            }
            self.reset();

            reconnects += 1;
            match self.policy.backoff(reconnects) {
                Some(delay) => tokio::time::sleep(delay).await,
                None => {
                    return ReconnectExhaustedSnafu {
                        attempts: reconnects - 1,
                    }
                    .fail();
                }
            }
        }
    }

    async fn connect_inner(&self) -> Result<StreamBody> {
        let response = self
            .client
            .get(self.subscription_address.clone())
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url: self.subscription_address.to_string(),
                status,
                body: response.text().await.context(RequestSnafu)?,
            }
            .fail();
        }

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::other(format!("{e:?}")))
            .into_async_read();

        let compat = tokio_util::compat::FuturesAsyncReadCompatExt::compat(stream);

        Ok(Box::new(compat))
    }
}
