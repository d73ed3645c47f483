use std::time::Duration;

use futures::TryStreamExt;
use reqwest::{Client, Url};
use serde::Serialize;
use snafu::ResultExt;
use tokio::io::AsyncRead;
use vessel_core::ConnectionState;

use crate::error::{
    AlreadyConnectedSnafu, ConnectTimeoutSnafu, FailedRequestSnafu, RequestSnafu, Result,
};

/// How long a connection attempt may take before it is forced closed and
/// reported as an error.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole-world coverage, the feed is narrowed client side by the viewport.
const WORLD_BOUNDS: [[f64; 2]; 2] = [[-90.0, -180.0], [90.0, 180.0]];

pub type StreamBody = Box<dyn AsyncRead + Send + Unpin>;

#[derive(Serialize)]
struct SubscriptionArgs<'a> {
    #[serde(rename = "APIKey")]
    api_key: &'a str,
    #[serde(rename = "BoundingBoxes")]
    bounding_boxes: Vec<[[f64; 2]; 2]>,
    #[serde(rename = "FilterMessageTypes")]
    filter_message_types: Vec<&'a str>,
    #[serde(rename = "FiltersShipMMSI", skip_serializing_if = "Option::is_none")]
    mmsi_filter: Option<Vec<String>>,
}

/// Client for the live position-report feed.
pub struct AisStreamClient {
    api_key: String,
    stream_address: Url,
    client: Client,
    state: ConnectionState,
}

impl AisStreamClient {
    pub fn new(api_key: String, stream_address: Url) -> AisStreamClient {
        AisStreamClient {
            api_key,
            stream_address,
            client: Client::new(),
            state: ConnectionState::Disconnected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns the feed as a stream which will continuously receive data
    /// from the source.
    ///
    /// Guarded by the connection state: a second call while a connection is
    /// open or opening is rejected instead of opening a concurrent one.
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

    /// Moves the client back to the disconnected state after the stream
    /// ended or errored, allowing a new `connect`.
    pub fn reset(&mut self) {
        self.state = ConnectionState::Disconnected;
    }

    async fn connect_inner(&self) -> Result<StreamBody> {
        let args = SubscriptionArgs {
            api_key: &self.api_key,
            bounding_boxes: vec![WORLD_BOUNDS],
            filter_message_types: vec!["PositionReport", "ShipStaticData"],
            mmsi_filter: None,
        };

        let response = self
            .client
            .post(self.stream_address.clone())
            .json(&args)
            .send()
            .await
            .context(RequestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url: self.stream_address.to_string(),
                status,
                body: response.text().await.context(RequestSnafu)?,
            }
            .fail();
        }

        let stream = response.bytes_stream();

        let stream = stream
            .map_err(|e| std::io::Error::other(format!("{e:?}")))
            .into_async_read();

        let compat = tokio_util::compat::FuturesAsyncReadCompatExt::compat(stream);

        Ok(Box::new(compat))
    }
}
