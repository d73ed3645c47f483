use std::time::Duration;

use reqwest::StatusCode;
use snafu::{Location, Snafu};
use vessel_core::ConnectionState;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("stream closed unexpectedly"))]
    StreamClosed {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("internal channel closed unexpectedly"))]
    ChannelClosed {
        #[snafu(implicit)]
        location: Location,
    },
    #[snafu(display("failed to parse stream message"))]
    Parse {
        #[snafu(implicit)]
        location: Location,
        source: serde_json::Error,
    },
    #[snafu(display("failed to send request"))]
    Request {
        #[snafu(implicit)]
        location: Location,
        source: reqwest::Error,
    },
    #[snafu(display("request to '{url}' failed, status: '{status}', body: '{body}'"))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: StatusCode,
        body: String,
    },
    #[snafu(display("connection attempt did not complete within {timeout:?}"))]
    ConnectTimeout {
        #[snafu(implicit)]
        location: Location,
        timeout: Duration,
    },
    #[snafu(display("connection already open or opening, state: '{state}'"))]
    AlreadyConnected {
        #[snafu(implicit)]
        location: Location,
        state: ConnectionState,
    },
    #[snafu(display("gave up reconnecting after {attempts} attempts"))]
    ReconnectExhausted {
        #[snafu(implicit)]
        location: Location,
        attempts: u32,
    },
}
