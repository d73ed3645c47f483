use snafu::{Location, Snafu};

use crate::ViewportBounds;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Converts any concrete error into a boxed one so it can be attached as an
/// opaque source.
pub trait BoxedResultExt<T> {
    fn boxed(self) -> Result<T, BoxError>;
}

impl<T, E> BoxedResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn boxed(self) -> Result<T, BoxError> {
        self.map_err(Into::into)
    }
}

/// Validation failures for values entering the domain. These are rejection
/// outcomes, nothing here is fatal.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("invalid mmsi '{value}'"))]
    InvalidMmsi {
        #[snafu(implicit)]
        location: Location,
        value: String,
    },
    #[snafu(display(
        "invalid coordinates, latitude: '{latitude}', longitude: '{longitude}'"
    ))]
    InvalidCoordinates {
        #[snafu(implicit)]
        location: Location,
        latitude: f64,
        longitude: f64,
    },
    #[snafu(display("invalid viewport bounds: {bounds:?}"))]
    InvalidBounds {
        #[snafu(implicit)]
        location: Location,
        bounds: ViewportBounds,
    },
}

/// Failures of the backend collaborator.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApiError {
    #[snafu(display("request to '{url}' failed, status: '{status}', body: '{body}'"))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: u16,
        body: String,
    },
    #[snafu(display("api transport failed"))]
    Transport {
        #[snafu(implicit)]
        location: Location,
        source: BoxError,
    },
    #[snafu(display("malformed api response"))]
    MalformedResponse {
        #[snafu(implicit)]
        location: Location,
        source: BoxError,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::FailedRequest { status, .. } => Some(*status),
            ApiError::Transport { .. } | ApiError::MalformedResponse { .. } => None,
        }
    }
}
