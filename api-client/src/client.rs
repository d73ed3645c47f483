use async_trait::async_trait;
use http::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use vessel_core::{
    ApiError, BoxedResultExt, FailedRequestSnafu, MalformedResponseSnafu, Mmsi, NewTrackedVessel,
    TrackedVessel, TrackedVesselId, TransportSnafu, VesselApiPort, VesselNote, VesselRecord,
    ViewportBounds,
};

use crate::models::{TrackResponseDto, TrackedVesselDto, VesselDto, collect_vessels};

/// HTTP client for the backend vessel service.
///
/// Remote failures are returned as-is, there is no automatic retry here:
/// the engine surfaces them to the user as transient notifications.
#[derive(Debug, Clone)]
pub struct VesselApiClient {
    api_address: Url,
    bearer_token: Option<String>,
    client: Client,
}

impl VesselApiClient {
    pub fn new(api_address: Url, bearer_token: Option<String>) -> VesselApiClient {
        VesselApiClient {
            api_address,
            bearer_token,
            client: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_address.as_str().trim_end_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, ApiError> {
        let response = BoxedResultExt::boxed(self.authorized(request).send().await)
            .context(TransportSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url,
                status: status.as_u16(),
                body: BoxedResultExt::boxed(response.text().await).context(TransportSnafu)?,
            }
            .fail();
        }

        BoxedResultExt::boxed(response.json().await).context(MalformedResponseSnafu)
    }

    async fn send_unit(&self, request: RequestBuilder, url: &str) -> Result<(), ApiError> {
        let response = BoxedResultExt::boxed(self.authorized(request).send().await)
            .context(TransportSnafu)?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url,
                status: status.as_u16(),
                body: BoxedResultExt::boxed(response.text().await).context(TransportSnafu)?,
            }
            .fail();
        }

        Ok(())
    }
}

#[async_trait]
impl VesselApiPort for VesselApiClient {
    async fn tracked_vessels(&self) -> Result<Vec<TrackedVessel>, ApiError> {
        let url = self.url("vessels/my-vessels");
        let dtos: Vec<TrackedVesselDto> = self.send(self.client.get(&url), &url).await?;
        Ok(dtos.into_iter().map(TrackedVessel::from).collect())
    }

    async fn track_vessel(&self, vessel: &NewTrackedVessel) -> Result<TrackedVesselId, ApiError> {
        let url = self.url("vessels/track");
        let dto: TrackResponseDto = self
            .send(self.client.post(&url).json(vessel), &url)
            .await?;
        Ok(TrackedVesselId(dto.id))
    }

    async fn untrack_vessel(&self, mmsi: &Mmsi) -> Result<(), ApiError> {
        let url = self.url(&format!("vessels/track/mmsi/{mmsi}"));
        self.send_unit(self.client.delete(&url), &url).await
    }

    async fn untrack_vessel_by_id(&self, id: TrackedVesselId) -> Result<(), ApiError> {
        let url = self.url(&format!("vessels/track/{id}"));
        self.send_unit(self.client.delete(&url), &url).await
    }

    async fn vessels_in_bbox(&self, bounds: &ViewportBounds) -> Result<Vec<VesselRecord>, ApiError> {
        let url = self.url("vessels/bbox");
        let request = self.client.get(&url).query(&[
            ("min_lat", bounds.min_lat),
            ("min_lon", bounds.min_lon),
            ("max_lat", bounds.max_lat),
            ("max_lon", bounds.max_lon),
        ]);
        let dtos: Vec<VesselDto> = self.send(request, &url).await?;
        Ok(collect_vessels(dtos))
    }

    async fn vessel_notes(&self, mmsi: &Mmsi) -> Result<Vec<VesselNote>, ApiError> {
        let url = self.url(&format!("vessels/{mmsi}/notes"));
        self.send(self.client.get(&url), &url).await
    }
}
