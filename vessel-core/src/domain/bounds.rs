use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidBoundsSnafu};

/// The lat/lon rectangle currently visible to the user.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ViewportBounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl ViewportBounds {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Result<Self, Error> {
        let bounds = ViewportBounds {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let valid = self.min_lat.is_finite()
            && self.min_lon.is_finite()
            && self.max_lat.is_finite()
            && self.max_lon.is_finite()
            && (-90.0..=90.0).contains(&self.min_lat)
            && (-90.0..=90.0).contains(&self.max_lat)
            && (-180.0..=180.0).contains(&self.min_lon)
            && (-180.0..=180.0).contains(&self.max_lon)
            && self.min_lat <= self.max_lat
            && self.min_lon <= self.max_lon;

        if valid {
            Ok(())
        } else {
            InvalidBoundsSnafu { bounds: *self }.fail()
        }
    }

    /// Whether the point lies within the rectangle.
    ///
    /// Inclusive on all four edges. Admission and eviction both go through
    /// this single predicate so cache entries cannot flicker in and out at
    /// the boundary.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// The largest displacement of any edge towards `new`, relative to the
    /// current span on that axis. Captures both pans and zooms.
    pub fn change_ratio(&self, new: &ViewportBounds) -> f64 {
        let lat_span = self.lat_span().max(f64::EPSILON);
        let lon_span = self.lon_span().max(f64::EPSILON);

        let deltas = [
            (new.min_lat - self.min_lat).abs() / lat_span,
            (new.max_lat - self.max_lat).abs() / lat_span,
            (new.min_lon - self.min_lon).abs() / lon_span,
            (new.max_lon - self.max_lon).abs() / lon_span,
        ];

        deltas.into_iter().fold(0.0, f64::max)
    }
}
