use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::CoreError;

const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    #[schema(example = 23.8103)]
    pub latitude: f64,
    #[schema(example = 90.4125)]
    pub longitude: f64,
}

impl GeoPoint {
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Great-circle distance in meters (haversine).
pub fn distance_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Office-location constraint for check-in. Fails closed: when enabled, a
/// missing or non-finite position is rejected before any record is created.
#[derive(Debug, Clone)]
pub struct LocationPolicy {
    pub office: GeoPoint,
    pub radius_m: f64,
    pub enabled: bool,
}

impl LocationPolicy {
    pub fn within_range(&self, reported: GeoPoint) -> bool {
        distance_m(reported, self.office) <= self.radius_m
    }

    pub fn check(&self, reported: Option<GeoPoint>) -> Result<(), CoreError> {
        if !self.enabled {
            return Ok(());
        }

        let position = reported.ok_or_else(|| {
            CoreError::Validation("Location is required for check-in".to_string())
        })?;

        if !position.is_finite() {
            return Err(CoreError::Validation(
                "Reported position is not a valid coordinate".to_string(),
            ));
        }

        if !self.within_range(position) {
            return Err(CoreError::Policy(
                "You are outside the allowed office range".to_string(),
            ));
        }

        Ok(())
    }
}
