//! Great-circle helpers.
//!
//! Providers that take a bounding box instead of a centre and radius build it
//! with [`GeoCursor::bounding_box`]; providers that return coordinates without
//! a distance compute it with [`GeoCursor::distance_km`].

use serde::Serialize;

use crate::GeoError;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Point reached by travelling `distance_km` from `origin` along the initial
/// great-circle bearing `bearing_deg` (clockwise from north).
///
/// The resulting longitude is normalised to `[-180, 180)`.
#[must_use]
pub fn destination_point(origin: Coordinate, bearing_deg: f64, distance_km: f64) -> Coordinate {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lng.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * sin_phi2;
    let lambda2 = lambda1 + y.atan2(x);

    Coordinate {
        lat: phi2.to_degrees(),
        lng: (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0,
    }
}

/// Haversine distance between two points in kilometres.
#[must_use]
pub fn great_circle_distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Axis-aligned box that contains the circle of `radius_km` around a centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top_left: Coordinate,
    pub bottom_right: Coordinate,
}

/// Stateful variant of [`destination_point`]: set the origin once with
/// [`GeoCursor::from_origin`], then project any number of points from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoCursor {
    origin: Option<Coordinate>,
}

impl GeoCursor {
    #[must_use]
    pub fn from_origin(origin: Coordinate) -> Self {
        Self {
            origin: Some(origin),
        }
    }

    /// # Errors
    ///
    /// Returns [`GeoError::OriginNotSet`] if the cursor was built without an
    /// origin.
    pub fn to(&self, bearing_deg: f64, distance_km: f64) -> Result<Coordinate, GeoError> {
        let origin = self.origin.ok_or(GeoError::OriginNotSet)?;
        Ok(destination_point(origin, bearing_deg, distance_km))
    }

    /// # Errors
    ///
    /// Returns [`GeoError::OriginNotSet`] if the cursor was built without an
    /// origin.
    pub fn distance_km(&self, to: Coordinate) -> Result<f64, GeoError> {
        let origin = self.origin.ok_or(GeoError::OriginNotSet)?;
        Ok(great_circle_distance_km(origin, to))
    }

    /// Box containing the circle of `radius_km` around the origin. Corners
    /// sit at bearings 315° and 135°, `sqrt(2) * radius_km` away, so each
    /// side is `2 * radius_km` long.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::OriginNotSet`] if the cursor was built without an
    /// origin.
    pub fn bounding_box(&self, radius_km: f64) -> Result<BoundingBox, GeoError> {
        let diagonal = std::f64::consts::SQRT_2 * radius_km;
        Ok(BoundingBox {
            top_left: self.to(315.0, diagonal)?,
            bottom_right: self.to(135.0, diagonal)?,
        })
    }
}
