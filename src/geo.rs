//! Bounding-box geometry, named reference places, and circular reference zones.
//!
//! All distance math uses an equirectangular approximation (111 km per degree
//! of latitude, scaled by `cos(lat)` for longitude). That is only accurate at
//! the scale of a single province or region.

use serde::{Deserialize, Serialize};

/// Kilometres per degree of latitude.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Slack absorbing f64 rounding in decimal-degree differences (~0.1 mm).
const COORD_EPSILON: f64 = 1e-9;

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Whether `other` lies strictly within `tolerance` degrees on both axes.
    ///
    /// A gap that equals `tolerance` in decimal degrees is never within,
    /// even when its f64 difference rounds to slightly less.
    pub fn within(&self, other: &GeoPoint, tolerance: f64) -> bool {
        let limit = tolerance - COORD_EPSILON;
        (self.lat - other.lat).abs() < limit && (self.lng - other.lng).abs() < limit
    }

    /// Approximate ground distance to `other` in kilometres.
    pub fn approx_distance_km(&self, other: &GeoPoint) -> f64 {
        let mean_lat = (self.lat + other.lat) / 2.0;
        let dy = (other.lat - self.lat) * KM_PER_DEGREE;
        let dx = (other.lng - self.lng) * km_per_degree_lng(mean_lat);
        dx.hypot(dy)
    }
}

fn km_per_degree_lng(lat: f64) -> f64 {
    KM_PER_DEGREE * lat.to_radians().cos()
}

/// Axis-aligned bounding box with `sw <= ne` on both axes.
///
/// The ordering is established by [`GeoBox::from_corners`]; there is no other
/// constructor, so every `GeoBox` in the program is normalized.
///
/// # Examples
///
/// ```
/// use windlytics::geo::{GeoBox, GeoPoint};
///
/// let b = GeoBox::from_corners(GeoPoint::new(47.1, -59.6), GeoPoint::new(43.3, -66.4));
/// assert_eq!(b.sw(), GeoPoint::new(43.3, -66.4));
/// assert_eq!(b.ne(), GeoPoint::new(47.1, -59.6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBox {
    sw: GeoPoint,
    ne: GeoPoint,
}

/// Approximate extent of a [`GeoBox`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AreaEstimate {
    /// East-west span (km).
    pub width_km: f64,
    /// North-south span (km).
    pub height_km: f64,
    /// `width_km * height_km`.
    pub area_km2: f64,
}

impl GeoBox {
    /// Builds the box spanned by two arbitrary corner points.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            sw: GeoPoint::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            ne: GeoPoint::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn sw(&self) -> GeoPoint {
        self.sw
    }

    pub fn ne(&self) -> GeoPoint {
        self.ne
    }

    /// Arithmetic midpoint of the two corners.
    pub fn centroid(&self) -> GeoPoint {
        GeoPoint::new(
            (self.sw.lat + self.ne.lat) / 2.0,
            (self.sw.lng + self.ne.lng) / 2.0,
        )
    }

    /// Width, height, and area in kilometres, using the box's mean latitude
    /// to scale longitude.
    pub fn approx_area_km2(&self) -> AreaEstimate {
        let mean_lat = (self.sw.lat + self.ne.lat) / 2.0;
        let height_km = (self.ne.lat - self.sw.lat) * KM_PER_DEGREE;
        let width_km = (self.ne.lng - self.sw.lng) * km_per_degree_lng(mean_lat);
        AreaEstimate {
            width_km,
            height_km,
            area_km2: width_km * height_km,
        }
    }

    /// Inclusive containment on both axes.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.sw.lat..=self.ne.lat).contains(&point.lat)
            && (self.sw.lng..=self.ne.lng).contains(&point.lng)
    }
}

impl<'de> Deserialize<'de> for GeoBox {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Corners {
            sw: GeoPoint,
            ne: GeoPoint,
        }

        let corners = Corners::deserialize(deserializer)?;
        Ok(GeoBox::from_corners(corners.sw, corners.ne))
    }
}

/// A named entry from the static reference list of towns and localities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPlace {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl NamedPlace {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Places whose coordinates fall inside `area`, in list order.
pub fn places_within<'a>(area: &GeoBox, places: &'a [NamedPlace]) -> Vec<&'a NamedPlace> {
    places
        .iter()
        .filter(|place| area.contains(&place.point()))
        .collect()
}

/// A named circular area such as a fishing bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceZone {
    pub name: String,
    pub center: GeoPoint,
    /// Radius in metres.
    pub radius_m: f64,
}

impl ReferenceZone {
    pub fn new(name: &str, center: GeoPoint, radius_m: f64) -> Self {
        Self {
            name: name.to_string(),
            center,
            radius_m,
        }
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.center.approx_distance_km(point) * 1000.0 <= self.radius_m
    }
}

/// Fishing banks off the Nova Scotia coast.
pub fn nova_scotia_banks() -> Vec<ReferenceZone> {
    vec![
        ReferenceZone::new("Sable Island Bank", GeoPoint::new(43.8, -61.0), 40_000.0),
        ReferenceZone::new("French Bank", GeoPoint::new(44.5, -60.5), 35_000.0),
        ReferenceZone::new("French Bank (west)", GeoPoint::new(44.5, -61.5), 35_000.0),
        ReferenceZone::new("Emerald Bank", GeoPoint::new(43.5, -62.2), 55_000.0),
        ReferenceZone::new(
            "Sydney Bight",
            GeoPoint::new(46.652568625714245, -59.5086061894759),
            35_000.0,
        ),
    ]
}

/// Zones that contain `point`.
pub fn zones_containing<'a>(
    point: &GeoPoint,
    zones: &'a [ReferenceZone],
) -> Vec<&'a ReferenceZone> {
    zones.iter().filter(|zone| zone.contains(point)).collect()
}
