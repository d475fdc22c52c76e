use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Coordinates are stored in 1e-7 degree units, the precision OSM itself keeps.
const KEY_SCALE: f64 = 1e7;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> LatLng {
        LatLng {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Haversine distance in kilometres between two `[lat, lon]` slices.
    pub fn distance(loc1: &[f64], loc2: &[f64]) -> f64 {
        assert!(loc1.len() == 2);
        assert!(loc2.len() == 2);
        let delta_latitude = (loc2[0] - loc1[0]).to_radians();
        let delta_longitude = (loc2[1] - loc1[1]).to_radians();

        let central_angle_inner = (delta_latitude / 2.0).sin().powi(2)
            + loc1[0].to_radians().cos()
                * loc2[0].to_radians().cos()
                * (delta_longitude / 2.0).sin().powi(2);
        let central_angle =
            2.0 * central_angle_inner.sqrt().atan2((1.0 - central_angle_inner).sqrt());

        EARTH_RADIUS_KM * central_angle
    }

    pub fn dist(&self, other: Self) -> f64 {
        LatLng::distance(&self.as_array(), &other.as_array())
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }

    /// Point on the unit sphere. Chord length between two such vectors grows
    /// monotonically with great-circle distance.
    pub fn to_unit_vector(&self) -> [f64; 3] {
        let (lat, lng) = (self.latitude.to_radians(), self.longitude.to_radians());
        [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::from(*self)
    }

    /// Closest point to `self` on the closed segment `[start, end]`.
    ///
    /// The projection is planar in degree space, which is accurate enough
    /// at street scale.
    pub fn project_on_segment(&self, start: LatLng, end: LatLng) -> LatLng {
        let seg_lat = end.latitude - start.latitude;
        let seg_lng = end.longitude - start.longitude;
        let length_squared = seg_lat * seg_lat + seg_lng * seg_lng;

        if length_squared == 0.0 {
            return start;
        }

        let t = ((self.latitude - start.latitude) * seg_lat
            + (self.longitude - start.longitude) * seg_lng)
            / length_squared;

        if t <= 0.0 {
            return start;
        }
        if t >= 1.0 {
            return end;
        }

        LatLng {
            latitude: start.latitude + t * seg_lat,
            longitude: start.longitude + t * seg_lng,
        }
    }
}

/// Canonical identity of a coordinate: latitude and longitude quantized to
/// fixed precision so that equal points always hash equally.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub lat: i64,
    pub lng: i64,
}

impl From<LatLng> for NodeKey {
    fn from(loc: LatLng) -> NodeKey {
        NodeKey {
            lat: (loc.latitude * KEY_SCALE).round() as i64,
            lng: (loc.longitude * KEY_SCALE).round() as i64,
        }
    }
}

impl From<NodeKey> for LatLng {
    fn from(key: NodeKey) -> LatLng {
        LatLng {
            latitude: key.lat as f64 / KEY_SCALE,
            longitude: key.lng as f64 / KEY_SCALE,
        }
    }
}

impl Display for NodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        LatLng::from(*self).fmt(f)
    }
}
