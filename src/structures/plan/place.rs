use async_graphql::{Enum, SimpleObject};

use crate::routing::SnappedPoint;

#[derive(Debug, Enum, Clone, Copy, PartialEq, Eq)]
pub enum PlanPlaceType {
    Node,
    Segment,
}

/// Where a requested endpoint was snapped to.
#[derive(Debug, SimpleObject, Clone, Copy)]
pub struct PlanPlace {
    pub lat: f64,
    pub lon: f64,
    pub mode: PlanPlaceType,
    /// Metres between the requested coordinate and the snapped one.
    pub offset: f64,
}

impl From<SnappedPoint> for PlanPlace {
    fn from(point: SnappedPoint) -> PlanPlace {
        PlanPlace {
            lat: point.location.latitude,
            lon: point.location.longitude,
            mode: if point.on_segment {
                PlanPlaceType::Segment
            } else {
                PlanPlaceType::Node
            },
            offset: point.distance * 1000.0,
        }
    }
}
