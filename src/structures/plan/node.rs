use async_graphql::SimpleObject;

use crate::structures::LatLng;

#[derive(Debug, SimpleObject, Clone, Copy)]
pub struct PlanNode {
    pub lat: f64,
    pub lon: f64,
}

impl From<LatLng> for PlanNode {
    fn from(loc: LatLng) -> PlanNode {
        PlanNode {
            lat: loc.latitude,
            lon: loc.longitude,
        }
    }
}
