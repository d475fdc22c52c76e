use async_graphql::SimpleObject;

use crate::{
    routing::Route,
    structures::plan::{PlanNode, PlanPlace},
};

#[derive(Debug, SimpleObject)]
pub struct Plan {
    /// False when both endpoints snapped but no route connects them.
    pub found: bool,
    /// Metres along the route.
    pub length: f64,
    /// `[lat, lon]` pairs from start to end.
    pub coordinates: Vec<Vec<f64>>,
    pub nodes: Vec<PlanNode>,
    pub from: PlanPlace,
    pub to: PlanPlace,
}

impl From<Route> for Plan {
    fn from(route: Route) -> Plan {
        Plan {
            found: !route.is_empty(),
            length: route.length * 1000.0,
            coordinates: route
                .coordinates
                .iter()
                .map(|c| vec![c.latitude, c.longitude])
                .collect(),
            nodes: route.coordinates.iter().copied().map(PlanNode::from).collect(),
            from: route.from.into(),
            to: route.to.into(),
        }
    }
}
