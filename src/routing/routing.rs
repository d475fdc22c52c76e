use std::{sync::atomic::AtomicBool, time::Instant};

use tracing::{debug, info};

use crate::{
    Error,
    routing::{
        dijkstra::shortest_path_with_cancel,
        query_graph::QueryGraph,
        snap::{Snap, snap},
    },
    structures::{Graph, LatLng},
};

#[derive(Debug, Clone, Copy)]
pub struct RouteQuery {
    pub from: LatLng,
    pub to: LatLng,
}

impl RouteQuery {
    pub fn new(from_lat: f64, from_lng: f64, to_lat: f64, to_lng: f64) -> RouteQuery {
        RouteQuery {
            from: LatLng::new(from_lat, from_lng),
            to: LatLng::new(to_lat, to_lng),
        }
    }

    fn validate(&self) -> Result<(), Error> {
        for loc in [self.from, self.to] {
            if !loc.is_valid() {
                return Err(Error::InvalidCoordinate(loc));
            }
        }
        Ok(())
    }
}

/// Result of a routing request. Empty `coordinates` means no route exists
/// between the two snapped points.
#[derive(Debug, Clone)]
pub struct Route {
    pub coordinates: Vec<LatLng>,
    /// Kilometres along the route.
    pub length: f64,
    pub from: SnappedPoint,
    pub to: SnappedPoint,
}

#[derive(Debug, Clone, Copy)]
pub struct SnappedPoint {
    pub location: LatLng,
    pub on_segment: bool,
    /// Kilometres from the requested coordinate.
    pub distance: f64,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn as_pairs(&self) -> Vec<[f64; 2]> {
        self.coordinates.iter().map(LatLng::as_array).collect()
    }
}

/// Snaps both ends of `query` onto `graph` and searches the shortest path
/// between them.
pub fn route(graph: &Graph, query: &RouteQuery, cancel: &AtomicBool) -> Result<Route, Error> {
    query.validate()?;

    let from_snap = snap(query.from, graph).ok_or(Error::NoNearbyPoint)?;
    let to_snap = snap(query.to, graph).ok_or(Error::NoNearbyPoint)?;

    let from = snapped_point(&from_snap, graph)?;
    let to = snapped_point(&to_snap, graph)?;
    debug!(
        "Snapped start to {} ({:.1} m), end to {} ({:.1} m)",
        from.location,
        from.distance * 1000.0,
        to.location,
        to.distance * 1000.0
    );

    let mut query_graph = QueryGraph::new(graph);
    let start = query_graph.attach(&from_snap);
    let end = query_graph.attach(&to_snap);

    let before = Instant::now();
    let path = shortest_path_with_cancel(&query_graph, start, end, cancel)?;
    info!(
        "Routed {} -> {} in {}ms ({} nodes)",
        query.from,
        query.to,
        before.elapsed().as_millis(),
        path.nodes.len()
    );

    let coordinates = path
        .nodes
        .iter()
        .map(|id| query_graph.location(*id).ok_or(Error::NodeNotFound(*id)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route {
        coordinates,
        length: path.length,
        from,
        to,
    })
}

fn snapped_point(snap: &Snap, graph: &Graph) -> Result<SnappedPoint, Error> {
    let location = match snap {
        Snap::Node { id, .. } => graph.get_node(*id).ok_or(Error::NodeNotFound(*id))?.loc(),
        Snap::OnSegment(segment) => LatLng::from(segment.point.key()),
    };

    Ok(SnappedPoint {
        location,
        on_segment: matches!(snap, Snap::OnSegment(_)),
        distance: snap.distance(),
    })
}
