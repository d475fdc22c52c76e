use tracing::debug;

use crate::structures::{Graph, LatLng, NodeID};

/// A projected point must beat the nearest vertex by more than this many
/// kilometres to be preferred over it.
pub const SNAP_EPSILON_KM: f64 = 0.001;

/// Where a free coordinate lands on the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snap {
    Node { id: NodeID, distance: f64 },
    OnSegment(SegmentSnap),
}

/// A point lying inside the segment between `from` and `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSnap {
    pub point: LatLng,
    pub from: NodeID,
    pub to: NodeID,
    /// Kilometres from the query to `point`.
    pub distance: f64,
}

impl SegmentSnap {
    pub fn same_segment(&self, other: &SegmentSnap) -> bool {
        (self.from, self.to) == (other.from, other.to)
            || (self.from, self.to) == (other.to, other.from)
    }
}

impl Snap {
    pub fn distance(&self) -> f64 {
        match self {
            Snap::Node { distance, .. } => *distance,
            Snap::OnSegment(s) => s.distance,
        }
    }

    pub fn location(&self, graph: &Graph) -> Option<LatLng> {
        match self {
            Snap::Node { id, .. } => graph.get_node(*id).map(|n| n.loc()),
            Snap::OnSegment(s) => Some(s.point),
        }
    }
}

/// Nearest existing graph node, or `None` when the graph is empty.
pub fn resolve_nearest(point: LatLng, graph: &Graph) -> Option<NodeID> {
    graph.nearest_node_dist(point).map(|(_, id)| id)
}

/// Closest point on any segment of the graph. Scans every segment.
pub fn nearest_on_segment(point: LatLng, graph: &Graph) -> Option<SegmentSnap> {
    let mut best: Option<SegmentSnap> = None;

    for segment in graph.segments() {
        let (Some(from), Some(to)) = (
            graph.get_node(segment.origin),
            graph.get_node(segment.destination),
        ) else {
            continue;
        };

        let projected = point.project_on_segment(from.loc(), to.loc());
        let distance = point.dist(projected);
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(SegmentSnap {
                point: projected,
                from: segment.origin,
                to: segment.destination,
                distance,
            });
        }
    }

    best
}

/// Snaps `point` to the nearest vertex, unless a point inside a segment is
/// closer by more than [`SNAP_EPSILON_KM`].
///
/// A projected point that coincides with an existing node identity is
/// reported as that node.
pub fn snap(point: LatLng, graph: &Graph) -> Option<Snap> {
    let (node_distance, node) = graph.nearest_node_dist(point)?;
    let node_snap = Snap::Node {
        id: node,
        distance: node_distance,
    };

    let Some(on_segment) = nearest_on_segment(point, graph) else {
        return Some(node_snap);
    };

    if on_segment.distance + SNAP_EPSILON_KM >= node_distance {
        return Some(node_snap);
    }

    if let Some(id) = graph.get_id(&on_segment.point.key()) {
        return Some(Snap::Node {
            id,
            distance: on_segment.distance,
        });
    }

    debug!(
        "Snapped {} onto segment {} - {} at {}",
        point, on_segment.from, on_segment.to, on_segment.point
    );
    Some(Snap::OnSegment(on_segment))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::structures::Way;

    fn node_at(g: &Graph, lat: f64, lng: f64) -> NodeID {
        g.get_id(&LatLng::new(lat, lng).key()).unwrap()
    }

    #[test]
    fn nearest_vertex() {
        let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (1.0, 0.0)])]);
        assert_eq!(
            resolve_nearest(LatLng::new(0.4, 0.0), &g),
            Some(node_at(&g, 0.0, 0.0))
        );
        assert_eq!(
            resolve_nearest(LatLng::new(0.6, 0.0), &g),
            Some(node_at(&g, 1.0, 0.0))
        );
    }

    #[test]
    fn empty_graph_has_no_snap() {
        let g = Graph::new();
        assert_eq!(resolve_nearest(LatLng::new(0.0, 0.0), &g), None);
        assert_eq!(nearest_on_segment(LatLng::new(0.0, 0.0), &g), None);
        assert_eq!(snap(LatLng::new(0.0, 0.0), &g), None);
    }

    #[test]
    fn point_beside_a_long_segment_snaps_inside_it() {
        let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (0.0, 0.01)])]);
        let s = snap(LatLng::new(0.0001, 0.005), &g).unwrap();
        match s {
            Snap::OnSegment(seg) => {
                assert_relative_eq!(seg.point.latitude, 0.0);
                assert_relative_eq!(seg.point.longitude, 0.005, epsilon = 1e-12);
                assert!(seg.distance < 0.02);
            }
            other => panic!("expected a segment snap, got {other:?}"),
        }
    }

    #[test]
    fn vertex_wins_within_epsilon() {
        // Half a metre past the end of the segment: projection clamps to the
        // vertex, so both candidates are equally far.
        let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (0.0, 0.01)])]);
        let query = LatLng::new(0.0, 0.010004);
        match snap(query, &g).unwrap() {
            Snap::Node { id, distance } => {
                assert_eq!(id, node_at(&g, 0.0, 0.01));
                assert_relative_eq!(distance, query.dist(LatLng::new(0.0, 0.01)));
            }
            other => panic!("expected a node snap, got {other:?}"),
        }
    }

    #[test]
    fn vertex_wins_when_projection_is_barely_closer() {
        // Projection lies 0.5 m from the vertex and 1 m off the road.
        let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (0.0, 0.01)])]);
        let query = LatLng::new(0.000009, 0.0000045);
        let s = snap(query, &g).unwrap();
        assert!(matches!(s, Snap::Node { id, .. } if id == node_at(&g, 0.0, 0.0)));
    }
}
