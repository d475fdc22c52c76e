use std::collections::HashMap;

use crate::{
    routing::{
        dijkstra::RoutingGraph,
        snap::{SegmentSnap, Snap},
    },
    structures::{Graph, LatLng, NodeID, NodeKey},
};

/// A base graph plus per-request virtual nodes for points snapped inside
/// segments. The base graph is only borrowed, never modified.
///
/// Virtual nodes take the ids following the base graph's last node.
pub struct QueryGraph<'a> {
    base: &'a Graph,
    virtual_nodes: Vec<(NodeKey, SegmentSnap)>,
    extra_edges: HashMap<NodeID, Vec<(NodeID, f64)>>,
}

impl<'a> QueryGraph<'a> {
    pub fn new(base: &'a Graph) -> QueryGraph<'a> {
        QueryGraph {
            base,
            virtual_nodes: Vec::new(),
            extra_edges: HashMap::new(),
        }
    }

    /// Makes `snap` addressable and returns its node id.
    pub fn attach(&mut self, snap: &Snap) -> NodeID {
        match snap {
            Snap::Node { id, .. } => *id,
            Snap::OnSegment(segment) => self.attach_on_segment(segment),
        }
    }

    fn attach_on_segment(&mut self, snap: &SegmentSnap) -> NodeID {
        let key = snap.point.key();
        if let Some(index) = self.virtual_nodes.iter().position(|(k, _)| *k == key) {
            return NodeID(self.base.node_count() + index);
        }

        let id = NodeID(self.base.node_count() + self.virtual_nodes.len());
        let point = LatLng::from(key);

        for end in [snap.from, snap.to] {
            if let Some(node) = self.base.get_node(end) {
                self.connect(id, end, point.dist(node.loc()));
            }
        }

        // Two points on the same segment reach each other directly.
        let siblings: Vec<(NodeID, LatLng)> = self
            .virtual_nodes
            .iter()
            .enumerate()
            .filter(|(_, (_, other))| other.same_segment(snap))
            .map(|(i, (k, _))| (NodeID(self.base.node_count() + i), LatLng::from(*k)))
            .collect();
        for (sibling, location) in siblings {
            self.connect(id, sibling, point.dist(location));
        }

        self.virtual_nodes.push((key, *snap));
        id
    }

    fn connect(&mut self, a: NodeID, b: NodeID, length: f64) {
        if a == b || length <= 0.0 {
            return;
        }
        self.extra_edges.entry(a).or_default().push((b, length));
        self.extra_edges.entry(b).or_default().push((a, length));
    }

    pub fn location(&self, id: NodeID) -> Option<LatLng> {
        if let Some(node) = self.base.get_node(id) {
            return Some(node.loc());
        }
        self.virtual_nodes
            .get(id.0.checked_sub(self.base.node_count())?)
            .map(|(key, _)| LatLng::from(*key))
    }

    pub fn virtual_node_count(&self) -> usize {
        self.virtual_nodes.len()
    }
}

impl RoutingGraph for QueryGraph<'_> {
    fn contains(&self, id: NodeID) -> bool {
        id.0 < self.base.node_count() + self.virtual_nodes.len()
    }

    fn neighbors(&self, id: NodeID) -> impl Iterator<Item = (NodeID, f64)> + '_ {
        RoutingGraph::neighbors(self.base, id).chain(
            self.extra_edges
                .get(&id)
                .into_iter()
                .flatten()
                .copied(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{routing::dijkstra::shortest_path, structures::Way};

    fn segment_snap(g: &Graph, lat: f64, lng: f64) -> Snap {
        let point = LatLng::new(lat, lng);
        let from = g.get_id(&LatLng::new(0.0, 0.0).key()).unwrap();
        let to = g.get_id(&LatLng::new(0.0, 0.01).key()).unwrap();
        Snap::OnSegment(SegmentSnap {
            point,
            from,
            to,
            distance: 0.0,
        })
    }

    #[test]
    fn virtual_node_splits_segment() {
        let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (0.0, 0.01)])]);
        let mut q = QueryGraph::new(&g);
        let v = q.attach(&segment_snap(&g, 0.0, 0.004));

        assert_eq!(v, NodeID(2));
        assert!(q.contains(v));
        assert_eq!(q.neighbors(v).count(), 2);
        assert_eq!(q.neighbors(NodeID(0)).count(), 2);
        assert_eq!(q.location(v), Some(LatLng::new(0.0, 0.004)));
        assert_eq!(g.edges_from(NodeID(0)).len(), 1);
    }

    #[test]
    fn attaching_the_same_point_twice_reuses_it() {
        let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (0.0, 0.01)])]);
        let mut q = QueryGraph::new(&g);
        let a = q.attach(&segment_snap(&g, 0.0, 0.004));
        let b = q.attach(&segment_snap(&g, 0.0, 0.004));
        assert_eq!(a, b);
        assert_eq!(q.virtual_node_count(), 1);
    }

    #[test]
    fn points_on_one_segment_connect_directly() {
        let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (0.0, 0.01)])]);
        let mut q = QueryGraph::new(&g);
        let a = q.attach(&segment_snap(&g, 0.0, 0.004));
        let b = q.attach(&segment_snap(&g, 0.0, 0.006));

        let path = shortest_path(&q, a, b).unwrap();
        assert_eq!(path.nodes, vec![a, b]);
    }
}
