use std::collections::{BTreeMap, HashMap};

use kdtree::{KdTree, distance::squared_euclidean};
use tracing::{debug, info, warn};

use crate::structures::{LatLng, NodeData, NodeID, NodeKey, StreetEdgeData, Way};

/// Undirected street graph, immutable once built.
///
/// Nodes live in an arena indexed by [`NodeID`]; `id_mapper` resolves a
/// coordinate identity to its arena slot. Every edge is stored once per
/// direction with the same length.
pub struct Graph {
    nodes: Vec<NodeData>,
    edges: Vec<Vec<StreetEdgeData>>,
    /// Nodes indexed by their position on the unit sphere.
    nodes_tree: KdTree<f64, NodeID, [f64; 3]>,
    id_mapper: HashMap<NodeKey, NodeID>,
    edge_count: usize,
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new()
    }
}

impl Graph {
    pub fn new() -> Graph {
        Graph {
            nodes: Vec::new(),
            edges: Vec::new(),
            nodes_tree: KdTree::new(3),
            id_mapper: HashMap::new(),
            edge_count: 0,
        }
    }

    /// Builds a fresh graph from raw polylines.
    ///
    /// Ways without geometry or with fewer than two distinct points are
    /// skipped, as are ways holding a non-finite or out-of-range point.
    /// Consecutive points sharing a [`NodeKey`] are collapsed, so the
    /// graph never holds self-loops or zero-length edges.
    pub fn from_ways(ways: &[Way]) -> Graph {
        let mut g = Graph::new();
        let mut skipped = 0;

        for way in ways {
            let geometry = match &way.geometry {
                Some(geometry) if geometry.len() >= 2 => geometry,
                Some(_) => {
                    debug!("Skipping {}: fewer than two points", way.label());
                    skipped += 1;
                    continue;
                }
                None => {
                    debug!("Skipping {}: no geometry", way.label());
                    skipped += 1;
                    continue;
                }
            };

            if let Some(bad) = geometry.iter().find(|p| !p.is_valid()) {
                debug!("Skipping {}: invalid point ({})", way.label(), bad);
                skipped += 1;
                continue;
            }

            let mut inserted = false;
            for pair in geometry.windows(2) {
                let from = pair[0].key();
                let to = pair[1].key();
                if from == to {
                    continue;
                }

                let from_id = g.add_node(from);
                let to_id = g.add_node(to);
                let length = g.nodes[from_id.0].loc().dist(g.nodes[to_id.0].loc());
                g.add_edge(from_id, to_id, length);
                inserted = true;
            }

            if !inserted {
                debug!("Skipping {}: all points coincide", way.label());
                skipped += 1;
            }
        }

        if skipped > 0 {
            warn!("Skipped {} of {} ways without usable geometry", skipped, ways.len());
        }
        info!(
            "Built graph with {} nodes and {} edges",
            g.node_count(),
            g.edge_count()
        );

        g
    }

    /// Returns the node registered under `key`, inserting it if needed.
    pub fn add_node(&mut self, key: NodeKey) -> NodeID {
        if let Some(id) = self.id_mapper.get(&key) {
            return *id;
        }

        let id = NodeID(self.nodes.len());
        let node = NodeData::new(key);

        if let Err(e) = self.nodes_tree.add(node.loc().to_unit_vector(), id) {
            warn!("Node {} at {} not indexed: {:?}", id, node.loc(), e);
        }
        self.nodes.push(node);
        self.edges.push(Vec::new());
        self.id_mapper.insert(key, id);

        id
    }

    /// Connects `a` and `b` in both directions. An existing edge between the
    /// same pair has its length overwritten.
    pub fn add_edge(&mut self, a: NodeID, b: NodeID, length: f64) {
        if a == b {
            return;
        }

        let added = self.upsert_half_edge(a, b, length);
        self.upsert_half_edge(b, a, length);
        if added {
            self.edge_count += 1;
        }
    }

    fn upsert_half_edge(&mut self, from: NodeID, to: NodeID, length: f64) -> bool {
        let adjacency = &mut self.edges[from.0];
        match adjacency.iter_mut().find(|e| e.destination == to) {
            Some(existing) => {
                existing.length = length;
                false
            }
            None => {
                adjacency.push(StreetEdgeData {
                    origin: from,
                    destination: to,
                    length,
                });
                true
            }
        }
    }

    pub fn get_id(&self, key: &NodeKey) -> Option<NodeID> {
        self.id_mapper.get(key).copied()
    }

    pub fn get_node(&self, id: NodeID) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    pub fn contains(&self, id: NodeID) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn edges_from(&self, id: NodeID) -> &[StreetEdgeData] {
        self.edges.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeID, &NodeData)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeID(i), n))
    }

    /// Every undirected edge exactly once, as `(lower id, higher id)`.
    pub fn segments(&self) -> impl Iterator<Item = &StreetEdgeData> {
        self.edges
            .iter()
            .flatten()
            .filter(|e| e.origin < e.destination)
    }

    /// Order-independent view of the adjacency, keyed by coordinate identity.
    pub fn adjacency(&self) -> BTreeMap<NodeKey, BTreeMap<NodeKey, f64>> {
        self.nodes()
            .map(|(id, node)| {
                let neighbors = self
                    .edges_from(id)
                    .iter()
                    .map(|e| (self.nodes[e.destination.0].key, e.length))
                    .collect();
                (node.key, neighbors)
            })
            .collect()
    }

    /// Nearest node to `loc` with its haversine distance in kilometres.
    ///
    /// The tree is searched by chord length on the unit sphere, which ranks
    /// nodes exactly like great-circle distance does.
    pub fn nearest_node_dist(&self, loc: LatLng) -> Option<(f64, NodeID)> {
        if self.nodes.is_empty() {
            return None;
        }

        match self
            .nodes_tree
            .nearest(&loc.to_unit_vector(), 1, &squared_euclidean)
        {
            Ok(found) => found
                .first()
                .and_then(|(_, id)| self.get_node(**id).map(|n| (loc.dist(n.loc()), **id))),
            Err(e) => {
                warn!("Failed to find a node close to {}: {:?}", loc, e);
                None
            }
        }
    }
}
