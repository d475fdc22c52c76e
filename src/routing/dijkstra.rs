use std::{
    cmp::Reverse,
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
};

use ordered_float::OrderedFloat;
use priority_queue::PriorityQueue;
use tracing::debug;

use crate::{
    Error,
    structures::{Graph, NodeID},
};

/// Read-only view of a weighted undirected graph, as needed by the search.
pub trait RoutingGraph {
    fn contains(&self, id: NodeID) -> bool;

    /// Neighbours of `id` with the edge length in kilometres.
    fn neighbors(&self, id: NodeID) -> impl Iterator<Item = (NodeID, f64)> + '_;
}

impl RoutingGraph for Graph {
    fn contains(&self, id: NodeID) -> bool {
        Graph::contains(self, id)
    }

    fn neighbors(&self, id: NodeID) -> impl Iterator<Item = (NodeID, f64)> + '_ {
        self.edges_from(id).iter().map(|e| (e.destination, e.length))
    }
}

/// Ordered node sequence from start to end. Empty means no route exists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub nodes: Vec<NodeID>,
    /// Total length in kilometres.
    pub length: f64,
}

impl Path {
    pub fn empty() -> Path {
        Path::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

pub fn shortest_path<G: RoutingGraph>(
    graph: &G,
    start: NodeID,
    end: NodeID,
) -> Result<Path, Error> {
    shortest_path_with_cancel(graph, start, end, &AtomicBool::new(false))
}

/// Dijkstra search between two members of `graph`.
///
/// `cancel` is polled once per settled node; raising it aborts the search
/// with [`Error::Cancelled`]. An unreachable `end` yields an empty path.
pub fn shortest_path_with_cancel<G: RoutingGraph>(
    graph: &G,
    start: NodeID,
    end: NodeID,
    cancel: &AtomicBool,
) -> Result<Path, Error> {
    if !graph.contains(start) {
        return Err(Error::NodeNotFound(start));
    }
    if !graph.contains(end) {
        return Err(Error::NodeNotFound(end));
    }

    let mut pq = PriorityQueue::<NodeID, Reverse<OrderedFloat<f64>>>::new();
    let mut dist = HashMap::<NodeID, f64>::new();
    let mut prev = HashMap::<NodeID, NodeID>::new();
    let mut settled = 0usize;

    dist.insert(start, 0.0);
    pq.push(start, Reverse(OrderedFloat(0.0)));

    let mut reached = false;
    while let Some((current, Reverse(OrderedFloat(current_dist)))) = pq.pop() {
        if cancel.load(Ordering::Relaxed) {
            debug!("Search cancelled after settling {} nodes", settled);
            return Err(Error::Cancelled);
        }
        settled += 1;

        if current == end {
            reached = true;
            break;
        }

        for (neighbor, length) in graph.neighbors(current) {
            let candidate = current_dist + length;
            // Missing entries stand for an infinite tentative distance.
            if dist.get(&neighbor).is_none_or(|&known| candidate < known) {
                dist.insert(neighbor, candidate);
                prev.insert(neighbor, current);
                pq.push_increase(neighbor, Reverse(OrderedFloat(candidate)));
            }
        }
    }

    if !reached {
        debug!("No path found after settling {} nodes", settled);
        return Ok(Path::empty());
    }

    let length = dist.get(&end).copied().unwrap_or(f64::INFINITY);
    if !length.is_finite() {
        return Ok(Path::empty());
    }

    let nodes = reconstruct_path(&prev, start, end);
    if nodes.first() != Some(&start) {
        return Ok(Path::empty());
    }

    debug!(
        "Found a path of {} nodes ({:.3} km) after settling {} nodes",
        nodes.len(),
        length,
        settled
    );
    Ok(Path { nodes, length })
}

fn reconstruct_path(prev: &HashMap<NodeID, NodeID>, start: NodeID, end: NodeID) -> Vec<NodeID> {
    let mut path = vec![end];
    let mut current = end;

    while current != start {
        match prev.get(&current) {
            Some(&next) => {
                path.push(next);
                current = next;
            }
            None => break,
        }
    }

    path.reverse();
    path
}
