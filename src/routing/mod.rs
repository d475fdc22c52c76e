pub mod dijkstra;
pub mod query_graph;
pub mod routing;
pub mod snap;

pub use dijkstra::{Path, RoutingGraph, shortest_path, shortest_path_with_cancel};
pub use routing::{Route, RouteQuery, SnappedPoint, route};
pub use snap::{SNAP_EPSILON_KM, SegmentSnap, Snap, nearest_on_segment, resolve_nearest, snap};
