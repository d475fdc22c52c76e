use approx::assert_relative_eq;
use rand::{Rng, SeedableRng, rngs::StdRng};
use wayfinder::{
    routing::{resolve_nearest, shortest_path},
    structures::{Graph, LatLng, NodeID, Way},
};

fn node(g: &Graph, lat: f64, lng: f64) -> NodeID {
    g.get_id(&LatLng::new(lat, lng).key()).unwrap()
}

fn path_length(g: &Graph, nodes: &[NodeID]) -> f64 {
    nodes
        .windows(2)
        .map(|pair| {
            g.edges_from(pair[0])
                .iter()
                .find(|e| e.destination == pair[1])
                .expect("consecutive path nodes must share an edge")
                .length
        })
        .sum()
}

/// Shortest length over every simple path, by exhaustive search.
fn brute_force(g: &Graph, current: NodeID, end: NodeID, visited: &mut Vec<bool>) -> Option<f64> {
    if current == end {
        return Some(0.0);
    }
    visited[current.0] = true;
    let mut best: Option<f64> = None;
    for edge in g.edges_from(current) {
        if visited[edge.destination.0] {
            continue;
        }
        if let Some(rest) = brute_force(g, edge.destination, end, visited) {
            let total = edge.length + rest;
            if best.is_none_or(|b| total < b) {
                best = Some(total);
            }
        }
    }
    visited[current.0] = false;
    best
}

fn random_graph(rng: &mut StdRng, nodes: usize) -> Graph {
    let points: Vec<(f64, f64)> = (0..nodes)
        .map(|_| {
            (
                45.63 + rng.random_range(0..1000) as f64 * 1e-5,
                -0.31 + rng.random_range(0..1000) as f64 * 1e-5,
            )
        })
        .collect();

    let mut ways = Vec::new();
    for i in 0..nodes {
        for j in (i + 1)..nodes {
            if rng.random_bool(0.35) {
                ways.push(Way::from_points(&[points[i], points[j]]));
            }
        }
    }
    Graph::from_ways(&ways)
}

#[test]
fn two_ways_sharing_a_corner() {
    let g = Graph::from_ways(&[
        Way::from_points(&[(0.0, 0.0), (1.0, 0.0)]),
        Way::from_points(&[(1.0, 0.0), (1.0, 1.0)]),
    ]);

    let path = shortest_path(&g, node(&g, 0.0, 0.0), node(&g, 1.0, 1.0)).unwrap();

    let coordinates: Vec<LatLng> = path
        .nodes
        .iter()
        .map(|id| g.get_node(*id).unwrap().loc())
        .collect();
    assert_eq!(
        coordinates,
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 0.0),
            LatLng::new(1.0, 1.0)
        ]
    );
    assert_relative_eq!(path.length, path_length(&g, &path.nodes));
}

#[test]
fn snapping_picks_the_closer_vertex() {
    let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (1.0, 0.0)])]);
    assert_eq!(
        resolve_nearest(LatLng::new(0.4, 0.0), &g),
        Some(node(&g, 0.0, 0.0))
    );
}

#[test]
fn start_equals_end() {
    let g = Graph::from_ways(&[Way::from_points(&[(0.0, 0.0), (1.0, 0.0)])]);
    let a = node(&g, 1.0, 0.0);
    assert_eq!(shortest_path(&g, a, a).unwrap().nodes, vec![a]);
}

#[test]
fn dijkstra_matches_exhaustive_search() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..40 {
        let g = random_graph(&mut rng, 8);
        if g.node_count() < 2 {
            continue;
        }

        for _ in 0..5 {
            let start = NodeID(rng.random_range(0..g.node_count()));
            let end = NodeID(rng.random_range(0..g.node_count()));

            let path = shortest_path(&g, start, end).unwrap();
            let expected = brute_force(&g, start, end, &mut vec![false; g.node_count()]);

            match expected {
                None => assert!(path.is_empty()),
                Some(best) => {
                    assert_eq!(path.nodes.first(), Some(&start));
                    assert_eq!(path.nodes.last(), Some(&end));
                    assert_relative_eq!(path.length, best, epsilon = 1e-9);
                    assert_relative_eq!(path_length(&g, &path.nodes), best, epsilon = 1e-9);
                }
            }
        }
    }
}
