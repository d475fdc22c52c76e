use std::{sync::Arc, time::Duration};

use poem::{http::StatusCode, test::TestClient};
use serde_json::{Value, json};
use wayfinder::{
    services::store::GraphStore,
    structures::{Graph, Way},
    web::app::{AppState, app},
};

fn state(graph: Graph) -> Arc<AppState> {
    state_with_timeout(graph, Duration::from_secs(5))
}

fn state_with_timeout(graph: Graph, timeout: Duration) -> Arc<AppState> {
    Arc::new(AppState::new(GraphStore::new(graph), None, timeout))
}

/// Square street grid with `size` rows and columns, 0.001 degrees apart.
fn grid(size: usize) -> Graph {
    let step = 0.001;
    let mut ways = Vec::with_capacity(2 * size);
    for i in 0..size {
        let row: Vec<_> = (0..size)
            .map(|j| (i as f64 * step, j as f64 * step))
            .collect();
        let column: Vec<_> = (0..size)
            .map(|j| (j as f64 * step, i as f64 * step))
            .collect();
        ways.push(Way::from_points(&row));
        ways.push(Way::from_points(&column));
    }
    Graph::from_ways(&ways)
}

fn corner() -> Graph {
    Graph::from_ways(&[
        Way::from_points(&[(0.0, 0.0), (0.01, 0.0)]),
        Way::from_points(&[(0.01, 0.0), (0.01, 0.01)]),
    ])
}

#[tokio::test]
async fn route_endpoint_returns_coordinate_pairs() {
    let cli = TestClient::new(app(state(corner())));

    let resp = cli
        .get("/route")
        .query("from_lat", &0.0)
        .query("from_lng", &0.0)
        .query("to_lat", &0.01)
        .query("to_lng", &0.01)
        .send()
        .await;

    resp.assert_status_is_ok();
    resp.assert_json(json!([[0.0, 0.0], [0.01, 0.0], [0.01, 0.01]]))
        .await;
}

#[tokio::test]
async fn unreachable_destination_is_an_empty_array() {
    let graph = Graph::from_ways(&[
        Way::from_points(&[(0.0, 0.0), (0.01, 0.0)]),
        Way::from_points(&[(1.0, 1.0), (1.01, 1.0)]),
    ]);
    let cli = TestClient::new(app(state(graph)));

    let resp = cli
        .get("/route")
        .query("from_lat", &0.0)
        .query("from_lng", &0.0)
        .query("to_lat", &1.0)
        .query("to_lng", &1.0)
        .send()
        .await;

    resp.assert_status_is_ok();
    resp.assert_json(json!([])).await;
}

#[tokio::test]
async fn empty_graph_is_not_found() {
    let cli = TestClient::new(app(state(Graph::new())));

    let resp = cli
        .get("/route")
        .query("from_lat", &0.0)
        .query("from_lng", &0.0)
        .query("to_lat", &1.0)
        .query("to_lng", &1.0)
        .send()
        .await;

    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn elapsed_deadline_is_a_gateway_timeout() {
    let cli = TestClient::new(app(state_with_timeout(grid(200), Duration::ZERO)));

    let resp = cli
        .get("/route")
        .query("from_lat", &0.0)
        .query("from_lng", &0.0)
        .query("to_lat", &0.199)
        .query("to_lng", &0.199)
        .send()
        .await;

    resp.assert_status(StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn graphql_plan() {
    let cli = TestClient::new(app(state(corner())));

    let resp = cli
        .post("/graphql")
        .body_json(&json!({
            "query": "{ graph { nodes edges } plan(fromLat: 0.0, fromLng: 0.0, toLat: 0.01, toLng: 0.01) { found coordinates from { mode } } }"
        }))
        .send()
        .await;

    resp.assert_status_is_ok();
    let body: Value = resp.0.into_body().into_json().await.unwrap();
    let data = &body["data"];
    assert_eq!(data["graph"], json!({ "nodes": 3, "edges": 2 }));
    assert_eq!(data["plan"]["found"], json!(true));
    assert_eq!(
        data["plan"]["coordinates"],
        json!([[0.0, 0.0], [0.01, 0.0], [0.01, 0.01]])
    );
    assert_eq!(data["plan"]["from"]["mode"], json!("NODE"));
}

#[tokio::test]
async fn rebuild_without_sources_is_refused() {
    let cli = TestClient::new(app(state(corner())));

    let resp = cli
        .post("/graphql")
        .body_json(&json!({ "query": "mutation { rebuild { nodes } }" }))
        .send()
        .await;

    let body: Value = resp.0.into_body().into_json().await.unwrap();
    assert_eq!(
        body["errors"][0]["message"],
        json!("Rebuilding is not configured")
    );
}
