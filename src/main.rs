use std::sync::Arc;

use tracing::{error, info};
use wayfinder::{
    services::{build::build_from_config, store::GraphStore},
    structures::Config,
    web::app::{AppState, server},
};

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.yaml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level())
        .init();

    let graph = match build_from_config(&config.build).await {
        Ok(graph) => graph,
        Err(e) if e.is_upstream() => {
            error!("Geodata source unavailable: {e}");
            return;
        }
        Err(e) => {
            error!("Failed to build graph: {e}");
            return;
        }
    };
    info!(
        "Graph ready: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let timeout = config.server.timeout();
    let bind = config.server.bind.clone();
    let state = Arc::new(AppState::new(
        GraphStore::new(graph),
        Some(config.build),
        timeout,
    ));

    if let Err(e) = server(state, &bind).await {
        error!("Server stopped: {e}");
    }
}
