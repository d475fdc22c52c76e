use std::time::Instant;

use tracing::info;

use crate::{
    Error,
    ingestion::{
        cache::{SourceLocation, resolve_path},
        osm, overpass,
    },
    structures::{BuildConfig, Graph, Ingestor, Way},
};

/// Fetches every configured input and builds one graph from all their ways.
///
/// Any failing source aborts the build, so a partial network is never
/// served.
pub async fn build_from_config(config: &BuildConfig) -> Result<Graph, Error> {
    let client = reqwest::Client::new();
    let mut ways = Vec::<Way>::new();

    for input in &config.inputs {
        info!("Loading '{}'...", input.label());
        let before = Instant::now();

        let loaded = match input {
            Ingestor::Overpass(c) => match input.location()? {
                SourceLocation::Local(path) => overpass::load_ways(&path)?,
                SourceLocation::Remote(url) => {
                    overpass::fetch_ways(&client, &url, &c.query).await?
                }
            },
            Ingestor::OsmPbf(_) => {
                let path = resolve_path(&client, input, &config.cache_dir).await?;
                tokio::task::spawn_blocking(move || osm::load_pbf_file(&path)).await??
            }
        };

        info!(
            "Loaded {} ways from '{}' in {}ms",
            loaded.len(),
            input.label(),
            before.elapsed().as_millis()
        );
        ways.extend(loaded);
    }

    let before = Instant::now();
    let graph = tokio::task::spawn_blocking(move || Graph::from_ways(&ways)).await?;
    info!("Graph built in {}ms", before.elapsed().as_millis());

    Ok(graph)
}
