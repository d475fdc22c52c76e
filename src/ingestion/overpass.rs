use std::fs;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{
    Error,
    structures::{LatLng, Way},
};

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
    /// Set by the server when the query did not run to completion.
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub geometry: Option<Vec<OverpassPoint>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassPoint {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassResponse {
    pub fn into_ways(self) -> Vec<Way> {
        let total = self.elements.len();
        let mut missing_geometry = 0;

        let ways: Vec<Way> = self
            .elements
            .into_iter()
            .filter(|e| e.kind == "way")
            .map(|e| {
                if e.geometry.is_none() {
                    missing_geometry += 1;
                    debug!("Element way/{} has no geometry", e.id);
                }
                Way {
                    id: Some(e.id),
                    geometry: e.geometry.map(|points| {
                        points
                            .into_iter()
                            .map(|p| LatLng::new(p.lat, p.lon))
                            .collect()
                    }),
                }
            })
            .collect();

        if missing_geometry > 0 {
            warn!(
                "{} Overpass ways came without geometry, was the query run with `out geom`?",
                missing_geometry
            );
        }
        info!("Read {} ways out of {} Overpass elements", ways.len(), total);

        ways
    }
}

/// Decodes an Overpass JSON body. A timed out or aborted query still comes
/// back as HTTP 200 with a `runtime error` remark, which is an error here.
pub fn parse_response(body: &str) -> Result<Vec<Way>, Error> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    if let Some(remark) = &response.remark {
        if remark.starts_with("runtime error") || remark.starts_with("runtime remark") {
            return Err(Error::Overpass(remark.clone()));
        }
        warn!("Overpass remark: {}", remark);
    }
    if response.elements.is_empty() {
        warn!("Overpass response holds no elements");
    }
    Ok(response.into_ways())
}

/// Reads a saved Overpass JSON response.
pub fn load_ways(path: &str) -> Result<Vec<Way>, Error> {
    let body = fs::read_to_string(path)?;
    parse_response(&body)
}

/// Runs `query` against an Overpass interpreter endpoint.
pub async fn fetch_ways(
    client: &reqwest::Client,
    endpoint: &str,
    query: &str,
) -> Result<Vec<Way>, Error> {
    info!("Querying Overpass at {}", endpoint);
    let body = client
        .post(endpoint)
        .form(&[("data", query)])
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_response(&body)
}
