use thiserror::Error;

use crate::structures::{LatLng, NodeID};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Node {0} is not part of the graph")]
    NodeNotFound(NodeID),
    #[error("Invalid coordinate ({0})")]
    InvalidCoordinate(LatLng),
    #[error("No nearby point found")]
    NoNearbyPoint,
    #[error("Route search cancelled")]
    Cancelled,
    #[error("Geodata request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("Overpass query failed: {0}")]
    Overpass(String),
    #[error("Failed to decode geodata: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Failed to read PBF: {0}")]
    Pbf(#[from] osmpbf::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether the graph could not be built because a data source failed.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Upstream(_)
                | Error::Overpass(_)
                | Error::Decode(_)
                | Error::Pbf(_)
                | Error::Io(_)
        )
    }
}
