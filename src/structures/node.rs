use std::fmt::Display;

use crate::structures::{LatLng, NodeKey};

#[derive(Debug, Clone, Copy)]
pub struct NodeData {
    pub key: NodeKey,
    pub lat_lng: LatLng,
}

impl NodeData {
    pub fn new(key: NodeKey) -> NodeData {
        NodeData {
            key,
            lat_lng: LatLng::from(key),
        }
    }

    pub fn loc(&self) -> LatLng {
        self.lat_lng
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeID(pub usize);

impl Display for NodeID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return self.0.fmt(f);
    }
}
