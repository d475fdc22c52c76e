use crate::structures::NodeID;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreetEdgeData {
    pub origin: NodeID,
    pub destination: NodeID,
    /// Great-circle length in kilometres.
    pub length: f64,
}
