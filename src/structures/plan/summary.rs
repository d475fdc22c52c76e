use async_graphql::SimpleObject;

use crate::structures::Graph;

#[derive(Debug, SimpleObject, Clone, Copy)]
pub struct GraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

impl From<&Graph> for GraphSummary {
    fn from(graph: &Graph) -> GraphSummary {
        GraphSummary {
            nodes: graph.node_count(),
            edges: graph.edge_count(),
        }
    }
}
