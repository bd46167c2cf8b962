use cascadia_core::{AdjacencyView, Graph, Thresholds};
use cascadia_test_support::graphs::EdgeList;

#[must_use]
pub fn view(list: EdgeList) -> AdjacencyView {
    Graph::new(list.nodes, list.edges)
        .expect("fixture graph must be valid")
        .adjacency()
}

#[must_use]
pub fn uniform_thresholds(nodes: usize, value: f64) -> Thresholds {
    Thresholds::new(vec![value; nodes]).expect("thresholds must be valid")
}
