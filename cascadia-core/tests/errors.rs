use std::sync::Arc;

use cascadia_core::{GraphError, GraphErrorCode, SimulationError, SimulationErrorCode};
use rstest::rstest;

#[rstest]
#[case(
    GraphError::EndpointOutOfRange { left: 0, right: 9, node_count: 3 },
    GraphErrorCode::EndpointOutOfRange,
)]
#[case(GraphError::SelfLoop { node: 1 }, GraphErrorCode::SelfLoop)]
#[case(GraphError::DuplicateEdge { left: 0, right: 1 }, GraphErrorCode::DuplicateEdge)]
#[case(
    GraphError::InvalidEdgeProbability { got: 1.5 },
    GraphErrorCode::InvalidEdgeProbability,
)]
fn returns_expected_graph_code(#[case] error: GraphError, #[case] expected: GraphErrorCode) {
    assert_eq!(error.code(), expected);
    assert!(error.code().as_str().starts_with("GRAPH_"));
}

#[rstest]
#[case(
    SimulationError::InvalidProbability { parameter: "threshold", got: -1.0 },
    SimulationErrorCode::InvalidProbability,
    None,
)]
#[case(SimulationError::InvalidRepeats { got: 0 }, SimulationErrorCode::InvalidRepeats, None)]
#[case(SimulationError::InvalidMaxSeeds { got: 0 }, SimulationErrorCode::InvalidMaxSeeds, None)]
#[case(
    SimulationError::InvalidCount { parameter: "graphs", got: 0 },
    SimulationErrorCode::InvalidCount,
    None,
)]
#[case(
    SimulationError::SeedCountExceedsNodes { requested: 4, nodes: 3 },
    SimulationErrorCode::SeedCountExceedsNodes,
    None,
)]
#[case(
    SimulationError::UnknownDistribution { got: 7 },
    SimulationErrorCode::UnknownDistribution,
    None,
)]
#[case(
    SimulationError::UnknownStrategy { name: Arc::from("pagerank") },
    SimulationErrorCode::UnknownStrategy,
    None,
)]
#[case(
    SimulationError::UnknownModel { name: Arc::from("bass") },
    SimulationErrorCode::UnknownModel,
    None,
)]
#[case(SimulationError::NoStrategies, SimulationErrorCode::NoStrategies, None)]
#[case(
    SimulationError::SeedOutOfRange { seed: 5, nodes: 5 },
    SimulationErrorCode::SeedOutOfRange,
    None,
)]
#[case(SimulationError::DuplicateSeed { seed: 2 }, SimulationErrorCode::DuplicateSeed, None)]
#[case(
    SimulationError::ThresholdLengthMismatch { thresholds: 2, nodes: 3 },
    SimulationErrorCode::ThresholdLengthMismatch,
    None,
)]
#[case(SimulationError::EmptyGraph, SimulationErrorCode::EmptyGraph, None)]
#[case(
    SimulationError::Graph(GraphError::SelfLoop { node: 0 }),
    SimulationErrorCode::GraphFailure,
    Some(GraphErrorCode::SelfLoop),
)]
fn returns_expected_simulation_code(
    #[case] error: SimulationError,
    #[case] expected: SimulationErrorCode,
    #[case] graph_code: Option<GraphErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
    assert_eq!(error.graph_code(), graph_code);
}

#[test]
fn graph_errors_convert_into_simulation_errors() {
    let error: SimulationError = GraphError::InvalidEdgeProbability { got: 2.0 }.into();
    assert_eq!(error.to_string(), "graph construction failed: edge probability must lie in [0, 1] (got 2)");
}
