//! Error types for the Cascadia simulation kernel.
//!
//! Defines the graph and simulation error enums exposed by the public API,
//! their stable machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while constructing or generating a [`crate::Graph`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// An edge referenced a node outside `0..node_count`.
    #[error("edge ({left}, {right}) references a node outside 0..{node_count}")]
    EndpointOutOfRange {
        /// Left endpoint as provided.
        left: usize,
        /// Right endpoint as provided.
        right: usize,
        /// Number of nodes in the graph.
        node_count: usize,
    },
    /// An edge connected a node to itself.
    #[error("edge ({node}, {node}) is a self-loop")]
    SelfLoop {
        /// Node carrying the loop.
        node: usize,
    },
    /// The same undirected edge appeared more than once.
    #[error("edge ({left}, {right}) appears more than once")]
    DuplicateEdge {
        /// Smaller endpoint of the repeated edge.
        left: usize,
        /// Larger endpoint of the repeated edge.
        right: usize,
    },
    /// Edge probability for a random graph was not a finite value in `[0, 1]`.
    #[error("edge probability must lie in [0, 1] (got {got})")]
    InvalidEdgeProbability {
        /// Probability supplied by the caller.
        got: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// An edge referenced a node outside the graph.
        EndpointOutOfRange => EndpointOutOfRange { .. } => "GRAPH_ENDPOINT_OUT_OF_RANGE",
        /// An edge connected a node to itself.
        SelfLoop => SelfLoop { .. } => "GRAPH_SELF_LOOP",
        /// The same undirected edge appeared more than once.
        DuplicateEdge => DuplicateEdge { .. } => "GRAPH_DUPLICATE_EDGE",
        /// Edge probability was outside `[0, 1]`.
        InvalidEdgeProbability => InvalidEdgeProbability { .. } => "GRAPH_INVALID_EDGE_PROBABILITY",
    }
}

/// Error type produced when configuring or running a cascade simulation.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimulationError {
    /// A probability parameter was outside `[0, 1]` or not finite.
    #[error("{parameter} must lie in [0, 1] (got {got})")]
    InvalidProbability {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// Value supplied by the caller.
        got: f64,
    },
    /// The repeat count must be at least one.
    #[error("repeats must be at least 1 (got {got})")]
    InvalidRepeats {
        /// The invalid repeat count.
        got: usize,
    },
    /// The maximum seed-set size must be at least one.
    #[error("max_seeds must be at least 1 (got {got})")]
    InvalidMaxSeeds {
        /// The invalid seed-set size.
        got: usize,
    },
    /// A grid-comparison count must be at least one.
    #[error("{parameter} must be at least 1 (got {got})")]
    InvalidCount {
        /// Name of the offending count.
        parameter: &'static str,
        /// The invalid count.
        got: usize,
    },
    /// More seeds were requested than the graph has nodes.
    #[error("{requested} seeds were requested but the graph has only {nodes} nodes")]
    SeedCountExceedsNodes {
        /// Requested seed-set size.
        requested: usize,
        /// Number of nodes in the graph.
        nodes: usize,
    },
    /// The threshold distribution identifier is not one of `1..=6`.
    #[error("threshold distribution must be one of 1..=6 (got {got})")]
    UnknownDistribution {
        /// The unsupported identifier.
        got: u8,
    },
    /// A seed strategy name was not recognised.
    #[error("unknown seed strategy `{name}`; expected `random`, `degree` or `eigen`")]
    UnknownStrategy {
        /// The unrecognised name.
        name: Arc<str>,
    },
    /// A cascade model name was not recognised.
    #[error("unknown cascade model `{name}`; expected `sir` or `threshold`")]
    UnknownModel {
        /// The unrecognised name.
        name: Arc<str>,
    },
    /// An experiment was configured without any seed strategy.
    #[error("at least one seed strategy must be requested")]
    NoStrategies,
    /// A seed referenced a node outside the graph.
    #[error("seed {seed} is outside 0..{nodes}")]
    SeedOutOfRange {
        /// The offending seed.
        seed: usize,
        /// Number of nodes in the graph.
        nodes: usize,
    },
    /// The same node was listed twice in a seed set.
    #[error("seed {seed} appears more than once")]
    DuplicateSeed {
        /// The repeated seed.
        seed: usize,
    },
    /// The threshold array does not have one entry per node.
    #[error("threshold array has {thresholds} entries but the graph has {nodes} nodes")]
    ThresholdLengthMismatch {
        /// Length of the threshold array.
        thresholds: usize,
        /// Number of nodes in the graph.
        nodes: usize,
    },
    /// The graph has no nodes to simulate on.
    #[error("cannot simulate a cascade on a graph without nodes")]
    EmptyGraph,
    /// Graph construction or generation failed.
    #[error("graph construction failed: {0}")]
    Graph(#[from] GraphError),
}

define_error_codes! {
    /// Stable codes describing [`SimulationError`] variants.
    enum SimulationErrorCode for SimulationError {
        /// A probability parameter was out of range.
        InvalidProbability => InvalidProbability { .. } => "SIMULATION_INVALID_PROBABILITY",
        /// The repeat count was zero.
        InvalidRepeats => InvalidRepeats { .. } => "SIMULATION_INVALID_REPEATS",
        /// The maximum seed-set size was zero.
        InvalidMaxSeeds => InvalidMaxSeeds { .. } => "SIMULATION_INVALID_MAX_SEEDS",
        /// A grid-comparison count was zero.
        InvalidCount => InvalidCount { .. } => "SIMULATION_INVALID_COUNT",
        /// More seeds were requested than nodes exist.
        SeedCountExceedsNodes => SeedCountExceedsNodes { .. } => "SIMULATION_SEED_COUNT_EXCEEDS_NODES",
        /// Threshold distribution identifier was unsupported.
        UnknownDistribution => UnknownDistribution { .. } => "SIMULATION_UNKNOWN_DISTRIBUTION",
        /// Seed strategy name was unsupported.
        UnknownStrategy => UnknownStrategy { .. } => "SIMULATION_UNKNOWN_STRATEGY",
        /// Cascade model name was unsupported.
        UnknownModel => UnknownModel { .. } => "SIMULATION_UNKNOWN_MODEL",
        /// No seed strategy was requested.
        NoStrategies => NoStrategies => "SIMULATION_NO_STRATEGIES",
        /// A seed was outside the graph.
        SeedOutOfRange => SeedOutOfRange { .. } => "SIMULATION_SEED_OUT_OF_RANGE",
        /// A seed was repeated.
        DuplicateSeed => DuplicateSeed { .. } => "SIMULATION_DUPLICATE_SEED",
        /// Threshold array length did not match the graph.
        ThresholdLengthMismatch => ThresholdLengthMismatch { .. } => "SIMULATION_THRESHOLD_LENGTH_MISMATCH",
        /// The graph had no nodes.
        EmptyGraph => EmptyGraph => "SIMULATION_EMPTY_GRAPH",
        /// Graph construction failed.
        GraphFailure => Graph(..) => "SIMULATION_GRAPH_FAILURE",
    }
}

impl SimulationError {
    /// Retrieve the inner [`GraphErrorCode`] when the error originated in graph
    /// construction.
    #[must_use]
    pub const fn graph_code(&self) -> Option<GraphErrorCode> {
        match self {
            Self::Graph(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the simulation API.
pub type Result<T> = core::result::Result<T, SimulationError>;
