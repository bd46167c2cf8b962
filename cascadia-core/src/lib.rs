//! Cascadia core library: information cascades on static networks.
//!
//! Compares seeding strategies for SIR and linear threshold cascades by
//! sweeping the seed-set size and averaging cascade sizes over Monte Carlo
//! repeats.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod cascade;
mod error;
mod experiment;
mod generate;
mod graph;
mod grid;
mod rng;
mod seed;
mod sweep;
mod thresholds;

pub use crate::{
    cascade::{CascadeEngine, Probability, SirCascade, ThresholdCascade},
    error::{GraphError, GraphErrorCode, Result, SimulationError, SimulationErrorCode},
    experiment::{CascadeModelKind, Experiment, ExperimentBuilder, ExperimentReport},
    generate::erdos_renyi,
    graph::{AdjacencyView, Graph},
    grid::{CascadeStats, DEFAULT_SEED_COUNTS, DEFAULT_TRANSMISSIONS, GridConfig, GridRow},
    seed::{EigenParams, SeedSelector, SeedStrategy, degree_centrality, eigenvector_centrality},
    sweep::{CascadeModel, Sweep, SweepBuilder, SweepCurve, SweepPoint},
    thresholds::{MIXTURE_SEGMENTS, MixtureWeights, ThresholdDistribution, Thresholds},
};
