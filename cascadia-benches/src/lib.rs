//! Benchmark support crate for cascadia.
//!
//! Provides seeded synthetic graphs and parameter types used by Criterion
//! benchmarks for the cascade engines, centrality ranking, and the seed-size
//! sweep.

pub mod error;
pub mod params;
pub mod source;
