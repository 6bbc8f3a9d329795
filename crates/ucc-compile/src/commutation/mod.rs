//! Commutation analysis.
//!
//! [`CommutationAnalysis`] walks every wire of a dependency graph and groups
//! consecutive operations into blocks whose members pairwise commute. Whether
//! two operations commute is decided by a [`CommutationOracle`]; the default
//! [`CommutationChecker`] tries, in order, an independence check, the static
//! [`CommutationLibrary`] and a cached [`ExactCommutation`] backend.

mod analysis;
mod cache;
mod checker;
mod config;
mod graph;
mod library;


pub use analysis::{Block, CommutationAnalysis, CommutationSets};
pub use cache::{CacheKey, CacheStats, CommutationCache, KindKey, ParamKey};
pub use checker::{CommutationChecker, CommutationOracle, ExactCommutation, QubitPlacement};
pub use config::{CheckerConfig, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_MAX_NUM_QUBITS};
pub use graph::WireOrderedGraph;
pub use library::CommutationLibrary;
