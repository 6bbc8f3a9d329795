//! Commutation analysis for quantum circuits.
//!
//! This crate decides which operations of a circuit may be reordered and
//! groups them into maximal commuting blocks, per wire. Optimization passes
//! (cancellation, rebasing, scheduling) read the result instead of
//! re-deriving legal reorderings themselves.
//!
//! # Architecture
//!
//! ```text
//! CircuitDag (ucc-ir)
//!       │  WireOrderedGraph
//!       ▼
//! ┌─────────────────────┐      ┌──────────────────────────────┐
//! │ CommutationAnalysis │ ───► │ CommutationChecker (oracle)  │
//! └─────────────────────┘      │  1. disjoint wires           │
//!       │                      │  2. CommutationLibrary       │
//!       │                      │  3. cache ─► ExactCommutation│
//!       ▼                      └──────────────────────────────┘
//! CommutationSets { table: wire → blocks, index: (op, wire) → block }
//! ```
//!
//! # Example
//!
//! ```rust
//! use ucc_compile::commutation::CheckerConfig;
//! use ucc_compile::{CommutationSets, PassManagerBuilder, PropertySet};
//! use ucc_ir::{Circuit, QubitId, WireId};
//!
//! let mut circuit = Circuit::with_size("demo", 2, 0);
//! circuit.rz(0.25, QubitId(0)).unwrap();
//! circuit.cz(QubitId(0), QubitId(1)).unwrap();
//! circuit.h(QubitId(0)).unwrap();
//!
//! let pm = PassManagerBuilder::new()
//!     .with_commutation_analysis(CheckerConfig::default().without_exact_fallback())
//!     .build()
//!     .unwrap();
//!
//! let mut dag = circuit.into_dag();
//! let mut props = PropertySet::new();
//! pm.run(&mut dag, &mut props).unwrap();
//!
//! let sets = props.get::<CommutationSets>().unwrap();
//! // {rz, cz} then {h}
//! assert_eq!(sets.blocks(WireId::Qubit(QubitId(0))).unwrap().len(), 2);
//! ```
//!
//! # Exact backends
//!
//! Pairs the static table cannot decide go to an [`ExactCommutation`]
//! backend, typically a matrix check. None ships with this crate; any closure
//! with the right signature can be attached to a [`CommutationChecker`].

pub mod commutation;
pub mod error;
pub mod manager;
pub mod pass;
pub mod property;

pub use commutation::{
    CheckerConfig, CommutationAnalysis, CommutationChecker, CommutationOracle, CommutationSets,
    ExactCommutation, WireOrderedGraph,
};
pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{AnalysisPass, Pass, PassKind};
pub use property::PropertySet;
