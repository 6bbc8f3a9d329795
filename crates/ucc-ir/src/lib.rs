//! UCC Circuit Intermediate Representation
//!
//! Circuit model consumed by the UCC commutation analysis: wires, operations
//! tagged with a closed [`OpKind`], and a DAG whose per-wire edges form simple
//! paths so that "the order of operations on a wire" is well defined.
//!
//! # Core Components
//!
//! - **Wires**: [`QubitId`], [`ClbitId`] and the [`WireId`] they induce
//! - **Kinds**: [`OpKind`], the parameter-free tag commutation tables are keyed on
//! - **Gates**: [`StandardGate`] for built-in gates and [`CustomGate`] for opaque ones
//! - **Parameters**: [`ParameterExpression`] for rotation angles, bound or symbolic
//! - **Instructions**: [`Instruction`] combining an operation with its operands
//! - **DAG**: [`CircuitDag`], with [`CircuitDag::nodes_on_wire`] giving wire order
//! - **Circuit**: [`Circuit`] builder API
//!
//! # Example
//!
//! ```rust
//! use ucc_ir::{Circuit, QubitId, WireId};
//!
//! let mut circuit = Circuit::with_size("example", 2, 0);
//! circuit.rz(0.5, QubitId(0)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! let dag = circuit.into_dag();
//! let on_q0 = dag.nodes_on_wire(WireId::Qubit(QubitId(0))).unwrap();
//! assert_eq!(on_q0.len(), 2);
//! ```

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod kind;
pub mod parameter;
pub mod wire;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex};
pub use error::{IrError, IrResult};
pub use gate::{ClassicalCondition, CustomGate, Gate, GateKind, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use kind::OpKind;
pub use parameter::ParameterExpression;
pub use wire::{ClbitId, QubitId, WireId};
