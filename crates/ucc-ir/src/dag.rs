//! DAG-based circuit representation.
//!
//! Each wire is a simple path `In → op → … → op → Out` through the graph;
//! the order in which operations appear on that path is the wire order used
//! by commutation analysis.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::wire::{ClbitId, QubitId, WireId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// An edge in the circuit DAG representing a wire segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// Boundary nodes of a wire plus its current last node.
#[derive(Debug, Clone, Copy)]
struct WireEnds {
    input: NodeIndex,
    output: NodeIndex,
    /// The node just before `output`; `input` while the wire is empty.
    front: NodeIndex,
}

/// DAG-based circuit representation.
///
/// - Nodes are input nodes, output nodes, or operation nodes
/// - Edges carry the wire they belong to
/// - Each wire has exactly one input and one output node
///
/// ## Performance
///
/// Each wire keeps a `front` pointer to the node just before its output, so
/// `apply()` finds the predecessor in O(1) instead of scanning the incoming
/// edges of the output node.
#[derive(Debug, Clone, Default)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Boundary nodes for every wire.
    wires: FxHashMap<WireId, WireEnds>,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a qubit wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        self.add_wire(WireId::Qubit(qubit));
    }

    /// Add a classical wire. Adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        self.add_wire(WireId::Clbit(clbit));
    }

    fn add_wire(&mut self, wire: WireId) {
        if self.wires.contains_key(&wire) {
            return;
        }
        let input = self.graph.add_node(DagNode::In(wire));
        let output = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(input, output, DagEdge { wire });
        self.wires.insert(
            wire,
            WireEnds {
                input,
                output,
                front: input,
            },
        );
    }

    /// Append an instruction at the end of every wire it touches.
    #[allow(clippy::cast_possible_truncation)]
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            _ => None,
        };

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits() as usize;
            let got = instruction.qubits.len();
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: expected as u32,
                    got: got as u32,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.wires.contains_key(&WireId::Qubit(qubit)) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }
        for &clbit in &instruction.clbits {
            if !self.wires.contains_key(&WireId::Clbit(clbit)) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }
        let mut seen_clbits = FxHashSet::default();
        if let Some(&clbit) = instruction.clbits.iter().find(|&&c| !seen_clbits.insert(c)) {
            return Err(IrError::InvalidDag(format!(
                "Duplicate classical bit {clbit} in operation"
            )));
        }

        let wires: Vec<WireId> = instruction.wires().collect();
        let op_node = self.graph.add_node(DagNode::Op(instruction));

        for wire in wires {
            let ends = self.wires[&wire];

            let edge_id = self
                .graph
                .edges_directed(ends.front, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == ends.output)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for wire {wire}"
                    ))
                })?;

            self.graph.remove_edge(edge_id);
            self.graph.add_edge(ends.front, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, ends.output, DagEdge { wire });
            if let Some(ends) = self.wires.get_mut(&wire) {
                ends.front = op_node;
            }
        }

        Ok(op_node)
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Get a node by index.
    #[inline]
    pub fn node(&self, node: NodeIndex) -> Option<&DagNode> {
        self.graph.node_weight(node)
    }

    /// Operation nodes on `wire`, in wire order.
    ///
    /// Walks the wire's path from its input node to its output node. Fails if
    /// the path is broken, branches back on itself, or never reaches the output.
    pub fn nodes_on_wire(&self, wire: WireId) -> IrResult<Vec<NodeIndex>> {
        let ends = self
            .wires
            .get(&wire)
            .ok_or(IrError::WireNotFound(wire))?;

        let mut nodes = Vec::new();
        let mut current = ends.input;
        let max_steps = self.graph.node_count();

        while current != ends.output {
            let next = self
                .graph
                .edges_directed(current, Direction::Outgoing)
                .find(|e| e.weight().wire == wire)
                .map(|e| e.target())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Wire {wire} is broken: no outgoing edge from node {}",
                        current.index()
                    ))
                })?;

            if next != ends.output {
                nodes.push(next);
            }
            current = next;

            if nodes.len() > max_steps {
                return Err(IrError::InvalidDag(format!(
                    "Wire {wire} has too many steps (possible cycle)"
                )));
            }
        }

        Ok(nodes)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.wires.keys().filter(|w| w.is_qubit()).count()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.wires.len() - self.num_qubits()
    }

    /// Get the number of operations.
    #[inline]
    pub fn num_ops(&self) -> usize {
        self.graph.node_count().saturating_sub(2 * self.wires.len())
    }

    /// All wires, sorted (qubits first).
    pub fn wires(&self) -> Vec<WireId> {
        let mut wires: Vec<_> = self.wires.keys().copied().collect();
        wires.sort_unstable();
        wires
    }

    /// Qubits, sorted by id.
    pub fn qubits(&self) -> Vec<QubitId> {
        self.wires()
            .into_iter()
            .filter_map(|w| match w {
                WireId::Qubit(q) => Some(q),
                WireId::Clbit(_) => None,
            })
            .collect()
    }

    /// Classical bits, sorted by id.
    pub fn clbits(&self) -> Vec<ClbitId> {
        self.wires()
            .into_iter()
            .filter_map(|w| match w {
                WireId::Clbit(c) => Some(c),
                WireId::Qubit(_) => None,
            })
            .collect()
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }
}
