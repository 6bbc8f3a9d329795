//! Read-only view of a dependency graph in wire order.

use ucc_ir::{CircuitDag, Instruction, IrError, NodeIndex, WireId};

use crate::error::{CompileError, CompileResult};

/// A dependency graph whose edges on each wire form a simple path.
///
/// This is all the commutation builder needs from a circuit representation.
/// Implementations report a broken wire through
/// [`CompileError::MalformedGraph`]; the builder cross-checks the remaining
/// invariants itself.
pub trait WireOrderedGraph: Sync {
    /// Every wire of the graph, in a deterministic order.
    fn wires(&self) -> Vec<WireId>;

    /// Nodes on `wire`, first to last, excluding the wire's boundary nodes.
    fn nodes_on_wire(&self, wire: WireId) -> CompileResult<Vec<NodeIndex>>;

    /// Every operation node of the graph.
    fn op_nodes(&self) -> Vec<NodeIndex>;

    /// The operation stored at `node`, if `node` is an operation.
    fn instruction(&self, node: NodeIndex) -> Option<&Instruction>;
}

impl WireOrderedGraph for CircuitDag {
    fn wires(&self) -> Vec<WireId> {
        CircuitDag::wires(self)
    }

    fn nodes_on_wire(&self, wire: WireId) -> CompileResult<Vec<NodeIndex>> {
        CircuitDag::nodes_on_wire(self, wire).map_err(|err| match err {
            IrError::InvalidDag(reason) => CompileError::MalformedGraph { wire, reason },
            IrError::WireNotFound(_) => CompileError::MalformedGraph {
                wire,
                reason: "wire is not part of the graph".into(),
            },
            other => CompileError::Ir(other),
        })
    }

    fn op_nodes(&self) -> Vec<NodeIndex> {
        self.graph()
            .node_indices()
            .filter(|&idx| self.graph()[idx].is_op())
            .collect()
    }

    fn instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.get_instruction(node)
    }
}
