//! Circuit instructions combining gates with operands.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, StandardGate};
use crate::kind::OpKind;
use crate::parameter::ParameterExpression;
use crate::wire::{ClbitId, QubitId, WireId};

/// The kind of instruction in a circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// A quantum gate operation.
    Gate(Gate),
    /// Measurement operation.
    Measure,
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point).
    Barrier,
    /// Delay instruction.
    Delay {
        /// Duration in device-specific units.
        duration: u64,
    },
}

/// A complete instruction with operands.
///
/// Operands are ordered: the position of a qubit in `qubits` is meaningful
/// (control before target, for instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The kind of instruction.
    pub kind: InstructionKind,
    /// Qubits this instruction operates on.
    pub qubits: Vec<QubitId>,
    /// Classical bits this instruction operates on (for measure).
    pub clbits: Vec<ClbitId>,
}

impl Instruction {
    /// Create a gate instruction.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Gate(gate.into()),
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a single-qubit gate instruction.
    pub fn single_qubit_gate(gate: StandardGate, qubit: QubitId) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a two-qubit gate instruction.
    pub fn two_qubit_gate(gate: StandardGate, q1: QubitId, q2: QubitId) -> Self {
        Self::gate(gate, [q1, q2])
    }

    /// Create a measurement instruction.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            kind: InstructionKind::Measure,
            qubits: vec![qubit],
            clbits: vec![clbit],
        }
    }

    /// Create a reset instruction.
    pub fn reset(qubit: QubitId) -> Self {
        Self {
            kind: InstructionKind::Reset,
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Create a barrier instruction.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: InstructionKind::Barrier,
            qubits: qubits.into_iter().collect(),
            clbits: vec![],
        }
    }

    /// Create a delay instruction.
    pub fn delay(qubit: QubitId, duration: u64) -> Self {
        Self {
            kind: InstructionKind::Delay { duration },
            qubits: vec![qubit],
            clbits: vec![],
        }
    }

    /// Check if this is a gate instruction.
    pub fn is_gate(&self) -> bool {
        matches!(self.kind, InstructionKind::Gate(_))
    }

    /// Check if this is a gate guarded by a classical condition.
    pub fn is_conditioned(&self) -> bool {
        matches!(&self.kind, InstructionKind::Gate(g) if g.condition.is_some())
    }

    /// Get the gate if this is a gate instruction.
    pub fn as_gate(&self) -> Option<&Gate> {
        match &self.kind {
            InstructionKind::Gate(g) => Some(g),
            _ => None,
        }
    }

    /// The kind tag of this instruction, or `None` for custom gates.
    pub fn op_kind(&self) -> Option<OpKind> {
        match &self.kind {
            InstructionKind::Gate(g) => g.op_kind(),
            InstructionKind::Measure => Some(OpKind::Measure),
            InstructionKind::Reset => Some(OpKind::Reset),
            InstructionKind::Barrier => Some(OpKind::Barrier),
            InstructionKind::Delay { .. } => Some(OpKind::Delay),
        }
    }

    /// Returns `true` if this instruction is not a unitary gate.
    pub fn is_non_unitary(&self) -> bool {
        !self.is_gate()
    }

    /// Continuous parameters of the instruction, in declaration order.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match &self.kind {
            InstructionKind::Gate(g) => g.kind.parameters(),
            _ => vec![],
        }
    }

    /// All wires this instruction acts on: qubits first, then classical bits.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.qubits
            .iter()
            .copied()
            .map(WireId::Qubit)
            .chain(self.clbits.iter().copied().map(WireId::Clbit))
    }

    /// Returns `true` if this instruction acts on `wire`.
    pub fn touches(&self, wire: WireId) -> bool {
        match wire {
            WireId::Qubit(q) => self.qubits.contains(&q),
            WireId::Clbit(c) => self.clbits.contains(&c),
        }
    }

    /// Returns `true` if the two instructions share at least one wire.
    pub fn shares_wire_with(&self, other: &Instruction) -> bool {
        self.qubits.iter().any(|q| other.qubits.contains(q))
            || self.clbits.iter().any(|c| other.clbits.contains(c))
    }

    /// Get the name of the instruction.
    pub fn name(&self) -> &str {
        match &self.kind {
            InstructionKind::Gate(g) => g.name(),
            InstructionKind::Measure => "measure",
            InstructionKind::Reset => "reset",
            InstructionKind::Barrier => "barrier",
            InstructionKind::Delay { .. } => "delay",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{ClassicalCondition, CustomGate};

    #[test]
    fn test_gate_instruction() {
        let inst = Instruction::single_qubit_gate(StandardGate::H, QubitId(0));
        assert!(inst.is_gate());
        assert_eq!(inst.qubits.len(), 1);
        assert_eq!(inst.name(), "h");
        assert_eq!(inst.op_kind(), Some(OpKind::H));
    }

    #[test]
    fn test_measure_wires() {
        let inst = Instruction::measure(QubitId(2), ClbitId(0));
        assert_eq!(inst.op_kind(), Some(OpKind::Measure));
        assert!(inst.is_non_unitary());
        assert_eq!(
            inst.wires().collect::<Vec<_>>(),
            vec![WireId::Qubit(QubitId(2)), WireId::Clbit(ClbitId(0))]
        );
        assert!(inst.touches(WireId::Clbit(ClbitId(0))));
        assert!(!inst.touches(WireId::Qubit(QubitId(0))));
    }

    #[test]
    fn test_shares_wire_with() {
        let cx = Instruction::two_qubit_gate(StandardGate::CX, QubitId(0), QubitId(1));
        let h1 = Instruction::single_qubit_gate(StandardGate::H, QubitId(1));
        let h2 = Instruction::single_qubit_gate(StandardGate::H, QubitId(2));
        assert!(cx.shares_wire_with(&h1));
        assert!(!cx.shares_wire_with(&h2));

        let m0 = Instruction::measure(QubitId(0), ClbitId(0));
        let m3 = Instruction::measure(QubitId(3), ClbitId(0));
        assert!(m0.shares_wire_with(&m3));
    }

    #[test]
    fn test_instruction_parameters() {
        let bound = Instruction::single_qubit_gate(
            StandardGate::Rz(ParameterExpression::constant(0.5)),
            QubitId(0),
        );
        let free = Instruction::single_qubit_gate(
            StandardGate::Rz(ParameterExpression::symbol("theta")),
            QubitId(0),
        );
        assert!(!bound.parameters()[0].is_symbolic());
        assert!(free.parameters()[0].is_symbolic());
        assert_eq!(bound.parameters().len(), 1);
    }

    #[test]
    fn test_conditioned_and_custom() {
        let cond = Instruction::gate(
            Gate::standard(StandardGate::X).with_condition(ClassicalCondition::new("c", 1)),
            [QubitId(0)],
        );
        assert!(cond.is_conditioned());

        let custom = Instruction::gate(CustomGate::new("oracle", 2), [QubitId(0), QubitId(1)]);
        assert!(custom.op_kind().is_none());
        assert_eq!(custom.name(), "oracle");
    }

    #[test]
    fn test_barrier_instruction() {
        let inst = Instruction::barrier([QubitId(0), QubitId(1), QubitId(2)]);
        assert!(inst.is_non_unitary());
        assert_eq!(inst.op_kind(), Some(OpKind::Barrier));
        assert_eq!(inst.qubits.len(), 3);
    }
}
