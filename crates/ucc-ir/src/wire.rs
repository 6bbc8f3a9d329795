//! Wire identifiers: qubits, classical bits, and the wires they induce.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Identifier of a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A resource line of the circuit.
///
/// Every operation touching a wire is totally ordered along it. Qubit wires
/// sort before classical wires, so iterating a `BTreeMap<WireId, _>` visits
/// `q0, q1, …, c0, c1, …`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl WireId {
    /// Returns `true` for quantum wires.
    #[inline]
    pub fn is_qubit(&self) -> bool {
        matches!(self, WireId::Qubit(_))
    }
}

impl fmt::Display for WireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireId::Qubit(q) => write!(f, "{q}"),
            WireId::Clbit(c) => write!(f, "{c}"),
        }
    }
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_display() {
        assert_eq!(WireId::from(QubitId(3)).to_string(), "q3");
        assert_eq!(WireId::from(ClbitId(1)).to_string(), "c1");
    }

    #[test]
    fn test_qubit_wires_sort_first() {
        let mut wires = vec![
            WireId::Clbit(ClbitId(0)),
            WireId::Qubit(QubitId(2)),
            WireId::Qubit(QubitId(0)),
        ];
        wires.sort();
        assert_eq!(
            wires,
            vec![
                WireId::Qubit(QubitId(0)),
                WireId::Qubit(QubitId(2)),
                WireId::Clbit(ClbitId(0)),
            ]
        );
    }
}
