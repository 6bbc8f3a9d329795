//! Closed set of operation kinds.
//!
//! [`OpKind`] is a parameter-free tag identifying the semantics of an
//! operation. Commutation tables are keyed on pairs of tags, so adding a new
//! gate family means adding a variant here and a row to the table, with no
//! new control flow.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// The kind of an operation, stripped of parameters and operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// Identity.
    Id,
    /// Pauli-X.
    X,
    /// Pauli-Y.
    Y,
    /// Pauli-Z.
    Z,
    /// Hadamard.
    H,
    /// S (sqrt(Z)).
    S,
    /// S-dagger.
    Sdg,
    /// T (fourth root of Z).
    T,
    /// T-dagger.
    Tdg,
    /// sqrt(X).
    SX,
    /// sqrt(X)-dagger.
    SXdg,
    /// Rotation around X.
    Rx,
    /// Rotation around Y.
    Ry,
    /// Rotation around Z.
    Rz,
    /// Phase.
    P,
    /// Universal single-qubit gate.
    U,
    /// Controlled-X.
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Controlled-Hadamard.
    CH,
    /// SWAP.
    Swap,
    /// iSWAP.
    ISwap,
    /// Controlled Rx.
    CRx,
    /// Controlled Ry.
    CRy,
    /// Controlled Rz.
    CRz,
    /// Controlled phase.
    CP,
    /// XX rotation.
    RXX,
    /// YY rotation.
    RYY,
    /// ZZ rotation.
    RZZ,
    /// Toffoli.
    CCX,
    /// Fredkin.
    CSwap,
    /// Measurement.
    Measure,
    /// Reset to |0⟩.
    Reset,
    /// Barrier directive.
    Barrier,
    /// Idle delay.
    Delay,
}

impl OpKind {
    /// Every kind, in declaration order.
    pub const ALL: [OpKind; 35] = [
        OpKind::Id,
        OpKind::X,
        OpKind::Y,
        OpKind::Z,
        OpKind::H,
        OpKind::S,
        OpKind::Sdg,
        OpKind::T,
        OpKind::Tdg,
        OpKind::SX,
        OpKind::SXdg,
        OpKind::Rx,
        OpKind::Ry,
        OpKind::Rz,
        OpKind::P,
        OpKind::U,
        OpKind::CX,
        OpKind::CY,
        OpKind::CZ,
        OpKind::CH,
        OpKind::Swap,
        OpKind::ISwap,
        OpKind::CRx,
        OpKind::CRy,
        OpKind::CRz,
        OpKind::CP,
        OpKind::RXX,
        OpKind::RYY,
        OpKind::RZZ,
        OpKind::CCX,
        OpKind::CSwap,
        OpKind::Measure,
        OpKind::Reset,
        OpKind::Barrier,
        OpKind::Delay,
    ];

    /// The canonical lowercase name of this kind.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            OpKind::Id => "id",
            OpKind::X => "x",
            OpKind::Y => "y",
            OpKind::Z => "z",
            OpKind::H => "h",
            OpKind::S => "s",
            OpKind::Sdg => "sdg",
            OpKind::T => "t",
            OpKind::Tdg => "tdg",
            OpKind::SX => "sx",
            OpKind::SXdg => "sxdg",
            OpKind::Rx => "rx",
            OpKind::Ry => "ry",
            OpKind::Rz => "rz",
            OpKind::P => "p",
            OpKind::U => "u",
            OpKind::CX => "cx",
            OpKind::CY => "cy",
            OpKind::CZ => "cz",
            OpKind::CH => "ch",
            OpKind::Swap => "swap",
            OpKind::ISwap => "iswap",
            OpKind::CRx => "crx",
            OpKind::CRy => "cry",
            OpKind::CRz => "crz",
            OpKind::CP => "cp",
            OpKind::RXX => "rxx",
            OpKind::RYY => "ryy",
            OpKind::RZZ => "rzz",
            OpKind::CCX => "ccx",
            OpKind::CSwap => "cswap",
            OpKind::Measure => "measure",
            OpKind::Reset => "reset",
            OpKind::Barrier => "barrier",
            OpKind::Delay => "delay",
        }
    }

    /// Returns `true` for kinds that are not unitary gates.
    ///
    /// Such operations never commute with an operation sharing a wire.
    #[inline]
    pub fn is_non_unitary(self) -> bool {
        matches!(
            self,
            OpKind::Measure | OpKind::Reset | OpKind::Barrier | OpKind::Delay
        )
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OpKind {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| IrError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_roundtrips_through_from_str() {
        for kind in OpKind::ALL {
            assert_eq!(kind.name().parse::<OpKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        assert!(matches!(
            "frobnicate".parse::<OpKind>(),
            Err(IrError::UnknownKind(name)) if name == "frobnicate"
        ));
    }

    #[test]
    fn test_serde_uses_gate_names() {
        let json = serde_json::to_string(&OpKind::SXdg).unwrap();
        assert_eq!(json, "\"sxdg\"");
        let kind: OpKind = serde_json::from_str("\"rzz\"").unwrap();
        assert_eq!(kind, OpKind::RZZ);
    }

    #[test]
    fn test_non_unitary_kinds() {
        assert!(OpKind::Measure.is_non_unitary());
        assert!(OpKind::Barrier.is_non_unitary());
        assert!(!OpKind::CX.is_non_unitary());
    }
}
