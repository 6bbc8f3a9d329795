//! Static table of operation kinds known to commute.

use rustc_hash::FxHashSet;
use ucc_ir::OpKind;

use super::config::CheckerConfig;

/// Gates diagonal in the computational basis.
const DIAGONAL: &[OpKind] = &[
    OpKind::Id,
    OpKind::Z,
    OpKind::S,
    OpKind::Sdg,
    OpKind::T,
    OpKind::Tdg,
    OpKind::Rz,
    OpKind::P,
    OpKind::CZ,
    OpKind::CP,
    OpKind::CRz,
    OpKind::RZZ,
];

/// Gates generated by Pauli-X terms only.
const X_AXIS: &[OpKind] = &[OpKind::X, OpKind::SX, OpKind::SXdg, OpKind::Rx, OpKind::RXX];

/// Gates generated by Pauli-Y terms only.
const Y_AXIS: &[OpKind] = &[OpKind::Y, OpKind::Ry, OpKind::RYY];

/// Unordered pairs of operation kinds that commute under every wire-overlap
/// pattern and every parameter value.
///
/// Lookups are symmetric: a pair is stored once with its smaller kind first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommutationLibrary {
    pairs: FxHashSet<(OpKind, OpKind)>,
}

impl CommutationLibrary {
    /// A library with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table.
    ///
    /// Gates within one family share an eigenbasis on every qubit they touch,
    /// so any two of them commute however their qubits overlap: the diagonal
    /// family, the X-axis family and the Y-axis family. The identity commutes
    /// with every unitary kind.
    pub fn standard() -> Self {
        let mut lib = Self::empty();
        for family in [DIAGONAL, X_AXIS, Y_AXIS] {
            for (i, &a) in family.iter().enumerate() {
                for &b in &family[i..] {
                    lib.insert(a, b);
                }
            }
        }
        for kind in OpKind::ALL.into_iter().filter(|k| !k.is_non_unitary()) {
            lib.insert(OpKind::Id, kind);
        }
        lib
    }

    /// Build the table a checker uses for `config`.
    ///
    /// The allow-list filters the built-in table; extra pairs are merged
    /// afterwards and are kept even when outside the allow-list.
    pub fn from_config(config: &CheckerConfig) -> Self {
        let mut lib = Self::standard();
        if let Some(allowed) = &config.allowed_kinds {
            lib.retain_kinds(allowed);
        }
        for &(a, b) in &config.extra_commutations {
            lib.insert(a, b);
        }
        lib
    }

    /// Record that `a` and `b` commute.
    pub fn insert(&mut self, a: OpKind, b: OpKind) {
        self.pairs.insert(ordered(a, b));
    }

    /// Returns `true` if the pair is in the table, in either order.
    #[inline]
    pub fn contains(&self, a: OpKind, b: OpKind) -> bool {
        self.pairs.contains(&ordered(a, b))
    }

    /// Drop every pair with a kind outside `allowed`.
    pub fn retain_kinds(&mut self, allowed: &[OpKind]) {
        let allowed: FxHashSet<OpKind> = allowed.iter().copied().collect();
        self.pairs
            .retain(|(a, b)| allowed.contains(a) && allowed.contains(b));
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if no pair is stored.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Stored pairs, smaller kind first, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (OpKind, OpKind)> + '_ {
        self.pairs.iter().copied()
    }
}

#[inline]
fn ordered(a: OpKind, b: OpKind) -> (OpKind, OpKind) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_families() {
        let lib = CommutationLibrary::standard();
        assert!(lib.contains(OpKind::Rz, OpKind::CZ));
        assert!(lib.contains(OpKind::CP, OpKind::RZZ));
        assert!(lib.contains(OpKind::Rz, OpKind::Rz));
        assert!(lib.contains(OpKind::RXX, OpKind::X));
        assert!(lib.contains(OpKind::Ry, OpKind::RYY));

        assert!(!lib.contains(OpKind::Rz, OpKind::CX));
        assert!(!lib.contains(OpKind::X, OpKind::Z));
        assert!(!lib.contains(OpKind::H, OpKind::H));
        assert!(!lib.contains(OpKind::Rx, OpKind::Ry));
    }

    #[test]
    fn test_lookup_is_symmetric() {
        let lib = CommutationLibrary::standard();
        for pair in lib.iter() {
            assert!(lib.contains(pair.1, pair.0));
        }
    }

    #[test]
    fn test_identity_row() {
        let lib = CommutationLibrary::standard();
        assert!(lib.contains(OpKind::CSwap, OpKind::Id));
        assert!(lib.contains(OpKind::Id, OpKind::U));
        assert!(!lib.contains(OpKind::Id, OpKind::Measure));
    }

    #[test]
    fn test_allow_list_filters_standard_pairs() {
        let config = CheckerConfig::default().with_allowed_kinds([OpKind::Rz, OpKind::P]);
        let lib = CommutationLibrary::from_config(&config);
        assert!(lib.contains(OpKind::Rz, OpKind::P));
        assert!(!lib.contains(OpKind::Rz, OpKind::CZ));
        assert_eq!(lib.len(), 3);
    }

    #[test]
    fn test_extra_pairs_survive_allow_list() {
        let config = CheckerConfig::default()
            .with_allowed_kinds(Vec::new())
            .with_extra_commutation(OpKind::H, OpKind::H);
        let lib = CommutationLibrary::from_config(&config);
        assert_eq!(lib.len(), 1);
        assert!(lib.contains(OpKind::H, OpKind::H));
    }
}
