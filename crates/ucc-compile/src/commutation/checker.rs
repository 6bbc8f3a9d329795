//! Commutation oracle: independence check, static table, cached exact fallback.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::trace;
use ucc_ir::Instruction;

use super::cache::{CacheKey, CacheStats, CommutationCache};
use super::config::CheckerConfig;
use super::library::CommutationLibrary;
use crate::error::{CompileError, CompileResult};

/// Decides whether two operations commute.
///
/// Implementations must be symmetric: `commutes(a, b)` and `commutes(b, a)`
/// agree. A `true` answer must be sound for reordering.
pub trait CommutationOracle: Send + Sync {
    /// Returns `true` if `a` and `b` may be applied in either order.
    fn commutes(&self, a: &Instruction, b: &Instruction) -> CompileResult<bool>;

    /// Cache counters, for oracles that keep a cache.
    fn cache_stats(&self) -> Option<CacheStats> {
        None
    }
}

impl<O: CommutationOracle + ?Sized> CommutationOracle for Arc<O> {
    fn commutes(&self, a: &Instruction, b: &Instruction) -> CompileResult<bool> {
        (**self).commutes(a, b)
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        (**self).cache_stats()
    }
}

/// Relative qubit placement of a canonically ordered pair.
///
/// The first operation's qubits are numbered `0..k` in operand order; qubits
/// only the second operation touches are numbered from `k` upwards in the
/// order they appear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QubitPlacement {
    /// Local index of each qubit of the first operation.
    pub first: SmallVec<[usize; 4]>,
    /// Local index of each qubit of the second operation.
    pub second: SmallVec<[usize; 4]>,
    /// Size of the combined register.
    pub num_qubits: usize,
}

impl QubitPlacement {
    fn new(first: &Instruction, second: &Instruction) -> Self {
        let k = first.qubits.len();
        let mut fresh = k;
        let second = second
            .qubits
            .iter()
            .map(|q| match first.qubits.iter().position(|p| p == q) {
                Some(pos) => pos,
                None => {
                    fresh += 1;
                    fresh - 1
                }
            })
            .collect();
        Self {
            first: (0..k).collect(),
            second,
            num_qubits: fresh,
        }
    }
}

/// An exact commutation test, usually matrix based.
///
/// Called with a canonically ordered pair: the operation with fewer qubits
/// comes first. Any closure with the matching signature is a backend.
pub trait ExactCommutation: Send + Sync {
    /// Decide whether `first` and `second` commute when placed as described.
    fn commute_exact(
        &self,
        first: &Instruction,
        second: &Instruction,
        placement: &QubitPlacement,
    ) -> CompileResult<bool>;
}

impl<F> ExactCommutation for F
where
    F: Fn(&Instruction, &Instruction, &QubitPlacement) -> CompileResult<bool> + Send + Sync,
{
    fn commute_exact(
        &self,
        first: &Instruction,
        second: &Instruction,
        placement: &QubitPlacement,
    ) -> CompileResult<bool> {
        self(first, second, placement)
    }
}

/// The default [`CommutationOracle`].
///
/// Answers in order: operations on disjoint wires commute; kind pairs in the
/// [`CommutationLibrary`] commute; pairs no unitary check can decide do not;
/// everything else goes to the exact backend through the cache.
pub struct CommutationChecker {
    library: CommutationLibrary,
    exact_fallback: bool,
    max_num_qubits: usize,
    backend: Option<Arc<dyn ExactCommutation>>,
    cache: CommutationCache,
}

impl CommutationChecker {
    /// Create a checker without an exact backend.
    ///
    /// With the fallback enabled, a pair that reaches it fails with
    /// [`CompileError::UnresolvedCommutation`] until a backend is attached.
    pub fn new(config: CheckerConfig) -> CompileResult<Self> {
        config.validate()?;
        Ok(Self {
            library: CommutationLibrary::from_config(&config),
            exact_fallback: config.exact_fallback,
            max_num_qubits: config.max_num_qubits as usize,
            backend: None,
            cache: CommutationCache::new(config.cache_max_entries),
        })
    }

    /// Attach an exact backend.
    #[must_use]
    pub fn with_backend(self, backend: impl ExactCommutation + 'static) -> Self {
        self.with_shared_backend(Arc::new(backend))
    }

    /// Attach an exact backend shared with other checkers.
    #[must_use]
    pub fn with_shared_backend(mut self, backend: Arc<dyn ExactCommutation>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The kind-pair table in use.
    pub fn library(&self) -> &CommutationLibrary {
        &self.library
    }

    /// The cache of exact decisions.
    pub fn cache(&self) -> &CommutationCache {
        &self.cache
    }

    /// Pairs that no unitary check can decide.
    fn never_commutes(&self, inst: &Instruction) -> bool {
        inst.is_non_unitary() || inst.is_conditioned() || inst.qubits.len() > self.max_num_qubits
    }

    fn table_hit(&self, a: &Instruction, b: &Instruction) -> bool {
        // Conditioned gates depend on classical state the wires do not show.
        if a.is_conditioned() || b.is_conditioned() {
            return false;
        }
        match (a.op_kind(), b.op_kind()) {
            (Some(ka), Some(kb)) => self.library.contains(ka, kb),
            _ => false,
        }
    }

    fn exact(&self, a: &Instruction, b: &Instruction) -> CompileResult<bool> {
        let key_ab = CacheKey::new(a, b);
        let key_ba = CacheKey::new(b, a);
        let (first, second, key) = if key_ab <= key_ba {
            (a, b, key_ab)
        } else {
            (b, a, key_ba)
        };

        let cacheable = !key.is_symbolic();
        if cacheable {
            if let Some(hit) = self.cache.get(&key) {
                trace!("cache hit: {} / {} -> {}", first.name(), second.name(), hit);
                return Ok(hit);
            }
        }

        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| CompileError::UnresolvedCommutation {
                first: first.name().to_owned(),
                second: second.name().to_owned(),
                reason: "no exact backend configured".into(),
            })?;
        let commutes =
            backend.commute_exact(first, second, &QubitPlacement::new(first, second))?;
        trace!("exact: {} / {} -> {}", first.name(), second.name(), commutes);

        if cacheable {
            self.cache.insert(key, commutes);
        }
        Ok(commutes)
    }
}

impl CommutationOracle for CommutationChecker {
    fn commutes(&self, a: &Instruction, b: &Instruction) -> CompileResult<bool> {
        if !a.shares_wire_with(b) {
            return Ok(true);
        }
        if self.table_hit(a, b) {
            trace!("table: {} / {}", a.name(), b.name());
            return Ok(true);
        }
        if self.never_commutes(a) || self.never_commutes(b) || !self.exact_fallback {
            return Ok(false);
        }
        self.exact(a, b)
    }

    fn cache_stats(&self) -> Option<CacheStats> {
        Some(self.cache.stats())
    }
}

impl fmt::Debug for CommutationChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommutationChecker")
            .field("library", &self.library.len())
            .field("exact_fallback", &self.exact_fallback)
            .field("max_num_qubits", &self.max_num_qubits)
            .field("backend", &self.backend.is_some())
            .field("cache", &self.cache.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use num_complex::Complex64;
    use ucc_ir::{
        ClassicalCondition, ClbitId, CustomGate, Gate, GateKind, OpKind, QubitId, StandardGate,
    };

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn rz(theta: f64, qubit: u32) -> Instruction {
        Instruction::single_qubit_gate(StandardGate::Rz(theta.into()), q(qubit))
    }

    fn cx(c: u32, t: u32) -> Instruction {
        Instruction::two_qubit_gate(StandardGate::CX, q(c), q(t))
    }

    fn h(qubit: u32) -> Instruction {
        Instruction::single_qubit_gate(StandardGate::H, q(qubit))
    }

    /// Backend that counts calls and answers `answer`.
    fn counting(answer: bool) -> (Arc<AtomicUsize>, impl ExactCommutation + 'static) {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let backend = move |_: &Instruction,
                            _: &Instruction,
                            _: &QubitPlacement|
              -> CompileResult<bool> {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(answer)
        };
        (calls, backend)
    }

    #[test]
    fn test_disjoint_wires_commute() {
        let checker = CommutationChecker::new(CheckerConfig::default()).unwrap();
        // No backend attached: the independence check must answer first.
        assert!(checker.commutes(&h(0), &cx(1, 2)).unwrap());
        assert!(checker.commutes(&cx(1, 2), &h(0)).unwrap());
    }

    #[test]
    fn test_table_ignores_parameters_and_overlap() {
        let checker = CommutationChecker::new(CheckerConfig::default()).unwrap();
        let cz = Instruction::two_qubit_gate(StandardGate::CZ, q(1), q(0));
        assert!(checker.commutes(&rz(0.3, 0), &rz(1.7, 0)).unwrap());
        assert!(checker.commutes(&rz(0.3, 0), &cz).unwrap());
        assert!(checker.cache().is_empty());
    }

    #[test]
    fn test_fallback_result_is_cached() {
        let (calls, backend) = counting(false);
        let checker = CommutationChecker::new(CheckerConfig::default())
            .unwrap()
            .with_backend(backend);

        assert!(!checker.commutes(&rz(0.5, 0), &cx(0, 1)).unwrap());
        // Same relative placement on other qubits, either order.
        assert!(!checker.commutes(&cx(3, 4), &rz(0.5, 3)).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = checker.cache_stats().unwrap();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_different_parameters_miss_cache() {
        let (calls, backend) = counting(false);
        let checker = CommutationChecker::new(CheckerConfig::default())
            .unwrap()
            .with_backend(backend);
        checker.commutes(&rz(0.5, 0), &cx(0, 1)).unwrap();
        checker.commutes(&rz(0.6, 0), &cx(0, 1)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_symbolic_parameters_bypass_cache() {
        let (calls, backend) = counting(true);
        let checker = CommutationChecker::new(CheckerConfig::default())
            .unwrap()
            .with_backend(backend);
        let free = Instruction::single_qubit_gate(
            StandardGate::Rx(ucc_ir::ParameterExpression::symbol("theta")),
            q(1),
        );
        assert!(checker.commutes(&free, &cx(0, 1)).unwrap());
        assert!(checker.commutes(&free, &cx(0, 1)).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(checker.cache().is_empty());
    }

    #[test]
    fn test_disabled_fallback_never_calls_backend() {
        let (calls, backend) = counting(true);
        let checker = CommutationChecker::new(CheckerConfig::default().without_exact_fallback())
            .unwrap()
            .with_backend(backend);
        assert!(!checker.commutes(&rz(0.5, 0), &cx(0, 1)).unwrap());
        assert!(checker.commutes(&rz(0.5, 0), &rz(0.1, 0)).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(checker.cache().is_empty());
    }

    #[test]
    fn test_allow_list_falls_through() {
        let (calls, backend) = counting(true);
        let config = CheckerConfig::default().with_allowed_kinds([OpKind::Rz]);
        let checker = CommutationChecker::new(config).unwrap().with_backend(backend);
        let cz = Instruction::two_qubit_gate(StandardGate::CZ, q(0), q(1));

        assert!(checker.commutes(&rz(0.5, 0), &rz(0.1, 0)).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // Filtered out of the table, so the backend decides.
        assert!(checker.commutes(&rz(0.5, 0), &cz).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_extra_pairs_are_honoured() {
        let config = CheckerConfig::default()
            .with_extra_commutation(OpKind::CX, OpKind::Z)
            .without_exact_fallback();
        let checker = CommutationChecker::new(config).unwrap();
        let z0 = Instruction::single_qubit_gate(StandardGate::Z, q(0));
        assert!(checker.commutes(&z0, &cx(0, 1)).unwrap());
        assert!(checker.commutes(&cx(0, 1), &z0).unwrap());
    }

    #[test]
    fn test_non_unitary_pairs_do_not_commute() {
        let (calls, backend) = counting(true);
        let checker = CommutationChecker::new(CheckerConfig::default())
            .unwrap()
            .with_backend(backend);
        let m = Instruction::measure(q(0), ClbitId(0));
        let m2 = Instruction::measure(q(1), ClbitId(0));
        assert!(!checker.commutes(&m, &h(0)).unwrap());
        assert!(!checker.commutes(&m, &m2).unwrap());
        assert!(!checker.commutes(&Instruction::reset(q(0)), &rz(0.1, 0)).unwrap());
        assert!(!checker.commutes(&Instruction::barrier([q(0), q(1)]), &h(1)).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_conditioned_gates_skip_table() {
        let checker = CommutationChecker::new(CheckerConfig::default()).unwrap();
        let cond = Instruction::gate(
            Gate::standard(StandardGate::Z).with_condition(ClassicalCondition::new("c", 1)),
            [q(0)],
        );
        assert!(!checker.commutes(&cond, &rz(0.1, 0)).unwrap());
    }

    #[test]
    fn test_wide_operations_skip_backend() {
        let (calls, backend) = counting(true);
        let checker = CommutationChecker::new(CheckerConfig::default().with_max_num_qubits(2))
            .unwrap()
            .with_backend(backend);
        let ccx = Instruction::gate(StandardGate::CCX, [q(0), q(1), q(2)]);
        assert!(!checker.commutes(&ccx, &h(0)).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_backend_sees_canonical_order() {
        let backend = |first: &Instruction,
                       second: &Instruction,
                       placement: &QubitPlacement|
         -> CompileResult<bool> {
            assert!(first.qubits.len() <= second.qubits.len());
            assert_eq!(placement.first.as_slice(), &[0]);
            assert_eq!(placement.second.as_slice(), &[1, 0]);
            assert_eq!(placement.num_qubits, 2);
            Ok(first.name() == "custom")
        };
        let checker = CommutationChecker::new(CheckerConfig::default())
            .unwrap()
            .with_backend(backend);
        let custom = Instruction::gate(CustomGate::new("custom", 1), [q(1)]);
        assert!(checker.commutes(&cx(0, 1), &custom).unwrap());
        assert!(checker.commutes(&custom, &cx(0, 1)).unwrap());
    }

    #[test]
    fn test_missing_backend_is_unresolved() {
        let checker = CommutationChecker::new(CheckerConfig::default()).unwrap();
        let err = checker.commutes(&h(0), &cx(0, 1)).unwrap_err();
        assert!(matches!(err, CompileError::UnresolvedCommutation { .. }));
    }

    #[test]
    fn test_default_config_without_backend() {
        // table hits never need a backend
        let checker = CommutationChecker::new(CheckerConfig::default()).unwrap();
        assert!(checker.commutes(&rz(0.5, 0), &rz(0.25, 0)).unwrap());
        assert!(checker.commutes(&h(0), &cx(0, 1)).is_err());

        let checker =
            CommutationChecker::new(CheckerConfig::default().without_exact_fallback()).unwrap();
        assert!(!checker.commutes(&h(0), &cx(0, 1)).unwrap());
        assert!(checker.cache().is_empty());
    }

    fn custom_1q(matrix: [f64; 4], qubit: u32) -> Instruction {
        let gate = CustomGate::new("u", 1)
            .with_matrix(matrix.iter().map(|&v| Complex64::new(v, 0.0)).collect());
        Instruction::gate(gate, [q(qubit)])
    }

    #[test]
    fn test_same_name_custom_gates_do_not_share_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let is_diagonal = |inst: &Instruction| match inst.as_gate().map(|g| &g.kind) {
            Some(GateKind::Custom(gate)) => gate
                .matrix
                .as_ref()
                .is_some_and(|m| m[1].norm() == 0.0 && m[2].norm() == 0.0),
            _ => false,
        };
        let backend = move |first: &Instruction,
                            second: &Instruction,
                            _: &QubitPlacement|
              -> CompileResult<bool> {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(is_diagonal(first) && is_diagonal(second))
        };
        let checker = CommutationChecker::new(CheckerConfig::default())
            .unwrap()
            .with_backend(backend);

        let z = custom_1q([1.0, 0.0, 0.0, -1.0], 0);
        let x = custom_1q([0.0, 1.0, 1.0, 0.0], 0);

        assert!(checker.commutes(&z, &z).unwrap());
        assert!(!checker.commutes(&z, &x).unwrap());
        assert!(!checker.commutes(&x, &z).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(checker.cache().len(), 2);
    }

    #[test]
    fn test_backend_error_propagates() {
        let backend = |first: &Instruction,
                       second: &Instruction,
                       _: &QubitPlacement|
         -> CompileResult<bool> {
            Err(CompileError::UnresolvedCommutation {
                first: first.name().to_owned(),
                second: second.name().to_owned(),
                reason: "matrix unavailable".into(),
            })
        };
        let checker = CommutationChecker::new(CheckerConfig::default())
            .unwrap()
            .with_backend(backend);
        let err = checker.commutes(&h(0), &cx(0, 1)).unwrap_err();
        assert!(err.to_string().contains("matrix unavailable"));
        assert!(checker.cache().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = CommutationChecker::new(CheckerConfig::default().with_max_num_qubits(0));
        assert!(matches!(result, Err(CompileError::InvalidConfiguration(_))));
    }
}
