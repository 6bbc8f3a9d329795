//! Thread-safe memo of exact commutation decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use ucc_ir::{CustomGate, GateKind, Instruction, OpKind};

/// Identity of an operation's semantics inside a cache key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KindKey {
    /// A tagged operation.
    Kind(OpKind),
    /// A custom gate, identified by its full definition.
    Custom(CustomKey),
}

impl KindKey {
    pub(crate) fn of(inst: &Instruction) -> Self {
        if let Some(GateKind::Custom(gate)) = inst.as_gate().map(|g| &g.kind) {
            return KindKey::Custom(CustomKey::of(gate));
        }
        match inst.op_kind() {
            Some(kind) => KindKey::Kind(kind),
            None => KindKey::Custom(CustomKey {
                name: inst.name().to_owned(),
                num_qubits: inst.qubits.len(),
                matrix: None,
            }),
        }
    }
}

/// Definition of a custom gate: two gates sharing a name but not a matrix
/// or arity get different keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomKey {
    name: String,
    num_qubits: usize,
    /// Matrix entries as `(re, im)` bit patterns.
    matrix: Option<Vec<(u64, u64)>>,
}

impl CustomKey {
    fn of(gate: &CustomGate) -> Self {
        Self {
            name: gate.name.clone(),
            num_qubits: gate.num_qubits as usize,
            matrix: gate.matrix.as_ref().map(|m| {
                m.iter()
                    .map(|c| (float_bits(c.re), float_bits(c.im)))
                    .collect()
            }),
        }
    }
}

/// Bit pattern of `v`, with `-0.0` folded into `0.0`.
#[inline]
fn float_bits(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

/// One parameter inside a cache key.
///
/// Concrete values are compared by bit pattern. Symbols take part in
/// ordering but a key containing one is never stored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKey {
    /// A bound value, as `f64::to_bits`.
    Value(u64),
    /// An unbound expression, in display form.
    Symbolic(String),
}

impl ParamKey {
    pub(crate) fn of(inst: &Instruction) -> SmallVec<[ParamKey; 3]> {
        inst.parameters()
            .into_iter()
            .map(|p| match p.as_f64() {
                Some(v) => ParamKey::Value(float_bits(v)),
                None => ParamKey::Symbolic(p.to_string()),
            })
            .collect()
    }
}

/// Canonical signature of an ordered operation pair.
///
/// Field order is the canonical ordering: fewer qubits first, then kind,
/// then parameters, then the overlap pattern.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey {
    pub(crate) first_qubits: usize,
    pub(crate) first: KindKey,
    pub(crate) first_params: SmallVec<[ParamKey; 3]>,
    pub(crate) second: KindKey,
    pub(crate) second_params: SmallVec<[ParamKey; 3]>,
    /// For each qubit of the second operation, its position among the
    /// first operation's qubits.
    pub(crate) overlap: SmallVec<[Option<u32>; 4]>,
}

impl CacheKey {
    /// Key of `first` followed by `second`.
    pub fn new(first: &Instruction, second: &Instruction) -> Self {
        let overlap = second
            .qubits
            .iter()
            .map(|q| {
                first
                    .qubits
                    .iter()
                    .position(|p| p == q)
                    .and_then(|pos| u32::try_from(pos).ok())
            })
            .collect();
        Self {
            first_qubits: first.qubits.len(),
            first: KindKey::of(first),
            first_params: ParamKey::of(first),
            second: KindKey::of(second),
            second_params: ParamKey::of(second),
            overlap,
        }
    }

    /// Returns `true` if any parameter is unbound.
    pub fn is_symbolic(&self) -> bool {
        self.first_params
            .iter()
            .chain(&self.second_params)
            .any(|p| matches!(p, ParamKey::Symbolic(_)))
    }
}

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that missed.
    pub misses: u64,
    /// Entries currently stored.
    pub size: usize,
}

/// Bounded map from [`CacheKey`] to a commutation decision.
///
/// Safe to share across worker threads. A lock poisoned by a panicking
/// writer is recovered since entries are plain booleans.
#[derive(Debug)]
pub struct CommutationCache {
    entries: RwLock<FxHashMap<CacheKey, bool>>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CommutationCache {
    /// Create a cache holding at most `max_entries` decisions.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(FxHashMap::default()),
            max_entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a decision, counting the hit or miss.
    pub fn get(&self, key: &CacheKey) -> Option<bool> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store a decision, clearing the cache first if it is full.
    pub fn insert(&self, key: CacheKey, commutes: bool) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            entries.clear();
        }
        entries.insert(key, commutes);
    }

    /// Number of stored decisions.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.len(),
        }
    }
}
