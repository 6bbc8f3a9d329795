//! Commutation checker configuration.

use serde::{Deserialize, Serialize};
use ucc_ir::OpKind;

use crate::error::{CompileError, CompileResult};

/// Default bound on operation arity for the exact fallback.
pub const DEFAULT_MAX_NUM_QUBITS: u32 = 3;

/// Default number of cached exact decisions before the cache is cleared.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1_000_000;

/// Configuration for a [`CommutationChecker`](super::CommutationChecker).
///
/// Deserialises from JSON with every field optional:
///
/// ```
/// use ucc_compile::commutation::CheckerConfig;
///
/// let config: CheckerConfig = serde_json::from_str(
///     r#"{ "allowed_kinds": ["rz", "cx"], "exact_fallback": false }"#,
/// ).unwrap();
/// assert!(!config.exact_fallback);
/// assert_eq!(config.max_num_qubits, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// Restrict the built-in table to pairs whose kinds are both listed.
    pub allowed_kinds: Option<Vec<OpKind>>,
    /// Additional commuting pairs merged over the table.
    pub extra_commutations: Vec<(OpKind, OpKind)>,
    /// Consult the exact backend for pairs the table cannot decide.
    ///
    /// On by default. A checker with no backend attached then fails with
    /// [`CompileError::UnresolvedCommutation`] for any such pair; attach one
    /// with [`CommutationChecker::with_backend`](super::CommutationChecker::with_backend)
    /// or call [`CheckerConfig::without_exact_fallback`].
    pub exact_fallback: bool,
    /// Operations acting on more qubits never reach the exact backend.
    pub max_num_qubits: u32,
    /// Cache capacity; the cache is cleared when it fills up.
    pub cache_max_entries: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            allowed_kinds: None,
            extra_commutations: vec![],
            exact_fallback: true,
            max_num_qubits: DEFAULT_MAX_NUM_QUBITS,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl CheckerConfig {
    /// Restrict the built-in table to the given kinds.
    #[must_use]
    pub fn with_allowed_kinds(mut self, kinds: impl IntoIterator<Item = OpKind>) -> Self {
        self.allowed_kinds = Some(kinds.into_iter().collect());
        self
    }

    /// Declare that `a` and `b` commute.
    #[must_use]
    pub fn with_extra_commutation(mut self, a: OpKind, b: OpKind) -> Self {
        self.extra_commutations.push((a, b));
        self
    }

    /// Treat every pair the table cannot decide as non-commuting.
    #[must_use]
    pub fn without_exact_fallback(mut self) -> Self {
        self.exact_fallback = false;
        self
    }

    /// Set the arity bound for the exact fallback.
    #[must_use]
    pub fn with_max_num_qubits(mut self, max_num_qubits: u32) -> Self {
        self.max_num_qubits = max_num_qubits;
        self
    }

    /// Set the cache capacity.
    #[must_use]
    pub fn with_cache_max_entries(mut self, entries: usize) -> Self {
        self.cache_max_entries = entries;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> CompileResult<()> {
        if self.max_num_qubits == 0 {
            return Err(CompileError::InvalidConfiguration(
                "max_num_qubits must be at least 1".into(),
            ));
        }
        if self.cache_max_entries == 0 {
            return Err(CompileError::InvalidConfiguration(
                "cache_max_entries must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
