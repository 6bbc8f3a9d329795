//! Error types for the compilation crate.

use thiserror::Error;
use ucc_ir::WireId;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] ucc_ir::IrError),

    /// The dependency graph breaks the per-wire path invariant.
    #[error("Malformed dependency graph on wire {wire}: {reason}")]
    MalformedGraph {
        /// The wire on which the violation was detected.
        wire: WireId,
        /// What was wrong.
        reason: String,
    },

    /// The exact commutation backend could not decide a pair.
    #[error("Cannot decide commutation of '{first}' and '{second}': {reason}")]
    UnresolvedCommutation {
        /// Name of the first operation.
        first: String,
        /// Name of the second operation.
        second: String,
        /// Why the backend gave up.
        reason: String,
    },

    /// Invalid pass configuration.
    #[error("Invalid pass configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
