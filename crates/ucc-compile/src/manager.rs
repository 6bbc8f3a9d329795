//! Pass manager for running analyses in sequence.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use ucc_ir::CircuitDag;

use crate::commutation::{
    CheckerConfig, CommutationAnalysis, CommutationChecker, ExactCommutation,
};
use crate::error::CompileResult;
use crate::pass::Pass;
use crate::property::PropertySet;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given DAG.
    #[instrument(skip(self, dag, properties))]
    pub fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} qubits",
            self.passes.len(),
            dag.num_qubits()
        );

        for pass in &self.passes {
            if pass.should_run(dag, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(dag, properties)?;
                debug!("Pass {} completed, ops: {}", pass.name(), dag.num_ops());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!("Pass manager completed, ops: {}", dag.num_ops());
        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for pass managers that front-load the analyses optimizers need.
pub struct PassManagerBuilder {
    /// Oracle configuration for commutation analysis, if requested.
    commutation: Option<CheckerConfig>,
    /// Exact backend handed to the commutation checker.
    exact_backend: Option<Arc<dyn ExactCommutation>>,
    /// Scan wires on the rayon pool.
    parallel: bool,
}

impl PassManagerBuilder {
    /// Create a new builder with no passes.
    pub fn new() -> Self {
        Self {
            commutation: None,
            exact_backend: None,
            parallel: false,
        }
    }

    /// Add commutation analysis with the given oracle configuration.
    #[must_use]
    pub fn with_commutation_analysis(mut self, config: CheckerConfig) -> Self {
        self.commutation = Some(config);
        self
    }

    /// Decide pairs outside the static table with `backend`.
    #[must_use]
    pub fn with_exact_backend(mut self, backend: Arc<dyn ExactCommutation>) -> Self {
        self.exact_backend = Some(backend);
        self
    }

    /// Run wire scans in parallel.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Build the pass manager.
    ///
    /// Fails if the commutation configuration is invalid.
    pub fn build(self) -> CompileResult<PassManager> {
        let mut pm = PassManager::new();

        if let Some(config) = self.commutation {
            let mut checker = CommutationChecker::new(config)?;
            if let Some(backend) = self.exact_backend {
                checker = checker.with_shared_backend(backend);
            }
            let analysis = CommutationAnalysis::with_oracle(checker).with_parallel(self.parallel);
            pm.add_pass(analysis);
        }

        Ok(pm)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
