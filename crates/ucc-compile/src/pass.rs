//! Pass traits shared by every analysis run through a [`PassManager`].
//!
//! [`PassManager`]: crate::manager::PassManager

use ucc_ir::CircuitDag;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the DAG.
    Analysis,
    /// Transformation pass that modifies the DAG.
    Transformation,
}

/// A compilation pass that operates on a circuit DAG.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given DAG.
    ///
    /// Analysis passes must leave the DAG untouched and publish their results
    /// in the `PropertySet`.
    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}

/// Analysis passes read the DAG and write to the `PropertySet`.
///
/// Every `AnalysisPass` is also a [`Pass`] through the blanket impl below.
pub trait AnalysisPass: Send + Sync {
    /// Get the name of this analysis pass.
    fn name(&self) -> &str;

    /// Analyze the circuit and update properties.
    fn analyze(&self, dag: &CircuitDag, properties: &mut PropertySet) -> CompileResult<()>;

    /// Check if this pass should run.
    fn should_run(&self, _dag: &CircuitDag, _properties: &PropertySet) -> bool {
        true
    }
}

impl<T: AnalysisPass> Pass for T {
    fn name(&self) -> &str {
        AnalysisPass::name(self)
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, dag: &mut CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        self.analyze(dag, properties)
    }

    fn should_run(&self, dag: &CircuitDag, properties: &PropertySet) -> bool {
        AnalysisPass::should_run(self, dag, properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountOps;

    #[derive(Debug, PartialEq)]
    struct OpCount(usize);

    impl AnalysisPass for CountOps {
        fn name(&self) -> &'static str {
            "count_ops"
        }

        fn analyze(&self, dag: &CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
            properties.insert(OpCount(dag.num_ops()));
            Ok(())
        }
    }

    #[test]
    fn test_analysis_pass_is_a_pass() {
        let pass = CountOps;
        assert_eq!(Pass::kind(&pass), PassKind::Analysis);
        assert_eq!(Pass::name(&pass), "count_ops");

        let mut dag = CircuitDag::new();
        let mut props = PropertySet::new();
        Pass::run(&pass, &mut dag, &mut props).unwrap();
        assert_eq!(props.get::<OpCount>(), Some(&OpCount(0)));
    }
}
