//! Greedy per-wire partition of operations into commuting blocks.

use std::collections::BTreeMap;

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument};
use ucc_ir::{CircuitDag, Instruction, NodeIndex, WireId};

use super::checker::{CommutationChecker, CommutationOracle};
use super::config::CheckerConfig;
use super::graph::WireOrderedGraph;
use crate::error::{CompileError, CompileResult};
use crate::pass::AnalysisPass;
use crate::property::PropertySet;

/// Operations on one wire that pairwise commute, in wire order.
pub type Block = Vec<NodeIndex>;

/// Commuting blocks per wire, with the reverse index.
///
/// Every operation touching a wire appears in exactly one block of that
/// wire, and block indices never decrease along the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommutationSets {
    table: BTreeMap<WireId, Vec<Block>>,
    index: FxHashMap<(NodeIndex, WireId), usize>,
}

impl CommutationSets {
    /// Blocks of `wire`, in wire order.
    pub fn blocks(&self, wire: WireId) -> Option<&[Block]> {
        self.table.get(&wire).map(Vec::as_slice)
    }

    /// Position of the block holding `node` on `wire`.
    pub fn block_index(&self, node: NodeIndex, wire: WireId) -> Option<usize> {
        self.index.get(&(node, wire)).copied()
    }

    /// The block holding `node` on `wire`.
    pub fn block_of(&self, node: NodeIndex, wire: WireId) -> Option<&Block> {
        let idx = self.block_index(node, wire)?;
        self.table.get(&wire)?.get(idx)
    }

    /// Analysed wires, in order.
    pub fn wires(&self) -> impl Iterator<Item = WireId> + '_ {
        self.table.keys().copied()
    }

    /// Wire to blocks.
    pub fn table(&self) -> &BTreeMap<WireId, Vec<Block>> {
        &self.table
    }

    /// (operation, wire) to block position.
    pub fn index(&self) -> &FxHashMap<(NodeIndex, WireId), usize> {
        &self.index
    }

    /// Total number of blocks over all wires.
    pub fn num_blocks(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Split into table and index.
    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<WireId, Vec<Block>>,
        FxHashMap<(NodeIndex, WireId), usize>,
    ) {
        (self.table, self.index)
    }
}

/// Result of scanning one wire.
struct WireScan {
    wire: WireId,
    blocks: Vec<Block>,
    positions: Vec<(NodeIndex, usize)>,
}

enum Placement {
    NewBlock,
    Append,
    AlreadyPlaced,
}

/// Builds [`CommutationSets`] from a dependency graph.
///
/// # Example
///
/// ```
/// use ucc_compile::commutation::{CheckerConfig, CommutationAnalysis};
/// use ucc_ir::{Circuit, QubitId, WireId};
///
/// let mut circuit = Circuit::with_size("demo", 1, 0);
/// circuit.rz(0.5, QubitId(0)).unwrap();
/// circuit.t(QubitId(0)).unwrap();
/// circuit.h(QubitId(0)).unwrap();
///
/// let analysis =
///     CommutationAnalysis::from_config(CheckerConfig::default().without_exact_fallback())
///         .unwrap();
/// let sets = analysis.build(circuit.dag()).unwrap();
/// assert_eq!(sets.blocks(WireId::Qubit(QubitId(0))).unwrap().len(), 2);
/// ```
#[derive(Debug)]
pub struct CommutationAnalysis<O = CommutationChecker> {
    oracle: O,
    parallel: bool,
}

impl CommutationAnalysis<CommutationChecker> {
    /// Create an analysis backed by a [`CommutationChecker`] for `config`.
    pub fn from_config(config: CheckerConfig) -> CompileResult<Self> {
        Ok(Self::with_oracle(CommutationChecker::new(config)?))
    }
}

impl<O: CommutationOracle> CommutationAnalysis<O> {
    /// Create an analysis that consults `oracle`.
    pub fn with_oracle(oracle: O) -> Self {
        Self {
            oracle,
            parallel: false,
        }
    }

    /// Scan wires on the rayon pool.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The oracle in use.
    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Partition every wire of `graph` into commuting blocks.
    #[instrument(skip_all, fields(parallel = self.parallel))]
    pub fn build<G>(&self, graph: &G) -> CompileResult<CommutationSets>
    where
        G: WireOrderedGraph + ?Sized,
    {
        let sequences = validate(graph)?;

        let scans: Vec<WireScan> = if self.parallel {
            sequences
                .par_iter()
                .map(|(wire, nodes)| self.scan_wire(graph, *wire, nodes))
                .collect::<CompileResult<_>>()?
        } else {
            sequences
                .iter()
                .map(|(wire, nodes)| self.scan_wire(graph, *wire, nodes))
                .collect::<CompileResult<_>>()?
        };

        let mut sets = CommutationSets::default();
        for scan in scans {
            for (node, block) in scan.positions {
                sets.index.insert((node, scan.wire), block);
            }
            sets.table.insert(scan.wire, scan.blocks);
        }

        debug!(
            "Commutation analysis: {} wires, {} blocks, {} placements",
            sets.table.len(),
            sets.num_blocks(),
            sets.index.len()
        );
        if let Some(stats) = self.oracle.cache_stats() {
            debug!(
                "Commutation cache: {} hits, {} misses, {} entries",
                stats.hits, stats.misses, stats.size
            );
        }

        Ok(sets)
    }

    fn scan_wire<G>(&self, graph: &G, wire: WireId, nodes: &[NodeIndex]) -> CompileResult<WireScan>
    where
        G: WireOrderedGraph + ?Sized,
    {
        let mut blocks: Vec<Block> = Vec::new();
        let mut positions = Vec::with_capacity(nodes.len());

        for &node in nodes {
            let current = op_at(graph, wire, node)?;
            let placement = match blocks.last() {
                None => Placement::NewBlock,
                Some(last) if last.contains(&node) => Placement::AlreadyPlaced,
                Some(last) => {
                    if self.commutes_with_all(graph, wire, current, last)? {
                        Placement::Append
                    } else {
                        Placement::NewBlock
                    }
                }
            };

            match placement {
                Placement::NewBlock => blocks.push(vec![node]),
                Placement::Append => {
                    if let Some(last) = blocks.last_mut() {
                        last.push(node);
                    }
                }
                Placement::AlreadyPlaced => {}
            }
            positions.push((node, blocks.len() - 1));
        }

        Ok(WireScan {
            wire,
            blocks,
            positions,
        })
    }

    /// Compares whole operations, not just their action on `wire`.
    fn commutes_with_all<G>(
        &self,
        graph: &G,
        wire: WireId,
        current: &Instruction,
        block: &[NodeIndex],
    ) -> CompileResult<bool>
    where
        G: WireOrderedGraph + ?Sized,
    {
        for &prev in block {
            if !self.oracle.commutes(current, op_at(graph, wire, prev)?)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

impl<O: CommutationOracle> AnalysisPass for CommutationAnalysis<O> {
    fn name(&self) -> &str {
        "CommutationAnalysis"
    }

    fn analyze(&self, dag: &CircuitDag, properties: &mut PropertySet) -> CompileResult<()> {
        let sets = self.build(dag)?;
        properties.insert(sets);
        Ok(())
    }
}

fn op_at<G>(graph: &G, wire: WireId, node: NodeIndex) -> CompileResult<&Instruction>
where
    G: WireOrderedGraph + ?Sized,
{
    graph
        .instruction(node)
        .ok_or_else(|| CompileError::MalformedGraph {
            wire,
            reason: format!("node {} is not an operation", node.index()),
        })
}

/// Read every wire sequence and check the per-wire path invariant.
fn validate<G>(graph: &G) -> CompileResult<Vec<(WireId, Vec<NodeIndex>)>>
where
    G: WireOrderedGraph + ?Sized,
{
    let wires = graph.wires();
    let mut placed: FxHashSet<(NodeIndex, WireId)> = FxHashSet::default();
    let mut sequences = Vec::with_capacity(wires.len());

    for wire in wires {
        let nodes = graph.nodes_on_wire(wire)?;
        for &node in &nodes {
            let inst = op_at(graph, wire, node)?;
            if !inst.touches(wire) {
                return Err(CompileError::MalformedGraph {
                    wire,
                    reason: format!(
                        "operation '{}' at node {} does not act on this wire",
                        inst.name(),
                        node.index()
                    ),
                });
            }
            if !placed.insert((node, wire)) {
                return Err(CompileError::MalformedGraph {
                    wire,
                    reason: format!("node {} appears twice", node.index()),
                });
            }
        }
        sequences.push((wire, nodes));
    }

    for node in graph.op_nodes() {
        let Some(inst) = graph.instruction(node) else {
            continue;
        };
        if let Some(wire) = inst.wires().find(|&w| !placed.contains(&(node, w))) {
            return Err(CompileError::MalformedGraph {
                wire,
                reason: format!(
                    "operation '{}' at node {} is missing from the wire sequence",
                    inst.name(),
                    node.index()
                ),
            });
        }
    }

    Ok(sequences)
}
