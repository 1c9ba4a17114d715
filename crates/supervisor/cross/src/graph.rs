//! The log dependency graph of a hazard set.

use crate::{CycleCheckDeps, CycleError, HazardSet, MermaidDiagram, OpenedBlock};
use derive_more::Display;
use kona_supervisor_types::{ChainIndex, ChainIndexResolver};
use std::collections::{HashMap, HashSet, hash_map::Entry};
use tracing::trace;

/// Identifies a log, and thus a node of the [`HazardGraph`].
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("C{chain_index}:L{log_index}")]
pub struct MsgKey {
    /// The chain of the block holding the log.
    pub chain_index: ChainIndex,
    /// The index of the log within its block.
    pub log_index: u32,
}

impl MsgKey {
    /// Creates a new [`MsgKey`].
    pub const fn new(chain_index: ChainIndex, log_index: u32) -> Self {
        Self { chain_index, log_index }
    }
}

/// A directed graph of log dependencies.
///
/// Every log of every hazard block is a node. An edge `a -> b` means `b` may only be emitted
/// after `a`: either `a` is the log right before `b` in the same block, or `b` executes the
/// message initiated by `a`.
///
/// Nodes are tracked by in-degree: nodes without incoming edges sit in `in_degree_zero`, all
/// others in `in_degree_non_zero` with their count. A node is never in both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HazardGraph {
    in_degree_zero: HashSet<MsgKey>,
    in_degree_non_zero: HashMap<MsgKey, u32>,
    outgoing_edges: HashMap<MsgKey, Vec<MsgKey>>,
}

impl HazardGraph {
    /// Builds the dependency graph of the `hazards` blocks.
    ///
    /// Only executing messages with a timestamp equal to `timestamp` add cross-chain edges;
    /// messages initiated at any other timestamp are ordered by time already.
    pub fn build<D, R>(
        deps: &D,
        resolver: &R,
        timestamp: u64,
        hazards: &HazardSet,
    ) -> Result<Self, CycleError>
    where
        D: CycleCheckDeps,
        R: ChainIndexResolver,
    {
        let mut graph = Self::default();
        let mut blocks: HashMap<ChainIndex, OpenedBlock> = HashMap::with_capacity(hazards.len());

        for (chain_index, expected) in hazards.iter() {
            let chain_id = resolver
                .chain_id_for_index(chain_index)
                .ok_or(CycleError::UnresolvedChainIndex(chain_index))?;

            let block = deps.open_block(chain_id, expected.number).map_err(|source| {
                CycleError::FailedToOpenBlock { chain_id, block_number: expected.number, source }
            })?;
            if block.seal != *expected {
                return Err(CycleError::BlockMismatch {
                    chain_id,
                    expected: *expected,
                    actual: block.seal,
                });
            }

            let out_of_range = block.executing_messages.range(block.log_count..).next();
            if let Some((&log_index, _)) = out_of_range {
                return Err(CycleError::InvalidLogIndex {
                    chain_index,
                    log_index,
                    log_count: block.log_count,
                });
            }

            // Logs of a block are emitted in order.
            for log_index in 0..block.log_count {
                let key = MsgKey::new(chain_index, log_index);
                if log_index == 0 {
                    graph.add_node(key);
                } else {
                    graph.add_edge(MsgKey::new(chain_index, log_index - 1), key);
                }
            }

            blocks.insert(chain_index, block);
        }

        for (chain_index, _) in hazards.iter() {
            let block = &blocks[&chain_index];
            for (&exec_log_index, message) in &block.executing_messages {
                if message.timestamp != timestamp {
                    continue;
                }

                let Some(init_block) = blocks.get(&message.chain_index) else {
                    return Err(CycleError::UnknownChain(message.chain_index));
                };

                let init = MsgKey::new(message.chain_index, message.log_index);
                let exec = MsgKey::new(chain_index, exec_log_index);
                if init == exec {
                    return Err(CycleError::SelfReferencing(exec));
                }
                if message.log_index >= init_block.log_count {
                    return Err(CycleError::UnknownInitiatingLog { exec, init });
                }

                graph.add_edge(init, exec);
            }
        }

        trace!(
            target: "supervisor::cross",
            timestamp,
            nodes = graph.node_count(),
            diagram = %graph.mermaid(),
            "Built hazard graph"
        );

        Ok(graph)
    }

    /// Adds a node without incoming edges, unless the node is already part of the graph.
    pub fn add_node(&mut self, key: MsgKey) {
        if !self.in_degree_non_zero.contains_key(&key) {
            self.in_degree_zero.insert(key);
        }
    }

    /// Adds the directed edge `from -> to`.
    pub fn add_edge(&mut self, from: MsgKey, to: MsgKey) {
        self.in_degree_zero.remove(&to);
        *self.in_degree_non_zero.entry(to).or_default() += 1;
        self.outgoing_edges.entry(from).or_default().push(to);
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.in_degree_zero.len() + self.in_degree_non_zero.len()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.outgoing_edges.values().map(Vec::len).sum()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// Returns all nodes with their in-degree, sorted by key.
    pub fn nodes(&self) -> Vec<(MsgKey, u32)> {
        let mut nodes: Vec<_> = self
            .in_degree_zero
            .iter()
            .map(|key| (*key, 0))
            .chain(self.in_degree_non_zero.iter().map(|(key, degree)| (*key, *degree)))
            .collect();
        nodes.sort_unstable();
        nodes
    }

    /// Returns all edges, sorted by source and then by insertion order.
    pub fn edges(&self) -> Vec<(MsgKey, MsgKey)> {
        let mut sources: Vec<_> = self.outgoing_edges.keys().copied().collect();
        sources.sort_unstable();
        sources
            .into_iter()
            .flat_map(|from| self.outgoing_edges[&from].iter().map(move |to| (from, *to)))
            .collect()
    }

    /// Returns a lazily rendered Mermaid flowchart of the graph.
    pub const fn mermaid(&self) -> MermaidDiagram<'_> {
        MermaidDiagram::new(self)
    }

    /// Checks the graph for cycles, consuming it in the process.
    ///
    /// Nodes without incoming edges are removed together with their outgoing edges until none
    /// are left. If nodes remain at that point, each of them sits on or behind a cycle, and
    /// [`CycleError::Cycle`] is returned. The remaining nodes and their edges stay in the graph.
    pub fn check_for_cycle(&mut self) -> Result<(), CycleError> {
        let mut ready: Vec<MsgKey> = self.in_degree_zero.drain().collect();

        while let Some(key) = ready.pop() {
            for target in self.outgoing_edges.remove(&key).unwrap_or_default() {
                if let Entry::Occupied(mut entry) = self.in_degree_non_zero.entry(target) {
                    *entry.get_mut() -= 1;
                    if *entry.get() == 0 {
                        entry.remove();
                        ready.push(target);
                    }
                }
            }
        }

        if self.in_degree_non_zero.is_empty() {
            Ok(())
        } else {
            Err(CycleError::Cycle { remaining: self.in_degree_non_zero.len() })
        }
    }
}
