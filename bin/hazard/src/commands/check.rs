//! The `check` subcommand.

use alloy_primitives::ChainId;
use anyhow::{Context as _, Result, anyhow};
use clap::Args;
use kona_supervisor_cross::{
    CycleCheckDeps, CycleError, HazardGraph, HazardSet, InMemoryChainData,
};
use kona_supervisor_types::ChainIndexResolver;
use std::str::FromStr;
use tracing::info;

/// A hazard block, given as `<chain-id>:<block-number>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HazardArg {
    /// The chain of the hazard block.
    pub chain_id: ChainId,
    /// The number of the hazard block.
    pub block_number: u64,
}

impl FromStr for HazardArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chain_id, block_number) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <chain-id>:<block-number>, got '{s}'"))?;
        Ok(Self {
            chain_id: chain_id
                .parse()
                .map_err(|err| format!("invalid chain ID '{chain_id}': {err}"))?,
            block_number: block_number
                .parse()
                .map_err(|err| format!("invalid block number '{block_number}': {err}"))?,
        })
    }
}

/// Checks a set of hazard blocks for cyclic dependencies among the messages executed at a
/// timestamp.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// The timestamp the hazard blocks are checked at.
    #[arg(long, short = 't')]
    pub timestamp: u64,
    /// A hazard block as `<chain-id>:<block-number>`, at most one per chain.
    #[arg(long = "hazard", required = true)]
    pub hazards: Vec<HazardArg>,
    /// Print the dependency graph as a Mermaid flowchart.
    #[arg(long)]
    pub diagram: bool,
}

impl CheckCommand {
    /// Runs the check against `chain_data`.
    pub fn run(&self, chain_data: &InMemoryChainData) -> Result<()> {
        let hazards = self.hazard_set(chain_data)?;
        let resolver = chain_data.dependency_set();

        let mut graph = HazardGraph::build(chain_data, resolver, self.timestamp, &hazards)
            .context("Failed to build hazard graph")?;
        info!(
            target: "hazard",
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Built hazard graph"
        );
        if self.diagram {
            println!("{}", graph.mermaid());
        }

        match graph.check_for_cycle() {
            Ok(()) => {
                println!(
                    "no cycle among {} hazard blocks at timestamp {}",
                    hazards.len(),
                    self.timestamp
                );
                Ok(())
            }
            Err(err @ CycleError::Cycle { .. }) => {
                if self.diagram {
                    println!("{}", graph.mermaid());
                }
                Err(anyhow!(err))
            }
            Err(err) => Err(anyhow!(err)),
        }
    }

    /// Resolves the hazard arguments to the seals of the blocks in `chain_data`.
    fn hazard_set(&self, chain_data: &InMemoryChainData) -> Result<HazardSet> {
        let mut hazards = HazardSet::new();
        for hazard in &self.hazards {
            let chain_index =
                chain_data.dependency_set().chain_index_for_id(hazard.chain_id).ok_or_else(
                    || anyhow!("chain {} is not part of the dependency set", hazard.chain_id),
                )?;
            let block =
                chain_data.open_block(hazard.chain_id, hazard.block_number).with_context(|| {
                    format!(
                        "Failed to open block {} of chain {}",
                        hazard.block_number, hazard.chain_id
                    )
                })?;
            hazards.record(chain_index, block.seal).map_err(|existing| {
                anyhow!("chain {} already has hazard block {existing}", hazard.chain_id)
            })?;
        }
        Ok(hazards)
    }
}
