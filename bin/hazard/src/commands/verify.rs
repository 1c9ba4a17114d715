//! The `verify` subcommand.

use alloy_primitives::ChainId;
use anyhow::{Result, anyhow};
use clap::Args;
use kona_supervisor_cross::{CrossUnsafeUpdater, InMemoryChainData};
use tracing::warn;

/// Verifies the blocks after the cross-unsafe head of a chain, advancing the head in the loaded
/// snapshot for every block that passes.
#[derive(Args, Debug, Clone)]
pub struct VerifyCommand {
    /// The chain to verify.
    #[arg(long, short = 'c')]
    pub chain_id: ChainId,
    /// The maximum number of blocks to verify.
    #[arg(long, short = 'n', default_value_t = 1)]
    pub blocks: u64,
}

impl VerifyCommand {
    /// Runs the verification against `chain_data`.
    pub fn run(&self, chain_data: &InMemoryChainData) -> Result<()> {
        let promoted = self.verify(chain_data)?;
        println!("promoted {promoted} block(s) of chain {} to cross-unsafe", self.chain_id);
        Ok(())
    }

    /// Returns the number of promoted blocks.
    fn verify(&self, chain_data: &InMemoryChainData) -> Result<u64> {
        let updater = CrossUnsafeUpdater::new(chain_data, chain_data.dependency_set());

        let mut promoted = 0;
        while promoted < self.blocks {
            match updater.update(self.chain_id) {
                Ok(Some(seal)) => {
                    println!("cross-unsafe: {seal}");
                    promoted += 1;
                }
                Ok(None) => break,
                Err(err) if err.is_candidate_rejection() => {
                    warn!(
                        target: "hazard",
                        chain_id = self.chain_id,
                        %err,
                        "Candidate block rejected"
                    );
                    return Err(anyhow!(err));
                }
                Err(err) => return Err(anyhow!(err)),
            }
        }
        Ok(promoted)
    }
}
