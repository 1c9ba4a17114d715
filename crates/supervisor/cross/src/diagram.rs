//! Mermaid rendering of a [`HazardGraph`], for operators debugging a rejected block.

use crate::{HazardGraph, MsgKey};
use core::fmt;

/// Renders a [`HazardGraph`] as a Mermaid flowchart when formatted.
///
/// Nodes without incoming edges are drawn as circles, all others as boxes. Rendering only
/// happens on [`fmt::Display`], so passing a diagram to a disabled log statement costs nothing.
#[derive(Debug, Clone, Copy)]
pub struct MermaidDiagram<'a> {
    graph: &'a HazardGraph,
}

impl<'a> MermaidDiagram<'a> {
    /// Creates a diagram of `graph`.
    pub const fn new(graph: &'a HazardGraph) -> Self {
        Self { graph }
    }
}

struct NodeId(MsgKey);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}_{}", self.0.chain_index, self.0.log_index)
    }
}

impl fmt::Display for MermaidDiagram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "flowchart TD")?;

        for (key, in_degree) in self.graph.nodes() {
            if in_degree == 0 {
                writeln!(f, "    {}(({key}))", NodeId(key))?;
            } else {
                writeln!(f, "    {}[{key}]", NodeId(key))?;
            }
        }

        for (from, to) in self.graph.edges() {
            writeln!(f, "    {} --> {}", NodeId(from), NodeId(to))?;
        }

        writeln!(f, "    subgraph Legend")?;
        writeln!(f, "        L1((In-Degree 0))")?;
        writeln!(f, "        L2[In-Degree > 0]")?;
        writeln!(f, "    end")
    }
}
