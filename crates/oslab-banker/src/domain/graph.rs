//! Wait-For Graph - Who Is Blocked on Whom, Right Now
//!
//! When the safety evaluation comes back `Unsafe`, the remaining
//! question is structural: which waiting process is blocked partly
//! because of which other waiting process. The builder answers it with
//! directed edges `from -> to`, meaning `from` needs more of some
//! resource than is available while `to` holds a positive amount of it.
//!
//! # Asymmetry with the Safety Check
//!
//! "Waiting" is judged against the registry's *real* `available`
//! snapshot, not the `work` vector the safety simulation relaxed by
//! hypothetically finishing processes. The graph describes the actual
//! blocking state visible right now; the evaluator never mutates the
//! registry, so the registry's live vectors are exactly that
//! pre-simulation snapshot.
//!
//! # Cycles
//!
//! A cycle among waiting processes is the graph-theoretic signature of
//! deadlock, but this builder only exposes the edge set. Cycle
//! detection is a consumer concern layered on top.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::registry::{ProcessId, ProcessRegistry};
use super::safety::SafetyResult;

/// Directed edge of the wait-for graph.
///
/// Reads as: `from` is blocked partly because `to` currently holds
/// resource `resource`, which `from` still needs. When several
/// resources justify the same ordered pair, only the earliest
/// qualifying resource index is recorded, and only one edge per pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitForEdge {
    /// The blocked process.
    pub from: ProcessId,
    /// The process holding a needed resource.
    pub to: ProcessId,
    /// Earliest resource index justifying the edge.
    pub resource: usize,
}

/// Derives wait-for edges from a registry snapshot and an evaluation
/// verdict.
#[derive(Debug, Default)]
pub struct WaitForGraphBuilder;

impl WaitForGraphBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self
    }

    /// Build the edge set for the processes the verdict left waiting.
    ///
    /// Waiting processes are the active ones absent from the verdict's
    /// finish sequence. A `Safe` verdict leaves nobody waiting, so the
    /// result is empty. Edges are enumerated in insertion order of
    /// `from`, then of `to`, which keeps the output deterministic.
    pub fn build(&self, registry: &ProcessRegistry, result: &SafetyResult) -> Vec<WaitForEdge> {
        let finished: HashSet<ProcessId> = result.finished_ids().iter().copied().collect();
        let waiting: Vec<_> = registry
            .active()
            .filter(|p| !finished.contains(&p.id))
            .collect();

        let mut edges = Vec::new();
        for blocked in &waiting {
            let need = blocked.need();
            for holder in &waiting {
                if holder.id == blocked.id {
                    continue;
                }
                if let Some(resource) = need.first_common_positive(&holder.allocation) {
                    edges.push(WaitForEdge {
                        from: blocked.id,
                        to: holder.id,
                        resource,
                    });
                }
            }
        }
        edges
    }
}
