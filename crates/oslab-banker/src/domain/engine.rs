//! Banker Engine - Facade for Presentation Collaborators
//!
//! Wires the registry, the safety evaluator, and the wait-for graph
//! builder into the single surface the external interface promises:
//! mutate, evaluate, inspect. The registry itself never triggers
//! evaluation (a deliberate composition decision that keeps it free of
//! evaluation cost when used standalone); the engine is the caller
//! that re-evaluates after every mutation, so consumers always observe
//! a verdict consistent with the snapshot they just built.

use tracing::debug;

use super::graph::{WaitForEdge, WaitForGraphBuilder};
use super::registry::{ProcessId, ProcessRegistry};
use super::safety::{Evaluation, SafetyEvaluator, SafetyResult};
use super::trace::StepRecorder;
use super::vector::ResourceVector;
use crate::error::RegistryError;

/// The deadlock avoidance and detection engine.
///
/// Owns the registry and caches the evaluation of the current
/// snapshot. All operations are synchronous; an evaluation either
/// completes to `Safe`/`Unsafe` or a mutation is rejected before any
/// state changes.
#[derive(Debug, Default)]
pub struct BankerEngine {
    registry: ProcessRegistry,
    evaluator: SafetyEvaluator,
    graph_builder: WaitForGraphBuilder,
    last_evaluation: Option<Evaluation>,
}

impl BankerEngine {
    /// Create an engine with an empty, unconfigured registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the system totals, beginning a new run.
    ///
    /// Clears all processes and any cached evaluation; see
    /// [`ProcessRegistry::set_total_resources`] for validation.
    pub fn set_total_resources(&mut self, raw: &[i64]) -> Result<(), RegistryError> {
        self.registry.set_total_resources(raw)?;
        self.last_evaluation = None;
        Ok(())
    }

    /// Admit a process and immediately re-evaluate the new snapshot.
    ///
    /// See [`ProcessRegistry::add_process`] for the validation
    /// taxonomy. A rejected admission leaves both the registry and the
    /// cached evaluation untouched.
    pub fn add_process(
        &mut self,
        max_demand_raw: &[i64],
        allocation_raw: &[i64],
    ) -> Result<ProcessId, RegistryError> {
        let id = self.registry.add_process(max_demand_raw, allocation_raw)?;
        self.reevaluate();
        Ok(id)
    }

    /// Withdraw a process and immediately re-evaluate.
    pub fn withdraw_process(&mut self, id: ProcessId) -> Result<(), RegistryError> {
        self.registry.withdraw(id)?;
        self.reevaluate();
        Ok(())
    }

    /// The verdict for the current snapshot.
    ///
    /// A pure function of registry state: recomputed from scratch when
    /// no cached evaluation exists, bit-identical across repeated
    /// calls otherwise.
    pub fn evaluate(&mut self) -> SafetyResult {
        if self.last_evaluation.is_none() {
            self.reevaluate();
        }
        // reevaluate always leaves a cached evaluation behind
        self.last_evaluation
            .as_ref()
            .map(|e| e.result.clone())
            .unwrap_or(SafetyResult::Safe { sequence: vec![] })
    }

    /// Wait-for edges for a verdict against the current snapshot.
    ///
    /// Empty for a `Safe` verdict.
    pub fn wait_for_graph(&self, result: &SafetyResult) -> Vec<WaitForEdge> {
        self.graph_builder.build(&self.registry, result)
    }

    /// Outstanding need of a process, clamped at zero for display.
    pub fn need(&self, id: ProcessId) -> Result<ResourceVector, RegistryError> {
        self.registry
            .need(id)
            .ok_or(RegistryError::UnknownProcess(id))
    }

    /// Trace of the most recent evaluation, if one has run since the
    /// last reset.
    pub fn trace(&self) -> Option<&StepRecorder> {
        self.last_evaluation.as_ref().map(|e| &e.trace)
    }

    /// Read-only view of the underlying registry.
    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    fn reevaluate(&mut self) {
        let evaluation = self.evaluator.evaluate(&self.registry);
        debug!(safe = evaluation.result.is_safe(), "snapshot re-evaluated");
        self.last_evaluation = Some(evaluation);
    }
}
