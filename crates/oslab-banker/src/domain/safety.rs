//! Safety Evaluator - The Banker's Safety Algorithm
//!
//! Decides whether the registry's snapshot is *safe*: whether some
//! ordering exists in which every process can obtain its full declared
//! demand, run to completion, and release everything it holds. The
//! produced ordering is a proof, replayable by hand against the trace;
//! the absence of one is an `Unsafe` verdict, not an error.
//!
//! # Algorithm
//!
//! 1. `work := available`, `finish[p] := false` for every process.
//! 2. Scan unfinished processes in registry insertion order. Any
//!    process whose need fits within `work` is marked finished and its
//!    allocation is released into `work` immediately - this models
//!    "can complete and then relinquish", not execution time.
//! 3. Repeat full passes until a pass makes no progress (fixed point)
//!    or everything is finished.
//! 4. Safe iff every process finished; otherwise the partial finish
//!    sequence is reported.
//!
//! Insertion order is the authoritative tie-break when several
//! processes are simultaneously satisfiable, which makes the output
//! deterministic for a fixed operation history: no randomness, no
//! hash-order dependence anywhere on this path.
//!
//! # Termination
//!
//! A productive pass finishes at least one process, so `n` passes
//! always suffice. The loop is nevertheless capped at `2 * n` passes;
//! hitting the cap would mean an implementation defect, never a
//! property of the input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::registry::{ProcessId, ProcessRegistry};
use super::trace::StepRecorder;

/// Outcome of a safety evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyResult {
    /// A safe sequence exists; `sequence` covers every active process
    /// exactly once, in a provably executable order.
    Safe {
        /// The derived safe sequence.
        sequence: Vec<ProcessId>,
    },
    /// No safe sequence exists; `finished` is the strict subset of
    /// processes that could still be shown to finish.
    Unsafe {
        /// Partial finish sequence.
        finished: Vec<ProcessId>,
    },
}

impl SafetyResult {
    /// True for `Safe`.
    #[inline(always)]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe { .. })
    }

    /// The processes shown able to finish, in finish order. For `Safe`
    /// this is the full sequence; for `Unsafe` the partial one.
    pub fn finished_ids(&self) -> &[ProcessId] {
        match self {
            Self::Safe { sequence } => sequence,
            Self::Unsafe { finished } => finished,
        }
    }
}

/// A completed evaluation: the verdict plus its replayable trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// The verdict.
    pub result: SafetyResult,
    /// Chronological record of every algorithm step.
    pub trace: StepRecorder,
}

/// Runs the safety algorithm over a registry snapshot.
///
/// The evaluator is stateless and never mutates caller-owned state: it
/// copies `available` into a private `work` vector and keeps its own
/// `finish` flags. Each evaluation recomputes from scratch; there is no
/// incremental mode.
#[derive(Debug, Default)]
pub struct SafetyEvaluator;

impl SafetyEvaluator {
    /// Create a new evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the registry's current snapshot.
    ///
    /// Synchronous and infallible on registry-validated input: an
    /// unsafe state is a result, not a failure. `O(n² · m)` worst case.
    pub fn evaluate(&self, registry: &ProcessRegistry) -> Evaluation {
        let processes: Vec<_> = registry.active().collect();
        let n = processes.len();
        let order: Vec<ProcessId> = processes.iter().map(|p| p.id).collect();
        let needs: Vec<_> = processes.iter().map(|p| p.need()).collect();

        let mut work = registry.available().clone();
        let mut finish = vec![false; n];
        let mut sequence: Vec<ProcessId> = Vec::with_capacity(n);
        let mut trace = StepRecorder::new(order);

        trace.record(
            None,
            work.clone(),
            finish.clone(),
            format!("work initialized from available: {}", work),
        );

        // A correct run needs at most n passes; the cap is a hard stop
        // for implementation defects only.
        let max_passes = 2 * n;
        let mut passes = 0;
        while sequence.len() < n && passes < max_passes {
            passes += 1;
            let mut progressed = false;

            for (idx, process) in processes.iter().enumerate() {
                if finish[idx] {
                    continue;
                }
                if needs[idx].fits_within(&work) {
                    work += &process.allocation;
                    finish[idx] = true;
                    sequence.push(process.id);
                    progressed = true;
                    trace.record(
                        Some(process.id),
                        work.clone(),
                        finish.clone(),
                        format!(
                            "{} can finish: need {} satisfied; releases {} into work",
                            process.id, needs[idx], process.allocation
                        ),
                    );
                } else {
                    trace.record(
                        Some(process.id),
                        work.clone(),
                        finish.clone(),
                        format!(
                            "{} must wait: need {} exceeds work {}",
                            process.id, needs[idx], work
                        ),
                    );
                }
            }

            if !progressed {
                break; // fixed point: nobody else can be shown to finish
            }
        }

        let result = if sequence.len() == n {
            trace.record(
                None,
                work.clone(),
                finish.clone(),
                format!("safe: all {} processes can finish", n),
            );
            SafetyResult::Safe { sequence }
        } else {
            trace.record(
                None,
                work.clone(),
                finish.clone(),
                format!("unsafe: only {}/{} processes can finish", sequence.len(), n),
            );
            SafetyResult::Unsafe { finished: sequence }
        };

        debug!(
            passes,
            safe = result.is_safe(),
            finished = result.finished_ids().len(),
            total = n,
            "safety evaluation complete"
        );

        Evaluation { result, trace }
    }
}
