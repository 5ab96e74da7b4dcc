//! Step Trace - Replayable Record of the Safety Algorithm
//!
//! The safety algorithm runs to completion synchronously and leaves
//! behind an append-only chronological trace. Presentation layers
//! replay the trace at whatever cadence they like; nothing here ever
//! re-runs the algorithm, and playback pacing is entirely a consumer
//! concern.
//!
//! Snapshots are owned deep copies taken at the moment of recording.
//! Later mutation of the evaluator's `work` or `finish` state cannot
//! retroactively alter an entry.

use serde::{Deserialize, Serialize};

use super::registry::ProcessId;
use super::vector::ResourceVector;

/// One recorded state transition of the safety algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Process under consideration, or `None` for run-level entries
    /// (initialization, final verdict).
    pub process: Option<ProcessId>,
    /// Snapshot of the hypothetical free pool at this moment.
    pub work: ResourceVector,
    /// Snapshot of the finish flags, positionally aligned with
    /// [`StepRecorder::evaluation_order`].
    pub finish: Vec<bool>,
    /// Human-readable narration of the transition.
    pub message: String,
}

/// Append-only log of [`TraceStep`] entries in algorithm order.
///
/// The recorder has no decision logic. It captures the evaluation
/// order once at the start so a trace is self-contained: consumers can
/// map every `finish` flag back to a process id without access to the
/// registry that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecorder {
    evaluation_order: Vec<ProcessId>,
    steps: Vec<TraceStep>,
}

impl StepRecorder {
    /// Start a trace over the given processes, in evaluation order.
    pub fn new(evaluation_order: Vec<ProcessId>) -> Self {
        Self {
            evaluation_order,
            steps: Vec::new(),
        }
    }

    /// Process ids in the order the evaluator scanned them; `finish`
    /// snapshots index into this list.
    #[inline(always)]
    pub fn evaluation_order(&self) -> &[ProcessId] {
        &self.evaluation_order
    }

    /// Append one entry. Snapshots must already be owned copies.
    pub fn record(
        &mut self,
        process: Option<ProcessId>,
        work: ResourceVector,
        finish: Vec<bool>,
        message: impl Into<String>,
    ) {
        self.steps.push(TraceStep {
            process,
            work,
            finish,
            message: message.into(),
        });
    }

    /// All entries, chronologically.
    #[inline(always)]
    pub fn steps(&self) -> &[TraceStep] {
        &self.steps
    }

    /// Number of recorded entries.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when nothing has been recorded.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshots_are_independent_of_later_mutation() {
        let mut recorder = StepRecorder::new(vec![ProcessId::new(0)]);
        let mut work = ResourceVector::new(vec![3, 3, 2]);
        let finish = vec![false];

        recorder.record(Some(ProcessId::new(0)), work.clone(), finish.clone(), "a");
        work += &ResourceVector::new(vec![2, 0, 0]);
        recorder.record(Some(ProcessId::new(0)), work.clone(), vec![true], "b");

        let steps = recorder.steps();
        assert_eq!(steps[0].work, ResourceVector::new(vec![3, 3, 2]));
        assert_eq!(steps[0].finish, vec![false]);
        assert_eq!(steps[1].work, ResourceVector::new(vec![5, 3, 2]));
    }

    #[test]
    fn test_entries_keep_chronological_order() {
        let mut recorder = StepRecorder::new(vec![]);
        for i in 0..4 {
            recorder.record(None, ResourceVector::zeros(1), vec![], format!("step {}", i));
        }

        let messages: Vec<&str> = recorder.steps().iter().map(|s| s.message.as_str()).collect();
        assert_eq!(messages, vec!["step 0", "step 1", "step 2", "step 3"]);
    }
}
