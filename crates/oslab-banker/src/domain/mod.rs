//! Domain Model - Pure Algorithm Logic
//!
//! Leaves first: [`vector`] is the arithmetic foundation, [`registry`]
//! owns the validated snapshot, [`safety`] runs the Banker's safety
//! algorithm over it, [`graph`] derives the wait-for edges for unsafe
//! states, [`trace`] records the replayable step log, and [`engine`]
//! composes the lot behind the external interface.
//!
//! Everything in here is synchronous and single-threaded: no operation
//! suspends, blocks, or shares mutable state across a component
//! boundary. The evaluator works on private copies; presentation-side
//! pacing happens on the recorded trace, never inside the algorithm.

pub mod engine;
pub mod graph;
pub mod proof;
pub mod registry;
pub mod safety;
pub mod trace;
pub mod vector;

pub use engine::BankerEngine;
pub use graph::{WaitForEdge, WaitForGraphBuilder};
pub use registry::{Process, ProcessId, ProcessRegistry, ProcessStatus};
pub use safety::{Evaluation, SafetyEvaluator, SafetyResult};
pub use trace::{StepRecorder, TraceStep};
pub use vector::ResourceVector;
