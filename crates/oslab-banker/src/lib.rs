//! oslab-banker - Deadlock Avoidance and Detection Engine
//!
//! # Overview
//!
//! `oslab-banker` is the core engine behind the oslab teaching
//! simulators for operating-system resource management: an
//! implementation of the Banker's Algorithm that computes safety
//! verdicts, derives safe sequences, and builds wait-for graphs for
//! unsafe states. The model is a static snapshot evaluated once per
//! recalculation - requests never arrive mid-simulation.
//!
//! The CPU-scheduling, disk-scheduling, paging, and memory-allocation
//! simulators, along with all rendering and animation pacing, are
//! external collaborators: they supply already-parsed numeric vectors
//! and display structured results. Nothing in this crate parses text,
//! draws, or sleeps.
//!
//! # Invariants
//!
//! The engine's outputs must be provably correct, not merely plausible,
//! so these hold in every reachable state:
//!
//! - **Conservation**: `available + Σ allocation == total` per resource
//!   type, across every mutation.
//! - **Need non-negativity**: `need = max_demand - allocation` never
//!   goes negative; admission rejects infeasible demand up front.
//! - **Determinism**: identical operation histories produce
//!   bit-identical verdicts and traces. Insertion order is the only
//!   tie-break; there is no hash-order or randomness dependence.
//! - **Completeness**: a `Safe` sequence is a permutation of exactly
//!   the active process ids.
//! - **Soundness**: replaying a `Safe` sequence by hand against the
//!   trace never meets a process whose need exceeds the free pool at
//!   its turn.
//!
//! # Usage
//!
//! ```rust
//! use oslab_banker::domain::BankerEngine;
//!
//! let mut engine = BankerEngine::new();
//! engine.set_total_resources(&[10, 5, 7])?;
//! engine.add_process(&[7, 5, 3], &[0, 1, 0])?;
//! engine.add_process(&[3, 2, 2], &[2, 0, 0])?;
//!
//! let result = engine.evaluate();
//! assert!(result.is_safe());
//! assert!(engine.wait_for_graph(&result).is_empty());
//! # Ok::<(), oslab_banker::RegistryError>(())
//! ```

pub mod domain;
pub mod error;

pub use domain::{
    BankerEngine, Evaluation, Process, ProcessId, ProcessRegistry, ProcessStatus, ResourceVector,
    SafetyEvaluator, SafetyResult, StepRecorder, TraceStep, WaitForEdge, WaitForGraphBuilder,
};
pub use error::RegistryError;
