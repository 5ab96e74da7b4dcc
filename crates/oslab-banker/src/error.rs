//! Registry Error Taxonomy
//!
//! Every kind is a local, synchronous validation failure surfaced at
//! the offending operation. None are retried internally and none leave
//! the registry in a partially-mutated state: validation completes in
//! full before the first mutation.
//!
//! "No safe sequence exists" is deliberately *not* in this taxonomy.
//! An unsafe state is a legitimate evaluation result, not a failure.

use crate::domain::registry::ProcessId;

/// Validation failures raised by [`crate::domain::registry::ProcessRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A vector element is negative, or the vector is empty.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Human-readable explanation of what was malformed.
        reason: String,
    },

    /// A vector's length does not match the configured number of
    /// resource types.
    #[error("dimension mismatch: expected {expected} resource types, got {actual}")]
    DimensionMismatch {
        /// Configured resource-type count (0 when no total has been set).
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },

    /// A single process's allocation exceeds the system total for some
    /// resource type.
    #[error(
        "over-allocation: allocated {allocated} of resource {resource} exceeds system total {total}"
    )]
    OverAllocation {
        /// Offending resource index.
        resource: usize,
        /// Amount the process asked to hold.
        allocated: u64,
        /// System total for that resource.
        total: u64,
    },

    /// Declared maximum demand is below the current allocation for some
    /// resource type.
    #[error(
        "infeasible demand: max demand {max_demand} of resource {resource} is below allocation {allocated}"
    )]
    InfeasibleDemand {
        /// Offending resource index.
        resource: usize,
        /// Declared maximum demand.
        max_demand: u64,
        /// Already-held amount.
        allocated: u64,
    },

    /// Admitting the process would push the aggregate allocation across
    /// all processes past the system total for some resource type.
    #[error(
        "capacity exceeded: aggregate allocation {aggregate} of resource {resource} exceeds system total {total}"
    )]
    CapacityExceeded {
        /// Offending resource index.
        resource: usize,
        /// Aggregate allocation including the candidate process.
        aggregate: u64,
        /// System total for that resource.
        total: u64,
    },

    /// No process with the given id exists in this run.
    #[error("unknown process {0}")]
    UnknownProcess(ProcessId),

    /// The process was already withdrawn; withdrawal is terminal.
    #[error("process {0} is already withdrawn")]
    AlreadyWithdrawn(ProcessId),
}
