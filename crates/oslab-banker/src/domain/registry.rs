//! Process Registry - Validated Snapshot of the Resource State
//!
//! The registry owns the static snapshot the engine evaluates: the
//! system-wide `total` vector, the derived `available` vector, and the
//! insertion-ordered set of processes with their maximum-demand and
//! current-allocation vectors.
//!
//! # Admission Discipline
//!
//! `add_process` validates in a fixed order (dimension, sign,
//! over-allocation, infeasible demand, aggregate capacity) and performs
//! *no* mutation until every check has passed. A rejected admission
//! leaves the registry byte-identical to its prior state.
//!
//! # Invariants
//!
//! - **Conservation**: `available[i] + Σ allocation[i]` over active
//!   processes equals `total[i]` for every resource type `i`.
//! - **Feasibility**: `allocation[i] <= max_demand[i]` for every
//!   admitted process, so `need` is non-negative by construction.
//! - **Id monotonicity**: ids are assigned from a counter that only
//!   moves forward within a run; withdrawal never frees an id.
//!
//! The registry deliberately does not trigger evaluation itself; the
//! [`crate::domain::engine::BankerEngine`] composes the two so the
//! registry stays free of evaluation cost when used standalone.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::vector::ResourceVector;
use crate::error::RegistryError;

/// Process identifier, unique within a run.
///
/// Assigned from a monotonically increasing counter on admission and
/// never reused; `set_total_resources` begins a new run and restarts
/// the counter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProcessId(pub usize);

impl ProcessId {
    /// Create a new process identifier.
    #[inline(always)]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw numeric id.
    #[inline(always)]
    pub const fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Terminal lifecycle status of a registered process.
///
/// Processes are never deleted; withdrawal converts a process to a
/// terminal `Withdrawn` record so the audit history of the run stays
/// intact while its allocation returns to the available pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessStatus {
    /// Holding its allocation and visible to the evaluator.
    Active,
    /// Terminal: allocation released, invisible to the evaluator.
    Withdrawn,
}

/// One registered process: immutable identity plus its demand and
/// allocation vectors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Unique id, assigned on admission.
    pub id: ProcessId,
    /// Declared maximum demand, per resource type.
    pub max_demand: ResourceVector,
    /// Currently held allocation, per resource type.
    pub allocation: ResourceVector,
    /// Lifecycle status.
    pub status: ProcessStatus,
}

impl Process {
    /// Outstanding need: `max_demand - allocation`, element-wise.
    ///
    /// Admission guarantees the subtraction cannot go negative; the
    /// saturating form is a display-safety clamp, never a semantic one.
    pub fn need(&self) -> ResourceVector {
        self.max_demand.saturating_sub(&self.allocation)
    }

    /// True while the process holds its allocation.
    #[inline(always)]
    pub fn is_active(&self) -> bool {
        self.status == ProcessStatus::Active
    }
}

/// Insertion-ordered process store with derived resource accounting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessRegistry {
    total: ResourceVector,
    available: ResourceVector,
    processes: Vec<Process>,
    next_id: usize,
}

impl ProcessRegistry {
    /// Create an empty, unconfigured registry.
    ///
    /// Until `set_total_resources` succeeds the resource-type count is
    /// zero and every admission fails with `DimensionMismatch`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of configured resource types (`m`).
    #[inline(always)]
    pub fn resource_types(&self) -> usize {
        self.total.len()
    }

    /// System-wide totals, one amount per resource type.
    #[inline(always)]
    pub fn total(&self) -> &ResourceVector {
        &self.total
    }

    /// Currently available amounts: `total - Σ active allocations`.
    #[inline(always)]
    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    /// All processes of the run, in insertion order, withdrawn records
    /// included.
    #[inline(always)]
    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Active processes in insertion order.
    ///
    /// Insertion order, not id order, is the authoritative tie-break
    /// everywhere downstream; the two only coincide because ids are
    /// assigned sequentially.
    pub fn active(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter().filter(|p| p.is_active())
    }

    /// Look up a process by id.
    pub fn process(&self, id: ProcessId) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Replace the system totals and begin a new run.
    ///
    /// Totals and allocations are coupled: changing one invalidates the
    /// other, so this clears every process, resets `available = total`,
    /// and restarts the id counter.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the vector is empty or any element is
    /// negative.
    pub fn set_total_resources(&mut self, raw: &[i64]) -> Result<(), RegistryError> {
        if raw.is_empty() {
            return Err(RegistryError::InvalidInput {
                reason: "total resources vector is empty".to_string(),
            });
        }
        let total = validate_amounts(raw, "total resources")?;

        debug!(total = %total, "total resources replaced; run reset");
        self.available = total.clone();
        self.total = total;
        self.processes.clear();
        self.next_id = 0;
        Ok(())
    }

    /// Admit a process with the given maximum demand and current
    /// allocation, returning its freshly assigned id.
    ///
    /// Validation order is fixed and complete before any mutation:
    ///
    /// 1. `DimensionMismatch` - either vector's length differs from the
    ///    configured resource-type count.
    /// 2. `InvalidInput` - any negative element.
    /// 3. `OverAllocation` - `allocation[i] > total[i]` for some `i`.
    /// 4. `InfeasibleDemand` - `max_demand[i] < allocation[i]` for some `i`.
    /// 5. `CapacityExceeded` - aggregate active allocation would exceed
    ///    `total[i]` for some `i`.
    pub fn add_process(
        &mut self,
        max_demand_raw: &[i64],
        allocation_raw: &[i64],
    ) -> Result<ProcessId, RegistryError> {
        let m = self.resource_types();
        for raw in [max_demand_raw, allocation_raw] {
            if raw.len() != m {
                return Err(RegistryError::DimensionMismatch {
                    expected: m,
                    actual: raw.len(),
                });
            }
        }

        let max_demand = validate_amounts(max_demand_raw, "max demand")?;
        let allocation = validate_amounts(allocation_raw, "allocation")?;

        for (i, held) in allocation.iter() {
            if held > self.total[i] {
                return Err(RegistryError::OverAllocation {
                    resource: i,
                    allocated: held,
                    total: self.total[i],
                });
            }
        }

        for (i, demanded) in max_demand.iter() {
            if demanded < allocation[i] {
                return Err(RegistryError::InfeasibleDemand {
                    resource: i,
                    max_demand: demanded,
                    allocated: allocation[i],
                });
            }
        }

        for (i, held) in allocation.iter() {
            if held > self.available[i] {
                let aggregate = (self.total[i] - self.available[i]) + held;
                return Err(RegistryError::CapacityExceeded {
                    resource: i,
                    aggregate,
                    total: self.total[i],
                });
            }
        }

        let id = ProcessId::new(self.next_id);
        self.next_id += 1;
        self.processes.push(Process {
            id,
            max_demand,
            allocation,
            status: ProcessStatus::Active,
        });
        self.recompute_available();

        debug!(process = %id, available = %self.available, "process admitted");
        Ok(id)
    }

    /// Withdraw a process, returning its allocation to the available
    /// pool.
    ///
    /// The record stays in `processes()` for audit; only its status
    /// changes. Withdrawal is terminal.
    ///
    /// # Errors
    ///
    /// `UnknownProcess` if no such id exists in this run;
    /// `AlreadyWithdrawn` if the process was withdrawn before.
    pub fn withdraw(&mut self, id: ProcessId) -> Result<(), RegistryError> {
        let process = self
            .processes
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RegistryError::UnknownProcess(id))?;

        if !process.is_active() {
            return Err(RegistryError::AlreadyWithdrawn(id));
        }
        process.status = ProcessStatus::Withdrawn;
        self.recompute_available();

        debug!(process = %id, available = %self.available, "process withdrawn");
        Ok(())
    }

    /// Outstanding need of a process, clamped at zero per element.
    ///
    /// The clamp exists for presentation only; admission invariants
    /// keep the true need non-negative.
    pub fn need(&self, id: ProcessId) -> Option<ResourceVector> {
        self.process(id).map(Process::need)
    }

    /// Check the conservation invariant:
    /// `available + Σ active allocations == total`, element-wise.
    ///
    /// A `false` here is an engine defect, never a user error; tests
    /// and proof harnesses call this after every mutation.
    pub fn verify_conservation(&self) -> bool {
        let mut accounted = self.available.clone();
        for process in self.active() {
            accounted += &process.allocation;
        }
        accounted == self.total
    }

    fn recompute_available(&mut self) {
        let mut held = ResourceVector::zeros(self.total.len());
        for process in self.processes.iter().filter(|p| p.is_active()) {
            held += &process.allocation;
        }
        debug_assert!(
            held.fits_within(&self.total),
            "admission must keep aggregate allocation within total"
        );
        self.available = self.total.saturating_sub(&held);
    }
}

/// Sign-check raw caller amounts and convert them to a vector.
fn validate_amounts(raw: &[i64], what: &str) -> Result<ResourceVector, RegistryError> {
    let mut amounts = Vec::with_capacity(raw.len());
    for (i, &value) in raw.iter().enumerate() {
        if value < 0 {
            return Err(RegistryError::InvalidInput {
                reason: format!("{} has negative amount {} at resource {}", what, value, i),
            });
        }
        amounts.push(value as u64);
    }
    Ok(ResourceVector::new(amounts))
}
