//! Kani Formal Verification Proofs

#![cfg(kani)]

use super::engine::BankerEngine;
use super::graph::WaitForGraphBuilder;
use super::registry::ProcessRegistry;
use super::safety::{SafetyEvaluator, SafetyResult};

/// Conservation holds after any bounded sequence of admissions.
///
/// # Scenario
///
/// Two resource types with small nondeterministic totals; two
/// candidate processes with nondeterministic demand/allocation. Any
/// admission that succeeds must preserve
/// `available + Σ allocation == total`.
#[kani::proof]
#[kani::unwind(5)]
fn proof_conservation_after_admissions() {
    let total_a: i64 = kani::any();
    let total_b: i64 = kani::any();
    kani::assume((0..=3).contains(&total_a) && (0..=3).contains(&total_b));
    kani::assume(total_a + total_b > 0);

    let mut registry = ProcessRegistry::new();
    if registry.set_total_resources(&[total_a, total_b]).is_err() {
        return;
    }
    kani::assert(registry.verify_conservation(), "conservation at reset");

    for _ in 0..2 {
        let max = [kani::any::<i64>(), kani::any::<i64>()];
        let alloc = [kani::any::<i64>(), kani::any::<i64>()];
        kani::assume(max.iter().all(|v| (0..=3).contains(v)));
        kani::assume(alloc.iter().all(|v| (0..=3).contains(v)));

        let _ = registry.add_process(&max, &alloc);
        kani::assert(
            registry.verify_conservation(),
            "conservation after admission attempt",
        );
    }
}

/// A safe verdict never produces wait-for edges.
#[kani::proof]
#[kani::unwind(4)]
fn proof_no_edges_on_safe() {
    let mut registry = ProcessRegistry::new();
    if registry.set_total_resources(&[2, 2]).is_err() {
        return;
    }

    let max = [kani::any::<i64>(), kani::any::<i64>()];
    let alloc = [kani::any::<i64>(), kani::any::<i64>()];
    kani::assume(max.iter().all(|v| (0..=2).contains(v)));
    kani::assume(alloc.iter().all(|v| (0..=2).contains(v)));
    let _ = registry.add_process(&max, &alloc);

    let evaluation = SafetyEvaluator::new().evaluate(&registry);
    if evaluation.result.is_safe() {
        let edges = WaitForGraphBuilder::new().build(&registry, &evaluation.result);
        kani::assert(edges.is_empty(), "safe state must have no edges");
    }
}

/// The AB-BA mutual wait is recognized as unsafe with both edges.
///
/// # Scenario
///
/// ```text
/// total = [1, 1]
/// P0: max [1, 1], holds [1, 0]
/// P1: max [1, 1], holds [0, 1]
/// ```
#[kani::proof]
#[kani::unwind(4)]
fn proof_ab_ba_mutual_wait() {
    let mut engine = BankerEngine::new();
    kani::assert(
        engine.set_total_resources(&[1, 1]).is_ok(),
        "totals are valid",
    );
    kani::assert(engine.add_process(&[1, 1], &[1, 0]).is_ok(), "P0 admitted");
    kani::assert(engine.add_process(&[1, 1], &[0, 1]).is_ok(), "P1 admitted");

    let result = engine.evaluate();
    kani::assert(
        matches!(result, SafetyResult::Unsafe { ref finished } if finished.is_empty()),
        "nobody can be shown to finish",
    );

    let edges = engine.wait_for_graph(&result);
    kani::assert(edges.len() == 2, "mutual wait yields both directed edges");
}
