//! End-to-end scenarios and algebraic properties of the engine,
//! exercised through the same facade the presentation layer uses.

use std::collections::BTreeSet;

use anyhow::Result;

use oslab_banker::{
    BankerEngine, ProcessId, RegistryError, ResourceVector, SafetyResult, WaitForEdge,
};

fn ids(raw: &[usize]) -> Vec<ProcessId> {
    raw.iter().copied().map(ProcessId::new).collect()
}

/// The textbook five-process example (Silberschatz et al.).
fn textbook_engine() -> Result<BankerEngine> {
    let mut engine = BankerEngine::new();
    engine.set_total_resources(&[10, 5, 7])?;
    engine.add_process(&[7, 5, 3], &[0, 1, 0])?;
    engine.add_process(&[3, 2, 2], &[2, 0, 0])?;
    engine.add_process(&[9, 0, 2], &[3, 0, 2])?;
    engine.add_process(&[2, 2, 2], &[2, 1, 1])?;
    engine.add_process(&[4, 3, 3], &[0, 0, 2])?;
    Ok(engine)
}

#[test]
fn scenario_1_textbook_example_is_safe() -> Result<()> {
    let mut engine = textbook_engine()?;

    assert_eq!(engine.registry().available().as_slice(), &[3, 3, 2]);

    let result = engine.evaluate();
    match &result {
        SafetyResult::Safe { sequence } => {
            assert_eq!(sequence, &ids(&[1, 3, 4, 0, 2]));
        }
        SafetyResult::Unsafe { .. } => panic!("textbook example must be safe"),
    }
    Ok(())
}

#[test]
fn scenario_2_mutual_circular_wait() -> Result<()> {
    let mut engine = BankerEngine::new();
    engine.set_total_resources(&[1, 1])?;
    let p0 = engine.add_process(&[1, 1], &[1, 0])?;
    let p1 = engine.add_process(&[1, 1], &[0, 1])?;

    assert_eq!(engine.registry().available().as_slice(), &[0, 0]);

    let result = engine.evaluate();
    assert_eq!(result, SafetyResult::Unsafe { finished: vec![] });

    let edges = engine.wait_for_graph(&result);
    assert_eq!(
        edges,
        vec![
            WaitForEdge { from: p0, to: p1, resource: 1 },
            WaitForEdge { from: p1, to: p0, resource: 0 },
        ]
    );
    Ok(())
}

#[test]
fn scenario_3_zero_processes_trivially_safe() -> Result<()> {
    let mut engine = BankerEngine::new();
    engine.set_total_resources(&[5, 5])?;

    assert_eq!(engine.evaluate(), SafetyResult::Safe { sequence: vec![] });
    Ok(())
}

#[test]
fn scenario_4_over_allocation_leaves_registry_unchanged() -> Result<()> {
    let mut engine = BankerEngine::new();
    engine.set_total_resources(&[5])?;

    let err = engine.add_process(&[6], &[6]).unwrap_err();
    assert!(matches!(err, RegistryError::OverAllocation { .. }));
    assert_eq!(engine.registry().processes().len(), 0);
    Ok(())
}

#[test]
fn property_conservation_across_reachable_states() -> Result<()> {
    let mut engine = BankerEngine::new();
    engine.set_total_resources(&[10, 5, 7])?;
    assert!(engine.registry().verify_conservation());

    let steps: &[(&[i64], &[i64])] = &[
        (&[7, 5, 3], &[0, 1, 0]),
        (&[3, 2, 2], &[2, 0, 0]),
        (&[9, 0, 2], &[3, 0, 2]),
        // Rejected: aggregate allocation of resource 1 would reach 6 > 5
        (&[9, 5, 2], &[0, 5, 0]),
        (&[2, 2, 2], &[2, 1, 1]),
    ];
    for (max, alloc) in steps {
        let _ = engine.add_process(max, alloc);
        assert!(engine.registry().verify_conservation());
    }

    let withdrawn = engine.registry().processes()[0].id;
    engine.withdraw_process(withdrawn)?;
    assert!(engine.registry().verify_conservation());
    Ok(())
}

#[test]
fn property_need_non_negative_for_every_process() -> Result<()> {
    let engine = textbook_engine()?;

    for process in engine.registry().processes() {
        let need = engine.need(process.id)?;
        // u64 amounts cannot be negative; check the arithmetic identity
        // instead: allocation + need == max_demand, element-wise.
        let mut rebuilt = process.allocation.clone();
        rebuilt += &need;
        assert_eq!(rebuilt, process.max_demand);
    }
    Ok(())
}

#[test]
fn property_determinism_bit_identical_runs() -> Result<()> {
    let build = || -> Result<(SafetyResult, String)> {
        let mut engine = textbook_engine()?;
        let result = engine.evaluate();
        let trace_json = serde_json::to_string(engine.trace().expect("trace after evaluate"))?;
        Ok((result, trace_json))
    };

    let (result_a, trace_a) = build()?;
    let (result_b, trace_b) = build()?;

    assert_eq!(result_a, result_b);
    assert_eq!(trace_a, trace_b);
    Ok(())
}

#[test]
fn property_safe_sequence_is_a_permutation_of_all_ids() -> Result<()> {
    let mut engine = textbook_engine()?;

    let result = engine.evaluate();
    let sequence = match result {
        SafetyResult::Safe { sequence } => sequence,
        SafetyResult::Unsafe { .. } => panic!("expected safe"),
    };

    let from_sequence: BTreeSet<ProcessId> = sequence.iter().copied().collect();
    let from_registry: BTreeSet<ProcessId> =
        engine.registry().processes().iter().map(|p| p.id).collect();

    assert_eq!(sequence.len(), from_sequence.len(), "no duplicates");
    assert_eq!(from_sequence, from_registry, "covers every process");
    Ok(())
}

#[test]
fn property_safe_sequence_replays_soundly() -> Result<()> {
    let mut engine = textbook_engine()?;

    let sequence = match engine.evaluate() {
        SafetyResult::Safe { sequence } => sequence,
        SafetyResult::Unsafe { .. } => panic!("expected safe"),
    };

    // Replay by hand: release allocations in sequence order into a
    // fresh work pool and demand that every need fits at its turn.
    let registry = engine.registry();
    let mut work: ResourceVector = registry.available().clone();
    for id in sequence {
        let process = registry.process(id).expect("sequence ids exist");
        assert!(
            process.need().fits_within(&work),
            "{} scheduled before its need fits",
            id
        );
        work += &process.allocation;
    }
    assert_eq!(&work, registry.total());
    Ok(())
}

#[test]
fn property_no_edges_on_safe_verdict() -> Result<()> {
    let mut engine = textbook_engine()?;

    let result = engine.evaluate();
    assert!(result.is_safe());
    assert!(engine.wait_for_graph(&result).is_empty());
    Ok(())
}

#[test]
fn trace_replay_matches_verdict() -> Result<()> {
    let mut engine = BankerEngine::new();
    engine.set_total_resources(&[1, 1])?;
    engine.add_process(&[1, 1], &[1, 0])?;
    engine.add_process(&[1, 1], &[0, 1])?;
    let _ = engine.evaluate();

    let trace = engine.trace().expect("trace after evaluate");
    assert_eq!(trace.evaluation_order(), ids(&[0, 1]).as_slice());

    // init, two blocked examinations, verdict; nobody ever finishes.
    assert_eq!(trace.len(), 4);
    let last = trace.steps().last().expect("verdict entry");
    assert_eq!(last.process, None);
    assert_eq!(last.finish, vec![false, false]);
    assert!(last.message.starts_with("unsafe"));
    Ok(())
}

#[test]
fn withdrawal_preserves_audit_history_and_frees_resources() -> Result<()> {
    let mut engine = BankerEngine::new();
    engine.set_total_resources(&[2, 2])?;
    let p0 = engine.add_process(&[2, 2], &[1, 1])?;
    let p1 = engine.add_process(&[2, 2], &[1, 1])?;
    assert!(!engine.evaluate().is_safe());

    engine.withdraw_process(p0)?;

    // P1 can now reach its maximum; the run is safe again.
    assert_eq!(engine.evaluate(), SafetyResult::Safe { sequence: vec![p1] });
    // The withdrawn record remains, terminally, and cannot be
    // withdrawn twice.
    assert_eq!(engine.registry().processes().len(), 2);
    assert_eq!(
        engine.withdraw_process(p0),
        Err(RegistryError::AlreadyWithdrawn(p0))
    );
    Ok(())
}
