//! End-to-end custody scenarios
//!
//! Drives the fee calculator, escrow policy, ledger, and scheduler
//! together the way the task-completion flow does:
//! 1. Small community task: fees only, no custody
//! 2. Large corporate task: full escrow lifecycle to scheduled release
//! 3. Barter task: never charged, never escrowed
//! 4. Disputed corporate task: dispute beats the sweep, then resolves

use std::sync::Arc;

use market_core::{EscrowPolicy, FeeCalculator, FeeSchedule, TaskType};
use market_escrow::{
    DisputeOutcome, EscrowLedger, EscrowStatus, MemoryStore, PayoutScheduler,
};

const NOW: i64 = 1_700_000_000;
const HOLD: i64 = 86_400;

struct Engine {
    calculator: FeeCalculator,
    policy: EscrowPolicy,
    ledger: Arc<EscrowLedger>,
    scheduler: PayoutScheduler,
}

fn engine() -> Engine {
    let schedule = Arc::new(FeeSchedule::standard());
    let ledger = Arc::new(EscrowLedger::new(Arc::new(MemoryStore::new())));
    Engine {
        calculator: FeeCalculator::new(schedule.clone()),
        policy: EscrowPolicy::new(schedule),
        ledger: ledger.clone(),
        scheduler: PayoutScheduler::new(ledger, HOLD as u64),
    }
}

/// Scenario A: $100.00 community task stays below the $200 threshold
#[test]
fn test_scenario_small_community_task() {
    let engine = engine();

    let breakdown = engine.calculator.compute(10_000, TaskType::Community).unwrap();
    assert_eq!(breakdown.gross, 10_000);
    assert_eq!(breakdown.platform_fee, 700);
    assert_eq!(breakdown.processing_fee, 0);
    assert_eq!(breakdown.net, 9_300);

    let decision = engine.policy.decide(10_000, TaskType::Community).unwrap();
    assert!(!decision.requires_escrow);
    assert_eq!(decision.threshold, Some(20_000));
}

/// Scenario B: $250.00 corporate task goes through the full lifecycle
#[test]
fn test_scenario_corporate_task_full_lifecycle() {
    let engine = engine();

    let breakdown = engine.calculator.compute(25_000, TaskType::Corporate).unwrap();
    assert_eq!(breakdown.platform_fee, 3_750);
    assert_eq!(breakdown.net, 21_250);

    let decision = engine.policy.decide(25_000, TaskType::Corporate).unwrap();
    assert!(decision.requires_escrow);

    // custody required: open at decision time
    let entry = engine.scheduler.open("tx-corp-1", 25_000, NOW).unwrap();
    assert_eq!(entry.status, EscrowStatus::Pending);
    assert_eq!(entry.release_eligible_at, NOW + HOLD);

    // gateway confirms capture
    let held = engine.ledger.mark_held(&entry.id).unwrap();
    assert_eq!(held.status, EscrowStatus::Held);

    // hold period not yet elapsed: sweep does nothing
    assert!(engine.scheduler.sweep(NOW + HOLD - 1).unwrap().is_empty());

    // hold period elapsed with no dispute: sweep releases
    let released = engine.scheduler.sweep(NOW + HOLD).unwrap();
    assert_eq!(released.len(), 1);
    let final_entry = engine.ledger.get(&entry.id).unwrap();
    assert_eq!(final_entry.status, EscrowStatus::Released);
    assert_eq!(final_entry.resolved_at, Some(NOW + HOLD));
}

/// Scenario C: $50.00 barter task, free and never escrowed
#[test]
fn test_scenario_barter_task() {
    let engine = engine();

    let breakdown = engine.calculator.compute(5_000, TaskType::Barter).unwrap();
    assert_eq!(breakdown.platform_fee, 0);
    assert_eq!(breakdown.processing_fee, 0);
    assert_eq!(breakdown.net, 5_000);

    let decision = engine.policy.decide(5_000, TaskType::Barter).unwrap();
    assert!(!decision.requires_escrow);
}

/// A dispute filed during the hold period blocks the sweep; resolution
/// decides the terminal state.
#[test]
fn test_scenario_disputed_task() {
    let engine = engine();

    let entry = engine.scheduler.open("tx-disp-1", 40_000, NOW).unwrap();
    engine.ledger.mark_held(&entry.id).unwrap();
    engine.ledger.dispute(&entry.id).unwrap();

    // sweep after the hold period must not pay out a disputed entry
    assert!(engine.scheduler.sweep(NOW + HOLD + 60).unwrap().is_empty());
    assert_eq!(
        engine.ledger.get(&entry.id).unwrap().status,
        EscrowStatus::Disputed
    );

    let cancelled = engine
        .ledger
        .resolve_dispute(&entry.id, DisputeOutcome::Cancel, NOW + HOLD + 120)
        .unwrap();
    assert_eq!(cancelled.status, EscrowStatus::Cancelled);
    assert_eq!(cancelled.resolved_at, Some(NOW + HOLD + 120));

    // terminal: later sweeps never revive it
    assert!(engine.scheduler.sweep(NOW + 10 * HOLD).unwrap().is_empty());
}

/// Retried opens return the duplicate error and the original entry
/// stays fetchable, so the create flow is idempotent.
#[test]
fn test_scenario_retried_open() {
    let engine = engine();

    let first = engine.scheduler.open("tx-retry", 25_000, NOW).unwrap();
    let err = engine.scheduler.open("tx-retry", 25_000, NOW + 5).unwrap_err();
    assert_eq!(
        err,
        market_escrow::EscrowError::DuplicateEscrow("tx-retry".to_string())
    );

    let existing = engine.ledger.find_by_ref("tx-retry").unwrap().unwrap();
    assert_eq!(existing.id, first.id);
    assert_eq!(existing.created_at, NOW);
}
