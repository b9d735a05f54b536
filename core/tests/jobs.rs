use hustle_core::catalog::Catalog;
use hustle_core::clock::{ManualClock, MINUTE_MS};
use hustle_core::command::{Caller, Command, Reply};
use hustle_core::engine::EconomyEngine;
use hustle_core::error::EconError;
use hustle_core::store::EconStore;
use std::sync::Arc;

// ── Test helpers ────────────────────────────────────────────────────────────

fn make_engine(seed: u64) -> (EconomyEngine, Arc<ManualClock>) {
    let store = EconStore::in_memory().unwrap();
    store.migrate().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let engine =
        EconomyEngine::new(store, Catalog::builtin(), clock.clone(), Some(seed)).unwrap();
    (engine, clock)
}

fn alice() -> Caller {
    Caller::new("alice", "Alice")
}

fn work(engine: &mut EconomyEngine) -> Reply {
    engine.handle(&alice(), Command::Work).unwrap()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn work_requires_a_job() {
    let (mut engine, _clock) = make_engine(1);
    let err = engine.handle(&alice(), Command::Work).unwrap_err();
    assert!(matches!(err, EconError::Validation(_)));
}

/// Only entry ranks are reachable by acquisition, and only from the
/// sentinel state.
#[test]
fn job_acquisition_entry_rank_only() {
    let (mut engine, _clock) = make_engine(1);

    let err = engine
        .handle(
            &alice(),
            Command::GetJob {
                name: "Senior Developer".into(),
            },
        )
        .unwrap_err();
    assert!(matches!(err, EconError::Validation(_)));

    let reply = engine
        .handle(&alice(), Command::GetJob { name: "intern".into() })
        .unwrap();
    assert!(matches!(reply, Reply::JobTaken { ref title } if title == "Intern"));

    // A second job while employed is rejected.
    let err = engine
        .handle(&alice(), Command::GetJob { name: "Nurse".into() })
        .unwrap_err();
    assert!(matches!(err, EconError::Validation(_)));
}

#[test]
fn work_pays_hourly_rate_and_enforces_cooldown() {
    let (mut engine, clock) = make_engine(7);
    engine
        .handle(&alice(), Command::GetJob { name: "Cashier".into() })
        .unwrap();

    let Reply::Worked { hours, payout, .. } = work(&mut engine) else {
        panic!("expected worked reply");
    };
    assert!((3..=8).contains(&hours));
    assert_eq!(payout, 10 * hours); // Cashier pays $10/hr, no modifiers
    assert_eq!(engine.store().balance("alice").unwrap(), payout);

    // Cooldown window: 30 minutes.
    let err = engine.handle(&alice(), Command::Work).unwrap_err();
    let EconError::CooldownActive { remaining_ms } = err else {
        panic!("expected cooldown error");
    };
    assert!(remaining_ms > 0 && remaining_ms <= 30 * MINUTE_MS);

    clock.advance(30 * MINUTE_MS);
    work(&mut engine);
    let account = engine.store().require_account("alice").unwrap();
    assert_eq!(account.times_worked, 2);
}

#[test]
fn meth_shortens_the_cooldown_window() {
    let (mut engine, clock) = make_engine(7);
    engine
        .handle(&alice(), Command::GetJob { name: "Cashier".into() })
        .unwrap();
    work(&mut engine);

    engine.store().grant_item("alice", "Meth", 1).unwrap();
    engine
        .handle(&alice(), Command::Use { item: "Meth".into() })
        .unwrap();

    // 20 minutes is still short of the plain 30-minute window but
    // clears the reduced one.
    clock.advance(20 * MINUTE_MS);
    assert!(matches!(
        work(&mut engine),
        Reply::Worked { .. }
    ));
}

#[test]
fn cocaine_scales_the_work_payout() {
    let (mut engine, _clock) = make_engine(11);
    engine
        .handle(&alice(), Command::GetJob { name: "Cashier".into() })
        .unwrap();
    engine.store().grant_item("alice", "Cocaine", 1).unwrap();
    engine
        .handle(&alice(), Command::Use { item: "Cocaine".into() })
        .unwrap();

    let Reply::Worked { hours, payout, .. } = work(&mut engine) else {
        panic!("expected worked reply");
    };
    assert_eq!(payout, ((10 * hours) as f64 * 1.25).floor() as i64);
}

/// A work counter exactly at the threshold is promotable; one less is
/// not. Cashier needs 5 shifts for Stocker.
#[test]
fn promotion_threshold_boundary() {
    let (mut engine, clock) = make_engine(3);
    engine
        .handle(&alice(), Command::GetJob { name: "Cashier".into() })
        .unwrap();

    for _ in 0..4 {
        work(&mut engine);
        clock.advance(31 * MINUTE_MS);
    }
    let reply = engine.handle(&alice(), Command::Promote).unwrap();
    assert!(matches!(reply, Reply::PromotionProgress { remaining: 1 }));

    work(&mut engine);
    let reply = engine.handle(&alice(), Command::Promote).unwrap();
    assert!(matches!(reply, Reply::Promoted { ref title } if title == "Stocker"));

    // The counter resets on advancement.
    let account = engine.store().require_account("alice").unwrap();
    assert_eq!(account.times_worked, 0);
    assert_eq!(account.job_rank, 1);
}

#[test]
fn promotion_is_terminal_at_the_top_rank() {
    let (mut engine, _clock) = make_engine(3);
    engine.handle(&alice(), Command::View { target: None }).unwrap();
    engine.store().set_job("alice", "Manager", 1, 2).unwrap();

    let reply = engine.handle(&alice(), Command::Promote).unwrap();
    assert!(matches!(reply, Reply::TopRank));
}

#[test]
fn quitting_returns_to_the_sentinel_and_resets_the_counter() {
    let (mut engine, clock) = make_engine(3);
    engine
        .handle(&alice(), Command::GetJob { name: "Nurse".into() })
        .unwrap();
    work(&mut engine);
    clock.advance(31 * MINUTE_MS);

    engine.handle(&alice(), Command::QuitJob).unwrap();
    let account = engine.store().require_account("alice").unwrap();
    assert!(!account.has_job());
    assert_eq!(account.times_worked, 0);
    assert_eq!(account.job, "None");

    // Quitting again has nothing to quit.
    let err = engine.handle(&alice(), Command::QuitJob).unwrap_err();
    assert!(matches!(err, EconError::Validation(_)));
}

#[test]
fn job_board_skips_the_sentinel_tier() {
    let (mut engine, _clock) = make_engine(1);
    let Reply::JobBoard { tiers } = engine.handle(&alice(), Command::Jobs).unwrap() else {
        panic!("expected job board");
    };
    assert_eq!(tiers.len(), 5);
    assert_eq!(tiers[0].titles[0], "Cashier");
    assert!(tiers.iter().all(|t| !t.titles.contains(&"None".to_string())));
}
