use hustle_core::catalog::{Boost, Catalog};
use hustle_core::clock::{Clock, ManualClock, HOUR_MS, MINUTE_MS};
use hustle_core::command::{Bet, Caller, Command, Reply};
use hustle_core::engine::{EconomyEngine, HOUSE_ACCOUNT};
use hustle_core::error::EconError;
use hustle_core::games::{CoinFace, Outcome};
use hustle_core::session::GameKind;
use hustle_core::store::EconStore;
use std::sync::Arc;

// ── Test helpers ────────────────────────────────────────────────────────────

fn make_engine_with(catalog: Catalog, seed: u64) -> (EconomyEngine, Arc<ManualClock>) {
    let store = EconStore::in_memory().unwrap();
    store.migrate().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let engine = EconomyEngine::new(store, catalog, clock.clone(), Some(seed)).unwrap();
    (engine, clock)
}

fn make_engine(seed: u64) -> (EconomyEngine, Arc<ManualClock>) {
    make_engine_with(Catalog::builtin(), seed)
}

fn alice() -> Caller {
    Caller::new("alice", "Alice")
}

fn fund(engine: &mut EconomyEngine, user: &str, amount: i64) {
    engine
        .handle(
            &Caller::admin("admin", "Admin"),
            Command::AdminGive {
                to: user.to_string(),
                amount,
            },
        )
        .unwrap();
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn using_requires_a_known_item_in_inventory() {
    let (mut engine, _clock) = make_engine(1);

    let err = engine
        .handle(&alice(), Command::Use { item: "Krokodil".into() })
        .unwrap_err();
    assert!(matches!(err, EconError::NotFound(_)));

    // Known item, empty inventory.
    let err = engine
        .handle(&alice(), Command::Use { item: "Weed".into() })
        .unwrap_err();
    assert!(matches!(err, EconError::Validation(_)));
}

#[test]
fn use_decrements_inventory_to_zero_not_below() {
    let (mut engine, _clock) = make_engine(1);
    engine.store().grant_item("alice", "Weed", 1).unwrap();

    engine
        .handle(&alice(), Command::Use { item: "weed".into() })
        .unwrap();
    assert_eq!(engine.store().item_quantity("alice", "Weed").unwrap(), 0);

    let err = engine
        .handle(&alice(), Command::Use { item: "Weed".into() })
        .unwrap_err();
    assert!(matches!(err, EconError::Validation(_)));
    assert_eq!(engine.store().item_quantity("alice", "Weed").unwrap(), 0);
}

/// Using the same consumable twice refreshes the single expiry row
/// rather than stacking a second effect.
#[test]
fn reuse_replaces_the_expiry_rather_than_stacking() {
    let (mut engine, clock) = make_engine(1);
    engine.store().grant_item("alice", "Weed", 2).unwrap();

    engine
        .handle(&alice(), Command::Use { item: "Weed".into() })
        .unwrap();
    let first = engine
        .store()
        .effect_expiry("alice", "Weed")
        .unwrap()
        .unwrap();
    assert_eq!(first, clock.now_ms() + HOUR_MS);

    clock.advance(10 * MINUTE_MS);
    engine
        .handle(&alice(), Command::Use { item: "Weed".into() })
        .unwrap();
    let second = engine
        .store()
        .effect_expiry("alice", "Weed")
        .unwrap()
        .unwrap();
    assert_eq!(second, clock.now_ms() + HOUR_MS);
    assert_eq!(second, first + 10 * MINUTE_MS);

    // One row, refreshed — the active list names the item once.
    let items = engine
        .store()
        .active_effect_items("alice", clock.now_ms())
        .unwrap();
    assert_eq!(items, vec!["Weed".to_string()]);
}

#[test]
fn poll_sweeps_expired_effect_rows() {
    let (mut engine, clock) = make_engine(1);
    engine.store().grant_item("alice", "Meth", 1).unwrap();
    engine
        .handle(&alice(), Command::Use { item: "Meth".into() })
        .unwrap();
    assert!(engine
        .store()
        .effect_expiry("alice", "Meth")
        .unwrap()
        .is_some());

    clock.advance(HOUR_MS + 1);
    engine.poll().unwrap();
    assert!(engine
        .store()
        .effect_expiry("alice", "Meth")
        .unwrap()
        .is_none());
}

/// The win-chance hook is catalog data. With a +50% coinflip boost the
/// biased coin cannot lose.
#[test]
fn win_chance_boost_biases_the_named_game() {
    let mut catalog = Catalog::builtin();
    let lsd = catalog
        .drugs
        .iter_mut()
        .find(|d| d.name == "LSD")
        .expect("builtin catalog carries LSD");
    lsd.boost = Boost::WinChance {
        game: GameKind::Coinflip,
        percent: 50,
    };

    let (mut engine, _clock) = make_engine_with(catalog, 77);
    fund(&mut engine, "alice", 10_000);
    fund(&mut engine, HOUSE_ACCOUNT, 1_000_000);
    engine.store().grant_item("alice", "LSD", 1).unwrap();
    engine
        .handle(&alice(), Command::Use { item: "LSD".into() })
        .unwrap();

    for _ in 0..20 {
        engine
            .handle(&alice(), Command::Coinflip { bet: Bet::Amount(10) })
            .unwrap();
        let Reply::Settled { settlement, .. } = engine
            .handle(
                &alice(),
                Command::CallCoin {
                    face: CoinFace::Heads,
                },
            )
            .unwrap()
        else {
            panic!("expected settlement");
        };
        assert_eq!(settlement.outcome, Outcome::Win);
    }
}

/// The same boost leaves other games untouched: roulette pays by its
/// own table regardless of a live coinflip effect.
#[test]
fn boost_does_not_leak_into_other_games() {
    let (mut engine, clock) = make_engine(4);
    fund(&mut engine, "alice", 10_000);
    fund(&mut engine, HOUSE_ACCOUNT, 1_000_000);
    engine.store().grant_item("alice", "LSD", 1).unwrap();
    engine
        .handle(&alice(), Command::Use { item: "LSD".into() })
        .unwrap();

    let pre = engine.store().balance("alice").unwrap();
    engine
        .handle(
            &alice(),
            Command::Roulette {
                bet: Bet::Amount(100),
                choice: hustle_core::games::RouletteChoice::Red,
            },
        )
        .unwrap();
    clock.advance(500);
    let delivered = engine.poll().unwrap();
    let (_, Reply::Settled { settlement, .. }) = &delivered[0] else {
        panic!("expected settlement");
    };
    match settlement.outcome {
        Outcome::Win => assert_eq!(engine.store().balance("alice").unwrap(), pre + 100),
        Outcome::Loss => assert_eq!(engine.store().balance("alice").unwrap(), pre - 100),
        Outcome::Push => panic!("roulette has no push"),
    }
}
