use hustle_core::catalog::Catalog;
use hustle_core::clock::{Clock, ManualClock, DAY_MS};
use hustle_core::command::{Caller, Command, LoanRole, Reply};
use hustle_core::engine::EconomyEngine;
use hustle_core::error::EconError;
use hustle_core::store::EconStore;
use std::sync::Arc;

// ── Test helpers ────────────────────────────────────────────────────────────

fn make_engine() -> (EconomyEngine, Arc<ManualClock>) {
    let store = EconStore::in_memory().unwrap();
    store.migrate().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let engine = EconomyEngine::new(store, Catalog::builtin(), clock.clone(), Some(1)).unwrap();
    (engine, clock)
}

fn lender() -> Caller {
    Caller::new("lender", "Lena")
}

fn borrower() -> Caller {
    Caller::new("borrower", "Bob")
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

fn offer(engine: &mut EconomyEngine, amount: i64, interest: f64, days: i64) -> Result<Reply, EconError> {
    engine.handle(
        &lender(),
        Command::OfferLoan {
            borrower: "borrower".into(),
            amount,
            interest,
            days,
        },
    )
}

// ── Tests ───────────────────────────────────────────────────────────────────

/// Full loan round trip: offer, accept, repay with interest, reject a
/// second repayment.
#[test]
fn loan_round_trip() {
    let (mut engine, clock) = make_engine();
    fund(&mut engine, "lender", 1_000);

    offer(&mut engine, 500, 10.0, 7).unwrap();
    assert!(engine.has_pending_offer("borrower"));
    // No funds move on the offer itself.
    assert_eq!(engine.store().balance("lender").unwrap(), 1_000);
    assert_eq!(engine.store().balance("borrower").unwrap(), 0);

    let Reply::LoanAccepted { loan_id, amount, .. } =
        engine.handle(&borrower(), Command::AcceptLoan).unwrap()
    else {
        panic!("expected acceptance");
    };
    assert_eq!(amount, 500);
    assert!(!engine.has_pending_offer("borrower"));
    assert_eq!(engine.store().balance("lender").unwrap(), 500);
    assert_eq!(engine.store().balance("borrower").unwrap(), 500);

    let loan = engine.store().loan(loan_id).unwrap().unwrap();
    assert!(!loan.paid);
    assert_eq!(loan.principal, 500);
    assert_eq!(loan.due_ms, clock.now_ms() + 7 * DAY_MS);

    // floor(500 * 1.10) = 550; the borrower is 50 short.
    let err = engine
        .handle(&borrower(), Command::Repay { loan_id })
        .unwrap_err();
    assert!(matches!(err, EconError::InsufficientFunds));

    fund(&mut engine, "borrower", 50);
    let Reply::LoanRepaid { total, .. } = engine
        .handle(&borrower(), Command::Repay { loan_id })
        .unwrap()
    else {
        panic!("expected repayment");
    };
    assert_eq!(total, 550);
    assert_eq!(engine.store().balance("lender").unwrap(), 1_050);
    assert_eq!(engine.store().balance("borrower").unwrap(), 0);
    assert!(engine.store().loan(loan_id).unwrap().unwrap().paid);

    // Repaying a settled loan is rejected.
    let err = engine
        .handle(&borrower(), Command::Repay { loan_id })
        .unwrap_err();
    assert!(matches!(err, EconError::Validation(_)));
}

#[test]
fn offer_validation() {
    let (mut engine, _clock) = make_engine();
    fund(&mut engine, "lender", 1_000);

    // Self-loan.
    let err = engine
        .handle(
            &lender(),
            Command::OfferLoan {
                borrower: "lender".into(),
                amount: 100,
                interest: 5.0,
                days: 7,
            },
        )
        .unwrap_err();
    assert!(matches!(err, EconError::Validation(_)));

    // Malformed terms.
    assert!(matches!(
        offer(&mut engine, 0, 5.0, 7).unwrap_err(),
        EconError::Validation(_)
    ));
    assert!(matches!(
        offer(&mut engine, 100, -1.0, 7).unwrap_err(),
        EconError::Validation(_)
    ));
    assert!(matches!(
        offer(&mut engine, 100, 5.0, 0).unwrap_err(),
        EconError::Validation(_)
    ));

    // Offering more than the lender holds.
    assert!(matches!(
        offer(&mut engine, 2_000, 5.0, 7).unwrap_err(),
        EconError::InsufficientFunds
    ));

    // One outstanding offer per borrower.
    offer(&mut engine, 100, 5.0, 7).unwrap();
    assert!(matches!(
        offer(&mut engine, 200, 5.0, 7).unwrap_err(),
        EconError::AlreadyActive(_)
    ));
}

#[test]
fn decline_clears_the_offer_without_moving_funds() {
    let (mut engine, _clock) = make_engine();
    fund(&mut engine, "lender", 1_000);
    offer(&mut engine, 500, 10.0, 7).unwrap();

    let reply = engine.handle(&borrower(), Command::DeclineLoan).unwrap();
    assert!(matches!(reply, Reply::LoanDeclined { .. }));
    assert!(!engine.has_pending_offer("borrower"));
    assert_eq!(engine.store().balance("lender").unwrap(), 1_000);
    assert_eq!(engine.store().balance("borrower").unwrap(), 0);

    // Nothing left to accept or decline.
    assert!(matches!(
        engine.handle(&borrower(), Command::AcceptLoan).unwrap_err(),
        EconError::NotFound(_)
    ));
    assert!(matches!(
        engine.handle(&borrower(), Command::DeclineLoan).unwrap_err(),
        EconError::NotFound(_)
    ));
}

/// The lender's balance may have changed between offer and acceptance;
/// it is re-validated when the borrower accepts, and a failed
/// acceptance spends the offer.
#[test]
fn acceptance_revalidates_the_lender_balance() {
    let (mut engine, _clock) = make_engine();
    fund(&mut engine, "lender", 1_000);
    offer(&mut engine, 800, 5.0, 7).unwrap();

    // The lender spends most of it in the meantime.
    engine
        .handle(
            &lender(),
            Command::Give {
                to: "charlie".into(),
                amount: 500,
            },
        )
        .unwrap();

    let err = engine.handle(&borrower(), Command::AcceptLoan).unwrap_err();
    assert!(matches!(err, EconError::InsufficientFunds));
    assert_eq!(engine.store().balance("lender").unwrap(), 500);
    assert_eq!(engine.store().balance("borrower").unwrap(), 0);
    assert!(!engine.has_pending_offer("borrower"));
}

#[test]
fn repay_rejects_strangers_and_unknown_ids() {
    let (mut engine, _clock) = make_engine();
    fund(&mut engine, "lender", 1_000);
    offer(&mut engine, 500, 10.0, 7).unwrap();
    let Reply::LoanAccepted { loan_id, .. } =
        engine.handle(&borrower(), Command::AcceptLoan).unwrap()
    else {
        panic!("expected acceptance");
    };

    // Only the borrower can repay a loan.
    let err = engine
        .handle(&Caller::new("charlie", "Charlie"), Command::Repay { loan_id })
        .unwrap_err();
    assert!(matches!(err, EconError::NotFound(_)));

    let err = engine
        .handle(&borrower(), Command::Repay { loan_id: 9_999 })
        .unwrap_err();
    assert!(matches!(err, EconError::NotFound(_)));
}

#[test]
fn listings_split_by_role() {
    let (mut engine, _clock) = make_engine();
    fund(&mut engine, "lender", 1_000);
    offer(&mut engine, 300, 20.0, 3).unwrap();
    engine.handle(&borrower(), Command::AcceptLoan).unwrap();

    let Reply::Loans { role, loans } = engine.handle(&lender(), Command::MyLoans).unwrap() else {
        panic!("expected loans reply");
    };
    assert!(matches!(role, LoanRole::Lender));
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].principal, 300);
    assert_eq!(loans[0].borrower_name, "Bob");
    assert!(!loans[0].paid);

    let Reply::Loans { role, loans } = engine.handle(&borrower(), Command::MyDebts).unwrap()
    else {
        panic!("expected loans reply");
    };
    assert!(matches!(role, LoanRole::Borrower));
    assert_eq!(loans.len(), 1);
    assert_eq!(loans[0].lender_name, "Lena");

    // The other side of each listing is empty.
    let Reply::Loans { loans, .. } = engine.handle(&lender(), Command::MyDebts).unwrap() else {
        panic!("expected loans reply");
    };
    assert!(loans.is_empty());
}
