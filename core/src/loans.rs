//! Peer-to-peer loans.
//!
//! An offer is a transient, unpersisted proposal held by the OfferBook —
//! at most one outstanding offer per borrower, removed on accept,
//! decline, or failed acceptance. Funds move and a loan row is persisted
//! only at acceptance time.

use crate::clock::DAY_MS;
use crate::command::{Caller, LoanRole, LoanView, Reply};
use crate::engine::EconomyEngine;
use crate::error::{EconError, EconResult};
use crate::store::LoanRow;
use crate::types::{LoanId, Money, UserId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct PendingLoanOffer {
    pub lender: UserId,
    pub amount: Money,
    pub interest: f64,
    pub days: i64,
}

#[derive(Default)]
pub struct OfferBook {
    pending: HashMap<UserId, PendingLoanOffer>,
}

impl OfferBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, borrower: &str) -> Option<&PendingLoanOffer> {
        self.pending.get(borrower)
    }

    pub fn insert(&mut self, borrower: &str, offer: PendingLoanOffer) -> EconResult<()> {
        if self.pending.contains_key(borrower) {
            return Err(EconError::AlreadyActive("loan offer"));
        }
        self.pending.insert(borrower.to_string(), offer);
        Ok(())
    }

    pub fn remove(&mut self, borrower: &str) -> Option<PendingLoanOffer> {
        self.pending.remove(borrower)
    }
}

impl EconomyEngine {
    pub(crate) fn offer_loan(
        &mut self,
        caller: &Caller,
        borrower: &str,
        amount: Money,
        interest: f64,
        days: i64,
    ) -> EconResult<Reply> {
        if borrower == caller.id {
            return Err(EconError::invalid("you cannot loan money to yourself"));
        }
        if amount <= 0 {
            return Err(EconError::invalid("loan amount must be positive"));
        }
        if !interest.is_finite() || interest < 0.0 {
            return Err(EconError::invalid("interest must be a non-negative percentage"));
        }
        if days <= 0 {
            return Err(EconError::invalid("days until due must be positive"));
        }
        if self.store.balance(&caller.id)? < amount {
            return Err(EconError::InsufficientFunds);
        }
        self.store.ensure_peer(borrower, self.clock.now_ms())?;
        self.offers.insert(
            borrower,
            PendingLoanOffer {
                lender: caller.id.clone(),
                amount,
                interest,
                days,
            },
        )?;
        log::info!(
            "{} offered {borrower} a ${amount} loan at {interest}% over {days}d",
            caller.id
        );
        Ok(Reply::LoanOffered {
            borrower_name: self.store.display_name(borrower)?,
            amount,
            interest,
            days,
        })
    }

    /// Accept the caller's pending offer. The lender's balance is
    /// re-validated at acceptance time; either way the offer is spent.
    pub(crate) fn accept_loan(&mut self, caller: &Caller) -> EconResult<Reply> {
        let offer = self
            .offers
            .remove(&caller.id)
            .ok_or_else(|| EconError::NotFound("pending loan offer".into()))?;
        let due_ms = self.clock.now_ms() + offer.days * DAY_MS;
        let loan_id = self.store.accept_loan(
            &offer.lender,
            &caller.id,
            offer.amount,
            offer.interest,
            due_ms,
        )?;
        log::info!(
            "loan #{loan_id}: {} -> {} ${} at {}%",
            offer.lender,
            caller.id,
            offer.amount,
            offer.interest
        );
        Ok(Reply::LoanAccepted {
            loan_id,
            lender_name: self.store.display_name(&offer.lender)?,
            amount: offer.amount,
        })
    }

    pub(crate) fn decline_loan(&mut self, caller: &Caller) -> EconResult<Reply> {
        let offer = self
            .offers
            .remove(&caller.id)
            .ok_or_else(|| EconError::NotFound("pending loan offer".into()))?;
        Ok(Reply::LoanDeclined {
            lender_name: self.store.display_name(&offer.lender)?,
        })
    }

    pub(crate) fn repay_loan(&mut self, caller: &Caller, loan_id: LoanId) -> EconResult<Reply> {
        let loan = self
            .store
            .loan(loan_id)?
            .filter(|l| l.borrower_id == caller.id)
            .ok_or_else(|| EconError::NotFound(format!("loan #{loan_id}")))?;
        if loan.paid {
            return Err(EconError::invalid("this loan is already paid"));
        }
        let total = loan.total_owed();
        self.store
            .repay_loan(loan_id, &caller.id, &loan.lender_id, total)?;
        log::info!("loan #{loan_id} repaid: {} -> {} ${total}", caller.id, loan.lender_id);
        Ok(Reply::LoanRepaid {
            loan_id,
            total,
            lender_name: self.store.display_name(&loan.lender_id)?,
        })
    }

    pub(crate) fn my_loans(&self, caller: &Caller) -> EconResult<Reply> {
        let loans = self.store.loans_by_lender(&caller.id)?;
        Ok(Reply::Loans {
            role: LoanRole::Lender,
            loans: self.loan_views(loans)?,
        })
    }

    pub(crate) fn my_debts(&self, caller: &Caller) -> EconResult<Reply> {
        let loans = self.store.loans_by_borrower(&caller.id)?;
        Ok(Reply::Loans {
            role: LoanRole::Borrower,
            loans: self.loan_views(loans)?,
        })
    }

    fn loan_views(&self, rows: Vec<LoanRow>) -> EconResult<Vec<LoanView>> {
        rows.into_iter()
            .map(|l| {
                Ok(LoanView {
                    lender_name: self.store.display_name(&l.lender_id)?,
                    borrower_name: self.store.display_name(&l.borrower_id)?,
                    id: l.id,
                    lender: l.lender_id,
                    borrower: l.borrower_id,
                    principal: l.principal,
                    interest: l.interest,
                    due_ms: l.due_ms,
                    paid: l.paid,
                })
            })
            .collect()
    }
}
