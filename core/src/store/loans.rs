//! Persisted loans. Pending offers are transient and never reach this
//! table; a row is created only at acceptance time.

use super::EconStore;
use crate::error::{EconError, EconResult};
use crate::types::{EpochMs, LoanId, Money, UserId};
use rusqlite::{params, OptionalExtension, Row};

#[derive(Debug, Clone)]
pub struct LoanRow {
    pub id: LoanId,
    pub lender_id: UserId,
    pub borrower_id: UserId,
    pub principal: Money,
    pub interest: f64,
    pub due_ms: EpochMs,
    pub paid: bool,
}

impl LoanRow {
    /// Principal plus simple interest, floored to whole currency units.
    pub fn total_owed(&self) -> Money {
        (self.principal as f64 * (1.0 + self.interest / 100.0)).floor() as Money
    }
}

fn loan_row(row: &Row) -> rusqlite::Result<LoanRow> {
    Ok(LoanRow {
        id: row.get(0)?,
        lender_id: row.get(1)?,
        borrower_id: row.get(2)?,
        principal: row.get(3)?,
        interest: row.get(4)?,
        due_ms: row.get(5)?,
        paid: row.get::<_, i64>(6)? != 0,
    })
}

impl EconStore {
    /// Move the principal lender → borrower and persist the loan, as one
    /// transaction. Fails without mutation if the lender can no longer
    /// cover the amount.
    pub fn accept_loan(
        &self,
        lender: &str,
        borrower: &str,
        principal: Money,
        interest: f64,
        due_ms: EpochMs,
    ) -> EconResult<LoanId> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "UPDATE accounts SET balance = balance - ?1 WHERE id = ?2 AND balance >= ?1",
            params![principal, lender],
        )?;
        if rows == 0 {
            return Err(EconError::InsufficientFunds);
        }
        tx.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2",
            params![principal, borrower],
        )?;
        tx.execute(
            "INSERT INTO loans (lender_id, borrower_id, principal, interest, due_ms, paid)
             VALUES (?1, ?2, ?3, ?4, ?5, 0)",
            params![lender, borrower, principal, interest, due_ms],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    pub fn loan(&self, id: LoanId) -> EconResult<Option<LoanRow>> {
        self.conn
            .query_row(
                "SELECT id, lender_id, borrower_id, principal, interest, due_ms, paid
                 FROM loans WHERE id = ?1",
                params![id],
                loan_row,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Move the repayment borrower → lender and flip the paid flag, as
    /// one transaction.
    pub fn repay_loan(
        &self,
        id: LoanId,
        borrower: &str,
        lender: &str,
        total: Money,
    ) -> EconResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "UPDATE accounts SET balance = balance - ?1 WHERE id = ?2 AND balance >= ?1",
            params![total, borrower],
        )?;
        if rows == 0 {
            return Err(EconError::InsufficientFunds);
        }
        tx.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2",
            params![total, lender],
        )?;
        tx.execute("UPDATE loans SET paid = 1 WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    pub fn loans_by_lender(&self, lender: &str) -> EconResult<Vec<LoanRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lender_id, borrower_id, principal, interest, due_ms, paid
             FROM loans WHERE lender_id = ?1 ORDER BY paid ASC, due_ms ASC",
        )?;
        let rows = stmt
            .query_map(params![lender], loan_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn loans_by_borrower(&self, borrower: &str) -> EconResult<Vec<LoanRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, lender_id, borrower_id, principal, interest, due_ms, paid
             FROM loans WHERE borrower_id = ?1 ORDER BY paid ASC, due_ms ASC",
        )?;
        let rows = stmt
            .query_map(params![borrower], loan_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
