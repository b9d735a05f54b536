//! Money movement. Every debit is guarded by the balance floor in SQL,
//! and every multi-leg mutation runs inside one transaction so a failing
//! leg rolls the whole command back.

use super::EconStore;
use crate::error::{EconError, EconResult};
use crate::types::Money;
use rusqlite::{params, Connection};

/// Conditional debit: zero rows touched means the balance could not
/// cover the amount, and nothing was mutated.
fn debit_on(conn: &Connection, user: &str, amount: Money) -> EconResult<()> {
    debug_assert!(amount >= 0);
    let rows = conn.execute(
        "UPDATE accounts SET balance = balance - ?1 WHERE id = ?2 AND balance >= ?1",
        params![amount, user],
    )?;
    if rows == 0 {
        return Err(EconError::InsufficientFunds);
    }
    Ok(())
}

fn credit_on(conn: &Connection, user: &str, amount: Money) -> EconResult<()> {
    debug_assert!(amount >= 0);
    conn.execute(
        "UPDATE accounts SET balance = balance + ?1 WHERE id = ?2",
        params![amount, user],
    )?;
    Ok(())
}

impl EconStore {
    pub fn balance(&self, user: &str) -> EconResult<Money> {
        Ok(self.require_account(user)?.balance)
    }

    pub fn credit(&self, user: &str, amount: Money) -> EconResult<()> {
        credit_on(&self.conn, user, amount)
    }

    pub fn debit(&self, user: &str, amount: Money) -> EconResult<()> {
        debit_on(&self.conn, user, amount)
    }

    /// Peer transfer: both legs or neither.
    pub fn transfer(&self, from: &str, to: &str, amount: Money) -> EconResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        debit_on(&tx, from, amount)?;
        credit_on(&tx, to, amount)?;
        tx.commit()?;
        Ok(())
    }

    /// Apply a game settlement: the player's payout plus the house leg.
    /// The wager was debited when the round started. A house leg the
    /// house cannot cover aborts the whole settlement.
    pub fn settle_game(
        &self,
        user: &str,
        payout: Money,
        house: &str,
        house_delta: Money,
    ) -> EconResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        if payout > 0 {
            credit_on(&tx, user, payout)?;
        }
        if house_delta > 0 {
            credit_on(&tx, house, house_delta)?;
        } else if house_delta < 0 {
            debit_on(&tx, house, -house_delta)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Synchronous round (slots): wager out, payout in, one transaction.
    pub fn settle_round(&self, user: &str, wager: Money, payout: Money) -> EconResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        debit_on(&tx, user, wager)?;
        if payout > 0 {
            credit_on(&tx, user, payout)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn top_accounts(&self, count: usize) -> EconResult<Vec<(String, Money)>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, balance FROM accounts ORDER BY balance DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![count as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
