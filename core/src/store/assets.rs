//! Asset ownership: one table per class, binary ownership per index.

use super::EconStore;
use crate::catalog::AssetClass;
use crate::error::{EconError, EconResult};
use crate::types::{EpochMs, Money};
use rusqlite::params;

fn table(class: AssetClass) -> &'static str {
    match class {
        AssetClass::House => "houses",
        AssetClass::Business => "businesses",
        AssetClass::IllegalBusiness => "illegal_businesses",
    }
}

impl EconStore {
    pub fn owns_asset(&self, user: &str, class: AssetClass, index: usize) -> EconResult<bool> {
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE user_id = ?1 AND asset_index = ?2",
                table(class)
            ),
            params![user, index as i64],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn owned_assets(&self, user: &str, class: AssetClass) -> EconResult<Vec<usize>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT asset_index FROM {} WHERE user_id = ?1 ORDER BY asset_index ASC",
            table(class)
        ))?;
        let rows = stmt
            .query_map(params![user], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().map(|i| i as usize).collect())
    }

    /// Debit the price and record ownership, atomically.
    pub fn purchase_asset(
        &self,
        user: &str,
        class: AssetClass,
        index: usize,
        price: Money,
    ) -> EconResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let rows = tx.execute(
            "UPDATE accounts SET balance = balance - ?1 WHERE id = ?2 AND balance >= ?1",
            params![price, user],
        )?;
        if rows == 0 {
            return Err(EconError::InsufficientFunds);
        }
        tx.execute(
            &format!(
                "INSERT OR IGNORE INTO {} (user_id, asset_index) VALUES (?1, ?2)",
                table(class)
            ),
            params![user, index as i64],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Administrative removal. Returns false if the row did not exist.
    pub fn remove_asset(&self, user: &str, class: AssetClass, index: usize) -> EconResult<bool> {
        let rows = self.conn.execute(
            &format!(
                "DELETE FROM {} WHERE user_id = ?1 AND asset_index = ?2",
                table(class)
            ),
            params![user, index as i64],
        )?;
        Ok(rows > 0)
    }

    /// Passive-income claim: credit the accrued income, stamp the claim
    /// time, and grant one unit of each illegal business's consumable —
    /// all or nothing.
    pub fn claim_passive(
        &self,
        user: &str,
        income: Money,
        now: EpochMs,
        grants: &[&str],
    ) -> EconResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE accounts SET balance = balance + ?1, last_passive_ms = ?2 WHERE id = ?3",
            params![income, now, user],
        )?;
        for item in grants {
            tx.execute(
                "INSERT INTO inventory (user_id, item, quantity) VALUES (?1, ?2, 1)
                 ON CONFLICT(user_id, item) DO UPDATE SET quantity = quantity + 1",
                params![user, item],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
